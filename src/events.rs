use std::sync::Arc;

use smallvec::SmallVec;

use crate::{Color, Tile};

/// A property change of a [`WallpaperRenderer`](crate::WallpaperRenderer).
///
/// Events are only emitted when the value actually changed.
#[derive(Debug, Clone)]
pub enum WallpaperEvent {
    TileChanged {
        old: Option<Arc<Tile>>,
        new: Option<Arc<Tile>>,
    },
    BackgroundColorChanged {
        old: Color,
        new: Color,
    },
    AlphaChanged {
        old: f32,
        new: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&WallpaperEvent)>;

/// Ordered list of change listeners.
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: SmallVec<[(ListenerId, Listener); 2]>,
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl Listeners {
    pub fn subscribe(&mut self, listener: impl FnMut(&WallpaperEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Delivers `event` to every listener in subscription order.
    pub fn notify(&mut self, event: &WallpaperEvent) {
        for (_, listener) in self.entries.iter_mut() {
            listener(event);
        }
    }
}
