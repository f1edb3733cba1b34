//! Cache rebuild policy against a scripted offscreen device.

use tilefill::{
    Color, Pixmap, PixmapCanvas, RendererConfig, SurfaceStatus, WallpaperRenderer,
};
use tilefill_test_scenes::ScriptedSurfaceFactory;

fn pattern() -> Pixmap {
    Pixmap::from_fn(16, 16, |x, y| {
        if (x / 4 + y / 4) % 2 == 0 {
            Color::rgba(200, 20, 20, 160)
        } else {
            Color::TRANSPARENT
        }
    })
}

fn scripted_renderer() -> (WallpaperRenderer, ScriptedSurfaceFactory) {
    let factory = ScriptedSurfaceFactory::new();
    let config = RendererConfig::default().with_min_block_size(1, 1);
    let mut renderer = WallpaperRenderer::with_surface_factory(config, factory.clone());
    renderer.set_tile(Some(pattern()));
    renderer.set_background_color(Some(Color::rgb(10, 90, 30)));
    renderer.set_alpha(0.8);
    (renderer, factory)
}

fn render(renderer: &mut WallpaperRenderer, width: u32, height: u32, allow_cache: bool) -> Pixmap {
    let mut frame = Pixmap::new(width, height);
    renderer.render(&mut PixmapCanvas::new(&mut frame), width, height, allow_cache);
    frame
}

#[test]
fn first_cached_render_allocates_and_paints() {
    let (mut renderer, factory) = scripted_renderer();

    let cached = render(&mut renderer, 100, 60, true);

    assert_eq!(factory.script().borrow().created, vec![(112, 64)]);
    assert_eq!(renderer.metrics().redraws, 1);
    assert_eq!(cached, render(&mut renderer, 100, 60, false));
}

#[test]
fn restored_surface_is_repainted_in_place() {
    let (mut renderer, factory) = scripted_renderer();
    let reference = render(&mut renderer, 100, 60, false);
    render(&mut renderer, 100, 60, true);

    factory
        .script()
        .borrow_mut()
        .pending_statuses
        .push_back(SurfaceStatus::RestoredNeedsRedraw);
    let frame = render(&mut renderer, 100, 60, true);

    assert_eq!(frame, reference);
    assert_eq!(renderer.metrics().allocations, 1);
    assert_eq!(renderer.metrics().redraws, 2);
}

#[test]
fn incompatible_surface_is_reallocated() {
    let (mut renderer, factory) = scripted_renderer();
    let reference = render(&mut renderer, 100, 60, false);
    render(&mut renderer, 100, 60, true);

    factory
        .script()
        .borrow_mut()
        .pending_statuses
        .push_back(SurfaceStatus::Incompatible);
    let frame = render(&mut renderer, 100, 60, true);

    assert_eq!(frame, reference);
    assert_eq!(factory.script().borrow().created.len(), 2);
    assert_eq!(renderer.metrics().allocations, 2);
    assert_eq!(renderer.metrics().discards, 1);
}

#[test]
fn contents_lost_after_blit_redraws_directly_in_same_frame() {
    let (mut renderer, factory) = scripted_renderer();
    let reference = render(&mut renderer, 100, 60, false);
    renderer.reset_metrics();

    // Survives the check after painting, fails the one after the blit.
    factory.script().borrow_mut().lose_contents_after_checks = Some(1);
    let frame = render(&mut renderer, 100, 60, true);

    assert_eq!(frame, reference);
    let metrics = renderer.metrics();
    assert_eq!(metrics.content_lost, 1);
    assert_eq!(metrics.cached_frames, 0);
    assert_eq!(metrics.direct_frames, 1);
    assert!(!renderer.has_cache());

    // The next frame rebuilds the cache.
    let frame = render(&mut renderer, 100, 60, true);
    assert_eq!(frame, reference);
    assert_eq!(renderer.metrics().allocations, 2);
    assert_eq!(renderer.metrics().cached_frames, 1);
}

#[test]
fn contents_lost_while_painting_falls_back() {
    let (mut renderer, factory) = scripted_renderer();
    let reference = render(&mut renderer, 100, 60, false);

    factory.script().borrow_mut().lose_contents_after_checks = Some(0);
    let frame = render(&mut renderer, 100, 60, true);

    assert_eq!(frame, reference);
    assert_eq!(renderer.metrics().content_lost, 1);
    assert!(!renderer.has_cache());
}

#[test]
fn refused_allocation_is_not_retried_until_size_changes() {
    let (mut renderer, factory) = scripted_renderer();
    factory.script().borrow_mut().refuse_allocations = true;
    let reference = render(&mut renderer, 100, 60, false);

    assert_eq!(render(&mut renderer, 100, 60, true), reference);
    assert_eq!(render(&mut renderer, 100, 60, true), reference);
    assert_eq!(renderer.metrics().allocation_failures, 1);

    factory.script().borrow_mut().refuse_allocations = false;
    render(&mut renderer, 100, 60, true);
    assert_eq!(renderer.metrics().allocations, 0);

    render(&mut renderer, 200, 60, true);
    assert_eq!(renderer.metrics().allocations, 1);
    assert_eq!(factory.script().borrow().created, vec![(208, 64)]);
}

#[test]
fn tile_change_retries_refused_allocation() {
    let (mut renderer, factory) = scripted_renderer();
    factory.script().borrow_mut().refuse_allocations = true;
    render(&mut renderer, 100, 60, true);

    factory.script().borrow_mut().refuse_allocations = false;
    renderer.set_tile(Some(pattern()));
    render(&mut renderer, 100, 60, true);

    assert_eq!(renderer.metrics().allocations, 1);
}

#[test]
fn background_change_keeps_surface() {
    let (mut renderer, factory) = scripted_renderer();
    render(&mut renderer, 100, 60, true);

    renderer.set_background_color(Some(Color::rgb(250, 250, 0)));
    let frame = render(&mut renderer, 100, 60, true);

    assert_eq!(factory.script().borrow().created.len(), 1);
    assert_eq!(renderer.metrics().redraws, 2);
    assert_eq!(frame, render(&mut renderer, 100, 60, false));
}

#[test]
fn viewport_drift_policy() {
    let (mut renderer, factory) = scripted_renderer();
    render(&mut renderer, 320, 320, true);

    // Within 20% of the ideal size.
    render(&mut renderer, 352, 300, true);
    assert_eq!(factory.script().borrow().created.len(), 1);

    // Beyond it.
    render(&mut renderer, 480, 320, true);
    assert_eq!(factory.script().borrow().created, vec![(320, 320), (480, 320)]);
}

#[test]
fn direct_requests_never_touch_the_device() {
    let (mut renderer, factory) = scripted_renderer();
    render(&mut renderer, 100, 60, false);
    render(&mut renderer, 100, 60, false);

    let script = factory.script();
    let script = script.borrow();
    assert!(script.created.is_empty());
    assert_eq!(script.validations, 0);
}
