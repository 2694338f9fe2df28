use crate::scene::SceneState;

/// Whether the playhead may take pointer input right now.
pub fn pointer_events_enabled(scene: &SceneState) -> bool {
    let flags = scene.flags();
    !(flags.clipping_or_dragging || flags.timeline_dragging)
}

pub fn begin_drag(scene: &mut SceneState) -> bool {
    if !pointer_events_enabled(scene) {
        return false;
    }
    scene.set_playhead_dragging(true);
    true
}

/// Follow the pointer while dragging. `x` is relative to the timeline viewport.
pub fn drag_to(scene: &mut SceneState, x: f64) {
    if !scene.flags().playhead_dragging {
        return;
    }
    let t = scene.projector().pixel_to_time(x);
    seek(scene, t);
}

pub fn end_drag(scene: &mut SceneState) {
    if scene.flags().playhead_dragging {
        scene.set_playhead_dragging(false);
    }
}

/// Jump to `time`, clamped to the timeline.
pub fn seek(scene: &mut SceneState, time: f64) {
    let position = time.min(scene.duration()).max(0.0);
    if position != scene.playhead() {
        scene.set_playhead(position);
    }
}

/// Left offset of the playhead inside the viewport, in whole pixels.
pub fn screen_x(scene: &SceneState) -> f64 {
    let viewport = scene.viewport();
    scene
        .projector()
        .time_to_pixel(scene.playhead())
        .floor()
        .min(viewport.width)
        .max(0.0)
}

/// Global pointer-up: ends a playhead drag and a ruler pan together.
pub fn release_all(scene: &mut SceneState) {
    end_drag(scene);
    if scene.flags().timeline_dragging {
        scene.set_timeline_dragging(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_scene() -> SceneState {
        let mut scene = SceneState::new(100.0, 800.0);
        scene.set_duration(20.0);
        scene
    }

    #[test]
    fn drag_follows_pointer_within_duration() {
        let mut scene = make_scene();
        assert!(begin_drag(&mut scene));
        drag_to(&mut scene, 350.0);
        assert_eq!(scene.playhead(), 3.5);

        drag_to(&mut scene, -40.0);
        assert_eq!(scene.playhead(), 0.0);

        scene.set_scroll_left(1_500.0);
        drag_to(&mut scene, 700.0);
        assert_eq!(scene.playhead(), 20.0);

        end_drag(&mut scene);
        drag_to(&mut scene, 100.0);
        assert_eq!(scene.playhead(), 20.0);
    }

    #[test]
    fn suspended_during_clip_gesture_or_pan() {
        let mut scene = make_scene();
        scene.set_clipping_or_dragging(true);
        assert!(!pointer_events_enabled(&scene));
        assert!(!begin_drag(&mut scene));

        scene.set_clipping_or_dragging(false);
        scene.set_timeline_dragging(true);
        assert!(!begin_drag(&mut scene));
        assert!(!scene.flags().playhead_dragging);
    }

    #[test]
    fn screen_x_is_clamped_and_floored() {
        let mut scene = make_scene();
        seek(&mut scene, 2.345);
        assert_eq!(screen_x(&scene), 234.0);

        scene.set_scroll_left(400.0);
        assert_eq!(screen_x(&scene), 0.0);

        seek(&mut scene, 19.0);
        scene.set_scroll_left(0.0);
        assert_eq!(screen_x(&scene), 800.0);
    }

    #[test]
    fn release_all_clears_both_drags() {
        let mut scene = make_scene();
        begin_drag(&mut scene);
        scene.set_timeline_dragging(true);
        release_all(&mut scene);
        let flags = scene.flags();
        assert!(!flags.playhead_dragging);
        assert!(!flags.timeline_dragging);
    }
}
