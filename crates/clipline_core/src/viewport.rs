use crate::config::EditorConfig;
use crate::scene::{SceneState, Viewport};

/// Largest scroll offset that still keeps the end of the timeline on screen.
pub fn max_scroll(viewport: &Viewport) -> f64 {
    (viewport.duration * viewport.scale - viewport.width).max(0.0)
}

pub fn clamp_scroll(viewport: &Viewport, scroll_left: f64) -> f64 {
    scroll_left.min(max_scroll(viewport)).max(0.0)
}

/// Owns the transient state of a ruler drag; everything else lives in the scene.
#[derive(Debug, Default)]
pub struct ViewportController {
    pan_anchor: Option<f64>,
}

impl ViewportController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp and apply a new scale, then re-clamp the scroll offset for it.
    pub fn set_scale(&self, scene: &mut SceneState, config: &EditorConfig, scale: f64) -> f64 {
        let scale = config.clamp_scale(scale);
        scene.set_scale(scale);
        let scroll = clamp_scroll(&scene.viewport(), scene.scroll_left());
        if scroll != scene.scroll_left() {
            scene.set_scroll_left(scroll);
        }
        scale
    }

    pub fn set_scroll_left(&self, scene: &mut SceneState, scroll_left: f64) -> f64 {
        let scroll = clamp_scroll(&scene.viewport(), scroll_left);
        scene.set_scroll_left(scroll);
        scroll
    }

    pub fn set_viewport_width(&self, scene: &mut SceneState, width: f64) {
        scene.set_viewport_width(width.max(0.0));
        let scroll = clamp_scroll(&scene.viewport(), scene.scroll_left());
        if scroll != scene.scroll_left() {
            scene.set_scroll_left(scroll);
        }
    }

    /// Zoom so the time under `pointer_x` stays under `pointer_x`.
    pub fn zoom_around(
        &self,
        scene: &mut SceneState,
        config: &EditorConfig,
        pointer_x: f64,
        new_scale: f64,
    ) {
        let time_at_pointer = scene.projector().pixel_to_time(pointer_x);
        let scale = config.clamp_scale(new_scale);
        scene.set_scale(scale);
        self.set_scroll_left(scene, time_at_pointer * scale - pointer_x);
    }

    /// Mouse wheel: `delta_y > 0` zooms out.
    pub fn wheel_zoom(
        &self,
        scene: &mut SceneState,
        config: &EditorConfig,
        pointer_x: f64,
        delta_y: f64,
    ) {
        let target = scene.scale() - delta_y * config.wheel_zoom_factor;
        self.zoom_around(scene, config, pointer_x, target);
    }

    pub fn zoom_in(&self, scene: &mut SceneState, config: &EditorConfig) -> f64 {
        self.set_scale(scene, config, scene.scale() + config.scale_step)
    }

    pub fn zoom_out(&self, scene: &mut SceneState, config: &EditorConfig) -> f64 {
        self.set_scale(scene, config, scene.scale() - config.scale_step)
    }

    // -- ruler drag ---------------------------------------------------------

    /// Start panning. Refused while a clip gesture or playhead drag owns the pointer.
    pub fn begin_pan(&mut self, scene: &mut SceneState, x: f64) -> bool {
        let flags = scene.flags();
        if flags.clipping_or_dragging || flags.playhead_dragging {
            return false;
        }
        self.pan_anchor = Some(x);
        scene.set_timeline_dragging(true);
        true
    }

    pub fn pan_to(&mut self, scene: &mut SceneState, x: f64) {
        let Some(anchor) = self.pan_anchor else {
            return;
        };
        let delta = x - anchor;
        self.set_scroll_left(scene, scene.scroll_left() - delta);
        self.pan_anchor = Some(x);
    }

    pub fn end_pan(&mut self, scene: &mut SceneState) {
        if self.pan_anchor.take().is_some() || scene.flags().timeline_dragging {
            scene.set_timeline_dragging(false);
        }
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }
}
