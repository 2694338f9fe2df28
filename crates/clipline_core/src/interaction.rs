use crate::config::EditorConfig;
use crate::editing::{find_clip_location, set_clip_range, transfer_clip};
use crate::hit_test::{cursor_for, hit_test, HitKind};
use crate::overlap::{resolve, Resolution};
use crate::scene::SceneState;
use crate::types::{Cursor, HandleSide, SelectedClip, TimeRange};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging {
        clip_id: Uuid,
        /// Track the clip sat on when the drag began; a reverted drop returns here.
        origin_track_id: Uuid,
        /// Pointer X minus the clip's left edge at pointer-down.
        drag_offset_x: f64,
    },
    Trimming {
        clip_id: Uuid,
        handle: HandleSide,
    },
}

/// Per-clip interaction flags for renderers. Never stored on the clip itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClipTransient {
    pub is_dragging: bool,
    pub resize_handle: Option<HandleSide>,
}

/// What a pointer-up did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    /// No gesture was in progress.
    Idle,
    Moved(Resolution),
    Trimmed(TimeRange),
    /// The clip vanished during the gesture.
    Stale,
}

/// Select, drag-move and trim. Pointer handlers never fail: positions are
/// clamped and a clip that vanishes mid-gesture ends the gesture.
#[derive(Debug, Default)]
pub struct InteractionMachine {
    gesture: Gesture,
}

impl InteractionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_active(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    pub fn transient(&self, clip_id: Uuid) -> ClipTransient {
        match self.gesture {
            Gesture::Dragging { clip_id: id, .. } if id == clip_id => ClipTransient {
                is_dragging: true,
                resize_handle: None,
            },
            Gesture::Trimming { clip_id: id, handle } if id == clip_id => ClipTransient {
                is_dragging: false,
                resize_handle: Some(handle),
            },
            _ => ClipTransient::default(),
        }
    }

    /// Drop any gesture without committing. Used when the scene is replaced.
    pub fn reset(&mut self) {
        self.gesture = Gesture::Idle;
    }

    // -----------------------------------------------------------------------
    // pointer down
    // -----------------------------------------------------------------------

    /// Returns `true` when a drag or trim started.
    pub fn pointer_down(
        &mut self,
        scene: &mut SceneState,
        config: &EditorConfig,
        x: f64,
        y: f64,
    ) -> bool {
        let flags = scene.flags();
        if flags.playhead_dragging || flags.timeline_dragging {
            return false;
        }
        if self.is_active() {
            self.pointer_up(scene, config);
        }

        let Some(hit) = hit_test(scene, config, x, y) else {
            if scene.selection().is_some() {
                tracing::debug!("pointer down on empty space, clearing selection");
                scene.set_selected_clip(None);
            }
            return false;
        };
        let Some(clip) = scene.clip(hit.clip_id) else {
            return false;
        };
        let range = clip.range();
        let selection = SelectedClip::of(clip);

        if scene.selection() != Some(&selection) {
            scene.set_selected_clip(Some(selection));
        }

        match hit.kind {
            HitKind::Body => {
                tracing::debug!("drag started on clip {} at {}", hit.clip_id, range);
                self.gesture = Gesture::Dragging {
                    clip_id: hit.clip_id,
                    origin_track_id: hit.track_id,
                    drag_offset_x: x - hit.clip_start_x,
                };
                scene.set_cursor(Cursor::Move);
            }
            HitKind::Handle(handle) => {
                tracing::debug!("trim {:?} started on clip {} at {}", handle, hit.clip_id, range);
                self.gesture = Gesture::Trimming {
                    clip_id: hit.clip_id,
                    handle,
                };
                scene.set_cursor(Cursor::EwResize);
            }
        }
        scene.set_clipping_or_dragging(true);
        true
    }

    // -----------------------------------------------------------------------
    // pointer move
    // -----------------------------------------------------------------------

    pub fn pointer_move(&mut self, scene: &mut SceneState, config: &EditorConfig, x: f64, y: f64) {
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Dragging {
                clip_id,
                drag_offset_x,
                ..
            } => self.drag_to(scene, config, clip_id, drag_offset_x, x, y),
            Gesture::Trimming { clip_id, handle } => self.trim_to(scene, config, clip_id, handle, x),
        }
    }

    /// Update the cursor for a pointer moving with no button held.
    pub fn hover(&self, scene: &mut SceneState, config: &EditorConfig, x: f64, y: f64) -> Cursor {
        let flags = scene.flags();
        if self.is_active() || flags.timeline_dragging || flags.playhead_dragging {
            return scene.cursor();
        }
        let cursor = cursor_for(hit_test(scene, config, x, y).as_ref());
        scene.set_cursor(cursor);
        cursor
    }

    fn drag_to(
        &mut self,
        scene: &mut SceneState,
        config: &EditorConfig,
        clip_id: Uuid,
        drag_offset_x: f64,
        x: f64,
        y: f64,
    ) {
        let Some((row, ci)) = find_clip_location(scene.tracks(), clip_id) else {
            self.abandon(scene, clip_id);
            return;
        };
        let clip = &scene.tracks()[row].clips[ci];
        let kind = clip.kind;
        let clip_duration = clip.duration();

        let target_row = config
            .row_at(y, scene.tracks().len())
            .filter(|&r| scene.tracks()[r].kind == kind)
            .unwrap_or(row);

        if target_row != row {
            tracing::trace!("clip {} crosses from row {} to row {}", clip_id, row, target_row);
            if let Err(e) = scene.update_tracks(|tracks| transfer_clip(tracks, clip_id, target_row)) {
                tracing::warn!("row change for clip {} refused: {}", clip_id, e);
            }
            return;
        }

        let max_start = (scene.duration() - clip_duration).max(0.0);
        let start = scene
            .projector()
            .pixel_to_time(x - drag_offset_x)
            .min(max_start)
            .max(0.0);
        let range = TimeRange::new(start, start + clip_duration);
        tracing::trace!("clip {} dragged to {}", clip_id, range);
        if let Err(e) = scene.update_tracks(|tracks| set_clip_range(tracks, clip_id, range)) {
            tracing::warn!("drag of clip {} not applied: {}", clip_id, e);
        }
    }

    fn trim_to(
        &mut self,
        scene: &mut SceneState,
        config: &EditorConfig,
        clip_id: Uuid,
        handle: HandleSide,
        x: f64,
    ) {
        let Some((row, ci)) = find_clip_location(scene.tracks(), clip_id) else {
            self.abandon(scene, clip_id);
            return;
        };
        let track = &scene.tracks()[row];
        let clip = &track.clips[ci];
        let min_duration = config.min_clip_duration(scene.scale());
        let t = scene.projector().pixel_to_time(x);

        let range = match handle {
            HandleSide::Left => {
                let lo = track
                    .prev_end_before(clip_id, clip.start_time)
                    .unwrap_or(0.0)
                    .max(0.0);
                let hi = clip.end_time - min_duration;
                if lo > hi {
                    return;
                }
                TimeRange::new(t.max(lo).min(hi), clip.end_time)
            }
            HandleSide::Right => {
                let lo = clip.start_time + min_duration;
                let hi = track
                    .next_start_after(clip_id, clip.end_time)
                    .unwrap_or(scene.duration())
                    .min(scene.duration());
                if lo > hi {
                    return;
                }
                TimeRange::new(clip.start_time, t.max(lo).min(hi))
            }
        };
        tracing::trace!("clip {} trimmed to {}", clip_id, range);
        if let Err(e) = scene.update_tracks(|tracks| set_clip_range(tracks, clip_id, range)) {
            tracing::warn!("trim of clip {} not applied: {}", clip_id, e);
        }
    }

    // -----------------------------------------------------------------------
    // pointer up
    // -----------------------------------------------------------------------

    /// End the current gesture. Also used for pointer-leave.
    pub fn pointer_up(&mut self, scene: &mut SceneState, _config: &EditorConfig) -> Release {
        let gesture = std::mem::take(&mut self.gesture);
        let release = match gesture {
            Gesture::Idle => return Release::Idle,
            Gesture::Dragging {
                clip_id,
                origin_track_id,
                ..
            } => self.commit_drag(scene, clip_id, origin_track_id),
            Gesture::Trimming { clip_id, .. } => match scene.clip(clip_id) {
                Some(clip) => {
                    tracing::debug!("trim committed for clip {} at {}", clip_id, clip.range());
                    Release::Trimmed(clip.range())
                }
                None => Release::Stale,
            },
        };

        match release {
            Release::Stale => scene.set_selected_clip(None),
            _ => self.refresh_selection(scene, gesture_clip(&gesture)),
        }
        scene.set_clipping_or_dragging(false);
        scene.set_cursor(Cursor::Default);
        release
    }

    fn commit_drag(&mut self, scene: &mut SceneState, clip_id: Uuid, origin_track_id: Uuid) -> Release {
        let Some((row, ci)) = find_clip_location(scene.tracks(), clip_id) else {
            tracing::debug!("dragged clip {} vanished before release", clip_id);
            return Release::Stale;
        };
        let track = &scene.tracks()[row];
        let candidate = track.clips[ci].range();
        let others = track.other_ranges(clip_id);
        let origin = scene
            .selection()
            .filter(|s| s.clip_id == clip_id)
            .map(|s| s.origin_time)
            .unwrap_or(candidate);

        let resolution = resolve(candidate, &others, origin, scene.duration());
        match resolution {
            Resolution::Accepted(range) => {
                tracing::debug!("drop of clip {} accepted at {}", clip_id, range);
            }
            Resolution::Snapped(range) => {
                tracing::info!("drop of clip {} snapped from {} to {}", clip_id, candidate, range);
            }
            Resolution::Reverted(range) => {
                tracing::info!("drop of clip {} at {} reverted to {}", clip_id, candidate, range);
                if track.id != origin_track_id {
                    if let Some(origin_row) = scene.tracks().iter().position(|t| t.id == origin_track_id) {
                        if let Err(e) =
                            scene.update_tracks(|tracks| transfer_clip(tracks, clip_id, origin_row))
                        {
                            tracing::warn!("clip {} not returned to row {}: {}", clip_id, origin_row, e);
                        }
                    }
                }
            }
        }

        let range = resolution.range();
        if let Err(e) = scene.update_tracks(|tracks| set_clip_range(tracks, clip_id, range)) {
            tracing::warn!("could not commit drop of clip {}: {}", clip_id, e);
            return Release::Stale;
        }
        Release::Moved(resolution)
    }

    fn refresh_selection(&self, scene: &mut SceneState, clip_id: Option<Uuid>) {
        let Some(clip_id) = clip_id else {
            return;
        };
        match scene.clip(clip_id) {
            Some(clip) => {
                let fresh = SelectedClip::of(clip);
                if scene.selection() != Some(&fresh) {
                    scene.set_selected_clip(Some(fresh));
                }
            }
            None => scene.set_selected_clip(None),
        }
    }

    /// The gesture's clip is gone: return to Idle and drop the selection.
    fn abandon(&mut self, scene: &mut SceneState, clip_id: Uuid) {
        tracing::debug!("clip {} vanished mid-gesture", clip_id);
        self.gesture = Gesture::Idle;
        scene.set_selected_clip(None);
        scene.set_clipping_or_dragging(false);
        scene.set_cursor(Cursor::Default);
    }
}

fn gesture_clip(gesture: &Gesture) -> Option<Uuid> {
    match gesture {
        Gesture::Idle => None,
        Gesture::Dragging { clip_id, .. } | Gesture::Trimming { clip_id, .. } => Some(*clip_id),
    }
}
