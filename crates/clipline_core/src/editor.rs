use crate::config::EditorConfig;
use crate::editing;
use crate::error::{CoreError, Result};
use crate::frame::{DirtyKind, DirtySet, FrameScheduler, FrameTicket};
use crate::interaction::{ClipTransient, Gesture, InteractionMachine, Release};
use crate::playhead;
use crate::ruler::{self, Tick};
use crate::scene::{InteractionFlags, SceneState, Viewport};
use crate::types::*;
use crate::viewport::ViewportController;
use serde::Serialize;
use uuid::Uuid;

/// Serializable view of everything a renderer needs.
#[derive(Debug, Clone, Serialize)]
pub struct SceneSnapshot {
    pub tracks: Vec<Track>,
    pub viewport: Viewport,
    pub selection: Option<SelectedClip>,
    pub playhead: f64,
    pub cursor: Cursor,
    pub flags: InteractionFlags,
    pub revision: u64,
}

/// Owns the scene and every controller that mutates it.
///
/// All edits go through these methods; each one ends by folding the scene's
/// change log into a pending frame request.
#[derive(Debug)]
pub struct TimelineEditor {
    config: EditorConfig,
    scene: SceneState,
    interaction: InteractionMachine,
    viewport: ViewportController,
    frames: FrameScheduler,
    media: Option<MediaSource>,
    generation: Generation,
}

impl Default for TimelineEditor {
    fn default() -> Self {
        Self::from_valid_config(EditorConfig::default())
    }
}

impl TimelineEditor {
    pub fn new(config: EditorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: EditorConfig) -> Self {
        let scene = SceneState::new(config.default_scale, config.viewport_width);
        Self {
            config,
            scene,
            interaction: InteractionMachine::new(),
            viewport: ViewportController::new(),
            frames: FrameScheduler::new(),
            media: None,
            generation: Generation::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn media(&self) -> Option<&MediaSource> {
        self.media.as_ref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn gesture(&self) -> Gesture {
        self.interaction.gesture()
    }

    pub fn transient(&self, clip_id: Uuid) -> ClipTransient {
        self.interaction.transient(clip_id)
    }

    pub fn min_clip_duration(&self) -> f64 {
        self.config.min_clip_duration(self.scene.scale())
    }

    pub fn playhead_screen_x(&self) -> f64 {
        playhead::screen_x(&self.scene)
    }

    /// Ticks for the visible part of the ruler.
    pub fn ruler_ticks(&self) -> Vec<Tick> {
        let viewport = self.scene.viewport();
        ruler::ticks(
            viewport.scale,
            viewport.scroll_left,
            viewport.width,
            self.config.ruler_left_inset,
            self.config.default_scale,
        )
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            tracks: self.scene.tracks().to_vec(),
            viewport: self.scene.viewport(),
            selection: self.scene.selection().cloned(),
            playhead: self.scene.playhead(),
            cursor: self.scene.cursor(),
            flags: self.scene.flags(),
            revision: self.scene.revision(),
        }
    }

    /// The coalesced redraw for this animation frame, if anything changed.
    pub fn take_frame(&mut self) -> Option<FrameTicket> {
        self.frames.take_due()
    }

    /// Ask for a redraw that no scene change triggers, e.g. a thumbnail arriving.
    pub fn request_frame(&mut self, kind: DirtyKind) {
        self.frames.request(kind);
    }

    fn settle(&mut self) {
        let mut dirty = DirtySet::default();
        for change in self.scene.take_changes() {
            dirty.merge(change.into());
        }
        if !dirty.is_empty() {
            self.frames.request(dirty);
        }
    }

    // -----------------------------------------------------------------------
    // Media
    // -----------------------------------------------------------------------

    /// Replace the scene with one video track and its derived audio track.
    /// Returns the new media generation.
    pub fn load_media(&mut self, source: MediaSource) -> Result<Generation> {
        if !(source.duration.is_finite() && source.duration > 0.0) {
            return Err(CoreError::InvalidOperation(format!(
                "media {} has no usable duration ({})",
                source.id, source.duration
            )));
        }
        let duration = source.duration;
        let extent = TimeRange::new(0.0, duration);

        let mut video = Track::new(
            TrackKind::Video,
            0,
            extent,
            self.config.track_height_for(TrackKind::Video),
        );
        video.clips.push(Clip::new(Uuid::new_v4(), &video, extent));
        let mut audio = Track::new(
            TrackKind::Audio,
            1,
            extent,
            self.config.track_height_for(TrackKind::Audio),
        );
        audio.clips.push(Clip::new(Uuid::new_v4(), &audio, extent));

        self.interaction.reset();
        self.viewport.end_pan(&mut self.scene);
        playhead::end_drag(&mut self.scene);

        self.scene.set_tracks(vec![video, audio]);
        self.scene.set_duration(duration);
        self.scene.set_selected_clip(None);
        self.viewport
            .set_scale(&mut self.scene, &self.config, self.config.default_scale);
        self.scene.set_scroll_left(0.0);
        self.scene.set_playhead(0.0);
        self.scene.set_clipping_or_dragging(false);
        self.scene.set_cursor(Cursor::Default);

        self.generation = self.generation.next();
        tracing::info!(
            "Loaded media {} ({}x{}, {:.3}s) as {}",
            source.id,
            source.width,
            source.height,
            duration,
            self.generation
        );
        self.media = Some(source);
        self.settle();
        Ok(self.generation)
    }

    /// Set the derived audio clip's length once the decoded buffer is known.
    pub fn attach_audio(&mut self, audio_duration: f64) -> Result<()> {
        if self.media.is_none() {
            return Err(CoreError::NoMedia);
        }
        if !(audio_duration.is_finite() && audio_duration > 0.0) {
            return Err(CoreError::InvalidOperation(format!(
                "audio duration must be positive, got {}",
                audio_duration
            )));
        }
        let end = audio_duration.min(self.scene.duration());
        let height = self.config.track_height_for(TrackKind::Audio);
        let timeline = self.scene.duration();

        let removed: Vec<Uuid> = self.scene.update_tracks(|tracks| {
            let row = match tracks.iter().position(|t| t.kind == TrackKind::Audio) {
                Some(row) => row,
                None => {
                    let row = tracks.len();
                    tracks.push(Track::new(
                        TrackKind::Audio,
                        row,
                        TimeRange::new(0.0, timeline),
                        height,
                    ));
                    row
                }
            };
            let track = &mut tracks[row];
            let removed: Vec<Uuid> = track.clips.iter().map(|c| c.id).collect();
            let clip = Clip::new(Uuid::new_v4(), track, TimeRange::new(0.0, end));
            track.clips = vec![clip];
            removed
        });

        if self
            .scene
            .selection()
            .is_some_and(|s| removed.contains(&s.clip_id))
        {
            self.scene.set_selected_clip(None);
        }
        tracing::info!("Attached audio: {:.3}s", end);
        self.settle();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Pointer input on the track area
    // -----------------------------------------------------------------------

    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        let started = self
            .interaction
            .pointer_down(&mut self.scene, &self.config, x, y);
        self.settle();
        started
    }

    /// Button held: drives the active gesture. Otherwise behaves like [`Self::hover`].
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if self.interaction.is_active() {
            self.interaction
                .pointer_move(&mut self.scene, &self.config, x, y);
        } else {
            self.interaction.hover(&mut self.scene, &self.config, x, y);
        }
        self.settle();
    }

    pub fn hover(&mut self, x: f64, y: f64) -> Cursor {
        let cursor = self.interaction.hover(&mut self.scene, &self.config, x, y);
        self.settle();
        cursor
    }

    pub fn pointer_up(&mut self) -> Release {
        let release = self.interaction.pointer_up(&mut self.scene, &self.config);
        self.settle();
        release
    }

    /// Leaving the track area ends the gesture exactly like a release.
    pub fn pointer_leave(&mut self) -> Release {
        self.pointer_up()
    }

    // -----------------------------------------------------------------------
    // Viewport
    // -----------------------------------------------------------------------

    pub fn wheel(&mut self, pointer_x: f64, delta_y: f64) {
        self.viewport
            .wheel_zoom(&mut self.scene, &self.config, pointer_x, delta_y);
        self.settle();
    }

    pub fn zoom_in(&mut self) -> f64 {
        let scale = self.viewport.zoom_in(&mut self.scene, &self.config);
        self.settle();
        scale
    }

    pub fn zoom_out(&mut self) -> f64 {
        let scale = self.viewport.zoom_out(&mut self.scene, &self.config);
        self.settle();
        scale
    }

    pub fn set_scale(&mut self, scale: f64) -> f64 {
        let scale = self.viewport.set_scale(&mut self.scene, &self.config, scale);
        self.settle();
        scale
    }

    pub fn set_scroll_left(&mut self, scroll_left: f64) -> f64 {
        let scroll = self.viewport.set_scroll_left(&mut self.scene, scroll_left);
        self.settle();
        scroll
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport.set_viewport_width(&mut self.scene, width);
        self.settle();
    }

    pub fn begin_pan(&mut self, x: f64) -> bool {
        let started = self.viewport.begin_pan(&mut self.scene, x);
        if started {
            self.scene.set_cursor(Cursor::Grabbing);
        }
        self.settle();
        started
    }

    pub fn pan_to(&mut self, x: f64) {
        self.viewport.pan_to(&mut self.scene, x);
        self.settle();
    }

    pub fn end_pan(&mut self) {
        if self.viewport.is_panning() {
            self.viewport.end_pan(&mut self.scene);
            self.scene.set_cursor(Cursor::Default);
        }
        self.settle();
    }

    // -----------------------------------------------------------------------
    // Playhead
    // -----------------------------------------------------------------------

    pub fn playhead_down(&mut self) -> bool {
        let started = playhead::begin_drag(&mut self.scene);
        self.settle();
        started
    }

    pub fn playhead_move(&mut self, x: f64) {
        playhead::drag_to(&mut self.scene, x);
        self.settle();
    }

    pub fn seek(&mut self, time: f64) {
        playhead::seek(&mut self.scene, time);
        self.settle();
    }

    /// Window-level pointer-up: ends playhead drag and ruler pan.
    pub fn release_all(&mut self) {
        let was_panning = self.viewport.is_panning();
        self.viewport.end_pan(&mut self.scene);
        playhead::release_all(&mut self.scene);
        if was_panning {
            self.scene.set_cursor(Cursor::Default);
        }
        self.settle();
    }

    // -----------------------------------------------------------------------
    // Editing commands
    // -----------------------------------------------------------------------

    fn ensure_idle(&self, what: &str) -> Result<()> {
        if self.interaction.is_active() {
            return Err(CoreError::InvalidOperation(format!(
                "cannot {} during a drag or trim",
                what
            )));
        }
        Ok(())
    }

    /// Append a text clip on the text track, creating the track if needed.
    pub fn add_text_clip(&mut self) -> Result<Uuid> {
        if self.media.is_none() {
            return Err(CoreError::NoMedia);
        }
        self.ensure_idle("add a text clip")?;

        let label = self.config.text_clip_label.clone();
        let clip_duration = self.config.text_clip_duration;
        let timeline = self.scene.duration();
        let min_duration = self.min_clip_duration();
        let height = self.config.track_height_for(TrackKind::Text);

        let id = self.scene.update_tracks(|tracks| {
            editing::append_text_clip(tracks, &label, clip_duration, timeline, min_duration, height)
        });
        self.settle();
        let id = id?;
        tracing::info!("Added text clip {}", id);
        Ok(id)
    }

    /// Split `clip_id` at `at`. The left part keeps the id; returns the right part's id.
    pub fn split_clip(&mut self, clip_id: Uuid, at: f64) -> Result<Uuid> {
        self.ensure_idle("split")?;
        if self.scene.clip(clip_id).is_none() {
            return Err(CoreError::ClipNotFound(clip_id));
        }
        let min_duration = self.min_clip_duration();
        let right = self
            .scene
            .update_tracks(|tracks| editing::split_clip(tracks, clip_id, at, min_duration));
        let right = match right {
            Ok(id) => id,
            Err(e) => {
                self.settle();
                return Err(e);
            }
        };

        if let Some(left) = self.scene.clip(clip_id) {
            let selection = SelectedClip::of(left);
            self.scene.set_selected_clip(Some(selection));
        }
        tracing::info!("Split clip {} at {:.3}s into {}", clip_id, at, right);
        self.settle();
        Ok(right)
    }

    pub fn split_selected_at_playhead(&mut self) -> Result<Uuid> {
        let clip_id = self
            .scene
            .selection()
            .map(|s| s.clip_id)
            .ok_or(CoreError::NoSelection)?;
        if self.scene.clip(clip_id).is_none() {
            self.scene.set_selected_clip(None);
            self.settle();
            return Err(CoreError::ClipNotFound(clip_id));
        }
        self.split_clip(clip_id, self.scene.playhead())
    }

    /// Remove the selected clip and clear the selection.
    pub fn delete_selected(&mut self) -> Result<Clip> {
        let clip_id = self
            .scene
            .selection()
            .map(|s| s.clip_id)
            .ok_or(CoreError::NoSelection)?;

        let removed = if self.scene.clip(clip_id).is_some() {
            self.scene
                .update_tracks(|tracks| editing::remove_clip(tracks, clip_id))
        } else {
            Err(CoreError::ClipNotFound(clip_id))
        };
        self.scene.set_selected_clip(None);
        self.settle();

        let clip = removed?;
        tracing::info!("Deleted clip {} {}", clip.id, clip.range());
        Ok(clip)
    }
}
