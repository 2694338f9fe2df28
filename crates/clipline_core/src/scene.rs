use crate::projector::Projector;
use crate::types::{Clip, Cursor, SelectedClip, Track};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub scroll_left: f64,
    pub width: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InteractionFlags {
    pub clipping_or_dragging: bool,
    pub timeline_dragging: bool,
    pub playhead_dragging: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneChange {
    Tracks,
    Scale,
    ScrollLeft,
    ViewportWidth,
    Duration,
    Selection,
    Playhead,
    Flags,
    Cursor,
}

/// Plain container. Setters bump the revision and record a change; they
/// do not validate.
#[derive(Debug, Clone)]
pub struct SceneState {
    tracks: Vec<Track>,
    viewport: Viewport,
    selection: Option<SelectedClip>,
    flags: InteractionFlags,
    playhead: f64,
    cursor: Cursor,
    revision: u64,
    changes: Vec<SceneChange>,
}

impl SceneState {
    pub fn new(scale: f64, viewport_width: f64) -> Self {
        Self {
            tracks: vec![],
            viewport: Viewport {
                scale,
                scroll_left: 0.0,
                width: viewport_width,
                duration: 0.0,
            },
            selection: None,
            flags: InteractionFlags::default(),
            playhead: 0.0,
            cursor: Cursor::Default,
            revision: 0,
            changes: vec![],
        }
    }

    fn touch(&mut self, change: SceneChange) {
        self.revision += 1;
        if !self.changes.contains(&change) {
            self.changes.push(change);
        }
    }

    // -- reads --------------------------------------------------------------

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scale(&self) -> f64 {
        self.viewport.scale
    }

    pub fn scroll_left(&self) -> f64 {
        self.viewport.scroll_left
    }

    pub fn duration(&self) -> f64 {
        self.viewport.duration
    }

    pub fn selection(&self) -> Option<&SelectedClip> {
        self.selection.as_ref()
    }

    pub fn flags(&self) -> InteractionFlags {
        self.flags
    }

    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Bumped by every setter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn projector(&self) -> Projector {
        Projector::new(self.viewport.scale, self.viewport.scroll_left)
    }

    pub fn track(&self, track_id: Uuid) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == track_id)
    }

    pub fn clip(&self, clip_id: Uuid) -> Option<&Clip> {
        self.tracks
            .iter()
            .flat_map(|t| t.clips.iter())
            .find(|c| c.id == clip_id)
    }

    pub fn selected_clip(&self) -> Option<&Clip> {
        self.selection.as_ref().and_then(|s| self.clip(s.clip_id))
    }

    /// Changes recorded since the last call, in first-seen order.
    pub fn take_changes(&mut self) -> Vec<SceneChange> {
        std::mem::take(&mut self.changes)
    }

    // -- writes -------------------------------------------------------------

    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.touch(SceneChange::Tracks);
    }

    /// Edit the track list in place as one change.
    pub fn update_tracks<R>(&mut self, f: impl FnOnce(&mut Vec<Track>) -> R) -> R {
        let out = f(&mut self.tracks);
        self.touch(SceneChange::Tracks);
        out
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.viewport.scale = scale;
        self.touch(SceneChange::Scale);
    }

    pub fn set_scroll_left(&mut self, scroll_left: f64) {
        self.viewport.scroll_left = scroll_left;
        self.touch(SceneChange::ScrollLeft);
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport.width = width;
        self.touch(SceneChange::ViewportWidth);
    }

    pub fn set_duration(&mut self, duration: f64) {
        self.viewport.duration = duration;
        self.touch(SceneChange::Duration);
    }

    pub fn set_selected_clip(&mut self, selection: Option<SelectedClip>) {
        self.selection = selection;
        self.touch(SceneChange::Selection);
    }

    pub fn set_playhead(&mut self, position: f64) {
        self.playhead = position;
        self.touch(SceneChange::Playhead);
    }

    pub fn set_clipping_or_dragging(&mut self, active: bool) {
        self.flags.clipping_or_dragging = active;
        self.touch(SceneChange::Flags);
    }

    pub fn set_timeline_dragging(&mut self, active: bool) {
        self.flags.timeline_dragging = active;
        self.touch(SceneChange::Flags);
    }

    pub fn set_playhead_dragging(&mut self, active: bool) {
        self.flags.playhead_dragging = active;
        self.touch(SceneChange::Flags);
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        if self.cursor != cursor {
            self.cursor = cursor;
            self.touch(SceneChange::Cursor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TimeRange, TrackKind};

    #[test]
    fn setters_bump_revision_and_record_changes() {
        let mut scene = SceneState::new(100.0, 800.0);
        assert_eq!(scene.revision(), 0);

        scene.set_scale(120.0);
        scene.set_scroll_left(40.0);
        scene.set_scale(130.0);

        assert_eq!(scene.revision(), 3);
        assert_eq!(scene.scale(), 130.0);
        assert_eq!(
            scene.take_changes(),
            vec![SceneChange::Scale, SceneChange::ScrollLeft]
        );
        assert!(scene.take_changes().is_empty());
    }

    #[test]
    fn store_does_not_validate() {
        let mut scene = SceneState::new(100.0, 800.0);
        scene.set_scroll_left(-50.0);
        assert_eq!(scene.scroll_left(), -50.0);
    }

    #[test]
    fn clip_lookup_across_tracks() {
        let mut scene = SceneState::new(100.0, 800.0);
        let mut video = Track::new(TrackKind::Video, 0, TimeRange::new(0.0, 10.0), 60.0);
        let mut audio = Track::new(TrackKind::Audio, 1, TimeRange::new(0.0, 10.0), 60.0);
        let a = Clip::new(Uuid::new_v4(), &video, TimeRange::new(0.0, 10.0));
        let b = Clip::new(Uuid::new_v4(), &audio, TimeRange::new(0.0, 10.0));
        let b_id = b.id;
        video.clips.push(a);
        audio.clips.push(b);
        scene.set_tracks(vec![video, audio]);

        assert_eq!(scene.clip(b_id).map(|c| c.kind), Some(TrackKind::Audio));
        assert!(scene.clip(Uuid::new_v4()).is_none());
    }

    #[test]
    fn stale_selection_resolves_to_none() {
        let mut scene = SceneState::new(100.0, 800.0);
        let track = Track::new(TrackKind::Video, 0, TimeRange::new(0.0, 10.0), 60.0);
        let clip = Clip::new(Uuid::new_v4(), &track, TimeRange::new(0.0, 5.0));
        scene.set_selected_clip(Some(SelectedClip::of(&clip)));
        assert!(scene.selection().is_some());
        assert!(scene.selected_clip().is_none());
    }

    #[test]
    fn unchanged_cursor_is_not_a_change() {
        let mut scene = SceneState::new(100.0, 800.0);
        scene.set_cursor(Cursor::Default);
        assert_eq!(scene.revision(), 0);
        scene.set_cursor(Cursor::Move);
        assert_eq!(scene.take_changes(), vec![SceneChange::Cursor]);
    }
}
