use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// TimeRange
// ---------------------------------------------------------------------------

/// A span on the timeline in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Same length, shifted so it begins at `start`.
    pub fn moved_to(&self, start: f64) -> Self {
        Self {
            start,
            end: start + self.duration(),
        }
    }

    /// `self` fully covers `other` (shared edges count).
    pub fn contains(&self, other: &TimeRange) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    /// Closed-interval intersection: ranges that merely touch also match.
    pub fn touches(&self, other: &TimeRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Half-open intersection: `[0,5)` and `[5,10)` do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}, {:.3}]", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// TrackKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Text,
    Image,
}

impl TrackKind {
    pub fn default_name(&self) -> &'static str {
        match self {
            TrackKind::Video => "Video",
            TrackKind::Audio => "Audio",
            TrackKind::Text => "Text",
            TrackKind::Image => "Image",
        }
    }
}

// ---------------------------------------------------------------------------
// HandleSide
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HandleSide {
    Left,
    Right,
}

// ---------------------------------------------------------------------------
// Clip
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Clip {
    pub id: Uuid,
    /// Owning track. A back-reference only; the track's `clips` vec owns the clip.
    pub parent_id: Uuid,
    pub kind: TrackKind,
    pub start_time: f64,
    pub end_time: f64,
    pub track_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Clip {
    pub fn new(id: Uuid, parent: &Track, range: TimeRange) -> Self {
        Self {
            id,
            parent_id: parent.id,
            kind: parent.kind,
            start_time: range.start,
            end_time: range.end,
            track_index: parent.track_index,
            content: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn set_range(&mut self, range: TimeRange) {
        self.start_time = range.start;
        self.end_time = range.end;
    }
}

// ---------------------------------------------------------------------------
// Track
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub id: Uuid,
    pub kind: TrackKind,
    pub name: String,
    /// Row position; equals the track's position in the scene's track list.
    pub track_index: usize,
    pub start_time: f64,
    pub end_time: f64,
    pub height: f64,
    /// Ascending by `start_time`.
    pub clips: Vec<Clip>,
}

impl Track {
    pub fn new(kind: TrackKind, track_index: usize, extent: TimeRange, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name: kind.default_name().to_string(),
            track_index,
            start_time: extent.start,
            end_time: extent.end,
            height,
            clips: vec![],
        }
    }

    pub fn extent(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }
}

// ---------------------------------------------------------------------------
// SelectedClip
// ---------------------------------------------------------------------------

/// The current selection plus the clip's committed range before the active gesture.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedClip {
    pub clip_id: Uuid,
    pub track_id: Uuid,
    pub kind: TrackKind,
    pub origin_time: TimeRange,
}

impl SelectedClip {
    pub fn of(clip: &Clip) -> Self {
        Self {
            clip_id: clip.id,
            track_id: clip.parent_id,
            kind: clip.kind,
            origin_time: clip.range(),
        }
    }
}

// ---------------------------------------------------------------------------
// MediaSource
// ---------------------------------------------------------------------------

/// What the upload/probe layer hands over once per load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaSource {
    pub id: String,
    pub src: String,
    pub duration: f64,
    pub width: u32,
    pub height: u32,
}

/// Identifies one media load. Results produced for an older generation are stale.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
    Move,
    EwResize,
    Grab,
    Grabbing,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_duration_and_move() {
        let r = TimeRange::new(2.0, 5.0);
        assert_eq!(r.duration(), 3.0);
        assert_eq!(r.moved_to(10.0), TimeRange::new(10.0, 13.0));
    }

    #[test]
    fn range_contains_counts_shared_edges() {
        let outer = TimeRange::new(5.0, 10.0);
        assert!(outer.contains(&TimeRange::new(6.0, 8.0)));
        assert!(outer.contains(&TimeRange::new(5.0, 10.0)));
        assert!(!outer.contains(&TimeRange::new(4.0, 8.0)));
    }

    #[test]
    fn touching_ranges_touch_but_do_not_overlap() {
        let a = TimeRange::new(0.0, 5.0);
        let b = TimeRange::new(5.0, 10.0);
        assert!(a.touches(&b));
        assert!(b.touches(&a));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn overlapping_ranges_detected() {
        let a = TimeRange::new(0.0, 5.0);
        let b = TimeRange::new(4.9, 9.0);
        assert!(a.overlaps(&b));
        assert!(a.touches(&b));
    }

    #[test]
    fn clip_inherits_parent_fields() {
        let track = Track::new(TrackKind::Text, 2, TimeRange::new(0.0, 30.0), 60.0);
        let clip = Clip::new(Uuid::new_v4(), &track, TimeRange::new(1.0, 3.0)).with_content("hi");
        assert_eq!(clip.parent_id, track.id);
        assert_eq!(clip.kind, TrackKind::Text);
        assert_eq!(clip.track_index, 2);
        assert_eq!(clip.duration(), 2.0);
        assert_eq!(clip.content.as_deref(), Some("hi"));
    }

    #[test]
    fn selection_captures_committed_range() {
        let track = Track::new(TrackKind::Video, 0, TimeRange::new(0.0, 10.0), 60.0);
        let clip = Clip::new(Uuid::new_v4(), &track, TimeRange::new(0.0, 5.0));
        let sel = SelectedClip::of(&clip);
        assert_eq!(sel.clip_id, clip.id);
        assert_eq!(sel.track_id, track.id);
        assert_eq!(sel.origin_time, TimeRange::new(0.0, 5.0));
    }

    #[test]
    fn serde_roundtrip_track() {
        let mut track = Track::new(TrackKind::Audio, 1, TimeRange::new(0.0, 12.5), 60.0);
        let clip = Clip::new(Uuid::new_v4(), &track, TimeRange::new(0.0, 12.5));
        track.clips.push(clip);
        let json = serde_json::to_string(&track).unwrap();
        let back: Track = serde_json::from_str(&json).unwrap();
        assert_eq!(track, back);
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TrackKind::Video).unwrap(), "\"video\"");
        assert_eq!(serde_json::to_string(&Cursor::EwResize).unwrap(), "\"ew-resize\"");
    }
}
