use crate::scene::SceneChange;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyKind {
    Clips,
    Ruler,
    Cursor,
    Thumbnails,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirtySet {
    pub clips: bool,
    pub ruler: bool,
    pub cursor: bool,
    pub thumbnails: bool,
}

impl DirtySet {
    pub fn insert(&mut self, kind: DirtyKind) {
        match kind {
            DirtyKind::Clips => self.clips = true,
            DirtyKind::Ruler => self.ruler = true,
            DirtyKind::Cursor => self.cursor = true,
            DirtyKind::Thumbnails => self.thumbnails = true,
        }
    }

    pub fn merge(&mut self, other: DirtySet) {
        self.clips |= other.clips;
        self.ruler |= other.ruler;
        self.cursor |= other.cursor;
        self.thumbnails |= other.thumbnails;
    }

    pub fn contains(&self, kind: DirtyKind) -> bool {
        match kind {
            DirtyKind::Clips => self.clips,
            DirtyKind::Ruler => self.ruler,
            DirtyKind::Cursor => self.cursor,
            DirtyKind::Thumbnails => self.thumbnails,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.clips || self.ruler || self.cursor || self.thumbnails)
    }
}

impl From<DirtyKind> for DirtySet {
    fn from(kind: DirtyKind) -> Self {
        let mut set = DirtySet::default();
        set.insert(kind);
        set
    }
}

/// Which layers a scene change invalidates.
impl From<SceneChange> for DirtySet {
    fn from(change: SceneChange) -> Self {
        let mut set = DirtySet::default();
        match change {
            SceneChange::Tracks | SceneChange::Selection => set.insert(DirtyKind::Clips),
            SceneChange::Scale
            | SceneChange::ScrollLeft
            | SceneChange::ViewportWidth
            | SceneChange::Duration => {
                set.insert(DirtyKind::Clips);
                set.insert(DirtyKind::Ruler);
                set.insert(DirtyKind::Thumbnails);
            }
            SceneChange::Playhead => set.insert(DirtyKind::Ruler),
            SceneChange::Flags | SceneChange::Cursor => set.insert(DirtyKind::Cursor),
        }
        set
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameTicket {
    pub id: u64,
    pub dirty: DirtySet,
}

/// Holds at most one pending redraw. Each request cancels the pending ticket
/// and reissues it with the union of everything dirtied so far.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    pending: Option<FrameTicket>,
    cancelled: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the pending ticket, if any, and schedule a new one.
    pub fn request(&mut self, dirty: impl Into<DirtySet>) -> u64 {
        let mut merged = dirty.into();
        if let Some(old) = self.pending.take() {
            tracing::trace!("frame {} superseded", old.id);
            merged.merge(old.dirty);
            self.cancelled += 1;
        }
        self.next_id += 1;
        self.pending = Some(FrameTicket {
            id: self.next_id,
            dirty: merged,
        });
        self.next_id
    }

    /// Hand out the pending ticket. Call once per animation frame.
    pub fn take_due(&mut self) -> Option<FrameTicket> {
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            self.cancelled += 1;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of tickets superseded or cancelled before they ran.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}
