use clipline_core::types::TimeRange;
use serde::{Deserialize, Serialize};

/// Horizontal padding subtracted from a clip before tiling.
const TILE_INSET: f64 = 10.0;
const MIN_TILE_WIDTH: f64 = 40.0;
const MAX_TILE_WIDTH: f64 = 80.0;

/// Opaque handle to a decoded frame image owned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailSlot {
    pub start: f64,
    pub end: f64,
}

impl ThumbnailSlot {
    pub fn record_id(&self) -> String {
        format!("thumb-{:.3}", self.start)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailRecord {
    pub id: String,
    pub start: f64,
    pub end: f64,
    pub image: ImageHandle,
}

impl ThumbnailRecord {
    pub fn for_slot(slot: ThumbnailSlot, image: ImageHandle) -> Self {
        Self {
            id: slot.record_id(),
            start: slot.start,
            end: slot.end,
            image,
        }
    }

    fn intersects(&self, range: &TimeRange) -> bool {
        !(self.start > range.end || self.end < range.start)
    }
}

/// Seconds between captured frames. Coarser when zoomed out, never below 1s.
pub fn thumbnail_interval(duration: f64, scale: f64) -> f64 {
    if duration <= 0.0 || scale <= 0.0 {
        return 1.0;
    }
    (duration * 100.0 / (scale * 5.0)).ceil().max(1.0)
}

/// Capture slots covering `[0, duration]`.
pub fn plan_thumbnails(duration: f64, scale: f64) -> Vec<ThumbnailSlot> {
    if !duration.is_finite() || duration <= 0.0 {
        return Vec::new();
    }
    let interval = thumbnail_interval(duration, scale);
    let mut slots = Vec::new();
    let mut time = 0.0;
    while time < duration {
        slots.push(ThumbnailSlot {
            start: time,
            end: (time + interval).min(duration),
        });
        time += interval;
    }
    slots
}

/// Thumbnails received so far, ordered by start time.
///
/// Slots arrive out of order and some may never arrive.
#[derive(Debug, Clone, Default)]
pub struct ThumbnailStrip {
    records: Vec<ThumbnailRecord>,
}

impl ThumbnailStrip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by id.
    pub fn insert(&mut self, record: ThumbnailRecord) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.id == record.id) {
            *existing = record;
        } else {
            self.records.push(record);
        }
        self.records.sort_by(|a, b| a.start.total_cmp(&b.start));
    }

    pub fn covering(&self, range: TimeRange) -> Vec<&ThumbnailRecord> {
        self.records.iter().filter(|r| r.intersects(&range)).collect()
    }

    pub fn records(&self) -> &[ThumbnailRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// One image placement inside a clip's box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub record_id: String,
    pub image: ImageHandle,
    pub x: f64,
    pub width: f64,
    /// Share of the source image width that is drawn; below 1.0 only for
    /// the last tile.
    pub source_fraction: f64,
}

/// Place thumbnails across a clip drawn at `start_x` with pixel `width`.
pub fn layout_tiles(
    strip: &ThumbnailStrip,
    clip_range: TimeRange,
    start_x: f64,
    width: f64,
) -> Vec<Tile> {
    let available = width - TILE_INSET;
    let covering = strip.covering(clip_range);
    if covering.is_empty() || available <= 0.0 {
        return Vec::new();
    }

    let tile_width = available.clamp(MIN_TILE_WIDTH, MAX_TILE_WIDTH);
    let count = (width / tile_width).ceil() as usize;

    let sequence: Vec<&ThumbnailRecord> = if count > covering.len() {
        let repeat = count / covering.len();
        let extra = count % covering.len();
        covering
            .iter()
            .enumerate()
            .flat_map(|(i, record)| {
                let times = repeat + usize::from(i < extra);
                std::iter::repeat(*record).take(times)
            })
            .collect()
    } else {
        covering.into_iter().take(count).collect()
    };

    sequence
        .into_iter()
        .enumerate()
        .map_while(|(index, record)| {
            let offset = index as f64 * tile_width;
            let remaining = available - offset;
            if remaining <= 0.0 {
                return None;
            }
            let draw_width = tile_width.min(remaining);
            Some(Tile {
                record_id: record.id.clone(),
                image: record.image.clone(),
                x: start_x + offset,
                width: draw_width,
                source_fraction: draw_width / tile_width,
            })
        })
        .collect()
}
