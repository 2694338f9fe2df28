use crate::error::{CoreError, Result};
use crate::types::*;
use uuid::Uuid;

impl Track {
    /// Restore ascending `start_time` order.
    pub fn sort_clips(&mut self) {
        self.clips
            .sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    }

    pub fn clip_position(&self, clip_id: Uuid) -> Option<usize> {
        self.clips.iter().position(|c| c.id == clip_id)
    }

    /// Ranges of every clip except `exclude`, ascending by start.
    pub fn other_ranges(&self, exclude: Uuid) -> Vec<TimeRange> {
        let mut ranges: Vec<TimeRange> = self
            .clips
            .iter()
            .filter(|c| c.id != exclude)
            .map(|c| c.range())
            .collect();
        ranges.sort_by(|a, b| a.start.total_cmp(&b.start));
        ranges
    }

    /// End of the nearest other clip that finishes at or before `t`.
    pub fn prev_end_before(&self, exclude: Uuid, t: f64) -> Option<f64> {
        self.clips
            .iter()
            .filter(|c| c.id != exclude && c.end_time <= t)
            .map(|c| c.end_time)
            .max_by(f64::total_cmp)
    }

    /// Start of the nearest other clip that begins at or after `t`.
    pub fn next_start_after(&self, exclude: Uuid, t: f64) -> Option<f64> {
        self.clips
            .iter()
            .filter(|c| c.id != exclude && c.start_time >= t)
            .map(|c| c.start_time)
            .min_by(f64::total_cmp)
    }

    pub fn last_end(&self) -> Option<f64> {
        self.clips.iter().map(|c| c.end_time).max_by(f64::total_cmp)
    }

    /// Widen the track extent so it covers all of its clips.
    pub fn fit_extent(&mut self) {
        if let Some(end) = self.last_end() {
            if end > self.end_time {
                self.end_time = end;
            }
        }
    }
}

/// Find the (track_index, clip_index) for a given clip id.
pub fn find_clip_location(tracks: &[Track], clip_id: Uuid) -> Option<(usize, usize)> {
    for (ti, track) in tracks.iter().enumerate() {
        if let Some(ci) = track.clip_position(clip_id) {
            return Some((ti, ci));
        }
    }
    None
}

/// Make every track's `track_index`, and its clips' mirrors, equal its list position.
pub fn reindex_tracks(tracks: &mut [Track]) {
    for (row, track) in tracks.iter_mut().enumerate() {
        track.track_index = row;
        for clip in &mut track.clips {
            clip.track_index = row;
            clip.parent_id = track.id;
        }
    }
}

/// Overwrite a clip's range and keep its track ordered.
pub fn set_clip_range(tracks: &mut [Track], clip_id: Uuid, range: TimeRange) -> Result<()> {
    let (ti, ci) = find_clip_location(tracks, clip_id).ok_or(CoreError::ClipNotFound(clip_id))?;
    tracks[ti].clips[ci].set_range(range);
    tracks[ti].sort_clips();
    tracks[ti].fit_extent();
    Ok(())
}

/// Remove a clip by its id. Returns the removed clip.
pub fn remove_clip(tracks: &mut [Track], clip_id: Uuid) -> Result<Clip> {
    for track in tracks.iter_mut() {
        if let Some(pos) = track.clip_position(clip_id) {
            return Ok(track.clips.remove(pos));
        }
    }
    Err(CoreError::ClipNotFound(clip_id))
}

/// Move a clip into the track at row `to_row`, keeping its time range.
/// The target must hold the same kind of content.
pub fn transfer_clip(tracks: &mut [Track], clip_id: Uuid, to_row: usize) -> Result<()> {
    let (from_row, ci) =
        find_clip_location(tracks, clip_id).ok_or(CoreError::ClipNotFound(clip_id))?;
    if from_row == to_row {
        return Ok(());
    }
    let target = tracks.get(to_row).ok_or_else(|| {
        CoreError::InvalidOperation(format!(
            "row {} out of bounds ({} tracks)",
            to_row,
            tracks.len()
        ))
    })?;
    if target.kind != tracks[from_row].clips[ci].kind {
        return Err(CoreError::InvalidOperation(format!(
            "cannot place a {:?} clip on a {:?} track",
            tracks[from_row].clips[ci].kind, target.kind
        )));
    }
    let (target_id, target_row) = (target.id, target.track_index);

    let mut clip = tracks[from_row].clips.remove(ci);
    clip.parent_id = target_id;
    clip.track_index = target_row;
    tracks[to_row].clips.push(clip);
    tracks[to_row].sort_clips();
    tracks[to_row].fit_extent();
    Ok(())
}

/// Split a clip at `at` into two clips. Both halves must be at least
/// `min_duration` long. Returns the id of the new right half; the left half
/// keeps the original id.
pub fn split_clip(
    tracks: &mut [Track],
    clip_id: Uuid,
    at: f64,
    min_duration: f64,
) -> Result<Uuid> {
    let (ti, ci) = find_clip_location(tracks, clip_id).ok_or(CoreError::ClipNotFound(clip_id))?;

    let clip = &tracks[ti].clips[ci];
    if at - clip.start_time < min_duration || clip.end_time - at < min_duration {
        return Err(CoreError::InvalidOperation(format!(
            "split point {:.3} too close to clip edges {}",
            at,
            clip.range()
        )));
    }

    let mut right = clip.clone();
    right.id = Uuid::new_v4();
    right.start_time = at;
    let right_id = right.id;

    tracks[ti].clips[ci].end_time = at;
    tracks[ti].clips.insert(ci + 1, right);
    Ok(right_id)
}

/// Append a text clip after the last clip of the first text track, creating
/// that track at the bottom when none exists. Returns the new clip id.
pub fn append_text_clip(
    tracks: &mut Vec<Track>,
    label: &str,
    clip_duration: f64,
    timeline_duration: f64,
    min_duration: f64,
    row_height: f64,
) -> Result<Uuid> {
    let row = match tracks.iter().position(|t| t.kind == TrackKind::Text) {
        Some(row) => row,
        None => {
            let row = tracks.len();
            tracks.push(Track::new(
                TrackKind::Text,
                row,
                TimeRange::new(0.0, timeline_duration),
                row_height,
            ));
            row
        }
    };

    let track = &mut tracks[row];
    let count = track.clips.len();
    let start = track.last_end().unwrap_or(0.0);
    let end = (start + clip_duration).min(timeline_duration);
    if end - start < min_duration {
        return Err(CoreError::InvalidOperation(format!(
            "no room for a text clip after {:.3}",
            start
        )));
    }

    let content = if count == 0 {
        label.to_string()
    } else {
        format!("{label}-{count}")
    };
    let clip = Clip::new(Uuid::new_v4(), track, TimeRange::new(start, end)).with_content(content);
    let id = clip.id;
    track.clips.push(clip);
    track.sort_clips();
    Ok(id)
}
