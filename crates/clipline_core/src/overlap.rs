use crate::types::TimeRange;

const EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    Accepted(TimeRange),
    Snapped(TimeRange),
    Reverted(TimeRange),
}

impl Resolution {
    pub fn range(&self) -> TimeRange {
        match self {
            Resolution::Accepted(r) | Resolution::Snapped(r) | Resolution::Reverted(r) => *r,
        }
    }

    pub fn is_reverted(&self) -> bool {
        matches!(self, Resolution::Reverted(_))
    }
}

/// Decide where a dragged clip lands once the pointer is released.
///
/// A neighbour that covers the candidate rejects the drop. Otherwise the
/// first neighbour touching it is pushed past: the candidate snaps to that
/// neighbour's far edge when the free gap there is wide enough, and is
/// rejected when it is not. A rejected drop returns `origin`.
///
/// `others` are the other clips on the destination track, ascending by
/// start. `origin` is the range captured when the drag began and
/// `duration` the timeline length.
pub fn resolve(
    candidate: TimeRange,
    others: &[TimeRange],
    origin: TimeRange,
    duration: f64,
) -> Resolution {
    if others.iter().any(|o| o.contains(&candidate)) {
        return Resolution::Reverted(origin);
    }

    let Some(idx) = others.iter().position(|o| o.touches(&candidate)) else {
        return Resolution::Accepted(candidate);
    };
    let other = others[idx];
    let width = candidate.duration();

    if other.contains(&candidate) {
        return Resolution::Reverted(origin);
    }

    let snapped = if candidate.start > other.start {
        let limit = others.get(idx + 1).map(|n| n.start).unwrap_or(duration);
        let start = other.end;
        (limit - start + EPS >= width).then(|| TimeRange::new(start, (start + width).min(limit)))
    } else {
        let floor = if idx > 0 { others[idx - 1].end } else { 0.0 };
        let end = other.start;
        (end - floor + EPS >= width).then(|| TimeRange::new((end - width).max(floor), end))
    };

    match snapped {
        Some(range) if range == candidate => Resolution::Accepted(range),
        Some(range) => Resolution::Snapped(range),
        None => Resolution::Reverted(origin),
    }
}
