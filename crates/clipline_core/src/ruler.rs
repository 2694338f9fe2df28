use serde::Serialize;

use crate::projector::Projector;

/// Scale thresholds (px/s) and the tick interval (s) used at or above each.
const INTERVALS: &[(f64, f64)] = &[
    (170.0, 0.2),
    (150.0, 0.4),
    (130.0, 0.6),
    (110.0, 0.8),
    (90.0, 1.0),
    (70.0, 2.0),
    (50.0, 3.0),
    (30.0, 5.0),
    (10.0, 10.0),
];

const COARSEST_INTERVAL: f64 = 20.0;
const SUB_TICKS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TickKind {
    Major,
    Minor,
    Sub,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub time: f64,
    pub x: f64,
    pub kind: TickKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Seconds between consecutive ticks at `scale`.
pub fn tick_interval(scale: f64) -> f64 {
    INTERVALS
        .iter()
        .find(|(threshold, _)| scale >= *threshold)
        .map(|(_, interval)| *interval)
        .unwrap_or(COARSEST_INTERVAL)
}

/// `mm:ss`, or `mm:ss.t` when `fractional` is set.
pub fn format_time(seconds: f64, fractional: bool) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u64;
    let rest = seconds - minutes as f64 * 60.0;
    if fractional {
        let tenths = (rest * 10.0).round() as u64;
        format!("{:02}:{:02}.{}", minutes, tenths / 10, tenths % 10)
    } else {
        format!("{:02}:{:02}", minutes, rest.floor() as u64)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Ticks from time 0 up to the right edge of the visible window.
///
/// A tick is major on every fifth step, and on every non-zero step once a
/// single interval is wider than `reference_scale` pixels; wide intervals
/// also get four sub-ticks after each major tick.
pub fn ticks(
    scale: f64,
    scroll_left: f64,
    width: f64,
    left_inset: f64,
    reference_scale: f64,
) -> Vec<Tick> {
    if !(scale > 0.0) || !(width >= 0.0) {
        return vec![];
    }
    let proj = Projector::new(scale, scroll_left).with_lane_offset(left_inset);
    let interval = tick_interval(scale);
    let end = proj.pixel_to_time(left_inset + width).ceil();
    let wide = proj.width_of(interval) > reference_scale;
    let fractional = interval.fract() != 0.0;
    let to_x = |t: f64| proj.time_to_pixel(t);

    let mut out = vec![];
    let mut sec = 0.0;
    let mut count = 0usize;
    while sec <= end {
        if count % SUB_TICKS == 0 || (sec != 0.0 && wide) {
            out.push(Tick {
                time: sec,
                x: to_x(sec),
                kind: TickKind::Major,
                label: Some(format_time(sec, fractional)),
            });
            if wide {
                for i in 1..SUB_TICKS {
                    let t = sec + i as f64 * interval / SUB_TICKS as f64;
                    out.push(Tick {
                        time: t,
                        x: to_x(t),
                        kind: TickKind::Sub,
                        label: None,
                    });
                }
            }
        } else {
            out.push(Tick {
                time: sec,
                x: to_x(sec),
                kind: TickKind::Minor,
                label: None,
            });
        }
        sec = round2(sec + interval);
        count += 1;
    }
    out
}
