//! Absolute-minute coordinate model.
//!
//! A diary day is a fixed 1440-minute window that starts at 04:00 and ends at
//! 04:00 the following day. Minutes are "absolute": 240 is 04:00 on the first
//! day, 1440 is midnight, 1680 is 04:00 on the next day. Every conversion
//! between minutes, axis percentages and clock strings goes through this
//! module; no other module does day-wrap arithmetic.

use chrono::NaiveTime;

/// Absolute minute at which the visible window starts (04:00).
pub const DAY_OFFSET: u32 = 240;
/// Length of the visible window in minutes.
pub const WINDOW_MINUTES: u32 = 1440;
/// Absolute minute at which the visible window ends (04:00 next day).
pub const WINDOW_END: u32 = DAY_OFFSET + WINDOW_MINUTES;
/// Default grid step for snapping.
pub const DEFAULT_STEP: u32 = 10;
/// Minutes in a calendar day, used to fold absolute minutes onto a clock.
const MINUTES_PER_DAY: u32 = 1440;
/// Marker appended to clock strings that fall on the following calendar day.
pub const NEXT_DAY_MARKER: &str = "(+1)";

/// Round `minutes` to the nearest multiple of `step`.
///
/// A zero step is treated as 1 (no snapping).
pub fn snap(minutes: f64, step: u32) -> u32 {
    let step = f64::from(step.max(1));
    let snapped = (minutes / step).round() * step;
    if snapped <= 0.0 {
        0
    } else {
        snapped as u32
    }
}

/// Map a position along the axis (0–100%) to a snapped absolute minute.
///
/// Without `allow_end` the result never equals [`WINDOW_END`]: a start minute
/// at the window end would leave no room for an interval, so it is pulled
/// back by one step.
pub fn position_to_minutes(percent: f64, allow_end: bool) -> u32 {
    position_to_minutes_with_step(percent, allow_end, DEFAULT_STEP)
}

/// [`position_to_minutes`] with an explicit grid step.
pub fn position_to_minutes_with_step(percent: f64, allow_end: bool, step: u32) -> u32 {
    let step = step.max(1);
    let percent = if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let raw = f64::from(DAY_OFFSET) + percent / 100.0 * f64::from(WINDOW_MINUTES);
    let mut minutes = snap(raw, step).clamp(DAY_OFFSET, WINDOW_END);

    if !allow_end && minutes >= WINDOW_END {
        minutes = WINDOW_END - step;
    }
    let upper = if allow_end { WINDOW_END } else { WINDOW_END - step };
    minutes.clamp(DAY_OFFSET, upper)
}

/// Map an absolute minute to its position along the axis (0–100%).
pub fn minutes_to_percentage(minutes: u32) -> f64 {
    let offset = f64::from(minutes) - f64::from(DAY_OFFSET);
    (offset / f64::from(WINDOW_MINUTES) * 100.0).clamp(0.0, 100.0)
}

/// Whether `start..end` lies inside the visible window.
pub fn within_window(start: u32, end: u32) -> bool {
    start >= DAY_OFFSET && start < WINDOW_END && end > DAY_OFFSET && end <= WINDOW_END
}

/// Format an absolute minute used as an interval start, e.g. `"23:30"` or
/// `"01:10(+1)"`.
pub fn format_start(minutes: u32) -> String {
    format_clock(minutes, false)
}

/// Format an absolute minute used as an interval end.
///
/// Unlike [`format_start`], a bare 04:00 (minute 240) is read as the next
/// day's 04:00 and carries the marker.
pub fn format_end(minutes: u32) -> String {
    format_clock(minutes, true)
}

fn format_clock(minutes: u32, is_end: bool) -> String {
    let next_day = minutes >= MINUTES_PER_DAY || (is_end && minutes == DAY_OFFSET);
    let clock = minutes % MINUTES_PER_DAY;
    let time = NaiveTime::from_hms_opt(clock / 60, clock % 60, 0).unwrap_or(NaiveTime::MIN);
    let text = time.format("%H:%M").to_string();
    if next_day {
        format!("{text}{NEXT_DAY_MARKER}")
    } else {
        text
    }
}
