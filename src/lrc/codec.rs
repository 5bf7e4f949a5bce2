use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d+):(\d{2})(?:\.(\d{1,3}))?\]").expect("timestamp pattern is valid")
});

/// Width of the fractional part of an LRC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampPrecision {
    /// `[mm:ss]`
    Seconds,
    /// `[mm:ss.cc]`
    Centiseconds,
    /// `[mm:ss.fff]`
    #[default]
    Milliseconds,
}

impl TimestampPrecision {
    /// 3 selects milliseconds, 2 centiseconds, anything else whole seconds.
    pub fn from_digits(digits: Option<u8>) -> Self {
        match digits {
            Some(3) => Self::Milliseconds,
            Some(2) => Self::Centiseconds,
            _ => Self::Seconds,
        }
    }
}

impl fmt::Display for TimestampPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds => f.write_str("seconds"),
            Self::Centiseconds => f.write_str("centiseconds"),
            Self::Milliseconds => f.write_str("milliseconds"),
        }
    }
}

/// Seconds to whole milliseconds, rounding half up; negatives and NaN
/// become 0.
pub fn seconds_to_millis(seconds: f64) -> u64 {
    let ms = (seconds * 1000.0).round();
    if ms.is_nan() || ms <= 0.0 {
        0
    } else {
        ms as u64
    }
}

pub fn format_seconds(seconds: f64, precision: TimestampPrecision) -> String {
    format_millis(seconds_to_millis(seconds), precision)
}

fn carry_second(minutes: &mut u64, seconds: &mut u64) {
    *seconds += 1;
    if *seconds == 60 {
        *seconds = 0;
        *minutes += 1;
    }
}

/// Render a millisecond time as an LRC timestamp token. Coarser precisions
/// round the remainder and carry into seconds and minutes.
pub fn format_millis(total_ms: u64, precision: TimestampPrecision) -> String {
    let mut minutes = total_ms / 60_000;
    let mut seconds = (total_ms % 60_000) / 1000;
    let frac = total_ms % 1000;

    match precision {
        TimestampPrecision::Milliseconds => format!("[{minutes:02}:{seconds:02}.{frac:03}]"),
        TimestampPrecision::Centiseconds => {
            let mut centis = (frac + 5) / 10;
            if centis == 100 {
                centis = 0;
                carry_second(&mut minutes, &mut seconds);
            }
            format!("[{minutes:02}:{seconds:02}.{centis:02}]")
        }
        TimestampPrecision::Seconds => {
            if frac >= 500 {
                carry_second(&mut minutes, &mut seconds);
            }
            format!("[{minutes:02}:{seconds:02}]")
        }
    }
}

/// Parse a leading `[mm:ss]`, `[mm:ss.c]`, `[mm:ss.cc]` or `[mm:ss.fff]`
/// token. Returns the time in milliseconds and the byte length consumed.
pub fn parse_prefix(text: &str) -> Option<(u64, usize)> {
    let caps = TIMESTAMP.captures(text)?;
    let minutes: u64 = caps[1].parse().ok()?;
    let seconds: u64 = caps[2].parse().ok()?;
    let frac = match caps.get(3) {
        None => 0,
        Some(digits) => {
            let value: u64 = digits.as_str().parse().ok()?;
            match digits.as_str().len() {
                1 => value * 100,
                2 => value * 10,
                _ => value,
            }
        }
    };
    let consumed = caps.get(0)?.end();
    Some((minutes * 60_000 + seconds * 1000 + frac, consumed))
}

/// Parse a complete timestamp token into milliseconds.
pub fn parse_timestamp(token: &str) -> Option<u64> {
    match parse_prefix(token) {
        Some((ms, consumed)) if consumed == token.len() => Some(ms),
        _ => None,
    }
}
