//! Text formatting for labels and cursor readouts.

use chrono::{Duration, NaiveTime};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Signed percentage with one decimal, e.g. `"-10.0%"` or `"3.4%"`.
pub fn format_change(change: f64) -> String {
    format!("{:.1}%", change)
}

/// Age of a sample relative to now as `hh:mm:ss.mmm`, prefixed with `-` for the past.
///
/// Ages of a day or more wrap around.
pub fn format_age(age_ms: f64) -> String {
    let sign = if age_ms < 0.0 { "-" } else { "" };
    let total_ms = (age_ms.abs().round() as i64) % DAY_MS;
    let t = NaiveTime::MIN + Duration::milliseconds(total_ms);
    format!("{sign}{}", t.format("%H:%M:%S%.3f"))
}

/// Cursor readout for one sample of a chart.
pub fn format_readout(name: &str, x: f64, y: f64, now_x: f64) -> String {
    format!("{name}\n{}\nValue: {:.2}", format_age(x - now_x), y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_keeps_minus_sign_only() {
        assert_eq!(format_change(-9.999_999_999), "-10.0%");
        assert_eq!(format_change(10.000_000_01), "10.0%");
        assert_eq!(format_change(0.04), "0.0%");
    }

    #[test]
    fn age_in_the_past() {
        assert_eq!(format_age(-1_234.0), "-00:00:01.234");
        assert_eq!(format_age(-(61_000.0 + 5.0)), "-00:01:01.005");
    }

    #[test]
    fn age_zero_and_hours() {
        assert_eq!(format_age(0.0), "00:00:00.000");
        assert_eq!(format_age(3_600_000.0 * 2.0 + 1.0), "02:00:00.001");
    }

    #[test]
    fn readout_lines() {
        let s = format_readout("Channel 3", 9_000.0, 101.256, 10_000.0);
        assert_eq!(s, "Channel 3\n-00:00:01.000\nValue: 101.26");
    }
}
