use chrono::{DateTime, Utc};

use crate::utils::datetime::elapsed_hours;

/// 按时长计价：小时数 × 每小时台费，四舍五入到生丁，不出现负数
pub fn session_price_minor(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    hourly_rate: f64,
) -> i64 {
    let hours = elapsed_hours(start, end);
    let minor = (hours * hourly_rate * 100.0).round() as i64;
    minor.max(0)
}

/// "1250" 生丁 → "12.50 MAD"
pub fn format_mad(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.abs();
    format!("{}{}.{:02} MAD", sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn prices_a_fractional_hour() {
        let start = Utc::now();
        // 90 分钟 × 30 MAD/小时 = 45 MAD
        let end = start + Duration::minutes(90);
        assert_eq!(session_price_minor(start, end, 30.0), 4500);
    }

    #[test]
    fn price_is_never_negative() {
        let start = Utc::now();
        let end = start - Duration::minutes(5);
        assert_eq!(session_price_minor(start, end, 30.0), 0);
    }

    #[test]
    fn rounds_to_nearest_centime() {
        let start = Utc::now();
        // 1 分钟 × 30 MAD/小时 = 0.5 MAD
        let end = start + Duration::minutes(1);
        assert_eq!(session_price_minor(start, end, 30.0), 50);
    }

    #[test]
    fn formats_minor_units() {
        assert_eq!(format_mad(0), "0.00 MAD");
        assert_eq!(format_mad(4505), "45.05 MAD");
        assert_eq!(format_mad(-130), "-1.30 MAD");
    }
}
