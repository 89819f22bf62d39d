use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::{AppError, AppResult};

/// 起止时间差，按小时计（可为小数）
pub fn elapsed_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_seconds() as f64 / 3600.0
}

/// 本地日历日在 UTC 下的 [起, 止) 区间。归档与日报都以服务器本地日为准。
pub fn local_day_bounds(date: NaiveDate) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let midnight = date.and_time(NaiveTime::MIN);
    let start = Local
        .from_local_datetime(&midnight)
        .earliest()
        .ok_or_else(|| AppError::Internal(format!("无法解析本地日期 {date}")))?;
    let start_utc = start.with_timezone(&Utc);
    Ok((start_utc, start_utc + Duration::days(1)))
}

/// 今天的本地日历日
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_span_24_hours() {
        let (start, end) = local_day_bounds(today_local()).unwrap();
        assert_eq!(end - start, Duration::days(1));
        let now = Utc::now();
        assert!(start <= now && now < end);
    }

    #[test]
    fn elapsed_hours_is_fractional() {
        let start = Utc::now();
        let end = start + Duration::minutes(30);
        assert!((elapsed_hours(start, end) - 0.5).abs() < 1e-9);
    }
}
