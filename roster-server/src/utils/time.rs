//! 日期与时间解析
//!
//! 日期一律使用 ISO `YYYY-MM-DD`，班次时间使用 `HH:MM`。

use chrono::{NaiveDate, NaiveTime};
use shared::models::DateRange;

use super::{AppError, AppResult, ErrorCode};

/// 单次查询允许的最大天数
pub const MAX_RANGE_DAYS: i64 = 366;

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析闭区间日期范围，要求 start <= end 且不超过 [`MAX_RANGE_DAYS`]
pub fn parse_date_range(start: &str, end: &str) -> AppResult<DateRange> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    let range = DateRange::new(start, end).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::InvalidDateRange,
            format!("start_date {start} is after end_date {end}"),
        )
    })?;
    if range.days() > MAX_RANGE_DAYS {
        return Err(AppError::with_message(
            ErrorCode::InvalidDateRange,
            format!("Date range spans {} days (max {MAX_RANGE_DAYS})", range.days()),
        ));
    }
    Ok(range)
}

/// 解析班次时间 (HH:MM)
pub fn parse_time_of_day(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
        AppError::with_message(
            ErrorCode::InvalidShiftTime,
            format!("Invalid time '{value}', expected HH:MM"),
        )
    })
}

/// 校验并规范化班次起止时间为 `HH:MM`
///
/// 结束早于开始视为跨午夜的班次；起止相同则无效。
pub fn normalize_shift_times(
    start: Option<&str>,
    end: Option<&str>,
) -> AppResult<(Option<String>, Option<String>)> {
    let start = start.map(parse_time_of_day).transpose()?;
    let end = end.map(parse_time_of_day).transpose()?;
    if let (Some(s), Some(e)) = (start, end)
        && s == e
    {
        return Err(AppError::new(ErrorCode::InvalidShiftTime));
    }
    let fmt = |t: NaiveTime| t.format("%H:%M").to_string();
    Ok((start.map(fmt), end.map(fmt)))
}
