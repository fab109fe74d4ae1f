use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// 时间字符串解析工具
pub struct TimeParser;

impl TimeParser {
    /// 解析过期时间字符串，支持多种格式：
    /// - RFC3339 格式：2026-10-01T12:00:00Z
    /// - 日期：2026-10-01（当天 00:00 UTC）
    /// - 相对时间：1d, 2w, 3M, 1y, 1h30m, 2d12h
    pub fn parse_expire_time(input: &str) -> Result<DateTime<Utc>, String> {
        Self::parse_expire_time_at(input, Utc::now())
    }

    /// 以给定的当前时间为基准解析过期时间
    pub fn parse_expire_time_at(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
        let input = input.trim();

        if let Some(dt) = Self::parse_absolute(input) {
            return Ok(dt);
        }

        if let Some(date) = Self::parse_date(input) {
            return Ok(Self::start_of_day(date));
        }

        let duration = Self::parse_relative(input)?;
        now.checked_add_signed(duration)
            .ok_or_else(|| "计算的过期时间超出了有效范围".to_string())
    }

    /// 解析区间起点：日期取当天 00:00 UTC
    pub fn parse_range_start(input: &str) -> Result<DateTime<Utc>, String> {
        let input = input.trim();
        if let Some(dt) = Self::parse_absolute(input) {
            return Ok(dt);
        }
        Self::parse_date(input)
            .map(Self::start_of_day)
            .ok_or_else(|| format!("无效的日期: '{}'，应为 RFC3339 或 YYYY-MM-DD", input))
    }

    /// 解析区间终点：日期包含当天全部时间
    pub fn parse_range_end(input: &str) -> Result<DateTime<Utc>, String> {
        let input = input.trim();
        if let Some(dt) = Self::parse_absolute(input) {
            return Ok(dt);
        }
        Self::parse_date(input)
            .and_then(|date| date.and_hms_nano_opt(23, 59, 59, 999_999_999))
            .map(|dt| dt.and_utc())
            .ok_or_else(|| format!("无效的日期: '{}'，应为 RFC3339 或 YYYY-MM-DD", input))
    }

    fn parse_absolute(input: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(input)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn parse_date(input: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
    }

    fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
        date.and_time(NaiveTime::MIN).and_utc()
    }

    fn parse_relative(input: &str) -> Result<Duration, String> {
        let mut total_duration = Duration::zero();
        let mut remaining = input;

        if remaining.is_empty() {
            return Err("时间字符串不能为空".to_string());
        }

        while !remaining.is_empty() {
            // 提取数字
            let digits = remaining
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(remaining.len());
            if digits == 0 {
                return Err(format!("无效的时间格式: '{}'", input));
            }
            let num: i64 = remaining[..digits]
                .parse()
                .map_err(|_| format!("无效的数字: '{}'", &remaining[..digits]))?;
            remaining = &remaining[digits..];

            // 提取单位
            let unit_len = remaining
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(remaining.len());
            if unit_len == 0 {
                return Err(format!("缺少时间单位，数字 '{}' 后应跟时间单位", num));
            }
            let unit = &remaining[..unit_len];
            remaining = &remaining[unit_len..];

            // 大写 M 表示月，其余单位不区分大小写
            let duration = if unit == "M" {
                num.checked_mul(30).and_then(Duration::try_days)
            } else {
                match unit.to_lowercase().as_str() {
                    "s" | "sec" | "second" | "seconds" => Duration::try_seconds(num),
                    "m" | "min" | "minute" | "minutes" => Duration::try_minutes(num),
                    "h" | "hour" | "hours" => Duration::try_hours(num),
                    "d" | "day" | "days" => Duration::try_days(num),
                    "w" | "week" | "weeks" => Duration::try_weeks(num),
                    "month" | "months" => num.checked_mul(30).and_then(Duration::try_days), // 近似30天
                    "y" | "year" | "years" => num.checked_mul(365).and_then(Duration::try_days), // 近似365天
                    _ => return Err(format!("不支持的时间单位: '{}'", unit)),
                }
            }
            .ok_or_else(|| format!("时间间隔超出范围: '{}'", input))?;

            total_duration = total_duration
                .checked_add(&duration)
                .ok_or_else(|| format!("时间间隔超出范围: '{}'", input))?;
        }

        if total_duration == Duration::zero() {
            return Err("时间间隔不能为零".to_string());
        }

        Ok(total_duration)
    }

    /// 格式化持续时间为人类可读的字符串
    pub fn format_duration_human(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
        let duration = to.signed_duration_since(from);

        if duration.num_seconds() <= 0 {
            return "已过期".to_string();
        }

        let days = duration.num_days();
        let hours = (duration.num_seconds() % 86400) / 3600;
        let minutes = (duration.num_seconds() % 3600) / 60;

        if days > 0 {
            if hours > 0 {
                format!("{}天{}小时", days, hours)
            } else {
                format!("{}天", days)
            }
        } else if hours > 0 {
            if minutes > 0 {
                format!("{}小时{}分钟", hours, minutes)
            } else {
                format!("{}小时", hours)
            }
        } else if minutes > 0 {
            format!("{}分钟", minutes)
        } else {
            format!("{}秒", duration.num_seconds())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_rfc3339() {
        let dt = TimeParser::parse_expire_time_at("2026-10-08T08:30:00+08:00", fixed_now()).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 10, 8, 0, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_date_only_is_midnight_utc() {
        let dt = TimeParser::parse_expire_time_at("2026-10-08", fixed_now()).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 10, 8, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_relative_units() {
        let now = fixed_now();
        let cases = [
            ("30s", Duration::seconds(30)),
            ("15m", Duration::minutes(15)),
            ("2h", Duration::hours(2)),
            ("7d", Duration::days(7)),
            ("1w", Duration::weeks(1)),
            ("1M", Duration::days(30)),
            ("1y", Duration::days(365)),
            ("1d12h", Duration::hours(36)),
        ];
        for (input, expected) in cases {
            assert_eq!(
                TimeParser::parse_expire_time_at(input, now).unwrap(),
                now + expected,
                "input: {}",
                input
            );
        }
    }

    #[test]
    fn test_lowercase_m_is_minutes_uppercase_m_is_months() {
        let now = fixed_now();
        assert_eq!(
            TimeParser::parse_expire_time_at("1m", now).unwrap(),
            now + Duration::minutes(1)
        );
        assert_eq!(
            TimeParser::parse_expire_time_at("1M", now).unwrap(),
            now + Duration::days(30)
        );
    }

    #[test]
    fn test_parse_invalid_inputs() {
        let now = fixed_now();
        for input in ["", "abc", "10", "5x", "0d", "2026-13-40"] {
            assert!(
                TimeParser::parse_expire_time_at(input, now).is_err(),
                "input should fail: {:?}",
                input
            );
        }
    }

    #[test]
    fn test_range_end_includes_whole_day() {
        let start = TimeParser::parse_range_start("2026-10-01").unwrap();
        let end = TimeParser::parse_range_end("2026-10-01").unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap());
        assert!(end > Utc.with_ymd_and_hms(2026, 10, 1, 23, 59, 59).unwrap());
        assert!(end < Utc.with_ymd_and_hms(2026, 10, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_range_end_covers_last_sub_millisecond() {
        let end = TimeParser::parse_range_end("2026-10-01").unwrap();
        let late = Utc
            .with_ymd_and_hms(2026, 10, 1, 23, 59, 59)
            .unwrap()
            + Duration::microseconds(999_500);
        assert!(late <= end);
    }

    #[test]
    fn test_overflowing_relative_duration_is_error() {
        let now = fixed_now();
        for input in [
            "99999999999999999y",
            "99999999999999999M",
            "99999999999999999months",
            "9223372036854775807d",
            "100000000d100000000d",
        ] {
            assert!(
                TimeParser::parse_expire_time_at(input, now).is_err(),
                "input should fail: {:?}",
                input
            );
        }
    }

    #[test]
    fn test_range_rejects_relative() {
        assert!(TimeParser::parse_range_start("7d").is_err());
        assert!(TimeParser::parse_range_end("yesterday").is_err());
    }

    #[test]
    fn test_format_duration_human() {
        let now = fixed_now();
        assert_eq!(
            TimeParser::format_duration_human(now, now + Duration::hours(26)),
            "1天2小时"
        );
        assert_eq!(
            TimeParser::format_duration_human(now, now + Duration::minutes(90)),
            "1小时30分钟"
        );
        assert_eq!(TimeParser::format_duration_human(now, now), "已过期");
    }
}
