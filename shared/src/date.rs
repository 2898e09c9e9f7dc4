//! 日期与图片格式化工具
//!
//! 所有输出均为法语（平台面向法语用户）。
//! 涉及"现在"的函数都显式接收 `now`，方便测试；前端传入本地时间。

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Weekday};

const WEEKDAYS: [&str; 7] = [
    "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
];

const MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;

fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAYS[day.num_days_from_monday() as usize]
}

/// 解析后端返回的时间字符串
///
/// 接受 RFC 3339（带时区，转换为其自身的本地墙上时间）以及不带时区的
/// `YYYY-MM-DDTHH:MM:SS[.fff]` / `YYYY-MM-DD HH:MM:SS`。
pub fn parse_api_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// 完整日期，例如 `lundi 3 mars 2025 à 14:05`
pub fn format_date(dt: &NaiveDateTime) -> String {
    format!(
        "{} {} {} {} à {:02}:{:02}",
        weekday_name(dt.weekday()),
        dt.day(),
        MONTHS[dt.month0() as usize],
        dt.year(),
        dt.hour(),
        dt.minute()
    )
}

/// 相对时间：一个月以内显示 "Il y a ..."，更早则退回完整日期
pub fn format_relative_time(dt: &NaiveDateTime, now: &NaiveDateTime) -> String {
    let diff = (*now - *dt).num_seconds();

    if diff < MINUTE {
        "À l'instant".to_string()
    } else if diff < HOUR {
        format!("Il y a {} min", diff / MINUTE)
    } else if diff < DAY {
        format!("Il y a {} h", diff / HOUR)
    } else if diff < MONTH {
        format!("Il y a {} j", diff / DAY)
    } else {
        format_date(dt)
    }
}

/// 将后端返回的 base64 图片包装为 data URL
pub fn format_base64_image(base64: &str) -> String {
    if base64.is_empty() {
        return String::new();
    }
    format!("data:image/jpeg;base64,{}", base64)
}

/// 距离活动开始还有多久
pub fn time_until_event(event: &NaiveDateTime, now: &NaiveDateTime) -> String {
    let diff = (*event - *now).num_seconds();
    if diff < 0 {
        return "Événement passé".to_string();
    }

    let days = diff / DAY;
    let hours = (diff % DAY) / HOUR;

    if days > 0 {
        format!("Dans {} jour{}", days, if days > 1 { "s" } else { "" })
    } else if hours > 0 {
        format!("Dans {} heure{}", hours, if hours > 1 { "s" } else { "" })
    } else {
        "Très bientôt".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_format_date_french_long_form() {
        assert_eq!(format_date(&at(2025, 3, 3, 14, 5)), "lundi 3 mars 2025 à 14:05");
        assert_eq!(
            format_date(&at(2024, 8, 18, 9, 0)),
            "dimanche 18 août 2024 à 09:00"
        );
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = at(2025, 3, 10, 12, 0);
        assert_eq!(format_relative_time(&(now - Duration::seconds(30)), &now), "À l'instant");
        assert_eq!(format_relative_time(&(now - Duration::minutes(5)), &now), "Il y a 5 min");
        assert_eq!(format_relative_time(&(now - Duration::hours(3)), &now), "Il y a 3 h");
        assert_eq!(format_relative_time(&(now - Duration::days(4)), &now), "Il y a 4 j");

        let old = now - Duration::days(45);
        assert_eq!(format_relative_time(&old, &now), format_date(&old));
    }

    #[test]
    fn test_base64_image() {
        assert_eq!(format_base64_image(""), "");
        assert_eq!(format_base64_image("AAAA"), "data:image/jpeg;base64,AAAA");
    }

    #[test]
    fn test_time_until_event() {
        let now = at(2025, 3, 10, 12, 0);
        assert_eq!(time_until_event(&(now - Duration::hours(1)), &now), "Événement passé");
        assert_eq!(time_until_event(&(now + Duration::days(1)), &now), "Dans 1 jour");
        assert_eq!(
            time_until_event(&(now + Duration::days(3) + Duration::hours(2)), &now),
            "Dans 3 jours"
        );
        assert_eq!(time_until_event(&(now + Duration::hours(5)), &now), "Dans 5 heures");
        assert_eq!(time_until_event(&(now + Duration::minutes(20)), &now), "Très bientôt");
    }

    #[test]
    fn test_parse_api_datetime() {
        assert_eq!(
            parse_api_datetime("2025-03-03T14:05:00"),
            Some(at(2025, 3, 3, 14, 5))
        );
        assert_eq!(
            parse_api_datetime("2025-03-03T14:05:00+01:00"),
            Some(at(2025, 3, 3, 14, 5))
        );
        assert_eq!(
            parse_api_datetime("2025-03-03 14:05:00.123"),
            Some(at(2025, 3, 3, 14, 5))
        );
        assert_eq!(parse_api_datetime("hier"), None);
    }
}
