//! `time::Date` as `YYYY-MM-DD`.
//!
//! Input also accepts a full ISO datetime (`2024-03-01T10:00:00Z`); only the
//! literal date part is kept, without converting time zones.

use serde::{de, Deserialize, Deserializer, Serializer};
use time::macros::format_description;
use time::Date;

const FORMAT: &[time::format_description::FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

pub fn format_date(date: &Date) -> String {
    date.format(FORMAT).unwrap_or_else(|_| date.to_string())
}

pub fn parse_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    let date_part = match raw.find(['T', 't', ' ']) {
        Some(10) => &raw[..10],
        Some(_) => return None,
        None => raw,
    };
    Date::parse(date_part, FORMAT).ok()
}

pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_date(date))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date '{raw}', expected YYYY-MM-DD")))
}

pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => super::serialize(d, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Date>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => super::parse_date(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}', expected YYYY-MM-DD"))),
        }
    }
}
