use chrono::NaiveDateTime;
use serde::{de, Deserialize, Deserializer};

const DATETIME_FORMATS: [&str; 4] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"];

/// Accepts both `datetime-local` form values and plain SQL-ish timestamps.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS.iter().find_map(|f| NaiveDateTime::parse_from_str(s.trim(), f).ok())
}

pub fn deserialize_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_datetime(&s).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", s)))
}

/// Empty form fields (an unselected radio group, say) come through as `""`.
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse().map(Some).map_err(de::Error::custom),
    }
}
