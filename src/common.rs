/// Common types and utilities shared across handlers and services
///
/// Mutation endpoints are posted from plain HTML forms as well as JSON
/// clients, so optional fields arrive as empty strings, `"0"`, numbers or
/// `null` depending on the caller. The deserializers here fold those spellings
/// into `Option`s that the services can validate uniformly.
use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

fn loose<'de, D>(deserializer: D) -> Result<Option<Loose>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Loose>::deserialize(deserializer)
}

/// Foreign-key style id. Blank, `0` and `null` all mean "not selected".
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match loose(deserializer)? {
        None => Ok(None),
        Some(Loose::Int(0)) => Ok(None),
        Some(Loose::Int(n)) => i32::try_from(n)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("id {} is out of range", n))),
        Some(Loose::Float(f)) if f == 0.0 => Ok(None),
        Some(Loose::Float(f)) if f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => {
            Ok(Some(f as i32))
        }
        Some(Loose::Text(s)) => {
            let s = s.trim();
            if s.is_empty() || s == "0" {
                return Ok(None);
            }
            s.parse::<i32>()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("invalid id `{}`", s)))
        }
        Some(_) => Err(de::Error::custom("expected an integer id")),
    }
}

pub fn optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match loose(deserializer)? {
        None => Ok(None),
        Some(Loose::Int(n)) => Ok(Some(n as f64)),
        Some(Loose::Float(f)) => Ok(Some(f)),
        Some(Loose::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<f64>()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("invalid number `{}`", s)))
        }
        Some(Loose::Bool(_)) => Err(de::Error::custom("expected a number")),
    }
}

/// ISO `YYYY-MM-DD` dates; blank means absent.
pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match loose(deserializer)? {
        None => Ok(None),
        Some(Loose::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| de::Error::custom(format!("invalid date `{}`, expected YYYY-MM-DD", s)))
        }
        Some(_) => Err(de::Error::custom("expected a date string")),
    }
}

/// Trimmed text; blank means absent. Numbers are accepted and rendered as text.
pub fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match loose(deserializer)? {
        None => return Ok(None),
        Some(Loose::Text(s)) => s,
        Some(Loose::Int(n)) => n.to_string(),
        Some(Loose::Float(f)) => f.to_string(),
        Some(Loose::Bool(b)) => b.to_string(),
    };
    let trimmed = value.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

/// Checkbox semantics: `on`, `true`, `yes` and `1` are true.
pub fn flexible_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match loose(deserializer)? {
        None => Ok(None),
        Some(Loose::Bool(b)) => Ok(Some(b)),
        Some(Loose::Int(n)) => Ok(Some(n != 0)),
        Some(Loose::Float(f)) => Ok(Some(f != 0.0)),
        Some(Loose::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "on" | "true" | "yes" | "1" => Ok(Some(true)),
            "" | "off" | "false" | "no" | "0" => Ok(Some(false)),
            other => Err(de::Error::custom(format!("invalid boolean `{}`", other))),
        },
    }
}

/// Normalises a display name: surrounding and repeated whitespace is dropped
/// and each word is capitalised ("  new   DELHI " becomes "New Delhi").
pub fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
