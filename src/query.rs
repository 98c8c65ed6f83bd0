//! Window bound expressions accepted on the command line.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid time '{input}': {message}")]
pub struct TimeExprError {
    input: String,
    message: String,
}

/// A point in time, either absolute or relative to the start of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeExpr {
    /// `T+90s`, `T+5m`, `T-10s`
    Relative(Duration),
    /// `2024-06-01T12:00:00Z`, optionally followed by `+ 30s` / `- 2m`
    Absolute(DateTime<Utc>),
}

impl TimeExpr {
    pub fn resolve(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimeExpr::Relative(d) => start + *d,
            TimeExpr::Absolute(dt) => *dt,
        }
    }
}

impl FromStr for TimeExpr {
    type Err = TimeExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time(s).map_err(|message| TimeExprError {
            input: s.to_string(),
            message,
        })
    }
}

fn parse_time(s: &str) -> Result<TimeExpr, String> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix(['T', 't']) {
        if rest.starts_with(['+', '-']) {
            return signed_duration(rest).map(TimeExpr::Relative);
        }
    }

    // 2024-06-01T12:00:00Z - 10s
    if let Some(idx) = s.rfind(['+', '-']) {
        if idx > 10 {
            if let Ok(base) = DateTime::parse_from_rfc3339(s[..idx].trim()) {
                let offset = signed_duration(&s[idx..])?;
                return Ok(TimeExpr::Absolute(base.with_timezone(&Utc) + offset));
            }
        }
    }

    DateTime::parse_from_rfc3339(s)
        .map(|dt| TimeExpr::Absolute(dt.with_timezone(&Utc)))
        .map_err(|e| e.to_string())
}

fn signed_duration(s: &str) -> Result<Duration, String> {
    let (neg, rest) = match s.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let dur = parse_duration(rest)?;
    Ok(if neg { -dur } else { dur })
}

fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim())
        .map_err(|e| e.to_string())
        .and_then(|d| Duration::from_std(d).map_err(|e| e.to_string()))
}
