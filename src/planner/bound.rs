use crate::planner::{PlanError, PlanErrorKind};

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;


const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];


/// A single partition bound, as read from the command line or decoded from
/// the result of a bound discovery query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BoundValue {
    Integer(i64),
    Float(f64),
    /// Exact numeric, e.g. the minimum of a `NUMERIC` column. Serialized as a string.
    Decimal(Decimal),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    /// An instant, rendered in UTC with a `Z` suffix so the reader does not
    /// reinterpret it in its own session time zone.
    TimestampTz(DateTime<Utc>),
    Text(String),
}

impl BoundValue {
    /// Interpret user input as the most specific bound it can be:
    /// integer, then float, then date, then timestamp, then timestamp with offset.
    /// Anything else is kept as text.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        if let Ok(value) = input.parse::<i64>() {
            return Self::Integer(value);
        }
        if let Ok(value) = input.parse::<f64>() {
            // "NaN" and "inf" are not bounds anyone meant to type
            if value.is_finite() {
                return Self::Float(value);
            }
        }
        if let Ok(value) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
            return Self::Date(value);
        }
        for format in TIMESTAMP_FORMATS {
            if let Ok(value) = NaiveDateTime::parse_from_str(input, format) {
                return Self::Timestamp(value);
            }
        }
        if let Ok(value) = DateTime::parse_from_rfc3339(input) {
            return Self::TimestampTz(value.with_timezone(&Utc));
        }

        Self::Text(input.to_string())
    }

    /// Compare two bounds, or `None` when they live on different scales.
    /// Integers share the number line with floats and decimals; a date is
    /// midnight of its day. Instants only compare with instants.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Float(b)) => compare_integer_float(*a, *b),
            (Self::Float(a), Self::Integer(b)) => compare_integer_float(*b, *a).map(Ordering::reverse),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Decimal(a), Self::Decimal(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Decimal(b)) => Some(Decimal::from(*a).cmp(b)),
            (Self::Decimal(a), Self::Integer(b)) => Some(a.cmp(&Decimal::from(*b))),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Timestamp(b)) => Some(a.and_hms_opt(0, 0, 0)?.cmp(b)),
            (Self::Timestamp(a), Self::Date(b)) => Some(a.cmp(&b.and_hms_opt(0, 0, 0)?)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            (Self::TimestampTz(a), Self::TimestampTz(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Whether a column holding this kind of value can be split into ranges.
    pub fn is_rangeable(&self) -> bool {
        !matches!(self, Self::Text(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Decimal(_) => "decimal",
            Self::Date(_) => "date",
            Self::Timestamp(_) => "timestamp",
            Self::TimestampTz(_) => "timestamptz",
            Self::Text(_) => "text",
        }
    }
}

impl fmt::Display for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Decimal(value) => write!(f, "{value}"),
            Self::Date(value) => write!(f, "{}", value.format(DATE_FORMAT)),
            Self::Timestamp(value) => write!(f, "{value}"),
            Self::TimestampTz(value) => write!(f, "{}", value.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Text(value) => write!(f, "{value}"),
        }
    }
}

/// Exact ordering of an integer against a float, without rounding the
/// integer through `f64`.
fn compare_integer_float(integer: i64, float: f64) -> Option<Ordering> {
    // -2^63 and 2^63, both exact in f64
    const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
    const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return None;
    }
    if float >= I64_UPPER {
        return Some(Ordering::Less);
    }
    if float < I64_LOWER {
        return Some(Ordering::Greater);
    }

    // In range, so the integral part converts without loss
    match integer.cmp(&(float.trunc() as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&float.fract()),
        ordering => Some(ordering),
    }
}


/// The single row returned by a bound discovery query.
/// Either side is `None` when the database returned NULL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundDiscoveryResult {
    pub min: Option<BoundValue>,
    pub max: Option<BoundValue>,
}

impl BoundDiscoveryResult {
    pub fn into_bounds(self) -> Result<(BoundValue, BoundValue), PlanError> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Ok((min, max)),
            _ => Err(PlanError { kind: PlanErrorKind::EmptyBounds }),
        }
    }
}
