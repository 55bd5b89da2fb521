use crate::planner::BoundValue;

use std::error::Error;
use std::fmt;


#[derive(Debug)]
#[non_exhaustive]
pub struct PlanError {
    pub kind: PlanErrorKind
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlanError: {}", self.kind)
    }
}

impl Error for PlanError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		Some(&self.kind)
	}
}

impl From<PlanErrorKind> for PlanError {
    fn from(kind: PlanErrorKind) -> Self {
        PlanError { kind }
    }
}

#[derive(Debug)]
pub enum PlanErrorKind {
    EmptyBounds,
    IncomparableBounds { lower: BoundValue, upper: BoundValue },
    InvalidColumn(String),
    InvalidPartitionCount(i64),
    ReversedBounds { lower: BoundValue, upper: BoundValue },
    UnsupportedBoundKind(BoundValue),
}

impl fmt::Display for PlanErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBounds => write!(f, "Bound discovery returned no values - the query yields no rows with a non-NULL partition column"),
            Self::IncomparableBounds { lower, upper } => write!(
                f,
                "Bounds are not comparable: lower {} '{lower}' vs upper {} '{upper}'",
                lower.kind_name(),
                upper.kind_name(),
            ),
            Self::InvalidColumn(column) => write!(f, "Invalid partition column: '{column}'"),
            Self::InvalidPartitionCount(count) => write!(f, "Invalid partition count: {count} (must be between 1 and {})", u32::MAX),
            Self::ReversedBounds { lower, upper } => write!(f, "Reversed bounds: lower ({lower}) > upper ({upper})"),
            Self::UnsupportedBoundKind(value) => write!(
                f,
                "Unsupported bound '{value}': range partitioning requires a numeric, date or timestamp column, found {}",
                value.kind_name(),
            ),
        }
    }
}

impl Error for PlanErrorKind {}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn plan_error_display_formats_correctly() {
        let date = |y, m, d| BoundValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap());

        let cases: Vec<(PlanErrorKind, &str)> = vec![
            (PlanErrorKind::EmptyBounds, "Bound discovery returned no values"),
            (
                PlanErrorKind::IncomparableBounds { lower: BoundValue::Integer(1), upper: date(2020, 1, 1) },
                "lower integer '1' vs upper date '2020-01-01'",
            ),
            (PlanErrorKind::InvalidColumn("a b".into()), "Invalid partition column: 'a b'"),
            (PlanErrorKind::InvalidPartitionCount(0), "Invalid partition count: 0"),
            (
                PlanErrorKind::ReversedBounds { lower: date(2022, 12, 31), upper: date(2020, 1, 1) },
                "lower (2022-12-31) > upper (2020-01-01)",
            ),
            (PlanErrorKind::UnsupportedBoundKind(BoundValue::Text("abc".into())), "found text"),
        ];

        for (kind, expect) in cases {
            let text = kind.to_string();
            assert!(
                text.contains(expect),
                "Expected `{}` in `{}`",
                expect,
                text
            );
        }
    }

    #[test]
    fn plan_error_source_is_its_kind() {
        let error = PlanError::from(PlanErrorKind::EmptyBounds);
        let source = error.source().unwrap().to_string();
        assert!(source.contains("Bound discovery returned no values"));
        assert!(error.to_string().starts_with("PlanError: "));
    }
}
