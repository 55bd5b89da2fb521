//! Range partition planning.
//!
//! Turns a base query plus a partitioning intent into the inputs a parallel
//! JDBC-style reader needs: a query it can embed as a table expression, the
//! column to split on, how many slices to make and the value range to split.
//! How the reader maps `[lower_bound, upper_bound]` onto per-worker predicates
//! is up to the reader.
//!
//! Every function here is a pure text or value transformation. The base query
//! is never parsed; it is only wrapped.
mod bound;
mod error;

pub use bound::{BoundDiscoveryResult, BoundValue};
pub use error::{PlanError, PlanErrorKind};

use serde::Serialize;
use sqlparser::dialect::GenericDialect;
use sqlparser::tokenizer::{Token, Tokenizer};
use std::cmp::Ordering;


/// Name of the column added by [`add_row_number_column`].
pub const SYNTHETIC_PARTITION_COLUMN: &str = "rn";

static DIALECT_GENERIC: GenericDialect = GenericDialect {};


#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionPlan {
    pub rewritten_query: String,
    pub partition_column: String,
    pub partition_count: u32,
    pub lower_bound: BoundValue,
    pub upper_bound: BoundValue,
}


/// `SELECT ...` -> `(SELECT ...) as q`
pub fn wrap_as_subquery(query: &str) -> String {
    format!("({query}) as q")
}

/// Number the rows of `query` so they can be partitioned when no natural
/// partition column exists. The numbering column is [`SYNTHETIC_PARTITION_COLUMN`].
///
/// `order_column` should give a stable order, otherwise rows may shift
/// between partitions across reads.
pub fn add_row_number_column(query: &str, order_column: &str) -> String {
    format!(
        "WITH cte AS ({query}) SELECT *, ROW_NUMBER() OVER (ORDER BY {order_column}) AS {SYNTHETIC_PARTITION_COLUMN} FROM cte"
    )
}

/// Query returning a single row with the minimum and maximum of `column` over `query`.
pub fn build_bound_discovery_query(query: &str, column: &str) -> String {
    format!("SELECT min({column}), max({column}) FROM ({query}) q")
}

/// Accepts a single identifier, quoted or not: `date`, `"Order Date"`.
///
/// The base query is always wrapped as an aliased subquery, so qualifiers
/// naming its inner tables are out of scope wherever the column is used.
pub fn validate_column(column: &str) -> Result<(), PlanError> {
    let invalid = || PlanError { kind: PlanErrorKind::InvalidColumn(column.to_string()) };

    let tokens = Tokenizer::new(&DIALECT_GENERIC, column.trim())
        .tokenize()
        .map_err(|e| {
            tracing::debug!("Failed to tokenize column '{column}': {e}");
            invalid()
        })?;

    match tokens.as_slice() {
        [Token::Word(_)] | [Token::Word(_), Token::EOF] => Ok(()),
        _ => Err(invalid()),
    }
}

pub fn build_partition_plan(
    query: &str,
    column: &str,
    partition_count: i64,
    lower_bound: BoundValue,
    upper_bound: BoundValue,
) -> Result<PartitionPlan, PlanError> {
    let count = u32::try_from(partition_count)
        .ok()
        .filter(|count| *count >= 1)
        .ok_or(PlanError { kind: PlanErrorKind::InvalidPartitionCount(partition_count) })?;

    validate_column(column)?;

    for bound in [&lower_bound, &upper_bound] {
        if !bound.is_rangeable() {
            return Err(PlanError { kind: PlanErrorKind::UnsupportedBoundKind(bound.clone()) });
        }
    }

    match lower_bound.compare(&upper_bound) {
        None => Err(PlanError {
            kind: PlanErrorKind::IncomparableBounds { lower: lower_bound, upper: upper_bound },
        }),
        Some(Ordering::Greater) => Err(PlanError {
            kind: PlanErrorKind::ReversedBounds { lower: lower_bound, upper: upper_bound },
        }),
        Some(_) => {
            tracing::debug!(
                "Planned {count} partition(s) on '{column}' over [{lower_bound}, {upper_bound}]"
            );
            Ok(PartitionPlan {
                rewritten_query: wrap_as_subquery(query),
                partition_column: column.trim().to_string(),
                partition_count: count,
                lower_bound,
                upper_bound,
            })
        }
    }
}
