use crate::db::{DbEngine, EngineError, EngineErrorKind};
use crate::planner::{BoundDiscoveryResult, BoundValue};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgConnectOptions, PgRow};
use sqlx::{Column, Connection, PgConnection, Row, TypeInfo};


/// A single lazily opened connection. No pooling: the CLI issues at most a
/// couple of queries per run.
pub struct PostgresEngine {
    options: PgConnectOptions,
    conn: Option<PgConnection>,
}


impl PostgresEngine {
    pub fn new(options: PgConnectOptions) -> Self {
        PostgresEngine { options, conn: None }
    }

    async fn connection(&mut self) -> Result<&mut PgConnection, EngineError> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                tracing::debug!(
                    "Connecting to {}:{}...",
                    self.options.get_host(),
                    self.options.get_port()
                );
                PgConnection::connect_with(&self.options).await?
            }
        };

        Ok(self.conn.insert(conn))
    }
}


impl DbEngine for PostgresEngine {
    async fn ping(&mut self) -> Result<(), EngineError> {
        let conn = self.connection().await?;

        sqlx::query("SELECT 1")
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    async fn fetch_bounds(&mut self, sql: &str) -> Result<BoundDiscoveryResult, EngineError> {
        let conn = self.connection().await?;

        tracing::debug!("Running bound discovery query: {sql}");
        let row = sqlx::query(sql)
            .fetch_one(&mut *conn)
            .await?;

        if row.len() != 2 {
            return Err(EngineError {
                kind: EngineErrorKind::ColumnCountMismatch { expected: 2, found: row.len() },
            });
        }

        Ok(BoundDiscoveryResult {
            min: decode_bound(&row, 0)?,
            max: decode_bound(&row, 1)?,
        })
    }
}


/// How a discovery column of a given Postgres type decodes into a bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoundColumnKind {
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Numeric,
    Date,
    Timestamp,
    TimestampTz,
    Text,
}

fn bound_column_kind(type_name: &str) -> Option<BoundColumnKind> {
    match type_name {
        "INT2" => Some(BoundColumnKind::Int2),
        "INT4" => Some(BoundColumnKind::Int4),
        "INT8" => Some(BoundColumnKind::Int8),
        "FLOAT4" => Some(BoundColumnKind::Float4),
        "FLOAT8" => Some(BoundColumnKind::Float8),
        "NUMERIC" => Some(BoundColumnKind::Numeric),
        "DATE" => Some(BoundColumnKind::Date),
        "TIMESTAMP" => Some(BoundColumnKind::Timestamp),
        "TIMESTAMPTZ" => Some(BoundColumnKind::TimestampTz),
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => Some(BoundColumnKind::Text),
        _ => None,
    }
}

/// Decode one column of a discovery row by its Postgres type. NULL decodes to `None`.
fn decode_bound(row: &PgRow, index: usize) -> Result<Option<BoundValue>, EngineError> {
    let type_name = row.column(index).type_info().name();

    let Some(kind) = bound_column_kind(type_name) else {
        return Err(EngineError {
            kind: EngineErrorKind::UnsupportedBoundType { column_index: index, found: type_name.to_string() },
        });
    };

    let value = match kind {
        BoundColumnKind::Int2 => row.try_get::<Option<i16>, _>(index)?.map(|v| BoundValue::Integer(v.into())),
        BoundColumnKind::Int4 => row.try_get::<Option<i32>, _>(index)?.map(|v| BoundValue::Integer(v.into())),
        BoundColumnKind::Int8 => row.try_get::<Option<i64>, _>(index)?.map(BoundValue::Integer),
        BoundColumnKind::Float4 => row.try_get::<Option<f32>, _>(index)?.map(|v| BoundValue::Float(v.into())),
        BoundColumnKind::Float8 => row.try_get::<Option<f64>, _>(index)?.map(BoundValue::Float),
        BoundColumnKind::Numeric => row.try_get::<Option<Decimal>, _>(index)?.map(BoundValue::Decimal),
        BoundColumnKind::Date => row.try_get::<Option<NaiveDate>, _>(index)?.map(BoundValue::Date),
        BoundColumnKind::Timestamp => row.try_get::<Option<NaiveDateTime>, _>(index)?.map(BoundValue::Timestamp),
        BoundColumnKind::TimestampTz => row.try_get::<Option<DateTime<Utc>>, _>(index)?.map(BoundValue::TimestampTz),
        BoundColumnKind::Text => row.try_get::<Option<String>, _>(index)?.map(BoundValue::Text),
    };

    tracing::trace!("Decoded column {index} ({type_name}) as {value:?}");
    Ok(value)
}
