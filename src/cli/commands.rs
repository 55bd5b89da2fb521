use crate::cli::error::RangeReadError;
use crate::cli::output::{CommandData, ReaderOptions};
use crate::cli::{Cli, Commands, PlanArgs};
use crate::config::{ConnectionConfig, JdbcEndpoint, JdbcReadOptions};
use crate::db::{self, DbEngine};
use crate::planner::{
    self, BoundDiscoveryResult, BoundValue, PartitionPlan, PlanError, PlanErrorKind,
    SYNTHETIC_PARTITION_COLUMN,
};


/// Checks the database accepts connections and queries.
pub async fn ping<E: DbEngine>(engine: &mut E) -> Result<(), RangeReadError> {
    tracing::info!("Pinging database...");
    engine.ping().await?;
    tracing::info!("Ping successful");

    Ok(())
}

/// Runs the bound discovery query for `column` over `query`.
pub async fn discover<E: DbEngine>(
    engine: &mut E,
    query: &str,
    column: &str,
) -> Result<BoundDiscoveryResult, RangeReadError> {
    planner::validate_column(column)?;

    let discovery_query = planner::build_bound_discovery_query(query, column);
    tracing::info!("Discovering bounds of '{column}'...");
    let bounds = engine.fetch_bounds(&discovery_query).await?;
    tracing::debug!("Discovered bounds: {bounds:?}");

    Ok(bounds)
}

/// Plans a partitioned read whose bounds are not known up front:
/// discover them first, then plan with what the database returned.
pub async fn plan_with_discovery<E: DbEngine>(
    engine: &mut E,
    query: &str,
    column: &str,
    partition_count: i64,
) -> Result<PartitionPlan, RangeReadError> {
    let (lower, upper) = discover(engine, query, column).await?.into_bounds()?;

    Ok(planner::build_partition_plan(query, column, partition_count, lower, upper)?)
}

/// The query and column to partition on: either as given, or with a
/// generated row number when partitioning on row order.
fn partition_source(args: &PlanArgs) -> Result<(String, String), RangeReadError> {
    match (&args.column, &args.row_number_order) {
        (Some(column), _) => Ok((args.query.clone(), column.clone())),
        (None, Some(order_column)) => {
            planner::validate_column(order_column)?;
            tracing::info!("Numbering rows by '{order_column}' to partition on '{SYNTHETIC_PARTITION_COLUMN}'");
            Ok((
                planner::add_row_number_column(&args.query, order_column),
                SYNTHETIC_PARTITION_COLUMN.to_string(),
            ))
        }
        (None, None) => Err(PlanError { kind: PlanErrorKind::InvalidColumn(String::new()) }.into()),
    }
}


pub async fn run_command(args: Cli) -> Result<CommandData, RangeReadError> {
    let connection = ConnectionConfig::from(args.connection);
    tracing::debug!("Connection: {connection:?}");

    match args.command {
        Commands::Ping {} => {
            let mut backend = db::EngineBackend::new(args.engine, &connection)?;
            ping(&mut backend).await?;

            Ok(CommandData::Ping { engine: backend.engine() })
        }
        Commands::Discover { query, column } => {
            let mut backend = db::EngineBackend::new(args.engine, &connection)?;

            Ok(CommandData::Bounds(discover(&mut backend, &query, &column).await?))
        }
        Commands::Plan { args: plan_args } => {
            // Resolve the endpoint first: a bad --url should fail before any query runs
            let endpoint = JdbcEndpoint::resolve(
                &connection,
                args.engine,
                args.url.as_deref(),
                args.driver.as_deref(),
            )?;
            let (query, column) = partition_source(&plan_args)?;

            let plan = match (&plan_args.lower, &plan_args.upper) {
                (Some(lower), Some(upper)) => planner::build_partition_plan(
                    &query,
                    &column,
                    plan_args.partitions,
                    BoundValue::parse(lower),
                    BoundValue::parse(upper),
                )?,
                _ => {
                    let mut backend = db::EngineBackend::new(args.engine, &connection)?;
                    plan_with_discovery(&mut backend, &query, &column, plan_args.partitions).await?
                }
            };

            let options = JdbcReadOptions::partitioned(endpoint, &plan);
            Ok(CommandData::Plan { options: ReaderOptions::from(&options), plan })
        }
        Commands::Single { query } => {
            let endpoint = JdbcEndpoint::resolve(
                &connection,
                args.engine,
                args.url.as_deref(),
                args.driver.as_deref(),
            )?;
            let options = JdbcReadOptions::single(endpoint, &query);

            Ok(CommandData::Single { options: ReaderOptions::from(&options) })
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::error::RangeReadErrorKind;
    use crate::cli::Parser;
    use crate::db::{EngineError, EngineErrorKind};
    use chrono::NaiveDate;

    /// Answers every bound query with the same result and remembers what it was asked.
    struct FakeEngine {
        bounds: Option<BoundDiscoveryResult>,
        queries: Vec<String>,
    }

    impl FakeEngine {
        fn returning(bounds: Option<BoundDiscoveryResult>) -> Self {
            FakeEngine { bounds, queries: vec![] }
        }
    }

    impl DbEngine for FakeEngine {
        async fn ping(&mut self) -> Result<(), EngineError> {
            Ok(())
        }

        async fn fetch_bounds(&mut self, sql: &str) -> Result<BoundDiscoveryResult, EngineError> {
            self.queries.push(sql.to_string());
            self.bounds
                .clone()
                .ok_or(EngineError { kind: EngineErrorKind::SQLX(sqlx::Error::RowNotFound) })
        }
    }

    fn dates(min: Option<(i32, u32, u32)>, max: Option<(i32, u32, u32)>) -> BoundDiscoveryResult {
        let date = |(y, m, d)| BoundValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap());
        BoundDiscoveryResult { min: min.map(date), max: max.map(date) }
    }

    fn cli(command: &[&str]) -> Cli {
        let base = ["rangeread", "--user", "reader", "--password", "secret", "--database", "dbserver"];
        Cli::try_parse_from(base.iter().chain(command.iter()).copied()).unwrap()
    }

    #[tokio::test]
    async fn plans_with_discovered_bounds() {
        let mut engine = FakeEngine::returning(Some(dates(Some((2020, 1, 1)), Some((2022, 12, 31)))));

        let plan = plan_with_discovery(&mut engine, "SELECT * FROM t", "date", 100).await.unwrap();

        assert_eq!(engine.queries, vec!["SELECT min(date), max(date) FROM (SELECT * FROM t) q"]);
        assert_eq!(plan.rewritten_query, "(SELECT * FROM t) as q");
        assert_eq!(plan.partition_count, 100);
        assert_eq!(plan.lower_bound.to_string(), "2020-01-01");
        assert_eq!(plan.upper_bound.to_string(), "2022-12-31");
    }

    #[tokio::test]
    async fn empty_discovery_is_an_invalid_argument() {
        let mut engine = FakeEngine::returning(Some(dates(None, None)));

        let error = plan_with_discovery(&mut engine, "SELECT * FROM t", "date", 10).await.unwrap_err();

        assert!(error.is_invalid_argument());
        assert!(matches!(
            error.kind,
            RangeReadErrorKind::InvalidArgument(PlanError { kind: PlanErrorKind::EmptyBounds, .. })
        ));
    }

    #[tokio::test]
    async fn upstream_failures_surface_unchanged() {
        let mut engine = FakeEngine::returning(None);

        let error = plan_with_discovery(&mut engine, "SELECT * FROM t", "date", 10).await.unwrap_err();

        assert_eq!(engine.queries.len(), 1);
        assert!(matches!(
            error.kind,
            RangeReadErrorKind::Engine(EngineError { kind: EngineErrorKind::SQLX(sqlx::Error::RowNotFound), .. })
        ));
    }

    #[tokio::test]
    async fn invalid_column_never_reaches_the_database() {
        let mut engine = FakeEngine::returning(Some(dates(Some((2020, 1, 1)), Some((2020, 1, 2)))));

        let error = discover(&mut engine, "SELECT * FROM t", "date; DROP TABLE t").await.unwrap_err();

        assert!(error.is_invalid_argument());
        assert!(engine.queries.is_empty());
    }

    #[tokio::test]
    async fn discovered_bounds_are_still_validated() {
        let mut engine = FakeEngine::returning(Some(dates(Some((2020, 1, 1)), Some((2020, 1, 2)))));
        let error = plan_with_discovery(&mut engine, "SELECT * FROM t", "date", 0).await.unwrap_err();
        assert!(matches!(
            error.kind,
            RangeReadErrorKind::InvalidArgument(PlanError { kind: PlanErrorKind::InvalidPartitionCount(0), .. })
        ));

        let mut engine = FakeEngine::returning(Some(dates(Some((2022, 1, 1)), Some((2020, 1, 1)))));
        let error = plan_with_discovery(&mut engine, "SELECT * FROM t", "date", 4).await.unwrap_err();
        assert!(matches!(
            error.kind,
            RangeReadErrorKind::InvalidArgument(PlanError { kind: PlanErrorKind::ReversedBounds { .. }, .. })
        ));
    }

    #[tokio::test]
    async fn pings_through_the_engine() {
        let mut engine = FakeEngine::returning(None);
        assert!(ping(&mut engine).await.is_ok());
    }

    #[tokio::test]
    async fn plan_command_with_known_bounds_needs_no_database() {
        let args = cli(&[
            "--url", "jdbc:postgresql:dbserver",
            "plan",
            "--query", "SELECT f1, f2, f3 FROM table",
            "--column", "date",
            "--partitions", "100",
            "--lower", "2020-01-01",
            "--upper", "2022-12-31",
        ]);

        let CommandData::Plan { plan, options } = run_command(args).await.unwrap() else {
            panic!("Expected plan output");
        };

        assert_eq!(plan.rewritten_query, "(SELECT f1, f2, f3 FROM table) as q");
        assert_eq!(
            options,
            ReaderOptions(vec![
                ("driver", "org.postgresql.Driver".to_string()),
                ("url", "jdbc:postgresql:dbserver".to_string()),
                ("user", "reader".to_string()),
                ("password", "***".to_string()),
                ("dbtable", "(SELECT f1, f2, f3 FROM table) as q".to_string()),
                ("numPartitions", "100".to_string()),
                ("partitionColumn", "date".to_string()),
                ("lowerBound", "2020-01-01".to_string()),
                ("upperBound", "2022-12-31".to_string()),
            ])
        );
    }

    #[tokio::test]
    async fn plan_command_numbers_rows_when_asked() {
        let args = cli(&[
            "--engine", "vertica",
            "plan",
            "--query", "SELECT f1, f2, f3 FROM table",
            "--row-number-order", "f1",
            "--partitions", "10",
            "--lower", "1",
            "--upper", "5000",
        ]);

        let CommandData::Plan { plan, options } = run_command(args).await.unwrap() else {
            panic!("Expected plan output");
        };

        assert_eq!(plan.partition_column, SYNTHETIC_PARTITION_COLUMN);
        assert_eq!(
            plan.rewritten_query,
            "(WITH cte AS (SELECT f1, f2, f3 FROM table) SELECT *, ROW_NUMBER() OVER (ORDER BY f1) AS rn FROM cte) as q"
        );
        assert_eq!(options.0[0], ("driver", "com.vertica.jdbc.Driver".to_string()));
    }

    #[tokio::test]
    async fn plan_command_rejects_zero_partitions() {
        let args = cli(&[
            "plan", "--query", "SELECT * FROM t", "--column", "date",
            "--partitions", "0", "--lower", "2020-01-01", "--upper", "2022-12-31",
        ]);

        let error = run_command(args).await.err().unwrap();
        assert!(error.is_invalid_argument());
    }

    #[tokio::test]
    async fn vertica_cannot_discover_bounds() {
        let args = cli(&[
            "--engine", "vertica",
            "plan", "--query", "SELECT * FROM t", "--column", "date", "--partitions", "4",
        ]);

        let error = run_command(args).await.err().unwrap();
        assert!(matches!(
            error.kind,
            RangeReadErrorKind::Engine(EngineError { kind: EngineErrorKind::DiscoveryUnsupported(_), .. })
        ));
    }

    #[tokio::test]
    async fn single_command_reads_query_as_is() {
        let args = cli(&["--tls", "false", "single", "--query", "SELECT f1, f2, f3 FROM table"]);

        let CommandData::Single { options } = run_command(args).await.unwrap() else {
            panic!("Expected single output");
        };

        assert_eq!(options.0[1], ("url", "jdbc:postgresql://localhost:5432/dbserver".to_string()));
        assert_eq!(options.0[4], ("query", "SELECT f1, f2, f3 FROM table".to_string()));
        assert_eq!(options.0.len(), 5);
    }
}
