use crate::config::{driver_for_url, ConfigError, ConnectionConfig, Engine, PASSWORD_MASK};
use crate::planner::{BoundValue, PartitionPlan};

use std::fmt;


/// Where and how a JDBC reader connects.
#[derive(Clone, PartialEq)]
pub struct JdbcEndpoint {
    pub driver: String,
    pub url: String,
    pub user: String,
    pub password: String,
}

impl JdbcEndpoint {
    /// Build the endpoint for `engine`. An explicit `url` replaces the one
    /// rendered from `connection`; an explicit `driver` replaces the class
    /// inferred from the URL's subprotocol.
    pub fn resolve(
        connection: &ConnectionConfig,
        engine: Engine,
        url: Option<&str>,
        driver: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let url = url
            .map(str::to_string)
            .unwrap_or_else(|| connection.jdbc_url(engine));

        let driver = match driver {
            Some(driver) => driver.to_string(),
            None => driver_for_url(&url)?.to_string(),
        };
        tracing::debug!("Resolved JDBC endpoint '{url}' with driver '{driver}'");

        Ok(JdbcEndpoint {
            driver,
            url,
            user: connection.user.clone(),
            password: connection.password.clone(),
        })
    }
}

impl fmt::Debug for JdbcEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JdbcEndpoint")
            .field("driver", &self.driver)
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &PASSWORD_MASK)
            .finish()
    }
}


#[derive(Debug, Clone, PartialEq)]
pub enum ReadSource {
    /// A table expression, e.g. `(SELECT ...) as q`. Required for partitioned reads.
    DbTable(String),
    /// A bare query, read as a single partition.
    Query(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Partitioning {
    pub column: String,
    pub num_partitions: u32,
    pub lower_bound: BoundValue,
    pub upper_bound: BoundValue,
}


/// Options for a JDBC-style distributed reader, e.g. Spark's
/// `spark.read.format("jdbc")`.
#[derive(Debug, Clone, PartialEq)]
pub struct JdbcReadOptions {
    pub endpoint: JdbcEndpoint,
    pub source: ReadSource,
    pub partitioning: Option<Partitioning>,
}

impl JdbcReadOptions {
    /// Read `query` with a single partition.
    pub fn single(endpoint: JdbcEndpoint, query: &str) -> Self {
        JdbcReadOptions {
            endpoint,
            source: ReadSource::Query(query.to_string()),
            partitioning: None,
        }
    }

    /// Read the plan's rewritten query split into `partition_count` ranges.
    pub fn partitioned(endpoint: JdbcEndpoint, plan: &PartitionPlan) -> Self {
        JdbcReadOptions {
            endpoint,
            source: ReadSource::DbTable(plan.rewritten_query.clone()),
            partitioning: Some(Partitioning {
                column: plan.partition_column.clone(),
                num_partitions: plan.partition_count,
                lower_bound: plan.lower_bound.clone(),
                upper_bound: plan.upper_bound.clone(),
            }),
        }
    }

    /// Reader options in the order a reader is usually configured.
    pub fn to_options(&self) -> Vec<(&'static str, String)> {
        self.render(&self.endpoint.password)
    }

    /// Same as [`Self::to_options`], with the password masked.
    pub fn redacted(&self) -> Vec<(&'static str, String)> {
        self.render(PASSWORD_MASK)
    }

    fn render(&self, password: &str) -> Vec<(&'static str, String)> {
        let mut options = vec![
            ("driver", self.endpoint.driver.clone()),
            ("url", self.endpoint.url.clone()),
            ("user", self.endpoint.user.clone()),
            ("password", password.to_string()),
        ];

        match &self.source {
            ReadSource::DbTable(table) => options.push(("dbtable", table.clone())),
            ReadSource::Query(query) => options.push(("query", query.clone())),
        }

        if let Some(partitioning) = &self.partitioning {
            options.push(("numPartitions", partitioning.num_partitions.to_string()));
            options.push(("partitionColumn", partitioning.column.clone()));
            options.push(("lowerBound", partitioning.lower_bound.to_string()));
            options.push(("upperBound", partitioning.upper_bound.to_string()));
        }

        options
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigErrorKind;
    use crate::planner::{build_partition_plan, BoundValue};

    fn connection() -> ConnectionConfig {
        ConnectionConfig {
            host: "localhost".into(),
            port: 5432,
            user: "reader".into(),
            password: "hunter2".into(),
            database: "dbserver".into(),
            tls: true,
        }
    }

    fn endpoint() -> JdbcEndpoint {
        JdbcEndpoint::resolve(&connection(), Engine::Postgres, None, None).unwrap()
    }

    fn keys(options: &[(&'static str, String)]) -> Vec<&'static str> {
        options.iter().map(|(key, _)| *key).collect()
    }

    #[test]
    fn resolves_endpoint_with_overrides() {
        let default = endpoint();
        assert_eq!(default.url, "jdbc:postgresql://localhost:5432/dbserver?ssl=true");
        assert_eq!(default.driver, "org.postgresql.Driver");

        let bare = JdbcEndpoint::resolve(
            &connection(), Engine::Vertica, Some("jdbc:postgresql:dbserver"), None,
        ).unwrap();
        assert_eq!(bare.url, "jdbc:postgresql:dbserver");
        assert_eq!(bare.driver, "org.postgresql.Driver");

        let custom = JdbcEndpoint::resolve(
            &connection(), Engine::Postgres, Some("jdbc:mysql://h/db"), Some("com.mysql.cj.jdbc.Driver"),
        ).unwrap();
        assert_eq!(custom.driver, "com.mysql.cj.jdbc.Driver");

        let error = JdbcEndpoint::resolve(
            &connection(), Engine::Postgres, Some("jdbc:mysql://h/db"), None,
        ).unwrap_err();
        assert!(matches!(error.kind, ConfigErrorKind::UnknownDriver(_)));
    }

    #[test]
    fn single_read_uses_query_option() {
        let options = JdbcReadOptions::single(endpoint(), "SELECT f1, f2, f3 FROM table").to_options();

        assert_eq!(keys(&options), vec!["driver", "url", "user", "password", "query"]);
        assert_eq!(options[3].1, "hunter2");
        assert_eq!(options[4].1, "SELECT f1, f2, f3 FROM table");
    }

    #[test]
    fn partitioned_read_uses_dbtable_and_bounds() {
        let plan = build_partition_plan(
            "SELECT f1, f2, f3 FROM table",
            "date",
            100,
            BoundValue::parse("2020-01-01"),
            BoundValue::parse("2022-12-31"),
        ).unwrap();
        let options = JdbcReadOptions::partitioned(endpoint(), &plan).to_options();

        assert_eq!(
            options[4..].to_vec(),
            vec![
                ("dbtable", "(SELECT f1, f2, f3 FROM table) as q".to_string()),
                ("numPartitions", "100".to_string()),
                ("partitionColumn", "date".to_string()),
                ("lowerBound", "2020-01-01".to_string()),
                ("upperBound", "2022-12-31".to_string()),
            ]
        );
    }

    #[test]
    fn redacted_options_hide_password() {
        let read = JdbcReadOptions::single(endpoint(), "SELECT 1");

        let redacted = read.redacted();
        assert!(redacted.iter().all(|(_, value)| !value.contains("hunter2")));
        assert_eq!(redacted[3], ("password", PASSWORD_MASK.to_string()));
        assert!(!format!("{read:?}").contains("hunter2"));
    }
}
