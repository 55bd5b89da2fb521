pub mod commands;
pub mod error;
pub mod output;
pub mod ux;

use crate::config::{ConnectionConfig, Engine, PASSWORD_MASK};
pub use clap::{Args, Parser, Subcommand};

use std::fmt;


#[derive(Args)]
pub struct ConnectionArgs {
    #[arg(
        long,
        help = "Database host.",
        env = "host",
        default_value = "localhost",
    )]
    pub host: String,

    #[arg(
        long,
        help = "Database port.",
        env = "port",
        default_value_t = 5432,
    )]
    pub port: u16,

    #[arg(
        long,
        help = "Database user.",
        env = "user",
    )]
    pub user: String,

    #[arg(
        long,
        help = "Database password.",
        env = "pass",
        hide_env_values = true
    )]
    pub password: String,

    #[arg(
        long,
        help = "Database name.",
        env = "db_name",
    )]
    pub database: String,

    #[arg(
        long,
        help = "Require TLS on database connections.",
        env = "ssl",
        default_value_t = true,
        action = clap::ArgAction::Set,
    )]
    pub tls: bool,
}

impl fmt::Debug for ConnectionArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionArgs")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &PASSWORD_MASK)
            .field("database", &self.database)
            .field("tls", &self.tls)
            .finish()
    }
}

impl From<ConnectionArgs> for ConnectionConfig {
    fn from(args: ConnectionArgs) -> Self {
        ConnectionConfig {
            host: args.host,
            port: args.port,
            user: args.user,
            password: args.password,
            database: args.database,
            tls: args.tls,
        }
    }
}


#[derive(Parser)]
#[command(name = "rangeread", version, about = "Plans range-partitioned parallel reads of a SQL query for JDBC readers such as Spark.")]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[arg(
        long = "engine",
        value_enum,
        help = "Database engine.",
        default_value_t = Engine::Postgres,
        env = "ENGINE",
    )]
    pub engine: Engine,

    #[arg(
        long,
        help = "JDBC URL handed to the reader, e.g. 'jdbc:postgresql:dbserver'.
If not set, one is built from the connection arguments and the engine.",
    )]
    pub url: Option<String>,

    #[arg(
        long,
        help = "JDBC driver class handed to the reader.
If not set, it is inferred from the URL.",
    )]
    pub driver: Option<String>,

    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Set level of verbosity. [default: INFO]\n\t-v: DEBUG\n\t-vv: TRACE\n--quiet takes precedence over --verbose."
    )]
    pub verbose: u8,

    #[arg(
        short,
        long,
        action = clap::ArgAction::SetTrue,
        help = "Disable all information logs (only ERROR level logs are shown).\n--quiet takes precedence over --verbose."
    )]
    pub quiet: bool,

    #[arg(
        long,
        action = clap::ArgAction::SetTrue,
        help = "Enable JSON output format. Human readable output is disabled when this flag is set."
    )]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[arg(long, help = "Query to read. It is embedded unchanged as a subquery.")]
    pub query: String,

    #[arg(
        long,
        help = "Numeric, date or timestamp column to partition on.",
        conflicts_with = "row_number_order",
        required_unless_present = "row_number_order",
    )]
    pub column: Option<String>,

    #[arg(
        long,
        help = "Partition on a generated row number ordered by this column.
Use when the query has no column suitable for partitioning.",
    )]
    pub row_number_order: Option<String>,

    #[arg(
        long,
        help = "Number of partitions the reader splits the range into.",
        allow_negative_numbers = true,
    )]
    pub partitions: i64,

    #[arg(
        long,
        help = "Lower bound of the partition column.
If neither bound is set, both are discovered by querying the database.",
        requires = "upper",
        allow_hyphen_values = true,
    )]
    pub lower: Option<String>,

    #[arg(
        long,
        help = "Upper bound of the partition column.",
        requires = "lower",
        allow_hyphen_values = true,
    )]
    pub upper: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Test connection to the database.")]
    Ping {},

    #[command(about = "Query the minimum and maximum of a column over a query.")]
    Discover {
        #[arg(long, help = "Query to inspect.")]
        query: String,
        #[arg(long, help = "Column to find the bounds of.")]
        column: String,
    },

    #[command(about = "Plan a partitioned read and print the reader options.")]
    Plan {
        #[command(flatten)]
        args: PlanArgs,
    },

    #[command(about = "Print the reader options for a single-partition read.")]
    Single {
        #[arg(long, help = "Query to read.")]
        query: String,
    },
}

impl std::fmt::Display for Commands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Commands::Ping { .. } => "ping",
            Commands::Discover { .. } => "discover",
            Commands::Plan { .. } => "plan",
            Commands::Single { .. } => "single",
        };
        write!(f, "{name}")
    }
}
