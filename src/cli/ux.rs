use crate::cli::output::{CommandData, RangeReadOutput, ReaderOptions};
use crate::planner::BoundValue;

use tracing::subscriber::SetGlobalDefaultError;


pub fn setup_logging(verbose: u8, quiet: bool, json: bool) -> Result<(), SetGlobalDefaultError> {
    if json {
        // Mute all logging: stdout carries the JSON document only
        return tracing::subscriber::set_global_default(tracing::subscriber::NoSubscriber::default());
    }

    let level = if quiet {
        tracing::Level::ERROR
    } else { match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }};

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}


fn describe_bound(bound: &Option<BoundValue>) -> String {
    match bound {
        Some(value) => format!("{value} ({})", value.kind_name()),
        None => "NULL".to_string(),
    }
}

/// Render reader options one per line, the way they would be passed to
/// `.option(key, value)`.
pub fn format_reader_options(options: &ReaderOptions) -> String {
    let width = options.0.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

    options.0
        .iter()
        .map(|(key, value)| format!("{key:<width$} = {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_human_output(output: &RangeReadOutput<CommandData>) {
    if let Some(error) = &output.error {
        tracing::error!("{} failed: {}", output.command, error.message());
        return;
    }

    match &output.data {
        Some(CommandData::Ping { engine }) => {
            tracing::info!("Database reachable ({engine:?})");
        }
        Some(CommandData::Bounds(bounds)) => {
            println!("min = {}", describe_bound(&bounds.min));
            println!("max = {}", describe_bound(&bounds.max));
        }
        Some(CommandData::Plan { plan, options }) => {
            tracing::info!(
                "Reading '{}' in {} partition(s) over [{}, {}]",
                plan.partition_column,
                plan.partition_count,
                plan.lower_bound,
                plan.upper_bound,
            );
            println!("{}", format_reader_options(options));
        }
        Some(CommandData::Single { options }) => {
            tracing::info!("Reading in a single partition");
            println!("{}", format_reader_options(options));
        }
        None => {}
    }
}
