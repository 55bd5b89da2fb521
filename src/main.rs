use clap::Parser;
use rangeread::cli::{self, commands, output, ux};


/// Entry point for the rangeread CLI.
///
/// - `ping`: Verify connectivity to the database.
/// - `discover`: Query the bounds of a column over a query.
/// - `plan`: Plan a partitioned read, discovering bounds if none are given.
/// - `single`: Reader options for an unpartitioned read.
///
/// Connection arguments fall back to the `host`, `port`, `user`, `pass`,
/// `db_name` and `ssl` environment variables.
#[tokio::main]
async fn main() {
    let args = cli::Cli::parse();

    let json = args.json;
    let command_name = args.command.to_string();
    let result = match ux::setup_logging(args.verbose, args.quiet, args.json) {
        Ok(()) => commands::run_command(args).await,
        Err(e) => Err(e.into()),
    };
    let output = output::RangeReadOutput::from_result(command_name, result);

    if json {
        match serde_json::to_string_pretty(&output) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Failed to serialize output: {e}");
                std::process::exit(1);
            }
        }
    } else {
        ux::render_human_output(&output);
    }

    if let output::RangeReadStatus::Error = output.status {
        std::process::exit(1);
    }
}
