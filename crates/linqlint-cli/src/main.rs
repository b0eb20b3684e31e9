//! linqlint CLI - Command-line interface for the linqlint static analyzer
//!
//! Finds stringified `uniqueidentifier` comparisons inside linq query text
//! in JavaScript/TypeScript sources.

mod commands;
mod logging;
mod output;

use clap::Parser;
use commands::Commands;
use logging::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "linqlint",
    author,
    version,
    about = "Static analyzer for linq query text in JavaScript/TypeScript",
    long_about = "linqlint inspects the query text passed to linq.execute and\n\
                  linq.executeWritable and flags comparisons that convert a\n\
                  uniqueidentifier column to a string, offering a Guid-based rewrite."
)]
pub struct Cli {
    #[arg(
        long,
        value_enum,
        global = true,
        default_value = "warn",
        help = "Set the log level"
    )]
    pub log_level: LogLevel,

    #[arg(long, global = true, help = "Output logs in JSON format")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level, cli.log_json);

    match cli.command {
        Commands::Check(args) => args.run(),
        Commands::Init(args) => args.run(),
        Commands::Explain(args) => args.run(),
    }
}
