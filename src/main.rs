mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use config::Config;

#[derive(Parser)]
#[command(name = "ical2csv")]
#[command(version)]
#[command(about = "Convert an iCalendar file into a CSV file for use in a spreadsheet")]
struct Cli {
    /// Show debug output on the console
    #[arg(short, long)]
    verbose: bool,

    /// Config file (defaults to ~/.config/ical2csv/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// iCalendar file to convert
    icalendar_file: PathBuf,

    /// CSV file to write (defaults to the iCalendar path with ".csv" appended)
    csv_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = Config::load(cli.config.as_deref())?;
    let _guard = logging::init_logging(cli.verbose, &cfg.logging)?;

    commands::convert::run(&cli.icalendar_file, cli.csv_file, &cfg)
}
