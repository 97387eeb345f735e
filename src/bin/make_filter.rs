//! Scaffolds a new filter source file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use filtercrate::scaffold::{self, SUCCESS_MESSAGE};

#[derive(Parser)]
#[command(name = "make-filter")]
#[command(version, about = "Create a new filter source file", long_about = None)]
struct Cli {
    /// Filter type name, optionally nested (e.g. `Blog/CategoryFilter`)
    name: String,

    /// Create the file even if the filter already exists
    #[arg(long)]
    force: bool,

    /// Directory the filter file is created under
    #[arg(long, default_value = "src/filters")]
    path: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match scaffold::make_filter(&cli.path, &cli.name, cli.force) {
        Ok(_) => {
            println!("{SUCCESS_MESSAGE}");
            ExitCode::SUCCESS
        }
        Err(err) if err.is_already_exists() => {
            eprintln!("Filter already exists!");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
