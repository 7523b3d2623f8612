//! matinfo
//!
//! Inspect level-4 MAT-files: list variables, print matrices and string arrays.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use extern_data::{MatFileBuilder, NumericClass};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "matinfo")]
#[command(about = "Inspect MAT-file tables")]
struct Args {
    /// Path to the MAT-file
    file: PathBuf,

    /// Log every file access
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List variables with shape and class (default)
    List,

    /// Print a numeric matrix row by row
    Show {
        /// Variable name
        name: String,
    },

    /// Print the rows of a character array
    Strings {
        /// Variable name
        name: String,

        /// Number of rows to print (default: all)
        #[arg(short, long)]
        rows: Option<usize>,
    },
}

/// Log filter: `RUST_LOG` when set, otherwise INFO with `--verbose` and WARN
/// without
fn log_filter(verbose: bool, env: Option<&str>) -> EnvFilter {
    match env {
        Some(directives) => EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .parse_lossy(directives),
        None if verbose => EnvFilter::default().add_directive(LevelFilter::INFO.into()),
        None => EnvFilter::default().add_directive(LevelFilter::WARN.into()),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.verbose, env.as_deref()))
        .init();
    let mat = MatFileBuilder::new()
        .path(&args.file)
        .verbose(args.verbose)
        .build()?;

    match args.command.unwrap_or(Command::List) {
        Command::List => {
            let variables = mat
                .variables()
                .with_context(|| format!("listing {}", args.file.display()))?;
            for var in variables {
                let dims: Vec<String> = var.dims.iter().map(|d| d.to_string()).collect();
                let complex = if var.is_complex { " complex" } else { "" };
                println!(
                    "{:<24} {:>12}  {}{} ({:?})",
                    var.name,
                    dims.join("x"),
                    var.class,
                    complex,
                    var.precision
                );
            }
        }
        Command::Show { name } => {
            let (rows, cols) = mat.matrix_dimensions(&name)?;
            let table = mat.read_matrix(&name, rows, cols)?;
            for row in table.chunks(cols.max(1)).take(rows) {
                let cells: Vec<String> = row.iter().map(|v| format!("{:>12}", v)).collect();
                println!("{}", cells.join(" "));
            }
        }
        Command::Strings { name, rows } => {
            let var = mat
                .variables()?
                .into_iter()
                .find(|v| v.name == name)
                .with_context(|| format!("no variable \"{}\" in {}", name, args.file.display()))?;
            if var.class != NumericClass::Char {
                bail!("\"{}\" is a {} array, not a character array", name, var.class);
            }
            let stored = var.dims.first().copied().unwrap_or(0);
            for line in mat.read_string_column(&name, rows.unwrap_or(stored))? {
                println!("{}", line.trim_end());
            }
        }
    }

    Ok(())
}
