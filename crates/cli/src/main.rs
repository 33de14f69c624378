use clap::{Parser, Subcommand, ValueEnum};
use fathom_import::{ColumnOverride, FieldKey};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

#[derive(Parser)]
#[command(name = "fathom", about = "Normalize loosely structured transaction CSV exports.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how the header row maps onto transaction fields.
    Detect {
        /// CSV file to inspect
        file: PathBuf,
        /// TOML file with import options
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Import a file and print the normalized records to stdout.
    Import {
        /// CSV file to import
        file: PathBuf,
        /// TOML file with import options
        #[arg(long)]
        config: Option<PathBuf>,
        /// Read ambiguous numeric dates as day/month
        #[arg(long)]
        day_first: bool,
        /// Column override, e.g. `amount=3` or `notes=none` (repeatable)
        #[arg(long = "map", value_parser = parse_map_arg)]
        map: Vec<(FieldKey, ColumnOverride)>,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Csv,
}

fn parse_map_arg(s: &str) -> Result<(FieldKey, ColumnOverride), String> {
    let (field, column) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected FIELD=COLUMN, got '{s}'"))?;
    Ok((field.parse()?, column.parse()?))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fathom_import=info,fathom=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect { file, config } => {
            let options = commands::load_options(config.as_deref())?;
            commands::detect(&file, options)
        }
        Commands::Import {
            file,
            config,
            day_first,
            map,
            format,
        } => {
            let mut options = commands::load_options(config.as_deref())?;
            commands::apply_flags(&mut options, day_first, map);
            commands::import(&file, options, format)
        }
    }
}
