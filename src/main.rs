use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::debug;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tabled::{settings::Style, Table, Tabled};

use cbconvert::config::{config_dir, expand_path, init_config, load_config};
use cbconvert::{
    convert_with, Config, ConvertError, FileSource, LiveSource, RateSource, Result, SourceKind,
};

#[derive(Parser)]
#[command(name = "cbconvert")]
#[command(version, about = "Convert amounts between currencies using central bank daily rates", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config or ~/.cbconvert)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Convert an amount from one currency to another
    Convert {
        /// Whole amount to convert
        #[arg(allow_negative_numbers = true)]
        amount: i64,

        /// Currency code to convert from (e.g., USD)
        from: String,

        /// Currency code to convert to (e.g., EUR)
        to: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Decimal places in the result (default: from config)
        #[arg(short, long)]
        precision: Option<usize>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List currencies available in the rate feed
    Currencies {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Download rates from the bank instead of reading a file
    #[arg(long, conflicts_with = "file")]
    live: bool,

    /// Read rates from this XML file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Download rates published for this date (YYYY-MM-DD), implies --live
    #[arg(long, conflicts_with = "file")]
    date: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Convert {
            amount,
            from,
            to,
            source,
            precision,
            json,
        } => cmd_convert(&cfg_dir, amount, &from, &to, &source, precision, json),
        Commands::Currencies { source } => cmd_currencies(&cfg_dir, &source),
    }
}

/// Initialize config directory with the template file
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    let path = init_config(cfg_dir)?;

    println!("Initialized cbconvert config at: {}", cfg_dir.display());
    println!();
    println!("Edit the rate source and display settings:");
    println!("  $EDITOR {}", path.display());

    Ok(())
}

/// Pick the rate source: command-line flags first, then config.toml
fn build_source(config: &Config, args: &SourceArgs) -> Result<Box<dyn RateSource>> {
    let date = args
        .date
        .as_ref()
        .map(|s| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| ConvertError::InvalidDate(s.clone()))
        })
        .transpose()?;

    if let Some(path) = &args.file {
        return Ok(Box::new(FileSource::new(path)));
    }

    if args.live || date.is_some() || config.source.kind == SourceKind::Live {
        let timeout = Duration::from_secs(config.source.timeout_secs);
        let mut source = LiveSource::new(config.source.host.clone(), timeout);
        if let Some(date) = date {
            source = source.with_date(date);
        }
        return Ok(Box::new(source));
    }

    Ok(Box::new(FileSource::new(expand_path(&config.source.file))))
}

/// Convert an amount and print the result
fn cmd_convert(
    cfg_dir: &Path,
    amount: i64,
    from: &str,
    to: &str,
    args: &SourceArgs,
    precision: Option<usize>,
    json: bool,
) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let source = build_source(&config, args)?;
    debug!("using rate source {}", source.describe());

    let conversion = convert_with(&*source, amount, from, to)?;

    if json {
        let out = serde_json::to_string_pretty(&conversion)?;
        println!("{out}");
        return Ok(());
    }

    let precision = precision.unwrap_or(config.display.precision);
    println!(
        "{} {} = {:.*} {}",
        conversion.amount, conversion.from, precision, conversion.converted, conversion.to
    );
    match &conversion.date {
        Some(date) => println!(
            "  1 {} = {:.4} {} (rates as of {})",
            conversion.from, conversion.rate, conversion.to, date
        ),
        None => println!(
            "  1 {} = {:.4} {}",
            conversion.from, conversion.rate, conversion.to
        ),
    }

    Ok(())
}

#[derive(Tabled)]
struct CurrencyRow {
    #[tabled(rename = "CURRENCY")]
    currency: String,
    #[tabled(rename = "RATE")]
    rate: String,
}

/// List the currencies in the current feed
fn cmd_currencies(cfg_dir: &Path, args: &SourceArgs) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let source = build_source(&config, args)?;
    let table = source.fetch()?;

    let rows = table
        .choices()
        .into_iter()
        .map(|(code, label)| {
            Ok(CurrencyRow {
                currency: label,
                rate: format!("{:.4}", table.rate(&code)?),
            })
        })
        .collect::<Result<Vec<CurrencyRow>>>()?;

    let rendered = Table::new(rows).with(Style::rounded()).to_string();
    println!("{rendered}");
    println!();
    match table.date() {
        Some(date) => println!("{} currencies, rates as of {}", table.len(), date),
        None => println!("{} currencies", table.len()),
    }
    println!("Source: {}", source.describe());

    Ok(())
}
