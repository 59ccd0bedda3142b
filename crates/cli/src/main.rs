// pricewatch CLI - track item prices against target prices

mod account;
mod exit_codes;
mod track;
mod util;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::LevelFilter;
use pricewatch_config::{ConfigError, Settings};
use pricewatch_io::StoreError;
use pricewatch_recon::ReconError;

use exit_codes::{
    recon_exit_code, store_exit_code, EXIT_CONFIG_INVALID, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "pwatch")]
#[command(about = "Track item prices and get alerted when they reach your target")]
#[command(version)]
struct Cli {
    /// Directory holding accounts and price ledgers
    #[arg(long, global = true, env = "PRICEWATCH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Settings file (default: <config dir>/pricewatch/settings.toml)
    #[arg(long, global = true, env = "PRICEWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    #[command(after_help = "\
Examples:
  pwatch signup --name Ada --email ada@example.com --password s3cret --country Nigeria")]
    Signup {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, env = "PRICEWATCH_PASSWORD", hide_env_values = true)]
        password: String,

        /// Country, selects the currency symbol used for display
        #[arg(long)]
        country: String,
    },

    /// Check credentials and show the account's currency
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "PRICEWATCH_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Record current prices, compare with last time, and report targets reached
    #[command(after_help = "\
Exit code 20 with --fail-on-alert means at least one item is at or below its target.

Examples:
  pwatch track --email ada@example.com --observe milk=4.00:4.50 --observe eggs=3.50:2.00
  pwatch track --email ada@example.com --observe bread=2.20
  pwatch track --email ada@example.com --batch prices.csv --json
  pwatch track --email ada@example.com --batch prices.csv --output report.json")]
    Track {
        #[arg(long)]
        email: String,

        #[arg(long, env = "PRICEWATCH_PASSWORD", hide_env_values = true)]
        password: String,

        /// ITEM=PRICE[:TARGET]; target defaults to the price. Repeatable.
        #[arg(long, value_name = "ITEM=PRICE[:TARGET]")]
        observe: Vec<String>,

        /// CSV with columns item,current_price[,target_price]
        #[arg(long)]
        batch: Option<PathBuf>,

        /// Output JSON to stdout instead of the human report
        #[arg(long)]
        json: bool,

        /// Write JSON report to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit 20 when any item reached its target
        #[arg(long)]
        fail_on_alert: bool,
    },

    /// List tracked prices
    Show {
        #[arg(long)]
        email: String,

        #[arg(long, env = "PRICEWATCH_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            let ts = chrono::Local::now().format("%H:%M:%S%.3f");
            writeln!(buf, "[{} {:<5} {}] {}", ts, record.level(), record.target(), record.args())
        })
        .target(env_logger::Target::Stderr)
        .init();
}

/// Settings and data directory resolved from flags, env and settings file.
pub struct Context {
    pub settings: Settings,
    pub data_dir: PathBuf,
}

impl Context {
    fn resolve(config: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<Self, CliError> {
        let settings = match config {
            Some(path) if !path.exists() => {
                return Err(CliError::usage(format!(
                    "settings file not found: {}",
                    path.display()
                )))
            }
            Some(path) => Settings::load_from(&path),
            None => Settings::load(),
        }
        .map_err(CliError::config)?;

        let data_dir = data_dir.unwrap_or_else(|| settings.effective_data_dir());
        log::debug!("data dir: {}", data_dir.display());
        Ok(Self { settings, data_dir })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = Context::resolve(cli.config, cli.data_dir).and_then(|ctx| match cli.command {
        Commands::Signup { name, email, password, country } => {
            account::cmd_signup(&ctx, &name, &email, &password, &country)
        }
        Commands::Login { email, password } => account::cmd_login(&ctx, &email, &password),
        Commands::Track { email, password, observe, batch, json, output, fail_on_alert } => {
            track::cmd_track(&ctx, &email, &password, observe, batch, json, output, fail_on_alert)
        }
        Commands::Show { email, password, json } => track::cmd_show(&ctx, &email, &password, json),
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    pub fn config(err: ConfigError) -> Self {
        Self::new(EXIT_CONFIG_INVALID, err.to_string())
            .with_hint(format!("check {}", Settings::config_path().display()))
    }

    /// Create error from store error with proper exit code.
    pub fn store(err: StoreError) -> Self {
        let hint = match &err {
            StoreError::AlreadyExists(_) => Some("log in with `pwatch login` instead".to_string()),
            StoreError::InvalidCredentials => {
                Some("sign up first with `pwatch signup` if you have no account".to_string())
            }
            _ => None,
        };
        Self { code: store_exit_code(&err), message: err.to_string(), hint }
    }

    pub fn recon(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::ObservationSyntax(_) => Some("example: --observe milk=4.00:4.50".to_string()),
            _ => None,
        };
        Self { code: recon_exit_code(&err), message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
