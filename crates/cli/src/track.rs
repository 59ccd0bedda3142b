//! `pwatch track` / `pwatch show` - record prices and report changes.

use std::path::PathBuf;

use pricewatch_io::batch::read_batch_csv;
use pricewatch_io::CsvLedgerStore;
use pricewatch_recon::{
    normalize, parse_observation_arg, track, AlertMessage, ClassificationMessage, Ledger,
    LedgerStore, Observation, PriceChange, PriceRecord, ReconSummary, Reconciliation,
};
use serde::Serialize;

use crate::account::authenticate;
use crate::exit_codes::{EXIT_IO, EXIT_TRACK_ALERT};
use crate::util::{money, pad_right};
use crate::{CliError, Context};

// ---------------------------------------------------------------------------
// JSON documents
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ReportMeta<'a> {
    user: &'a str,
    currency: &'a str,
    engine_version: &'static str,
    run_at: String,
}

impl<'a> ReportMeta<'a> {
    fn new(user: &'a str, currency: &'a str) -> Self {
        Self {
            user,
            currency,
            engine_version: env!("CARGO_PKG_VERSION"),
            run_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
struct TrackReport<'a> {
    meta: ReportMeta<'a>,
    summary: &'a ReconSummary,
    messages: &'a [ClassificationMessage],
    alerts: &'a [AlertMessage],
}

#[derive(Serialize)]
struct LedgerRow<'a> {
    #[serde(flatten)]
    record: &'a PriceRecord,
    change: PriceChange,
    target_reached: bool,
}

#[derive(Serialize)]
struct LedgerReport<'a> {
    meta: ReportMeta<'a>,
    items: Vec<LedgerRow<'a>>,
}

// ---------------------------------------------------------------------------
// track
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
pub fn cmd_track(
    ctx: &Context,
    email: &str,
    password: &str,
    observe: Vec<String>,
    batch: Option<PathBuf>,
    json_output: bool,
    output_file: Option<PathBuf>,
    fail_on_alert: bool,
) -> Result<(), CliError> {
    if observe.is_empty() && batch.is_none() {
        return Err(CliError::usage("nothing to track: give --observe or --batch")
            .with_hint("pwatch track --email you@example.com --observe milk=4.00:4.50"));
    }

    let account = authenticate(ctx, email, password)?;
    let currencies = ctx.settings.currency_table();
    let symbol = currencies.symbol_for(&account.country);

    let observations = collect_observations(ctx, observe, batch)?;
    if observations.is_empty() {
        eprintln!("no items with a name were submitted");
    }

    let store = CsvLedgerStore::new(&ctx.data_dir);
    let outcome = track(&store, &account.email, &observations).map_err(CliError::recon)?;

    let report = TrackReport {
        meta: ReportMeta::new(&account.email, symbol),
        summary: &outcome.summary,
        messages: &outcome.messages,
        alerts: &outcome.alerts,
    };
    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::new(EXIT_IO, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    } else {
        print_track_report(&outcome, symbol);
    }

    // Human summary to stderr
    let s = &outcome.summary;
    eprintln!(
        "{} items updated: {} cheaper, {} increased, {} unchanged; {} at target; {} tracked",
        s.observed, s.decreased, s.increased, s.unchanged, s.alerts, s.tracked,
    );

    if fail_on_alert && s.alerts > 0 {
        return Err(CliError::new(EXIT_TRACK_ALERT, format!("{} items reached their target", s.alerts)));
    }
    Ok(())
}

fn collect_observations(
    ctx: &Context,
    observe: Vec<String>,
    batch: Option<PathBuf>,
) -> Result<Vec<Observation>, CliError> {
    let mut raw = Vec::new();
    if let Some(path) = batch {
        if !path.exists() {
            return Err(CliError::usage(format!("batch file not found: {}", path.display())));
        }
        raw.extend(read_batch_csv(&path).map_err(CliError::store)?);
    }
    for arg in &observe {
        raw.push(parse_observation_arg(arg).map_err(CliError::recon)?);
    }
    normalize(raw, &ctx.settings.price_bounds()).map_err(CliError::recon)
}

fn change_marker(kind: PriceChange) -> &'static str {
    match kind {
        PriceChange::Decreased => "✅",
        PriceChange::Increased => "⚠️",
        PriceChange::Unchanged => "🔹",
    }
}

fn format_message(m: &ClassificationMessage, symbol: &str) -> String {
    format!("{} {}", change_marker(m.kind), m.render(|p| money(symbol, p)))
}

fn format_alert(a: &AlertMessage, symbol: &str) -> String {
    format!("🚨 {}", a.render(|p| money(symbol, p)))
}

fn print_track_report(outcome: &Reconciliation, symbol: &str) {
    if !outcome.messages.is_empty() {
        println!("Price tracker results");
        for m in &outcome.messages {
            println!("  {}", format_message(m, symbol));
        }
    }
    if !outcome.alerts.is_empty() {
        println!("Alerts");
        for a in &outcome.alerts {
            println!("  {}", format_alert(a, symbol));
        }
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

pub fn cmd_show(ctx: &Context, email: &str, password: &str, json_output: bool) -> Result<(), CliError> {
    let account = authenticate(ctx, email, password)?;
    let currencies = ctx.settings.currency_table();
    let symbol = currencies.symbol_for(&account.country);

    let store = CsvLedgerStore::new(&ctx.data_dir);
    let ledger = store.load(&account.email).map_err(CliError::recon)?;

    if json_output {
        let report = LedgerReport {
            meta: ReportMeta::new(&account.email, symbol),
            items: ledger
                .iter()
                .map(|record| LedgerRow {
                    record,
                    change: record.change(),
                    target_reached: record.target_reached(),
                })
                .collect(),
        };
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    if ledger.is_empty() {
        println!("No tracked prices yet.");
        return Ok(());
    }
    for line in ledger_lines(&ledger, symbol) {
        println!("{line}");
    }
    Ok(())
}

const ITEM_COLUMN_MAX: usize = 24;

fn ledger_lines(ledger: &Ledger, symbol: &str) -> Vec<String> {
    let width = ledger
        .iter()
        .map(|r| unicode_width::UnicodeWidthStr::width(r.item.as_str()))
        .max()
        .unwrap_or(0)
        .min(ITEM_COLUMN_MAX);

    ledger
        .iter()
        .map(|r| {
            let alert = if r.target_reached() { "  🚨" } else { "" };
            format!(
                "{}  {} ({} last: {}, target: {}){}",
                pad_right(&r.item, width),
                money(symbol, r.current_price),
                change_marker(r.change()),
                money(symbol, r.last_price),
                money(symbol, r.target_price),
                alert,
            )
        })
        .collect()
}
