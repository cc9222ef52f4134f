//! Command-line interface.
//!
//! Every subcommand has a `run_*` handler returning `Result<ExitCode>`;
//! [`run`] maps errors to exit codes and prints them in the selected format.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use mw_common::{
    Error, OutputFormat, Record, RecordId, Result, RunId, SummaryMetrics, SCHEMA_VERSION,
};
use mw_config::{resolve_config, ConfigOverrides, ConfigSnapshot, ResolvedConfig};
use mw_store::SortOrder;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::csv_io;
use crate::exit_codes::ExitCode;
use crate::logging::LogOptions;
use crate::metrics::derive_rows;
use crate::seed::{self, SeedOptions};
use crate::service::MessService;
use crate::validate::{parse_date, ObservationInput};

#[derive(Parser, Debug)]
#[command(
    name = "mw-core",
    version,
    about = "Track canteen food waste and forecast cooking quantities"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Configuration file (overrides MW_CONFIG and the user config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// SQLite database path
    #[arg(long, global = true, env = "MW_DB_PATH", value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
}

impl GlobalOpts {
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            verbosity: self.verbose,
            json: self.log_json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record one day's figures
    Add(RecordArgs),
    /// Overwrite an existing record
    Edit {
        /// Record ID
        id: i64,
        #[command(flatten)]
        fields: RecordArgs,
    },
    /// Delete a record
    Delete {
        /// Record ID
        id: i64,
    },
    /// Show one record with its derived columns
    Show {
        /// Record ID
        id: i64,
    },
    /// List records with derived columns, newest first
    List {
        /// Oldest first
        #[arg(long)]
        asc: bool,
    },
    /// Summary metrics
    Dashboard,
    /// Chart series for the analytics view
    Charts,
    /// Forecast consumption and recommend a cooking quantity
    Predict {
        /// Expected attendees
        #[arg(long, allow_negative_numbers = true)]
        attendees: i64,
        /// Weekday index, 0 = Monday .. 6 = Sunday (default: today)
        #[arg(long, allow_negative_numbers = true)]
        weekday: Option<i64>,
    },
    /// Write a static HTML dashboard and analytics report
    #[cfg(feature = "report")]
    Report {
        /// Output HTML file
        #[arg(long, short)]
        output: PathBuf,
        /// Minify the generated HTML
        #[arg(long)]
        minify: bool,
    },
    /// Serve the web dashboard
    #[cfg(feature = "serve")]
    Serve {
        /// Listen address (overrides the config file)
        #[arg(long, env = "MW_BIND", value_name = "ADDR")]
        bind: Option<String>,
    },
    /// Generate synthetic records
    Seed {
        /// Number of consecutive days
        #[arg(long, default_value_t = 40)]
        count: usize,
        /// First day (YYYY-MM-DD)
        #[arg(long, default_value = "2025-01-01")]
        start: String,
        /// RNG seed for reproducible data
        #[arg(long)]
        seed: Option<u64>,
        /// Write a CSV file instead of inserting into the store
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,
    },
    /// Import records from CSV (date,students,cooked,leftover)
    Import {
        /// CSV file
        path: PathBuf,
    },
    /// Export all records to CSV, oldest first
    Export {
        /// CSV file
        path: PathBuf,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the resolved configuration
    Show,
    /// Check the configuration and report problems
    Validate,
}

/// The four observation fields.
#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    /// Date (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub date: Option<String>,
    /// Number of attendees
    #[arg(long, allow_negative_numbers = true)]
    pub attendees: i64,
    /// Quantity cooked (kg)
    #[arg(long, allow_negative_numbers = true)]
    pub cooked: f64,
    /// Quantity left over (kg)
    #[arg(long, allow_negative_numbers = true)]
    pub leftover: f64,
}

impl RecordArgs {
    fn to_input(&self) -> ObservationInput {
        let date = self
            .date
            .clone()
            .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());
        ObservationInput::new(date, self.attendees, self.cooked, self.leftover)
    }
}

impl Commands {
    /// Name used in the JSON envelope.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Add(_) => "add",
            Commands::Edit { .. } => "edit",
            Commands::Delete { .. } => "delete",
            Commands::Show { .. } => "show",
            Commands::List { .. } => "list",
            Commands::Dashboard => "dashboard",
            Commands::Charts => "charts",
            Commands::Predict { .. } => "predict",
            #[cfg(feature = "report")]
            Commands::Report { .. } => "report",
            #[cfg(feature = "serve")]
            Commands::Serve { .. } => "serve",
            Commands::Seed { .. } => "seed",
            Commands::Import { .. } => "import",
            Commands::Export { .. } => "export",
            Commands::Config {
                command: ConfigCommands::Show,
            } => "config show",
            Commands::Config {
                command: ConfigCommands::Validate,
            } => "config validate",
        }
    }
}

/// Writes command results to stdout in the selected format.
pub struct Output {
    format: OutputFormat,
    run_id: RunId,
    command: &'static str,
}

impl Output {
    pub fn new(format: OutputFormat, command: &'static str) -> Self {
        Self {
            format,
            run_id: RunId::new(),
            command,
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Wrap `payload`'s fields in the standard envelope.
    pub fn envelope(&self, payload: Value) -> Value {
        let mut out = json!({
            "schema_version": SCHEMA_VERSION,
            "run_id": self.run_id.0,
            "generated_at": Utc::now().to_rfc3339(),
            "command": self.command,
        });
        if let (Some(map), Value::Object(extra)) = (out.as_object_mut(), payload) {
            map.extend(extra);
        }
        out
    }

    pub fn json(&self, payload: Value) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(&self.envelope(payload))?);
        Ok(())
    }

    pub fn error(&self, err: &Error) {
        if self.is_json() {
            let payload = json!({
                "error": {
                    "code": err.code(),
                    "message": err.to_string(),
                    "user_message": err.user_message(),
                    "recoverable": err.is_recoverable(),
                }
            });
            match serde_json::to_string_pretty(&self.envelope(payload)) {
                Ok(text) => println!("{text}"),
                Err(_) => eprintln!("Error: {err}"),
            }
        } else {
            match err {
                Error::Store(_) | Error::Io(_) | Error::Config(_) => eprintln!("Error: {err}"),
                _ => eprintln!("Error: {}", err.user_message()),
            }
        }
    }
}

/// Lazily opened service plus the resolved configuration.
struct Context {
    out: Output,
    resolved: ResolvedConfig,
}

impl Context {
    fn service(&self) -> Result<MessService> {
        MessService::open(&self.resolved.config)
    }
}

/// Resolve configuration, dispatch, and map errors to exit codes.
pub fn run(cli: &Cli) -> ExitCode {
    let out = Output::new(cli.global.format, cli.command.name());

    let overrides = ConfigOverrides {
        database_path: cli.global.db.clone(),
        bind_address: bind_override(&cli.command),
    };
    let resolved = match resolve_config(cli.global.config.as_deref(), &overrides) {
        Ok(resolved) => resolved,
        Err(e) => {
            let err = Error::from(e);
            out.error(&err);
            return ExitCode::ConfigError;
        }
    };
    for warning in &resolved.warnings {
        warn!("{}", warning);
    }

    let ctx = Context { out, resolved };
    match dispatch(&ctx, &cli.command) {
        Ok(code) => code,
        Err(err) => {
            debug!(code = err.code(), error = %err, "command failed");
            ctx.out.error(&err);
            ExitCode::from(&err)
        }
    }
}

#[cfg(feature = "serve")]
fn bind_override(command: &Commands) -> Option<String> {
    match command {
        Commands::Serve { bind } => bind.clone(),
        _ => None,
    }
}

#[cfg(not(feature = "serve"))]
fn bind_override(_command: &Commands) -> Option<String> {
    None
}

fn dispatch(ctx: &Context, command: &Commands) -> Result<ExitCode> {
    match command {
        Commands::Add(fields) => run_add(ctx, fields),
        Commands::Edit { id, fields } => run_edit(ctx, RecordId(*id), fields),
        Commands::Delete { id } => run_delete(ctx, RecordId(*id)),
        Commands::Show { id } => run_show(ctx, RecordId(*id)),
        Commands::List { asc } => run_list(ctx, *asc),
        Commands::Dashboard => run_dashboard(ctx),
        Commands::Charts => run_charts(ctx),
        Commands::Predict { attendees, weekday } => run_predict(ctx, *attendees, *weekday),
        #[cfg(feature = "report")]
        Commands::Report { output, minify } => run_report(ctx, output, *minify),
        #[cfg(feature = "serve")]
        Commands::Serve { .. } => run_serve(ctx),
        Commands::Seed {
            count,
            start,
            seed,
            csv,
        } => run_seed(ctx, *count, start, *seed, csv.as_deref()),
        Commands::Import { path } => run_import(ctx, path),
        Commands::Export { path } => run_export(ctx, path),
        Commands::Config { command } => match command {
            ConfigCommands::Show => run_config_show(ctx),
            ConfigCommands::Validate => run_config_validate(ctx),
        },
    }
}

fn run_add(ctx: &Context, fields: &RecordArgs) -> Result<ExitCode> {
    let service = ctx.service()?;
    let id = service.add(&fields.to_input())?;
    if ctx.out.is_json() {
        let record = service.get(id)?;
        ctx.out.json(json!({ "id": id, "record": record }))?;
    } else {
        println!("Record added successfully! (id {id})");
    }
    Ok(ExitCode::Success)
}

fn run_edit(ctx: &Context, id: RecordId, fields: &RecordArgs) -> Result<ExitCode> {
    let service = ctx.service()?;
    service.edit(id, &fields.to_input())?;
    if ctx.out.is_json() {
        ctx.out.json(json!({ "id": id, "record": service.get(id)? }))?;
    } else {
        println!("Record updated successfully!");
    }
    Ok(ExitCode::Success)
}

fn run_delete(ctx: &Context, id: RecordId) -> Result<ExitCode> {
    let removed = ctx.service()?.delete(id)?;
    if ctx.out.is_json() {
        ctx.out.json(json!({ "id": id, "removed": removed }))?;
    } else if removed {
        println!("Record deleted successfully!");
    } else {
        println!("No record with id {id}; nothing deleted.");
    }
    Ok(ExitCode::Success)
}

fn run_show(ctx: &Context, id: RecordId) -> Result<ExitCode> {
    let record = ctx.service()?.get(id)?;
    if ctx.out.is_json() {
        let derived = derive_rows(std::slice::from_ref(&record));
        ctx.out
            .json(json!({ "record": record, "derived": derived.first() }))?;
    } else {
        print_record(&record);
    }
    Ok(ExitCode::Success)
}

fn print_record(record: &Record) {
    let obs = &record.observation;
    println!("# Record {}", record.id);
    println!();
    println!("  Date:        {} ({})", obs.date_label(), obs.weekday_name());
    println!("  Attendees:   {}", obs.attendee_count);
    println!("  Cooked:      {:.2} kg", obs.quantity_cooked);
    println!("  Leftover:    {:.2} kg", obs.quantity_leftover);
    println!("  Consumed:    {:.2} kg", obs.consumption());
    match (obs.waste_percent(), obs.efficiency()) {
        (Some(waste), Some(efficiency)) => {
            println!("  Waste:       {waste:.2}%");
            println!("  Efficiency:  {efficiency:.2}%");
        }
        _ => println!("  Waste:       n/a (nothing cooked)"),
    }
}

fn run_list(ctx: &Context, ascending: bool) -> Result<ExitCode> {
    let order = if ascending {
        SortOrder::Ascending
    } else {
        SortOrder::Descending
    };
    let rows = ctx.service()?.list_rows(order)?;
    if ctx.out.is_json() {
        ctx.out.json(json!({ "count": rows.len(), "records": rows }))?;
        return Ok(ExitCode::Success);
    }

    if rows.is_empty() {
        println!("No records yet.");
        return Ok(ExitCode::Success);
    }
    println!("# Records ({} total)", rows.len());
    println!();
    println!(
        "  {:>5}  {:<10}  {:<9}  {:>9}  {:>9}  {:>9}  {:>9}  {:>7}  {:>7}",
        "id", "date", "day", "attendees", "cooked", "leftover", "consumed", "waste%", "eff%"
    );
    for row in &rows {
        let pct = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"));
        println!(
            "  {:>5}  {:<10}  {:<9}  {:>9}  {:>9.2}  {:>9.2}  {:>9.2}  {:>7}  {:>7}",
            row.id,
            row.date,
            row.weekday,
            row.attendee_count,
            row.quantity_cooked,
            row.quantity_leftover,
            row.consumption,
            pct(row.waste_percent),
            pct(row.efficiency),
        );
    }
    Ok(ExitCode::Success)
}

fn last_updated() -> String {
    Local::now().format("%d %b %Y").to_string()
}

fn run_dashboard(ctx: &Context) -> Result<ExitCode> {
    let metrics = ctx.service()?.get_dashboard_metrics()?;
    if ctx.out.is_json() {
        ctx.out
            .json(json!({ "metrics": metrics, "last_updated": last_updated() }))?;
    } else {
        print_metrics(&metrics);
    }
    Ok(ExitCode::Success)
}

fn print_metrics(m: &SummaryMetrics) {
    println!("# Dashboard (last updated {})", last_updated());
    println!();
    println!("  Records:                  {}", m.record_count);
    println!("  Average waste:            {:.2}%", m.avg_waste_percent);
    println!("  Average efficiency:       {:.2}%", m.avg_efficiency);
    println!("  Total loss:               {:.2}", m.total_loss_cost);
    println!("  Total consumption:        {:.2} kg", m.total_consumption);
    println!(
        "  Consumption per attendee: {:.3} kg",
        m.avg_consumption_per_attendee
    );
    if m.excluded_records > 0 {
        println!(
            "  ({} record(s) with no cooked quantity excluded from averages)",
            m.excluded_records
        );
    }
}

fn run_charts(ctx: &Context) -> Result<ExitCode> {
    let charts = ctx.service()?.get_chart_data()?;
    if ctx.out.is_json() {
        ctx.out.json(json!({ "charts": charts }))?;
        return Ok(ExitCode::Success);
    }

    println!("# Chart series ({} days)", charts.attendance.len());
    if let (Some(first), Some(last)) = (
        charts.attendance.labels.first(),
        charts.attendance.labels.last(),
    ) {
        println!("  Range: {first} .. {last}");
    }
    println!();
    println!("  Average waste by weekday:");
    for (day, waste) in charts
        .weekday_pattern
        .labels
        .iter()
        .zip(&charts.weekday_pattern.data)
    {
        println!("    {day:<9}  {waste:>6.2}%");
    }
    Ok(ExitCode::Success)
}

fn run_predict(ctx: &Context, attendees: i64, weekday: Option<i64>) -> Result<ExitCode> {
    let result = ctx.service()?.predict(attendees, weekday)?;
    if ctx.out.is_json() {
        ctx.out.json(json!({ "prediction": result }))?;
    } else {
        println!(
            "# Prediction for {} attendees on {}",
            result.attendee_count, result.weekday_name
        );
        println!();
        println!("  Predicted consumption: {:.2} kg", result.prediction);
        println!(
            "  Recommended to cook:   {:.2} kg (x{} safety margin)",
            result.recommended, result.safety_margin
        );
        println!(
            "  Model fit (R²):        {:.2}% over {} records",
            result.score, result.training_records
        );
    }
    Ok(ExitCode::Success)
}

#[cfg(feature = "report")]
fn run_report(ctx: &Context, output: &Path, minify: bool) -> Result<ExitCode> {
    let service = ctx.service()?;
    let dashboard = service.dashboard()?;
    let charts = service.get_chart_data()?;
    let generated_at = Local::now().format("%d %b %Y %H:%M").to_string();
    let page = mw_report::ReportPage::new(&dashboard, &charts, generated_at)?;
    let bytes = mw_report::write_report(&page, output, minify)?;

    if ctx.out.is_json() {
        ctx.out.json(json!({
            "path": output.display().to_string(),
            "bytes": bytes,
            "minified": minify,
            "record_count": dashboard.metrics.record_count,
        }))?;
    } else {
        println!("Report written to {} ({bytes} bytes)", output.display());
    }
    Ok(ExitCode::Success)
}

#[cfg(feature = "serve")]
fn run_serve(ctx: &Context) -> Result<ExitCode> {
    let service = ctx.service()?;
    let bind = &ctx.resolved.config.server.bind_address;
    if !ctx.out.is_json() {
        eprintln!("Serving on http://{bind}");
    }
    crate::server::serve(service, bind)?;
    Ok(ExitCode::Success)
}

fn run_seed(
    ctx: &Context,
    count: usize,
    start: &str,
    seed: Option<u64>,
    csv: Option<&Path>,
) -> Result<ExitCode> {
    let start: NaiveDate = parse_date(start)?;
    let observations = seed::generate(&SeedOptions { count, start, seed });

    match csv {
        Some(path) => {
            csv_io::write_observations_file(path, &observations)?;
            if ctx.out.is_json() {
                ctx.out.json(json!({
                    "rows": observations.len(),
                    "path": path.display().to_string(),
                }))?;
            } else {
                println!("Wrote {} rows to {}", observations.len(), path.display());
            }
        }
        None => {
            let ids = ctx.service()?.add_many(&observations)?;
            if ctx.out.is_json() {
                ctx.out.json(json!({ "inserted": ids.len(), "ids": ids }))?;
            } else {
                println!("Inserted {} synthetic records", ids.len());
            }
        }
    }
    Ok(ExitCode::Success)
}

fn run_import(ctx: &Context, path: &Path) -> Result<ExitCode> {
    let report = csv_io::read_observations_file(path)?;
    let ids = ctx.service()?.add_many(&report.accepted)?;

    if ctx.out.is_json() {
        ctx.out.json(json!({
            "imported": ids.len(),
            "rejected": report.rejected,
        }))?;
    } else {
        println!(
            "Imported {} records; {} rejected",
            ids.len(),
            report.rejected.len()
        );
        for row in &report.rejected {
            println!("  line {}: {}", row.line, row.reason);
        }
    }

    if report.rejected.is_empty() {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::ValidationError)
    }
}

fn run_export(ctx: &Context, path: &Path) -> Result<ExitCode> {
    let records = ctx.service()?.list_all(SortOrder::Ascending)?;
    let observations: Vec<_> = records.into_iter().map(|r| r.observation).collect();
    csv_io::write_observations_file(path, &observations)?;
    if ctx.out.is_json() {
        ctx.out.json(json!({
            "exported": observations.len(),
            "path": path.display().to_string(),
        }))?;
    } else {
        println!(
            "Exported {} records to {}",
            observations.len(),
            path.display()
        );
    }
    Ok(ExitCode::Success)
}

fn run_config_show(ctx: &Context) -> Result<ExitCode> {
    let snapshot = ConfigSnapshot::from_resolved(&ctx.resolved);
    if ctx.out.is_json() {
        ctx.out.json(json!({ "config": snapshot }))?;
        return Ok(ExitCode::Success);
    }

    let config = &snapshot.config;
    println!("# Configuration ({})", snapshot.source);
    println!();
    if let Some(path) = &snapshot.path {
        println!("  File:                 {path}");
    }
    if let Some(digest) = &snapshot.content_sha256 {
        println!("  SHA-256:              {digest}");
    }
    println!("  Unit cost:            {}", config.analytics.unit_cost);
    println!("  Safety margin:        {}", config.analytics.safety_margin);
    println!(
        "  Min training records: {}",
        config.analytics.min_training_records
    );
    println!(
        "  Database:             {}",
        config.store.database_path.display()
    );
    println!("  Bind address:         {}", config.server.bind_address);
    for warning in &snapshot.warnings {
        println!("  Warning: {warning}");
    }
    Ok(ExitCode::Success)
}

fn run_config_validate(ctx: &Context) -> Result<ExitCode> {
    // Resolution already rejected invalid configs; only warnings remain.
    let warnings = &ctx.resolved.warnings;
    if ctx.out.is_json() {
        ctx.out.json(json!({
            "valid": true,
            "source": ctx.resolved.source,
            "warnings": warnings,
        }))?;
    } else {
        println!("Configuration is valid ({})", ctx.resolved.source);
        for warning in warnings {
            println!("  Warning: {warning}");
        }
    }
    Ok(ExitCode::Success)
}
