//! Staffboard - employee, payroll and attendance dashboard
//!
//! A CLI that loads the three dashboard fixtures, joins them and prints
//! the dashboard or a payslip as Markdown or JSON.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (config, load failure, unknown employee, etc.)

use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use staffboard::analysis::{
    bucket_attendance_by_date, date_window, filter_by_status, latest_attendance_date, payslip,
    search,
};
use staffboard::cli::{Args, OutputFormat};
use staffboard::config::{Config, CONFIG_FILE};
use staffboard::report::{self, DashboardReport, ReportMetadata};
use staffboard::{DashboardSession, SourceLoader};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Staffboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Dashboard failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .staffboard.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to point at your fixtures and adjust the dashboard.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so a report printed to stdout stays clean.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load, apply commands and write the requested output. Returns the exit code.
async fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let locations = config.source.locations();
    let loader = SourceLoader::new(locations.clone(), config.source.timeout_seconds)
        .context("Failed to create HTTP client")?;

    let spinner = if args.quiet {
        None
    } else {
        Some(loading_spinner())
    };

    let loaded = loader.load().await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let dataset = loaded.context("Failed to load dashboard data")?;

    let mut session = DashboardSession::new(&dataset);

    // Apply approve/deny actions before rendering
    for command in args.commands() {
        match session.handle(command) {
            Ok(outcome) => {
                if !args.quiet {
                    eprintln!(
                        "✅ Leave request {} is {} (employee {})",
                        outcome.request_id, outcome.status, outcome.employee_id
                    );
                }
            }
            Err(e) => {
                if !args.quiet {
                    eprintln!("⚠️  Skipped {:?}: {}", command, e);
                }
            }
        }
    }

    let output = if let Some(employee_id) = args.payslip {
        let Some(view) = session.employee(employee_id) else {
            eprintln!("No employee found with id {}", employee_id);
            return Ok(1);
        };

        let slip = payslip(view, &config.dashboard.pay_period);
        match args.format {
            OutputFormat::Json => report::generate_payslip_json(&slip)?,
            OutputFormat::Markdown => {
                report::generate_payslip_markdown(&slip, &config.dashboard.currency)
            }
        }
    } else {
        let status_filter = args.status_filter();
        let mut views = filter_by_status(session.views(), &status_filter);

        if let Some(ref query) = args.search {
            views = search(&views, query).cloned().into_iter().collect();
            if views.is_empty() {
                info!("No employee matches '{}'", query);
            }
        }

        let chart_end = config
            .dashboard
            .chart_end
            .or_else(|| latest_attendance_date(session.views()))
            .unwrap_or_else(|| Utc::now().date_naive());
        let dates = date_window(chart_end, config.dashboard.chart_days);
        let chart = bucket_attendance_by_date(&views, &dates);
        let attendance_date = args.date.unwrap_or(chart_end);

        let metadata = ReportMetadata {
            sources: locations,
            generated_at: Utc::now(),
            currency: config.dashboard.currency.clone(),
            pay_period: config.dashboard.pay_period.clone(),
            status_filter: status_filter.to_string(),
            search: args.search.clone(),
        };

        let dashboard = DashboardReport::build(
            metadata,
            session.summary(),
            &views,
            chart,
            attendance_date,
            config.dashboard.default_leave_entitlement,
        );

        match args.format {
            OutputFormat::Json => report::generate_json_report(&dashboard)?,
            OutputFormat::Markdown => report::generate_markdown_report(&dashboard, &config.report),
        }
    };

    match config.output_path() {
        Some(path) => {
            std::fs::write(&path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !args.quiet {
                let summary = session.summary();
                eprintln!("\n📊 Dashboard Summary:");
                eprintln!("   Employees: {}", summary.headcount);
                eprintln!(
                    "   Total payroll: {}",
                    report::format_amount(&config.dashboard.currency, summary.total_payroll)
                );
                eprintln!("   Pending leave: {}", summary.pending_leave);
                eprintln!("\n✅ Report saved to: {}", path.display());
            }
        }
        None => println!("{}", output),
    }

    Ok(0)
}

fn loading_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Loading fixtures...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
