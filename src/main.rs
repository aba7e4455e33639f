//! CLI entry point for the degree-day report job.
//!
//! For every configured location the job fetches daily station history,
//! compares the trailing window with last year and a multi-year average,
//! renders a chart and emails the summary to each recipient.

mod infra;
mod services;

use crate::infra::acis::AcisClient;
use crate::infra::outbox::FileMailer;
use crate::infra::ses::SesMailer;
use crate::services::mailer::Mailer;
use crate::services::station_data::StationData;
use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use degree_day_report::acis::{DEFAULT_ACIS_URL, StationHistory};
use degree_day_report::chart::{chart_path, chart_title, render_chart};
use degree_day_report::degree_days::{
    DegreeDaySummary, ZeroDenominator, history_window, trailing_window,
};
use degree_day_report::fetch::{BasicClient, HttpClient, fetch_bytes, fetch_source};
use degree_day_report::forecast::{DEFAULT_FORECAST_URL, DEFAULT_REGION, Forecast, parse_forecast};
use degree_day_report::locations::{DEFAULT_LOCATIONS_URL, Location, LocationSheet, parse_locations};
use degree_day_report::mail::{ReportAttachment, build_message};
use degree_day_report::report::{ForecastSection, compose};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::Instrument;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "degree_day_report")]
#[command(about = "Emails heating/cooling degree-day reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct ReportOptions {
    /// Number of earlier years averaged into the baseline
    #[arg(long, default_value_t = 5)]
    baseline_years: u32,

    /// Row of the weekly forecast feed to report
    #[arg(long, default_value = DEFAULT_REGION)]
    forecast_region: String,

    /// Leave the weekly forecast section out
    #[arg(long, default_value_t = false)]
    no_forecast: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and email reports for every configured location
    Run {
        /// Location CSV path or URL (default: $DD_LOCATIONS, then the published sheet)
        #[arg(short, long, value_name = "FILE_OR_URL")]
        locations: Option<String>,

        /// Directory for charts, and for messages when --dry-run is set
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Sender address (default: $DD_MAIL_FROM)
        #[arg(long)]
        from: Option<String>,

        /// Named AWS profile used for SES
        #[arg(long)]
        aws_profile: Option<String>,

        /// SES region
        #[arg(long, default_value = "us-east-1")]
        aws_region: String,

        /// Write .eml files to <output_dir>/outbox instead of sending
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Send reports without the chart attachment
        #[arg(long, default_value_t = false)]
        no_chart: bool,

        #[command(flatten)]
        report: ReportOptions,
    },
    /// Print the text summary for one station
    Summary {
        /// ACIS station identifier
        #[arg(short, long)]
        station: String,

        /// Trailing window length in days
        #[arg(short, long, default_value_t = 30)]
        days: u32,

        #[command(flatten)]
        report: ReportOptions,
    },
    /// List the configured locations
    Locations {
        /// Location CSV path or URL (default: $DD_LOCATIONS, then the published sheet)
        #[arg(short, long, value_name = "FILE_OR_URL")]
        locations: Option<String>,
    },
}

/// Remote endpoints, overridable through the environment.
struct Endpoints {
    acis_url: String,
    forecast_url: String,
}

impl Endpoints {
    fn from_env() -> Self {
        Self {
            acis_url: env_or("DD_ACIS_URL", DEFAULT_ACIS_URL),
            forecast_url: env_or("DD_FORECAST_URL", DEFAULT_FORECAST_URL),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = env_or("LOG_FILE_PATH", "logs/degree_day_report.log");
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("degree_day_report.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            locations,
            output_dir,
            from,
            aws_profile,
            aws_region,
            dry_run,
            no_chart,
            report,
        } => {
            let output_dir = output_dir.unwrap_or_else(std::env::temp_dir);
            let sender = match from.or_else(|| std::env::var("DD_MAIL_FROM").ok()) {
                Some(sender) => sender,
                None if dry_run => "degree-days@localhost.localdomain".to_string(),
                None => bail!("a sender address is required: pass --from or set DD_MAIL_FROM"),
            };

            let mailer: Box<dyn Mailer> = if dry_run {
                info!(dir = %output_dir.display(), "Dry run, messages go to the outbox");
                Box::new(FileMailer::new(output_dir.join("outbox")))
            } else {
                Box::new(SesMailer::new(aws_profile.as_deref(), &aws_region).await)
            };

            run_reports(
                locations.as_deref(),
                &output_dir,
                &sender,
                mailer.as_ref(),
                &report,
                !no_chart,
            )
            .await?;
        }
        Commands::Summary {
            station,
            days,
            report,
        } => {
            let http = BasicClient::new()?;
            let endpoints = Endpoints::from_env();
            let acis = AcisClient::new(http.clone(), endpoints.acis_url.clone());
            let today = Local::now().date_naive();

            let (history, summary) =
                build_summary(&acis, &station, days, today, report.baseline_years).await?;
            let forecast = if report.no_forecast {
                None
            } else {
                load_forecast(&http, &endpoints.forecast_url, &report.forecast_region).await
            };
            let section = forecast.as_ref().map(|forecast| ForecastSection {
                forecast,
                source_url: &endpoints.forecast_url,
            });

            let report = compose(&history.name, &summary, section);
            println!("{}", report.text);
        }
        Commands::Locations { locations } => {
            let http = BasicClient::new()?;
            let source = locations_source(locations.as_deref());
            let sheet = load_locations(&http, &source).await?;

            for location in &sheet.locations {
                println!(
                    "{}\t{} days\t{}",
                    location.station,
                    location.num_days,
                    location.recipients.join(", ")
                );
            }
        }
    }

    Ok(())
}

fn locations_source(cli_value: Option<&str>) -> String {
    cli_value
        .map(str::to_string)
        .unwrap_or_else(|| env_or("DD_LOCATIONS", DEFAULT_LOCATIONS_URL))
}

/// Generates and sends reports for every configured location, in sheet order.
///
/// A failing location is logged and skipped; the run fails at the end if any
/// location failed.
#[tracing::instrument(skip(output_dir, sender, mailer, report), fields(output_dir = %output_dir.display()))]
async fn run_reports(
    locations: Option<&str>,
    output_dir: &Path,
    sender: &str,
    mailer: &dyn Mailer,
    report: &ReportOptions,
    attach_chart: bool,
) -> Result<()> {
    let http = BasicClient::new()?;
    let endpoints = Endpoints::from_env();

    let source = locations_source(locations);
    let sheet = load_locations(&http, &source).await?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let forecast = if report.no_forecast {
        None
    } else {
        load_forecast(&http, &endpoints.forecast_url, &report.forecast_region).await
    };

    let acis = AcisClient::new(http, endpoints.acis_url.clone());
    let pipeline = Pipeline {
        stations: &acis,
        mailer,
        sender,
        output_dir,
        baseline_years: report.baseline_years,
        forecast: forecast.as_ref().map(|forecast| ForecastSection {
            forecast,
            source_url: &endpoints.forecast_url,
        }),
        attach_chart,
    };

    let today = Local::now().date_naive();
    let mut failed = 0;

    for location in &sheet.locations {
        let span = tracing::info_span!(
            "location",
            station = %location.station,
            num_days = location.num_days,
        );

        match pipeline.process(location, today).instrument(span).await {
            Ok(sent) => info!(station = %location.station, sent, "Location report delivered"),
            Err(e) => {
                failed += 1;
                let message = format!("{e:#}");
                error!(station = %location.station, error = %message, "Location report failed");
            }
        }
    }

    info!(
        locations = sheet.locations.len(),
        failed,
        rejected_rows = sheet.rejected.len(),
        "Run complete"
    );

    if failed > 0 {
        bail!("{failed} of {} locations failed", sheet.locations.len());
    }
    Ok(())
}

/// Per-location work shared by every report in one run.
struct Pipeline<'a> {
    stations: &'a dyn StationData,
    mailer: &'a dyn Mailer,
    sender: &'a str,
    output_dir: &'a Path,
    baseline_years: u32,
    forecast: Option<ForecastSection<'a>>,
    attach_chart: bool,
}

impl Pipeline<'_> {
    /// Builds, renders and sends one location's report. Returns the number of
    /// messages delivered.
    async fn process(&self, location: &Location, today: NaiveDate) -> Result<usize> {
        let (history, summary) = build_summary(
            self.stations,
            &location.station,
            location.num_days,
            today,
            self.baseline_years,
        )
        .await?;

        let report = compose(&history.name, &summary, self.forecast);

        let attachment = if self.attach_chart {
            let path = chart_path(self.output_dir, &location.station, location.num_days);
            render_chart(
                &path,
                &chart_title(&history.name, location.num_days),
                &history.series,
                summary.window,
            )?;
            Some(ReportAttachment::png(&path)?)
        } else {
            None
        };

        if location.recipients.is_empty() {
            warn!("No recipients configured");
        }

        let mut sent = 0;
        for recipient in &location.recipients {
            info!(recipient = %recipient, "Emailing");
            let result = match build_message(self.sender, recipient, &report, attachment.as_ref()) {
                Ok(raw) => self.mailer.send_raw(self.sender, recipient, raw).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => sent += 1,
                Err(e) => {
                    let message = format!("{e:#}");
                    error!(recipient = %recipient, error = %message, "Send failed");
                }
            }
        }

        if sent < location.recipients.len() {
            bail!(
                "{} of {} sends failed",
                location.recipients.len() - sent,
                location.recipients.len()
            );
        }
        Ok(sent)
    }
}

/// Fetches enough history for `station` and summarizes the window ending yesterday.
async fn build_summary(
    stations: &dyn StationData,
    station: &str,
    num_days: u32,
    today: NaiveDate,
    baseline_years: u32,
) -> Result<(StationHistory, DegreeDaySummary)> {
    let yesterday = today.pred_opt().context("run date out of range")?;
    let window = trailing_window(yesterday, num_days)?;
    // Always reach back at least one year for the last-year comparison.
    let range = history_window(window, baseline_years.max(1))?;

    let history = stations.station_history(station, range).await?;
    let summary = DegreeDaySummary::compute(
        &history.series,
        window,
        baseline_years,
        ZeroDenominator::ReturnZero,
    )?;

    Ok((history, summary))
}

async fn load_locations<C: HttpClient>(client: &C, source: &str) -> Result<LocationSheet> {
    let bytes = fetch_source(client, source).await?;
    let sheet = parse_locations(&bytes)
        .with_context(|| format!("invalid location sheet '{source}'"))?;

    for row in &sheet.rejected {
        warn!(
            line = row.line,
            station = %row.station,
            reason = %row.reason,
            "Skipping location row"
        );
    }
    info!(locations = sheet.locations.len(), "Locations loaded");

    Ok(sheet)
}

/// Fetches and parses the weekly forecast. Any problem leaves the section out.
async fn load_forecast<C: HttpClient>(client: &C, url: &str, region: &str) -> Option<Forecast> {
    match fetch_bytes(client, url).await {
        Ok(bytes) => {
            let forecast = parse_forecast(&String::from_utf8_lossy(&bytes), region);
            (!forecast.is_empty()).then_some(forecast)
        }
        Err(e) => {
            warn!(url, error = %e, "Forecast feed unavailable, omitting section");
            None
        }
    }
}
