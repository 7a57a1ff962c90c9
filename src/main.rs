use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::info;

use car_valuator::{
    models::{FuelType, GearboxType, MAX_YEAR, MIN_YEAR},
    prompt::{PartialQuery, Prompter},
    report::write_reports,
    web::{self, AppState},
    AnalysisReport, AppConfig, ValuationPipeline,
};

#[derive(Debug, Parser)]
#[command(name = "car-valuator", version, about = "Flag used-car ads priced below what their mileage suggests")]
struct Cli {
    /// Extra configuration file layered over the defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch one search, value every ad and write the CSV tables and plot
    Analyze(AnalyzeArgs),
    /// Run the web form
    Serve(ServeArgs),
}

/// Anything left out is asked for on the terminal.
#[derive(Debug, Args)]
struct AnalyzeArgs {
    #[arg(long)]
    make: Option<String>,

    #[arg(long)]
    model: Option<String>,

    #[arg(long, value_parser = clap::value_parser!(i32).range((MIN_YEAR as i64)..=(MAX_YEAR as i64)))]
    start_year: Option<i32>,

    #[arg(long, value_parser = clap::value_parser!(i32).range((MIN_YEAR as i64)..=(MAX_YEAR as i64)))]
    end_year: Option<i32>,

    #[arg(long, value_enum)]
    fuel: Option<FuelType>,

    #[arg(long, value_enum)]
    gearbox: Option<GearboxType>,

    /// Directory the reports are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

impl AnalyzeArgs {
    fn partial_query(&self) -> PartialQuery {
        PartialQuery {
            make: self.make.clone(),
            model: self.model.clone(),
            start_year: self.start_year,
            end_year: self.end_year,
            fuel: self.fuel,
            gearbox: self.gearbox,
        }
    }
}

#[derive(Debug, Args)]
struct ServeArgs {
    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("car_valuator=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Analyze(args) => analyze(config, args).await,
        Command::Serve(args) => serve(config, args).await,
    }
}

async fn analyze(mut config: AppConfig, args: AnalyzeArgs) -> Result<()> {
    if let Some(dir) = &args.output_dir {
        config.output.directory = dir.clone();
    }

    let query = {
        let stdin = io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), io::stdout());
        prompter
            .complete(args.partial_query())
            .context("Failed to read search parameters")?
    };

    let pipeline = ValuationPipeline::new(&config).context("Failed to set up the pipeline")?;

    info!("Analyzing {}", query.title());
    let report = pipeline
        .run(&query)
        .await
        .with_context(|| format!("Failed to analyze {}", query.title()))?;

    if report.is_empty() {
        println!("No ads found for {}.", query.title());
    }

    let paths = write_reports(&report, &config.output).context("Failed to write reports")?;

    print_summary(&report);
    println!("Raw ads:      {}", paths.raw.display());
    println!("Cleaned ads:  {}", paths.cleaned.display());
    println!("Valuations:   {}", paths.results.display());
    println!("Plot:         {}", paths.plot.display());

    Ok(())
}

fn print_summary(report: &AnalysisReport) {
    let summary = &report.summary;
    println!("{}: {} ads", report.query.title(), report.valuations.len());
    match report.regression.r_squared {
        Some(r2) => println!(
            "Price = {:.2} * mileage + {:.0} (R² = {:.2})",
            report.regression.slope, report.regression.intercept, r2
        ),
        None => println!("Not enough data for a regression"),
    }
    println!(
        "Undervalued: {}  Overvalued: {}  Normal: {}",
        summary.undervalued, summary.overvalued, summary.normal
    );
}

async fn serve(mut config: AppConfig, args: ServeArgs) -> Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let state = AppState::new(config).context("Failed to set up the web server")?;
    web::serve(state).await
}
