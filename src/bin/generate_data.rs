use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use finboard_backend::logging::{init_logging, LoggingConfig};
use finboard_backend::errors::AppError;
use finboard_backend::models::{FinancialSeries, GeneratorParams};
use finboard_backend::services::{
    export_service, generator_service, ratio_service, spreadsheet_service,
};

/// Generate the synthetic quarterly sample dataset and write it to disk.
#[derive(Debug, Parser)]
#[command(name = "generate_data", version, about)]
struct Args {
    /// Number of quarters to generate
    #[arg(long, default_value_t = 12)]
    num_quarters: usize,

    /// Year of the first quarter (Q1)
    #[arg(long, default_value_t = 2022)]
    start_year: i32,

    /// Random seed; the same seed always yields the same data
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Where to write the sample file; a `.csv` extension writes CSV, anything else a workbook
    #[arg(long, default_value = "financial_data.xlsx")]
    output: PathBuf,
}

fn write_sample(path: &Path, series: &FinancialSeries) -> Result<(), AppError> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        export_service::write_series_csv(path, series)
    } else {
        spreadsheet_service::write_series_xlsx(path, series)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let args = Args::parse();
    let params = GeneratorParams {
        num_quarters: args.num_quarters,
        start_year: args.start_year,
        seed: args.seed,
    };

    let series = generator_service::generate_series(&params).context("generating sample data")?;
    write_sample(&args.output, &series)
        .with_context(|| format!("writing {}", args.output.display()))?;

    let summary = ratio_service::summarize(&series);
    info!("✅ Financial data generated successfully");
    info!("📊 Created {} quarters of data", summary.quarters);
    info!("💾 Saved to: {}", args.output.display());
    for record in series.iter().take(5) {
        info!(
            "{}: revenue {}, net profit {}, equity {}",
            record.period, record.revenue, record.net_profit, record.equity
        );
    }
    info!("Average Revenue: ${:.0}", summary.average_revenue);
    info!("Average Net Profit: ${:.0}", summary.average_net_profit);
    if let Some(margin) = summary.average_profit_margin {
        info!("Average Profit Margin: {:.1}%", margin);
    }

    Ok(())
}
