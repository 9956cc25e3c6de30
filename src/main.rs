use anyhow::Result;
use clap::Parser;
use repo_milestones::{config::AppConfig, ChartReport, Visualizer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "repo-milestones")]
#[command(about = "Chart the milestones of a GitHub repository", long_about = None)]
struct Cli {
    /// GitHub username or organization that owns the repository
    owner: String,

    /// Repository name
    repo: String,

    /// Where to save the chart; the extension picks the format (png, jpg, bmp, svg)
    #[arg(short, long, default_value = "milestones.png")]
    output: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repo_milestones=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let visualizer = Visualizer::new(&config)?;

    match visualizer.run(&cli.owner, &cli.repo, &cli.output).await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Failed to chart {}/{}: {}", cli.owner, cli.repo, e);
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn print_report(report: &ChartReport) {
    println!("Chart saved to {}", report.destination.display());
    for panel in &report.panels {
        println!("  {}: {} ({})", panel.metric, panel.value, panel.title);
    }
}
