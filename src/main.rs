mod backend;
mod config;
mod error;
mod http;
mod output;
mod profile;
mod ratio;
mod report;
mod store;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "finlens",
    about = "Financial-statement analysis client — categorized ratios + combined dashboard reports"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Fetch every analysis section for a session and write the combined HTML report
    Analyze {
        /// Session id returned by the upload endpoint
        session_id: String,

        /// Path to config file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// Output path for the HTML report
        #[arg(short, long, default_value = "finlens-report.html")]
        output: PathBuf,
    },

    /// Fetch and print the categorized financial ratios for a session
    Ratios {
        /// Session id returned by the upload endpoint
        session_id: String,

        /// Path to config file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// Print the normalized structure as JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Re-render the HTML report from the last saved analysis (no network)
    Render {
        /// Snapshot file; defaults to the stored latest analysis
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output path for the HTML report
        #[arg(short, long, default_value = "finlens-report.html")]
        output: PathBuf,
    },

    /// Fetch company profiles by CIN and print a peer comparison
    Profile {
        /// One or more Corporate Identification Numbers
        #[arg(required = true)]
        cins: Vec<String>,

        /// Path to config file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
    },

    /// Discard the stored analysis snapshot
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finlens=info".parse().unwrap()),
        )
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze {
            session_id,
            config,
            output,
        } => {
            let cfg = config::Config::load(&config).unwrap_or_default();
            cfg.validate()?;
            let client = backend::BackendClient::new(&cfg.backend)?;
            let combined = report::fetch_combined(&client, &cfg.report, &session_id).await;

            let store = store::AnalysisStore::default();
            if let Err(e) = store.save(&combined) {
                tracing::warn!(error = %e, "failed to save analysis snapshot");
            }

            let html = output::render_combined_report(&combined)?;
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, &html)?;

            println!("FinLens report: {}", output.display());
            println!("  {}", combined.status_line());
            for e in &combined.errors {
                println!("  failed — {}: {}", e.section, e.message);
            }
            Ok(())
        }
        Command::Ratios {
            session_id,
            config,
            json,
        } => {
            let cfg = config::Config::load(&config).unwrap_or_default();
            cfg.validate()?;
            let client = backend::BackendClient::new(&cfg.backend)?;
            let raw = client.financial_ratios(&session_id).await?;
            let normalized = ratio::normalize(&raw);
            if json {
                println!("{}", serde_json::to_string_pretty(&normalized)?);
            } else {
                print!("{}", output::render_ratio_text(&normalized));
            }
            Ok(())
        }
        Command::Render { input, output } => {
            let combined = match input {
                Some(path) => {
                    let content = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading snapshot {}", path.display()))?;
                    serde_json::from_str::<store::AnalysisSnapshot>(&content)
                        .with_context(|| format!("parsing snapshot {}", path.display()))?
                        .report
                }
                None => {
                    store::AnalysisStore::default()
                        .load_latest()
                        .context("no stored analysis; run `finlens analyze` first")?
                        .report
                }
            };
            let html = output::render_combined_report(&combined)?;
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, &html)?;
            println!(
                "Report rendered: {} (session {}, {})",
                output.display(),
                combined.session_id,
                combined.status_line()
            );
            Ok(())
        }
        Command::Profile { cins, config } => {
            let cfg = config::Config::load(&config).unwrap_or_default();
            cfg.validate()?;
            let client = backend::BackendClient::new(&cfg.backend)?;

            // Per-CIN failure isolation, same as report sections.
            let mut profiles = Vec::new();
            let mut failures = Vec::new();
            let mut set = tokio::task::JoinSet::new();
            for cin in cins {
                let client = client.clone();
                set.spawn(async move {
                    let result = client.company_profile(&cin).await;
                    (cin, result)
                });
            }
            while let Some(joined) = set.join_next().await {
                match joined {
                    Ok((cin, Ok(p))) => profiles.push((cin, p)),
                    Ok((cin, Err(e))) => failures.push((cin, e.to_string())),
                    Err(e) => failures.push(("?".into(), e.to_string())),
                }
            }
            profiles.sort_by(|a, b| a.0.cmp(&b.0));

            for line in profile::comparison_lines(&profiles) {
                println!("{line}");
            }
            for (cin, message) in &failures {
                println!("  failed — {cin}: {message}");
            }
            Ok(())
        }
        Command::Reset => {
            store::AnalysisStore::default().reset()?;
            println!("Stored analysis cleared.");
            Ok(())
        }
    }
}
