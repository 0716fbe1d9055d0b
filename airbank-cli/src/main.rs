use anyhow::{Context, Result, bail};
use airbank_ingest::{AccountBalances, ingest_dir, locale::parse_portal_date};
use airbank_sync::{ChromeSession, Credentials, Period, SyncOutput, SyncRequest, preflight, run_sync};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

mod config;
mod logging;
mod output;
mod state;

use logging::LogFormat;

#[derive(Parser, Debug)]
#[command(
    name = "airbank",
    version,
    about = "Download and normalize Air Bank transactions"
)]
struct Cli {
    /// Log output format (logs go to stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in, read balances, export and parse transactions (AIRBANK_USERNAME / AIRBANK_PASSWORD)
    Sync {
        /// Account number as shown in the portal; repeatable (default: [sync].accounts from config)
        #[arg(long = "account")]
        accounts: Vec<String>,

        /// Start of the exported period, DD.MM.YYYY
        #[arg(long, value_parser = parse_period_date, requires = "period_to")]
        period_from: Option<NaiveDate>,

        /// End of the exported period, DD.MM.YYYY
        #[arg(long, value_parser = parse_period_date, requires = "period_from")]
        period_to: Option<NaiveDate>,

        /// Directory the browser downloads exports into (default: a temporary directory)
        #[arg(long, env = "AIRBANK_DOWNLOAD_DIR")]
        download_dir: Option<PathBuf>,

        /// Write the JSON result here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Show the browser window
        #[arg(long)]
        headful: bool,
    },

    /// Parse already downloaded exports without touching the portal
    Parse {
        /// Directory holding airbank_<account>_*.csv exports
        #[arg(long)]
        dir: PathBuf,

        /// Write the JSON result here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Manage ~/.airbank/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective configuration
    Show,
}

fn parse_period_date(s: &str) -> Result<NaiveDate, String> {
    parse_portal_date(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_format, "info")?;

    match cli.command {
        Command::Sync {
            accounts,
            period_from,
            period_to,
            download_dir,
            output,
            headful,
        } => {
            let cfg = config::load_config()?;
            let accounts = if accounts.is_empty() { cfg.sync.accounts.clone() } else { accounts };
            let period = match (period_from, period_to) {
                (Some(from), Some(to)) => {
                    if from > to {
                        bail!("--period-from {from} is after --period-to {to}");
                    }
                    Some(Period { from, to })
                }
                _ => None,
            };

            let request = SyncRequest {
                credentials: Credentials {
                    username: state::required_env("AIRBANK_USERNAME")?,
                    password: state::required_env("AIRBANK_PASSWORD")?,
                },
                accounts,
                period,
            };
            preflight(&request).context("pre-flight check")?;

            let mut browser = cfg.browser.clone();
            if headful {
                browser.headless = false;
            }

            // Keep the guard alive until ingestion has read the exports.
            let (download_dir, _tmp) = match download_dir.or(cfg.sync.download_dir.clone()) {
                Some(dir) => {
                    std::fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
                    (dir, None)
                }
                None => {
                    let tmp = tempfile::Builder::new()
                        .prefix("airbank-")
                        .tempdir()
                        .context("create download dir")?;
                    (tmp.path().to_path_buf(), Some(tmp))
                }
            };
            info!(dir = %download_dir.display(), accounts = request.accounts.len(), "starting sync");

            let session = ChromeSession::launch(&browser, &download_dir)
                .await
                .context("launching chrome")?;
            let result = run_sync(session.page(), &request, &download_dir, &cfg.portal.driver_settings()).await;
            if let Err(e) = session.close().await {
                warn!(error = %e, "closing chrome failed");
            }

            let out = result.context("sync failed")?;
            output::write_output(&out, output.as_deref())?;
        }

        Command::Parse { dir, output } => {
            let tx = ingest_dir(&dir).with_context(|| format!("parsing exports in {}", dir.display()))?;
            let out = SyncOutput {
                tx,
                balances: AccountBalances::new(),
            };
            output::write_output(&out, output.as_deref())?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}
