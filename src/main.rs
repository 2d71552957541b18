//! Votedesk CLI
//!
//! Command-line interface for the election backend:
//! - Watch the live tally
//! - List constituencies and the grouped constituency table
//! - Register parties and voters
//! - Log in as voter or admin

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use votedesk::client::{ClientError, ElectionClient, FailureKind};
use votedesk::config::{generate_default_config, Config, LoggingConfig};
use votedesk::forms::{LoginForm, PartyForm, VoterSignupForm};
use votedesk::grouping::group_by_constituency;
use votedesk::render::{self, OutputFormat};
use votedesk::session::Role;
use votedesk::tally::{LiveTallyView, PollHandle, TallyPoller, ViewState};

#[derive(Parser)]
#[command(name = "votedesk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal desk for the election survey platform")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides config and VOTEDESK_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: ~/.config/votedesk/config.toml or ./votedesk.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Watch the live tally of the active constituency
    Live {
        /// Fetch once and exit instead of polling
        #[arg(long)]
        once: bool,
    },

    /// List all constituencies
    Constituencies,

    /// Show parties grouped by constituency
    Parties,

    /// Register a new party
    RegisterParty {
        /// Party name
        #[arg(long)]
        name: String,
        /// Candidate name
        #[arg(long)]
        candidate_name: String,
        /// Party symbol URL
        #[arg(long)]
        img: String,
        /// Candidate photo URL
        #[arg(long)]
        candidate_img: String,
        /// Constituency ID (positive number, must exist in the backend)
        #[arg(long)]
        constituency: String,
    },

    /// Register as a voter
    Signup {
        #[arg(long)]
        voter_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        age: String,
        /// Male, Female or Other
        #[arg(long)]
        gender: String,
        #[arg(long)]
        address: String,
        /// Constituency (district) name
        #[arg(long)]
        constituency: String,
        #[arg(long)]
        constituency_number: String,
    },

    /// Log in as a voter or an admin
    Login {
        #[arg(value_enum)]
        role: Role,
        /// Voter ID or admin ID
        #[arg(long)]
        id: String,
        #[arg(long)]
        password: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("Cannot load config from {}", path.display()))?,
        None => Config::load_default().context("Cannot load default config")?,
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    config.validate()?;

    init_logging(&config.logging);
    tracing::debug!(base_url = %config.api.base_url, "Votedesk v{}", env!("CARGO_PKG_VERSION"));

    let client = Arc::new(ElectionClient::new(config.api.client_config())?);

    match cli.command {
        Commands::Live { once } => {
            if once {
                let mut view = LiveTallyView::new();
                let state = view.refresh(client.as_ref()).await;
                if let ViewState::Failed { message, cause } = state {
                    bail!("{} ({})", message, cause);
                }
                print_live(state, cli.format)?;
            } else {
                watch_live(client, &config, cli.format).await?;
            }
        }

        Commands::Constituencies => {
            let constituencies = client
                .constituencies()
                .await
                .context("Failed to fetch constituencies")?;

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&constituencies)?),
                OutputFormat::Csv => print!("{}", render::constituencies_to_csv(&constituencies)?),
                OutputFormat::Table => print!("{}", render::render_constituencies(&constituencies)),
            }
        }

        Commands::Parties => {
            let parties = client
                .parties()
                .await
                .context("Failed to fetch constituency data")?;
            let groups = group_by_constituency(&parties);

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&groups)?),
                OutputFormat::Csv => print!("{}", render::groups_to_csv(&groups)?),
                OutputFormat::Table => print!("{}", render::render_groups(&groups)),
            }
        }

        Commands::RegisterParty {
            name,
            candidate_name,
            img,
            candidate_img,
            constituency,
        } => {
            let form = PartyForm {
                name,
                candidate_name,
                img,
                candidate_img,
                constituency_id: constituency,
            };

            let party = client
                .register_party(&form)
                .await
                .map_err(|e| user_error(e, "Failed to register party. Check connection."))?;

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&party)?),
                _ => println!("Party registered successfully! (id {})", party.id),
            }
        }

        Commands::Signup {
            voter_id,
            name,
            email,
            password,
            age,
            gender,
            address,
            constituency,
            constituency_number,
        } => {
            let form = VoterSignupForm {
                voter_id,
                name,
                email,
                password,
                age,
                gender,
                address,
                constituency,
                constituency_number,
            };

            client
                .register_voter(&form)
                .await
                .map_err(|e| user_error(e, "Registration failed. Please check your details."))?;

            println!("Registration Successful! Log in with: votedesk login voter --id {}", form.voter_id.trim());
        }

        Commands::Login { role, id, password } => {
            let session = client
                .login(&LoginForm::new(role, id, password))
                .await
                .map_err(|e| user_error(e, "Server error. Please try again later."))?;

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&session)?),
                _ => {
                    if let Some(welcome) = session.welcome_message() {
                        println!("{}", welcome);
                    }
                    let links: Vec<&str> = session.nav_links().iter().map(|l| l.label).collect();
                    println!("Available: {}", links.join(" | "));
                }
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Cannot write {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("votedesk={}", config.level).into());

    let registry = tracing_subscriber::registry().with(filter);

    // stderr keeps stdout clean for table/json/csv output
    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Turn a client failure into what the user should read
fn user_error(err: ClientError, fallback: &'static str) -> anyhow::Error {
    match err.kind() {
        FailureKind::Validation | FailureKind::Conflict | FailureKind::Auth => anyhow::anyhow!(err.to_string()),
        FailureKind::Network | FailureKind::Decode => anyhow::Error::new(err).context(fallback),
    }
}

fn print_live(state: &ViewState, format: OutputFormat) -> anyhow::Result<()> {
    match (format, state.snapshot()) {
        (OutputFormat::Json, Some(snapshot)) => println!("{}", serde_json::to_string_pretty(snapshot)?),
        (OutputFormat::Csv, Some(snapshot)) => print!("{}", render::snapshot_to_csv(snapshot)?),
        _ => print!("{}", render::render_live(state)),
    }
    Ok(())
}

async fn watch_live(client: Arc<ElectionClient>, config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let interval = config.poll.interval();
    let view = TallyPoller::new(client, interval).mount();

    let frames = watch_until(view, interval, format, tokio::signal::ctrl_c()).await?;
    tracing::debug!(frames, "Live view unmounted");
    Ok(())
}

/// Render every state change until `shutdown` resolves, then unmount
///
/// `shutdown` is polled from one place for the whole session, so a signal
/// that lands while a frame is printing still ends the loop.
async fn watch_until<F: Future>(
    mut view: PollHandle,
    interval: Duration,
    format: OutputFormat,
    shutdown: F,
) -> anyhow::Result<usize> {
    tokio::pin!(shutdown);
    let mut frames = 0;

    loop {
        tokio::select! {
            state = view.changed() => {
                let Some(state) = state else { break };
                frames += 1;

                if format == OutputFormat::Table {
                    // clear screen, cursor home
                    print!("\x1B[2J\x1B[H");
                    print!("{}", render::render_live(&state));
                    println!();
                    println!("● Data refreshes automatically every {:.0} seconds. Ctrl-C to quit.", interval.as_secs_f64());
                } else {
                    print_live(&state, format)?;
                }
            }
            _ = &mut shutdown => break,
        }
    }

    view.unmount();
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use votedesk::client::ClientResult;
    use votedesk::model::{Constituency, PartyTally};
    use votedesk::tally::TallySource;

    #[derive(Default)]
    struct FixedSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TallySource for FixedSource {
        async fn active_tallies(&self) -> ClientResult<Vec<PartyTally>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let north = Constituency::new(9, "North", "KA", true);
            Ok(vec![PartyTally::new(1, "Green", 10, north)])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_stops_on_shutdown_and_unmounts() {
        let source = Arc::new(FixedSource::default());
        let interval = Duration::from_millis(5000);
        let view = TallyPoller::new(source.clone(), interval).mount();

        // frames at 0s, 5s and 10s; shutdown at 12s
        let shutdown = tokio::time::sleep(Duration::from_secs(12));
        let frames = watch_until(view, interval, OutputFormat::Json, shutdown).await.unwrap();

        assert_eq!(frames, 3);
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);

        tokio::time::advance(Duration::from_secs(60)).await;
        tokio::task::yield_now().await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_watch_honours_shutdown_that_is_already_ready() {
        let source = Arc::new(FixedSource::default());
        let interval = Duration::from_millis(5000);
        let view = TallyPoller::new(source, interval).mount();

        let frames = watch_until(view, interval, OutputFormat::Json, std::future::ready(()))
            .await
            .unwrap();
        assert!(frames <= 1);
    }
}
