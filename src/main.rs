use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use trendsmith::banner::{BannerInfo, print_banner, print_session_summary};
use trendsmith::commands::{CommandRegistry, CommandResult, Session, save_image};
use trendsmith::config::{Config, ModelOverrides};
use trendsmith::consts::{API_BASE_URL, API_KEY_ENV, default_db_path};
use trendsmith::generator::Tone;
use trendsmith::generator::gemini::{GeminiGenerator, api_key_from_env};
use trendsmith::spinner;
use trendsmith::view;
use trendsmith::workflow::{Dashboard, Intent, Workflow};

#[derive(Parser)]
#[command(
    name = "trendsmith",
    version,
    about = "Hunt tech trends, draft the post, render the picture."
)]
struct Cli {
    /// SQLite database for preferences (use :memory: for ephemeral)
    #[arg(short, long)]
    db: Option<String>,

    /// Drafting tone: Default, Technical, Skeptical, Beginner-Friendly
    #[arg(short, long)]
    tone: Option<Tone>,

    /// Model for trend discovery
    #[arg(long)]
    discover_model: Option<String>,

    /// Model for drafting posts
    #[arg(long)]
    draft_model: Option<String>,

    /// Model for rendering images
    #[arg(long)]
    image_model: Option<String>,

    /// Gemini API base URL
    #[arg(long, default_value = API_BASE_URL)]
    base_url: String,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Scan, draft a post for trend N, and exit (non-interactive)
    #[arg(short, long)]
    run: Option<usize>,

    /// Where to save the image in --run mode
    #[arg(short, long, requires = "run")]
    out: Option<PathBuf>,
}

fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("trendsmith={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let db = cli
        .db
        .clone()
        .unwrap_or_else(|| default_db_path().to_string_lossy().into_owned());
    let config = Config::open(&db).context("failed to open preferences")?;

    let models = config.models(ModelOverrides {
        discover: cli.discover_model.clone(),
        draft: cli.draft_model.clone(),
        image: cli.image_model.clone(),
    })?;
    let tone = match cli.tone {
        Some(tone) => tone,
        None => config.tone()?.unwrap_or_default(),
    };

    let generator = GeminiGenerator::new(api_key_from_env(), models).with_base_url(&cli.base_url);
    let auth_status = if generator.has_api_key() {
        "API key (env) ✓".to_string()
    } else {
        format!("not set. Export {API_KEY_ENV}")
    };
    let models = generator.models().clone();

    let mut workflow =
        Workflow::new(Arc::new(generator), Dashboard::new(tone)).with_spinner(spinner::stderr());

    // Single run mode
    if let Some(position) = cli.run {
        let result = run_once(&mut workflow, position, cli.out.as_deref()).await;
        print_session_summary(workflow.generator().usage());
        return result;
    }

    let preferences = if db == ":memory:" { "ephemeral" } else { &db };
    print_banner(&BannerInfo {
        models: &models,
        auth_status: &auth_status,
        tone: tone.label(),
        preferences,
    });

    let registry = CommandRegistry::new();

    // Async stdin so Ctrl+C is caught at the prompt too
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("\ntrendsmith> ");
        io::stdout().flush()?;

        let line = tokio::select! {
            result = lines.next_line() => {
                match result {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        // Ctrl+D (EOF)
                        println!();
                        break;
                    }
                    Err(e) => {
                        eprintln!("input error: {}", e);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut session = Session {
            workflow: &mut workflow,
            config: &config,
        };

        // Remote calls can't be cancelled, so Ctrl+C mid-call ends the session
        let result = tokio::select! {
            result = registry.dispatch(input, &mut session) => result,
            _ = tokio::signal::ctrl_c() => {
                println!("\n\ninterrupted");
                break;
            }
        };

        match result {
            CommandResult::Quit => break,
            CommandResult::Handled => {}
            CommandResult::NotACommand => {
                println!("  not a command. /help lists what you can do");
            }
        }
    }

    print_session_summary(workflow.generator().usage());
    Ok(())
}

async fn run_once(
    workflow: &mut Workflow,
    position: usize,
    out: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    workflow.dispatch(Intent::Scan).await?;
    if let Some(error) = workflow.dashboard().error() {
        bail!("{error}");
    }
    print!("{}", view::trends(workflow.dashboard()));

    let Some(trend) = workflow.dashboard().trend_at(position) else {
        bail!(
            "no trend #{position}; the scan found {}",
            workflow.dashboard().trends().len()
        );
    };
    let id = trend.id.clone();

    workflow.dispatch(Intent::SelectTrend(id)).await?;
    if let Some(error) = workflow.dashboard().error() {
        bail!("{error}");
    }
    println!();
    print!("{}", view::content(workflow.dashboard()));

    if let Some(out) = out {
        match workflow.dashboard().image() {
            Some(image) => {
                let path = save_image(image, out)?;
                println!("  ✓ saved {}", path.display());
            }
            None => println!("  no image was rendered"),
        }
    }
    Ok(())
}
