//! EssayLens - LLM-powered essay feedback
//!
//! A CLI tool that analyzes one essay with a local Ollama model and prints
//! a Markdown or JSON report, or serves the same analysis over HTTP.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid input, connection, config, etc.)

use anyhow::{Context, Result};
use chrono::Utc;
use essaylens::analysis::{analyze_heuristic, analyze_simple, TextStats};
use essaylens::cli::{Args, OutputFormat, Profile};
use essaylens::config::{Config, CONFIG_FILE_NAME};
use essaylens::models::{AnalysisReport, EssayInput, ReportMetadata};
use essaylens::service::validate_text;
use essaylens::{build_router, report, AppState, EssayService};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;
use std::path::Path;
use std::time::{Duration, Instant};
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

    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(&args, &config);

    info!("EssayLens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let result = if args.serve {
        run_server(config).await
    } else {
        run_analysis(&args, &config).await
    };

    if let Err(e) = result {
        error!("{:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .essaylens.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the model, server address, and limits.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

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

/// Load configuration from file or use defaults.
///
/// An explicit `--config` that cannot be read is an error; a broken default
/// file only produces a warning.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!(
                "⚠️  Ignoring {}: {:#}. Using defaults.",
                CONFIG_FILE_NAME, e
            );
            Ok(Config::default())
        }
    }
}

/// Serve the HTTP API.
///
/// The listener is bound first so health checks answer while the model is
/// still being verified; analysis routes return 503 until then.
async fn run_server(config: Config) -> Result<()> {
    let state = AppState::uninitialized(config.limits.max_essay_chars);
    let app = build_router(state.clone());

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("EssayLens listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    });

    info!(
        "Initializing essay analyzer (model {}, Ollama {})",
        config.model.name, config.model.ollama_url
    );
    let service = EssayService::from_config(&config)
        .await
        .context("Failed to initialize essay analyzer")?;
    state.install(service)?;
    info!("✓ Essay analyzer ready");

    server.await.context("HTTP server task failed")??;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Analyze one essay and write the report.
async fn run_analysis(args: &Args, config: &Config) -> Result<()> {
    let start_time = Instant::now();

    let text = read_essay(args)?;
    validate_text(&text, config.limits.max_essay_chars)?;

    let input = EssayInput::new(text).with_requester(args.user.clone());
    let word_count = TextStats::measure(&input.text).word_count;

    let service = if args.profile.uses_engine() {
        if !args.quiet {
            eprintln!("🤖 Model: {} ({})", config.model.name, config.model.ollama_url);
        }
        Some(
            EssayService::from_config(config)
                .await
                .context("Failed to initialize essay analyzer")?,
        )
    } else {
        None
    };

    let spinner = (!args.quiet && service.is_some()).then(|| analysis_spinner(args.profile));

    let requester_id = input.requester_id.clone();
    let model_used = service.as_ref().map(|s| s.model_name().to_string());
    let metadata = |session_id: Option<String>| ReportMetadata {
        session_id,
        requester_id: requester_id.clone(),
        analysis_date: Utc::now(),
        model_used: model_used.clone(),
        profile: args.profile.name().to_string(),
        word_count,
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    let rendered = match (args.profile, service) {
        (Profile::Coordinator, Some(service)) => {
            let outcome = service.analyze(input).await;
            finish_spinner(spinner);
            let analysis = outcome?;
            render_report(&analysis, &metadata(analysis.session_id.clone()), args.format)?
        }
        (Profile::Simple, _) => {
            let analysis = analyze_simple(&input.text);
            render_report(&analysis, &metadata(None), args.format)?
        }
        (_, service) => {
            let analysis = match service {
                Some(service) => {
                    let outcome = service.analyze_pillars(&input.text).await;
                    finish_spinner(spinner);
                    outcome?
                }
                None => analyze_heuristic(&input.text),
            };
            let metadata = metadata(None);
            match args.format {
                OutputFormat::Json => report::generate_json_report(&analysis, &metadata)?,
                OutputFormat::Markdown => {
                    report::generate_pillar_markdown_report(&analysis, &metadata)
                }
            }
        }
    };

    if config.general.output.is_empty() {
        println!("{}", rendered);
    } else {
        let path = Path::new(&config.general.output);
        report::write_report(&rendered, path)?;
        if !args.quiet {
            eprintln!(
                "\n✅ Analysis complete in {:.1}s. Report saved to: {}",
                start_time.elapsed().as_secs_f64(),
                path.display()
            );
        }
    }

    Ok(())
}

/// Read the essay from the positional argument, `--file`, or stdin.
fn read_essay(args: &Args) -> Result<String> {
    if let Some(ref text) = args.text {
        return Ok(text.clone());
    }

    if let Some(ref path) = args.file {
        debug!("Reading essay from {}", path.display());
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read essay file {}", path.display()));
    }

    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read essay from stdin")?;
    Ok(text)
}

fn render_report(
    analysis: &AnalysisReport,
    metadata: &ReportMetadata,
    format: OutputFormat,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => report::generate_json_report(analysis, metadata)?,
        OutputFormat::Markdown => report::generate_markdown_report(analysis, metadata),
    })
}

fn analysis_spinner(profile: Profile) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(match profile {
        Profile::Coordinator => "Consulting grammar, structure and content analyzers...",
        _ => "Scoring essay pillars...",
    });
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

fn finish_spinner(spinner: Option<ProgressBar>) {
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
}
