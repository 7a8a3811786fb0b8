//! Ruen - Russian/English offline translator
//!
//! Entry point: reads text from input.txt or the clipboard, translates it
//! between Russian and English with Argos Translate and writes output.txt.

use anyhow::Result;
use clap::Parser;
use tracing::{Level, info};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ruen::cli::{Args, Commands};
use ruen::config::{Config, DetectionMode, SourceMode};
use ruen::detect::detect_direction;
use ruen::engine::{EngineFactory, TranslationEngine};
use ruen::setup::SetupManager;
use ruen::source::SystemClipboard;
use ruen::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    let mut config = Config::load(args.config.as_deref())?;

    let command = args.command.unwrap_or(Commands::Run {
        source: None,
        detection: None,
    });

    match command {
        Commands::Run { source, detection } => {
            if let Some(source) = source {
                config.source.mode = source.parse::<SourceMode>()?;
            }
            if let Some(detection) = detection {
                config.detection.mode = detection.parse::<DetectionMode>()?;
            }

            info!(
                "Starting run: source {:?}, detection {:?}",
                config.source.mode, config.detection.mode
            );

            let engine = EngineFactory::create_default(config.engine.clone())?;
            let workflow = Workflow::new(config, engine, Box::new(SystemClipboard));
            let outcome = workflow.run().await?;

            info!("Run finished: {:?}", outcome);
        }
        Commands::Setup => {
            let engine = EngineFactory::create_default(config.engine.clone())?;
            let report = SetupManager::new().ensure_language_packs(engine.as_ref()).await?;
            info!("Setup finished: {:?}", report);
        }
        Commands::Languages => {
            let engine = EngineFactory::create_default(config.engine.clone())?;
            let languages = engine.installed_languages().await?;

            println!("Установлено языков: {}", languages.len());
            SetupManager::print_languages(&languages);
        }
        Commands::Detect { text, detection } => {
            let mode = match detection {
                Some(detection) => detection.parse::<DetectionMode>()?,
                None => config.detection.mode,
            };
            println!("{}", detect_direction(text.trim(), mode));
        }
        Commands::Init { output } => {
            config.save_to_file(&output)?;
            println!("Конфигурация сохранена в {}", output.display());
        }
    }

    Ok(())
}

/// Setup logging to both console and file.
///
/// The console layer writes to stderr; stdout carries the user-facing
/// status lines.
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".ruen").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "ruen.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Logging initialized - console: {}, file: {}",
        log_level,
        log_dir.join("ruen.log").display()
    );

    Ok(())
}
