use chrono::Utc;
use std::fmt::Display;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::config::{Config, SourceMode};
use crate::detect::{Direction, detect_direction};
use crate::engine::TranslationEngine;
use crate::error::{Result, RuenError};
use crate::setup::SetupManager;
use crate::source::{self, ClipboardSource, InputOrigin, InputText};
use crate::translate::translate_text;

/// Longest input prefix echoed back to the user
const PREVIEW_CHARS: usize = 100;

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Translated {
        direction: Direction,
        origin: InputOrigin,
        output_path: PathBuf,
    },
    EmptyInput,
    InputMissing,
    Failed(String),
}

/// One run of the pipeline: bootstrap, acquire, detect, translate, write
pub struct Workflow {
    config: Config,
    engine: Box<dyn TranslationEngine>,
    clipboard: Box<dyn ClipboardSource>,
}

impl Workflow {
    pub fn new(
        config: Config,
        engine: Box<dyn TranslationEngine>,
        clipboard: Box<dyn ClipboardSource>,
    ) -> Self {
        Self {
            config,
            engine,
            clipboard,
        }
    }

    /// Run the whole pipeline.
    ///
    /// Only bootstrap failures are returned as errors; everything after that
    /// is reported and folded into the outcome.
    pub async fn run(&self) -> Result<RunOutcome> {
        SetupManager::new()
            .ensure_language_packs(self.engine.as_ref())
            .await?;

        Ok(self.translate_input().await)
    }

    /// Acquire, detect, translate and write, assuming packages are in place
    pub async fn translate_input(&self) -> RunOutcome {
        let input = match self.acquire_input() {
            Ok(input) => input,
            Err(outcome) => return outcome,
        };

        if input.text.is_empty() {
            info!("Input from {} is empty, nothing to translate", input.origin);
            println!("{} пуст", self.origin_label(input.origin));
            return RunOutcome::EmptyInput;
        }

        println!("Получен текст для перевода: {}...", preview(&input.text, PREVIEW_CHARS));

        let direction = detect_direction(&input.text, self.config.detection.mode);
        info!("Translation direction: {}", direction);

        let translated = match translate_text(self.engine.as_ref(), direction, &input.text).await {
            Ok(translated) => translated,
            Err(e) => {
                error!("Translation failed: {}", e);
                println!("{}", error_line(&e));
                return RunOutcome::Failed(e.to_string());
            }
        };
        println!("Перевод выполнен");

        let output_path = &self.config.io.output_path;
        if let Err(e) = tokio::fs::write(output_path, &translated).await {
            error!("Failed to write {}: {}", output_path.display(), e);
            println!("{}", error_line(&e));
            return RunOutcome::Failed(e.to_string());
        }
        println!("Перевод сохранен в {}", output_path.display());

        RunOutcome::Translated {
            direction,
            origin: input.origin,
            output_path: output_path.clone(),
        }
    }

    fn acquire_input(&self) -> std::result::Result<InputText, RunOutcome> {
        let input_path = &self.config.io.input_path;

        match self.config.source.mode {
            SourceMode::File => {
                println!("Ожидание текста в файле {}...", input_path.display());
                source::acquire_text(input_path, &self.config.source, self.clipboard.as_ref(), Utc::now())
                    .map_err(|e| match e {
                        RuenError::FileNotFound(_) => {
                            warn!("Input file {} not found", input_path.display());
                            println!("Ошибка: Файл {} не найден", input_path.display());
                            RunOutcome::InputMissing
                        }
                        other => {
                            error!("Failed to read {}: {}", input_path.display(), other);
                            println!("{}", error_line(&other));
                            RunOutcome::Failed(other.to_string())
                        }
                    })
            }
            SourceMode::Auto => {
                match source::acquire_text(input_path, &self.config.source, self.clipboard.as_ref(), Utc::now()) {
                    Ok(input) => {
                        info!("Reading input from {}", input.origin);
                        Ok(input)
                    }
                    Err(e) => {
                        // Surfaces as empty input
                        error!("Failed to acquire input text: {}", e);
                        println!("{}", error_line(&e));
                        println!("Нет текста для перевода");
                        Err(RunOutcome::EmptyInput)
                    }
                }
            }
        }
    }

    fn origin_label(&self, origin: InputOrigin) -> String {
        match origin {
            InputOrigin::File => format!("Файл {}", self.config.io.input_path.display()),
            InputOrigin::Clipboard => "Буфер обмена".to_string(),
        }
    }
}

/// User-facing line for a failure after bootstrap
fn error_line(error: &impl Display) -> String {
    format!("Ошибка: {}", error)
}

/// First `max_chars` characters of `text`
fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
