//! Russian/English direction detection.

use std::fmt;
use tracing::{debug, warn};
use whatlang::{Detector, Lang};

use crate::config::DetectionMode;

pub const RUSSIAN: &str = "ru";
pub const ENGLISH: &str = "en";

/// Language codes that must be installed for either direction to work
pub const REQUIRED_LANGUAGES: [&str; 2] = [RUSSIAN, ENGLISH];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    RuEn,
    EnRu,
}

impl Direction {
    pub fn source_code(&self) -> &'static str {
        match self {
            Self::RuEn => RUSSIAN,
            Self::EnRu => ENGLISH,
        }
    }

    pub fn target_code(&self) -> &'static str {
        match self {
            Self::RuEn => ENGLISH,
            Self::EnRu => RUSSIAN,
        }
    }

    /// (source, target)
    pub fn codes(&self) -> (&'static str, &'static str) {
        (self.source_code(), self.target_code())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source_code(), self.target_code())
    }
}

// Basic Russian alphabet only; Ё/ё sit outside these ranges.
fn is_cyrillic_letter(c: char) -> bool {
    matches!(c, 'А'..='Я' | 'а'..='я')
}

/// Any Cyrillic letter makes the text Russian
pub fn heuristic_direction(text: &str) -> Direction {
    if text.chars().any(is_cyrillic_letter) {
        Direction::RuEn
    } else {
        Direction::EnRu
    }
}

// Only ru/en are candidates, so short Cyrillic words never resolve to a
// neighbouring Cyrillic language.
fn detector() -> Detector {
    Detector::with_allowlist(vec![Lang::Rus, Lang::Eng])
}

/// Statistical detection with the character heuristic as fallback
pub fn detector_direction(text: &str) -> Direction {
    match detector().detect(text) {
        Some(info) => {
            debug!(
                "Detected language {} (confidence {:.2})",
                info.lang().code(),
                info.confidence()
            );
            match info.lang() {
                Lang::Rus => Direction::RuEn,
                Lang::Eng => Direction::EnRu,
                other => {
                    warn!(
                        "Detected unsupported language '{}', defaulting to {}",
                        other.code(),
                        Direction::EnRu
                    );
                    Direction::EnRu
                }
            }
        }
        None => {
            warn!("Language detection failed, falling back to character heuristic");
            heuristic_direction(text)
        }
    }
}

pub fn detect_direction(text: &str, mode: DetectionMode) -> Direction {
    match mode {
        DetectionMode::Heuristic => heuristic_direction(text),
        DetectionMode::Detector => detector_direction(text),
    }
}
