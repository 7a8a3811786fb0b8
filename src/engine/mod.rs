// Translation engine abstraction
//
// The pipeline talks to the engine only through the TranslationEngine trait:
// - Argos: Argos Translate package store, package index and CLI
// - Package: index/metadata formats and the on-disk package store
// - Command: argos-translate command builders

pub mod argos;
pub mod command;
pub mod package;

use async_trait::async_trait;
use std::fmt;

pub use command::*;
pub use package::*;

use crate::config::EngineConfig;
use crate::error::Result;

/// A language known to the engine through at least one installed package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub code: String,
    pub name: String,
}

impl Language {
    pub fn new<S1: Into<String>, S2: Into<String>>(code: S1, name: S2) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

/// Main trait for translation engine operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// Languages available through installed packages
    async fn installed_languages(&self) -> Result<Vec<Language>>;

    /// Refresh the local copy of the remote package index
    async fn update_package_index(&self) -> Result<()>;

    /// Packages listed in the local copy of the package index
    async fn available_packages(&self) -> Result<Vec<PackageInfo>>;

    /// Download and install a package
    async fn install_package(&self, package: &PackageInfo) -> Result<()>;

    /// Translate text between two installed languages
    async fn translate(&self, from: &Language, to: &Language, text: &str) -> Result<String>;
}

/// Factory for creating engine instances
pub struct EngineFactory;

impl EngineFactory {
    /// Create the default engine implementation (Argos Translate)
    pub fn create_default(config: EngineConfig) -> Result<Box<dyn TranslationEngine>> {
        Ok(Box::new(argos::ArgosEngine::new(config)?))
    }
}
