use std::collections::HashSet;
use tracing::{debug, info};

use crate::detect::REQUIRED_LANGUAGES;
use crate::engine::{Language, PackageInfo, TranslationEngine};
use crate::error::Result;

/// What the bootstrap step did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapReport {
    /// Every required language was already installed; nothing was fetched
    AlreadyInstalled(Vec<Language>),
    /// Packages were installed from the index
    Installed {
        packages: Vec<PackageInfo>,
        languages: Vec<Language>,
    },
}

/// Makes sure the language packs needed for ru<->en are installed
pub struct SetupManager {
    required: Vec<String>,
}

impl Default for SetupManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupManager {
    pub fn new() -> Self {
        Self {
            required: REQUIRED_LANGUAGES.iter().map(|code| code.to_string()).collect(),
        }
    }

    /// Install missing language packs.
    ///
    /// Package and download errors are returned as-is; a failed bootstrap
    /// ends the run.
    pub async fn ensure_language_packs(&self, engine: &dyn TranslationEngine) -> Result<BootstrapReport> {
        println!("Проверка установленных языков...");
        let installed = engine.installed_languages().await?;
        let installed_codes: HashSet<String> = installed.iter().map(|l| l.code.clone()).collect();

        if self.required.iter().all(|code| installed_codes.contains(code)) {
            info!("All required languages are installed: {}", self.required.join(", "));
            println!("Все необходимые языковые пакеты уже установлены");
            Self::print_languages(&installed);
            return Ok(BootstrapReport::AlreadyInstalled(installed));
        }

        println!("Загрузка доступных языковых пакетов...");
        engine.update_package_index().await?;
        let available = engine.available_packages().await?;
        debug!("{} packages available in the index", available.len());

        println!("Установка недостающих языковых пакетов...");
        let required: Vec<&str> = self.required.iter().map(String::as_str).collect();
        let selected: Vec<PackageInfo> = packages_to_install(&available, &required, &installed_codes)
            .into_iter()
            .cloned()
            .collect();

        for package in &selected {
            println!("Установка пакета: {} -> {}", package.from_name, package.to_name);
            engine.install_package(package).await?;
        }

        println!("Проверка установленных языков...");
        let languages = engine.installed_languages().await?;
        println!("Установлено языков: {}", languages.len());
        Self::print_languages(&languages);

        info!("Installed {} language packages", selected.len());
        Ok(BootstrapReport::Installed {
            packages: selected,
            languages,
        })
    }

    pub fn print_languages(languages: &[Language]) {
        for language in languages {
            println!("- {}", language);
        }
        println!();
    }
}

/// Packages that translate between required languages and bring in at least
/// one language that is not installed yet
pub fn packages_to_install<'a>(
    available: &'a [PackageInfo],
    required: &[&str],
    installed_codes: &HashSet<String>,
) -> Vec<&'a PackageInfo> {
    available
        .iter()
        .filter(|p| required.contains(&p.from_code.as_str()) && required.contains(&p.to_code.as_str()))
        .filter(|p| !installed_codes.contains(&p.from_code) || !installed_codes.contains(&p.to_code))
        .collect()
}
