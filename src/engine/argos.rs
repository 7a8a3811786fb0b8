use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{Result, RuenError};
use super::{
    EngineCommandBuilder, Language, PackageInfo, TranslationEngine, extract_package,
    languages_from_packages, parse_index, scan_installed_packages,
};

/// Argos Translate engine.
///
/// Package management works directly on the Argos package store and index
/// format; inference runs through the argos-translate CLI.
pub struct ArgosEngine {
    client: Client,
    config: EngineConfig,
    packages_dir: PathBuf,
    command_builder: EngineCommandBuilder,
}

impl ArgosEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let packages_dir = config.resolve_packages_dir()?;
        let command_builder = EngineCommandBuilder::new(&config.binary_path, &packages_dir);

        let client = Client::builder()
            .user_agent(concat!("ruen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RuenError::Http)?;

        debug!("Using Argos package directory {}", packages_dir.display());

        Ok(Self {
            client,
            config,
            packages_dir,
            command_builder,
        })
    }

    fn progress_bar(&self, package: &PackageInfo) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg} {bytes}")
        {
            pb.set_style(style);
        }
        pb.set_message(format!("Downloading {}", package.name()));
        pb
    }
}

#[async_trait]
impl TranslationEngine for ArgosEngine {
    async fn installed_languages(&self) -> Result<Vec<Language>> {
        let packages = scan_installed_packages(&self.packages_dir)?;
        Ok(languages_from_packages(&packages))
    }

    async fn update_package_index(&self) -> Result<()> {
        info!("Updating package index from {}", self.config.index_url);

        let response = self.client.get(&self.config.index_url).send().await?;
        if !response.status().is_success() {
            return Err(RuenError::Package(format!(
                "Failed to download package index: HTTP {}",
                response.status()
            )));
        }

        let content = response.text().await?;
        let packages = parse_index(&content)?;

        tokio::fs::create_dir_all(&self.config.cache_dir).await?;
        tokio::fs::write(self.config.index_cache_path(), &content).await?;

        info!("Package index updated: {} packages", packages.len());
        Ok(())
    }

    async fn available_packages(&self) -> Result<Vec<PackageInfo>> {
        let index_path = self.config.index_cache_path();
        let content = match tokio::fs::read_to_string(&index_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RuenError::Package(format!(
                    "Package index not found at {}; update the index first",
                    index_path.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        parse_index(&content)
    }

    async fn install_package(&self, package: &PackageInfo) -> Result<()> {
        let url = package.links.first().ok_or_else(|| {
            RuenError::Package(format!("Package {} has no download link", package.name()))
        })?;

        info!("Downloading {} from {}", package.name(), url);

        let pb = self.progress_bar(package);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            pb.abandon();
            return Err(RuenError::Package(format!(
                "Failed to download package {}: HTTP {}",
                package.name(),
                response.status()
            )));
        }

        if let Some(length) = response.content_length() {
            pb.set_length(length);
        }
        let bytes = response.bytes().await?;
        pb.set_position(bytes.len() as u64);

        std::fs::create_dir_all(&self.config.cache_dir)?;
        let mut archive = tempfile::Builder::new()
            .prefix(&package.name())
            .suffix(".argosmodel")
            .tempfile_in(&self.config.cache_dir)?;
        archive.write_all(&bytes)?;
        archive.flush()?;

        extract_package(archive.path(), &self.packages_dir)?;

        pb.finish_with_message(format!("Installed {}", package.name()));
        info!(
            "Installed {} into {}",
            package.name(),
            self.packages_dir.display()
        );
        Ok(())
    }

    async fn translate(&self, from: &Language, to: &Language, text: &str) -> Result<String> {
        debug!("Translating {} characters {} -> {}", text.chars().count(), from.code, to.code);

        let output = self
            .command_builder
            .translate(&from.code, &to.code, text)
            .execute()
            .await?;

        Ok(output.trim().to_string())
    }
}
