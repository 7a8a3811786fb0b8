use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::ZipArchive;

use super::Language;
use crate::error::{Result, RuenError};

/// Name of the metadata file at the root of every installed package
pub const METADATA_FILE: &str = "metadata.json";

/// A translation package, as listed in the package index or in an installed
/// package's metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub from_code: String,
    pub from_name: String,
    pub to_code: String,
    pub to_name: String,
    #[serde(default)]
    pub package_version: String,
    /// Download URLs; only present in the index
    #[serde(default)]
    pub links: Vec<String>,
}

impl PackageInfo {
    pub fn from_language(&self) -> Language {
        Language::new(&self.from_code, &self.from_name)
    }

    pub fn to_language(&self) -> Language {
        Language::new(&self.to_code, &self.to_name)
    }

    /// Name of the package, e.g. `translate-ru_en`
    pub fn name(&self) -> String {
        format!("translate-{}_{}", self.from_code, self.to_code)
    }
}

/// Parse the package index document
pub fn parse_index(content: &str) -> Result<Vec<PackageInfo>> {
    let packages: Vec<PackageInfo> = serde_json::from_str(content)?;
    Ok(packages)
}

/// Read the metadata of every package directly under `packages_dir`.
///
/// A missing directory means nothing is installed. Packages with unreadable
/// metadata are skipped.
pub fn scan_installed_packages(packages_dir: &Path) -> Result<Vec<PackageInfo>> {
    if !packages_dir.exists() {
        debug!("Package directory {} does not exist", packages_dir.display());
        return Ok(Vec::new());
    }

    let mut packages = Vec::new();
    for entry in WalkDir::new(packages_dir)
        .min_depth(2)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_name() != METADATA_FILE {
            continue;
        }

        let parsed = std::fs::read_to_string(entry.path())
            .map_err(RuenError::from)
            .and_then(|content| serde_json::from_str::<PackageInfo>(&content).map_err(RuenError::from));

        match parsed {
            Ok(package) => {
                debug!("Found installed package {}", package.name());
                packages.push(package);
            }
            Err(e) => warn!("Skipping package with bad metadata {}: {}", entry.path().display(), e),
        }
    }

    Ok(packages)
}

/// Languages covered by a set of packages, de-duplicated by code in the order
/// they are first seen
pub fn languages_from_packages(packages: &[PackageInfo]) -> Vec<Language> {
    let mut seen = HashSet::new();
    let mut languages = Vec::new();

    for package in packages {
        for language in [package.from_language(), package.to_language()] {
            if seen.insert(language.code.clone()) {
                languages.push(language);
            }
        }
    }

    languages
}

/// Unpack a downloaded `.argosmodel` archive into the package store
pub fn extract_package(archive_path: &Path, packages_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(packages_dir)?;

    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;
    debug!(
        "Extracting {} entries from {} into {}",
        archive.len(),
        archive_path.display(),
        packages_dir.display()
    );
    archive.extract(packages_dir)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use std::io::Write;
    use zip::write::FileOptions;

    const INDEX: &str = r#"[
        {
            "package_type": "translate",
            "from_code": "en",
            "from_name": "English",
            "to_code": "ru",
            "to_name": "Russian",
            "package_version": "1.9",
            "argos_version": "1.9.0",
            "links": ["https://example.invalid/translate-en_ru-1_9.argosmodel"]
        },
        {
            "from_code": "ru",
            "from_name": "Russian",
            "to_code": "en",
            "to_name": "English"
        }
    ]"#;

    fn metadata(from: &str, from_name: &str, to: &str, to_name: &str) -> String {
        format!(
            r#"{{"from_code":"{}","from_name":"{}","to_code":"{}","to_name":"{}","package_version":"1.9"}}"#,
            from, from_name, to, to_name
        )
    }

    #[test]
    fn test_parse_index_tolerates_extra_and_missing_fields() {
        let packages = parse_index(INDEX).unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].name(), "translate-en_ru");
        assert_eq!(packages[0].links.len(), 1);
        assert!(packages[1].links.is_empty());
        assert_eq!(packages[1].package_version, "");
    }

    #[test]
    fn test_parse_index_rejects_garbage() {
        assert!(matches!(parse_index("<html>"), Err(RuenError::Json(_))));
    }

    #[test]
    fn test_scan_missing_directory_is_empty() {
        let temp = assert_fs::TempDir::new().unwrap();
        let packages = scan_installed_packages(&temp.path().join("packages")).unwrap();
        assert!(packages.is_empty());
    }

    #[test]
    fn test_scan_reads_metadata_and_skips_broken_packages() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("translate-en_ru-1_9/metadata.json")
            .write_str(&metadata("en", "English", "ru", "Russian"))
            .unwrap();
        temp.child("translate-ru_en-1_9/metadata.json")
            .write_str(&metadata("ru", "Russian", "en", "English"))
            .unwrap();
        temp.child("broken/metadata.json").write_str("{").unwrap();
        temp.child("translate-ru_en-1_9/model/metadata.json")
            .write_str("nested files are not package roots")
            .unwrap();

        let packages = scan_installed_packages(temp.path()).unwrap();
        assert_eq!(packages.len(), 2);

        let languages = languages_from_packages(&packages);
        assert_eq!(
            languages,
            vec![Language::new("en", "English"), Language::new("ru", "Russian")]
        );
    }

    #[test]
    fn test_extract_package_installs_into_store() {
        let temp = assert_fs::TempDir::new().unwrap();
        let archive_path = temp.path().join("translate-ru_en.argosmodel");

        let file = File::create(&archive_path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.add_directory("translate-ru_en-1_9/", FileOptions::default()).unwrap();
        zip.start_file("translate-ru_en-1_9/metadata.json", FileOptions::default())
            .unwrap();
        zip.write_all(metadata("ru", "Russian", "en", "English").as_bytes())
            .unwrap();
        zip.finish().unwrap();

        let store = temp.path().join("packages");
        extract_package(&archive_path, &store).unwrap();

        let packages = scan_installed_packages(&store).unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name(), "translate-ru_en");
    }
}
