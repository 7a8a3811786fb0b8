//! Input acquisition: the input file, the clipboard, or a choice between them
//! based on how recently the file was modified.

use arboard::Clipboard;
use chrono::{DateTime, Utc};
use std::fmt;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::config::{SourceConfig, SourceMode};
use crate::error::{Result, RuenError};

/// Read access to clipboard text
#[cfg_attr(test, mockall::automock)]
pub trait ClipboardSource: Send + Sync {
    /// Current clipboard text; empty when the clipboard holds no text
    fn read_text(&self) -> Result<String>;
}

/// The system clipboard.
///
/// arboard's `Clipboard` is not `Send`/`Sync` on every platform, so a handle
/// is opened per read.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardSource for SystemClipboard {
    fn read_text(&self) -> Result<String> {
        let mut clipboard = Clipboard::new()
            .map_err(|e| RuenError::Clipboard(format!("Failed to access clipboard: {}", e)))?;

        match clipboard.get_text() {
            Ok(text) => Ok(text),
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(RuenError::Clipboard(format!("Failed to read clipboard: {}", e))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOrigin {
    File,
    Clipboard,
}

impl fmt::Display for InputOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Clipboard => write!(f, "clipboard"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputText {
    pub origin: InputOrigin,
    /// Trimmed text
    pub text: String,
}

/// Decide between the file and the clipboard.
///
/// The file wins only if it was modified less than `window` before `now`.
/// A modification time in the future counts as fresh.
pub fn select_origin(path: &Path, now: DateTime<Utc>, window: Duration) -> Result<InputOrigin> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{} does not exist, using clipboard", path.display());
            return Ok(InputOrigin::Clipboard);
        }
        Err(e) => return Err(e.into()),
    };

    let modified: DateTime<Utc> = metadata.modified()?.into();
    let age = now.signed_duration_since(modified);
    let window = chrono::Duration::from_std(window)
        .map_err(|e| RuenError::Config(format!("Invalid freshness window: {}", e)))?;

    debug!(
        "{} modified at {} ({}s ago)",
        path.display(),
        modified.to_rfc3339(),
        age.num_seconds()
    );

    if age < window {
        Ok(InputOrigin::File)
    } else {
        Ok(InputOrigin::Clipboard)
    }
}

/// Read and trim the input file
pub fn read_file_text(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content.trim().to_string()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(RuenError::FileNotFound(path.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Acquire the input text according to the configured source mode
pub fn acquire_text(
    path: &Path,
    config: &SourceConfig,
    clipboard: &dyn ClipboardSource,
    now: DateTime<Utc>,
) -> Result<InputText> {
    let origin = match config.mode {
        SourceMode::File => InputOrigin::File,
        SourceMode::Auto => select_origin(path, now, config.freshness_window())?,
    };

    let text = match origin {
        InputOrigin::File => read_file_text(path)?,
        InputOrigin::Clipboard => clipboard.read_text()?.trim().to_string(),
    };

    debug!("Acquired {} characters from {}", text.chars().count(), origin);
    Ok(InputText { origin, text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn auto_config() -> SourceConfig {
        SourceConfig {
            mode: SourceMode::Auto,
            freshness_window_secs: 10,
        }
    }

    #[test]
    fn test_recent_file_is_selected() {
        let temp = assert_fs::TempDir::new().unwrap();
        let input = temp.child("input.txt");
        input.write_str("hello").unwrap();

        let origin = select_origin(input.path(), Utc::now(), Duration::from_secs(10)).unwrap();
        assert_eq!(origin, InputOrigin::File);
    }

    #[test]
    fn test_stale_file_yields_clipboard() {
        let temp = assert_fs::TempDir::new().unwrap();
        let input = temp.child("input.txt");
        input.write_str("hello").unwrap();

        let later = Utc::now() + chrono::Duration::seconds(60);
        let origin = select_origin(input.path(), later, Duration::from_secs(10)).unwrap();
        assert_eq!(origin, InputOrigin::Clipboard);
    }

    fn modified_at(path: &Path) -> DateTime<Utc> {
        std::fs::metadata(path).unwrap().modified().unwrap().into()
    }

    #[test]
    fn test_file_exactly_window_old_yields_clipboard() {
        let temp = assert_fs::TempDir::new().unwrap();
        let input = temp.child("input.txt");
        input.write_str("hello").unwrap();

        let now = modified_at(input.path()) + chrono::Duration::seconds(10);
        let origin = select_origin(input.path(), now, Duration::from_secs(10)).unwrap();
        assert_eq!(origin, InputOrigin::Clipboard);

        let just_inside = now - chrono::Duration::milliseconds(1);
        let origin = select_origin(input.path(), just_inside, Duration::from_secs(10)).unwrap();
        assert_eq!(origin, InputOrigin::File);
    }

    #[test]
    fn test_future_mtime_counts_as_fresh() {
        let temp = assert_fs::TempDir::new().unwrap();
        let input = temp.child("input.txt");
        input.write_str("hello").unwrap();

        let before_write = modified_at(input.path()) - chrono::Duration::seconds(5);
        let origin = select_origin(input.path(), before_write, Duration::from_secs(10)).unwrap();
        assert_eq!(origin, InputOrigin::File);
    }

    #[test]
    fn test_missing_file_yields_clipboard() {
        let temp = assert_fs::TempDir::new().unwrap();
        let origin = select_origin(
            &temp.path().join("input.txt"),
            Utc::now(),
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(origin, InputOrigin::Clipboard);
    }

    #[test]
    fn test_fresh_file_is_read_without_touching_clipboard() {
        let temp = assert_fs::TempDir::new().unwrap();
        let input = temp.child("input.txt");
        input.write_str("  привет мир \n").unwrap();

        let mut clipboard = MockClipboardSource::new();
        clipboard.expect_read_text().times(0);

        let acquired = acquire_text(input.path(), &auto_config(), &clipboard, Utc::now()).unwrap();
        assert_eq!(acquired.origin, InputOrigin::File);
        assert_eq!(acquired.text, "привет мир");
    }

    #[test]
    fn test_stale_file_reads_trimmed_clipboard() {
        let temp = assert_fs::TempDir::new().unwrap();
        let input = temp.child("input.txt");
        input.write_str("old text").unwrap();

        let mut clipboard = MockClipboardSource::new();
        clipboard
            .expect_read_text()
            .times(1)
            .returning(|| Ok("\tGood morning\n".to_string()));

        let later = Utc::now() + chrono::Duration::seconds(30);
        let acquired = acquire_text(input.path(), &auto_config(), &clipboard, later).unwrap();
        assert_eq!(acquired.origin, InputOrigin::Clipboard);
        assert_eq!(acquired.text, "Good morning");
    }

    #[test]
    fn test_file_mode_ignores_freshness() {
        let temp = assert_fs::TempDir::new().unwrap();
        let input = temp.child("input.txt");
        input.write_str("stale but forced").unwrap();

        let mut clipboard = MockClipboardSource::new();
        clipboard.expect_read_text().times(0);

        let config = SourceConfig {
            mode: SourceMode::File,
            freshness_window_secs: 10,
        };
        let later = Utc::now() + chrono::Duration::seconds(3600);
        let acquired = acquire_text(input.path(), &config, &clipboard, later).unwrap();
        assert_eq!(acquired.text, "stale but forced");
    }

    #[test]
    fn test_file_mode_reports_missing_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let err = read_file_text(&temp.path().join("input.txt")).unwrap_err();
        assert!(matches!(err, RuenError::FileNotFound(_)));
    }

    #[test]
    fn test_clipboard_errors_propagate() {
        let temp = assert_fs::TempDir::new().unwrap();

        let mut clipboard = MockClipboardSource::new();
        clipboard
            .expect_read_text()
            .returning(|| Err(RuenError::Clipboard("no display".to_string())));

        let result = acquire_text(
            &temp.path().join("input.txt"),
            &auto_config(),
            &clipboard,
            Utc::now(),
        );
        assert!(matches!(result, Err(RuenError::Clipboard(_))));
    }
}
