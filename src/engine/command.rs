use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, RuenError};

/// Abstract engine command representation
#[derive(Debug, Clone)]
pub struct EngineCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
    pub stdin: Option<String>,
    pub description: String,
}

impl EngineCommand {
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            envs: Vec::new(),
            stdin: None,
            description: description.into(),
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Feed text to the process on stdin
    pub fn stdin<S: Into<String>>(mut self, input: S) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn from_lang<S: Into<String>>(self, code: S) -> Self {
        self.arg("--from-lang").arg(code)
    }

    pub fn to_lang<S: Into<String>>(self, code: S) -> Self {
        self.arg("--to-lang").arg(code)
    }

    /// Point the engine at a package store
    pub fn packages_dir<P: AsRef<Path>>(self, dir: P) -> Self {
        self.env("ARGOS_PACKAGES_DIR", dir.as_ref().to_string_lossy().to_string())
    }

    /// Execute the command and return its stdout
    pub async fn execute(&self) -> Result<String> {
        debug!("Executing engine command: {} {:?}", self.binary_path, self.args);
        debug!("Description: {}", self.description);

        let mut cmd = Command::new(&self.binary_path);
        cmd.args(&self.args)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(if self.stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| RuenError::Engine(format!("Failed to execute {}: {}", self.binary_path, e)))?;

        if let Some(input) = &self.stdin {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(input.as_bytes()).await?;
                // Dropping stdin closes the pipe so the process sees EOF
            }
        }

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RuenError::Engine(format!(
                "{} failed: {}",
                self.description,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Builder for argos-translate invocations
#[derive(Debug, Clone)]
pub struct EngineCommandBuilder {
    binary_path: String,
    packages_dir: PathBuf,
}

impl EngineCommandBuilder {
    pub fn new<S: Into<String>, P: Into<PathBuf>>(binary_path: S, packages_dir: P) -> Self {
        Self {
            binary_path: binary_path.into(),
            packages_dir: packages_dir.into(),
        }
    }

    /// Build a translation command; the text goes through stdin
    pub fn translate(&self, from_code: &str, to_code: &str, text: &str) -> EngineCommand {
        EngineCommand::new(&self.binary_path, format!("Translation {}-{}", from_code, to_code))
            .from_lang(from_code)
            .to_lang(to_code)
            .packages_dir(&self.packages_dir)
            .stdin(text)
    }
}
