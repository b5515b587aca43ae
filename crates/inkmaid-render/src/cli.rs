//! Mermaid CLI (`mmdc`) renderer for native platforms.

use super::{BoxFuture, DiagramRenderer, RenderError, RenderResult};
use inkmaid_core::RenderOptions;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Program looked up on `PATH` when no explicit path is configured.
pub const DEFAULT_MMDC: &str = "mmdc";

/// Renders by shelling out to the Mermaid CLI.
///
/// Every render writes the source and a Mermaid config into a fresh temporary
/// directory and reads the SVG back. The call blocks, so run it off the UI
/// thread.
#[derive(Debug, Clone)]
pub struct MermaidCli {
    program: PathBuf,
    options: RenderOptions,
}

impl Default for MermaidCli {
    fn default() -> Self {
        Self::new()
    }
}

impl MermaidCli {
    /// Use `mmdc` from `PATH`.
    pub fn new() -> Self {
        Self::with_program(DEFAULT_MMDC)
    }

    /// Use a specific `mmdc` executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            options: RenderOptions::default(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn render_blocking(&self, id: &str, source: &str) -> RenderResult<String> {
        let dir = tempfile::Builder::new()
            .prefix("inkmaid-")
            .tempdir()
            .map_err(|e| RenderError::Io(format!("Failed to create temp dir: {}", e)))?;
        let input = dir.path().join("diagram.mmd");
        let output = dir.path().join("diagram.svg");
        let config = dir.path().join("config.json");

        fs::write(&input, source)
            .map_err(|e| RenderError::Io(format!("Failed to write {}: {}", input.display(), e)))?;
        let config_json = serde_json::to_string(&self.options)
            .map_err(|e| RenderError::Other(format!("Failed to encode config: {}", e)))?;
        fs::write(&config, config_json)
            .map_err(|e| RenderError::Io(format!("Failed to write {}: {}", config.display(), e)))?;

        log::debug!("Running {} for {}", self.program.display(), id);
        let result = Command::new(&self.program)
            .arg("--input")
            .arg(&input)
            .arg("--output")
            .arg(&output)
            .arg("--configFile")
            .arg(&config)
            .arg("--svgId")
            .arg(id)
            .arg("--quiet")
            .stdin(Stdio::null())
            .output();

        let out = match result {
            Ok(out) => out,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RenderError::Unavailable(format!(
                    "{} not found; install @mermaid-js/mermaid-cli",
                    self.program.display()
                )));
            }
            Err(e) => {
                return Err(RenderError::Io(format!(
                    "Failed to run {}: {}",
                    self.program.display(),
                    e
                )));
            }
        };

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(RenderError::Syntax(clean_cli_error(&stderr)));
        }

        fs::read_to_string(&output)
            .map_err(|e| RenderError::Io(format!("Failed to read {}: {}", output.display(), e)))
    }
}

/// Reduce `mmdc` stderr to the Mermaid error message.
///
/// Drops the leading `Error:` tag and any JavaScript stack frames.
pub(crate) fn clean_cli_error(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim_start().starts_with("at "))
        .filter(|line| !line.trim().is_empty())
        .collect();
    let text = lines.join("\n");
    text.strip_prefix("Error: ").unwrap_or(&text).to_string()
}

impl DiagramRenderer for MermaidCli {
    fn name(&self) -> &'static str {
        "mermaid-cli"
    }

    fn initialize(&mut self, options: &RenderOptions) -> RenderResult<()> {
        self.options = options.clone();
        log::info!(
            "Mermaid CLI renderer using {} (theme {})",
            self.program.display(),
            options.theme
        );
        Ok(())
    }

    fn render(&self, id: &str, source: &str) -> BoxFuture<'_, RenderResult<String>> {
        let id = id.to_string();
        let source = source.to_string();
        Box::pin(async move { self.render_blocking(&id, &source) })
    }
}
