//! Histogram rendering through an external R script.

use super::{image_path, HistogramRenderer};
use crate::report::node::join_values;
use crate::utils::config::{BUNDLED_R_SCRIPT, DEFAULT_RSCRIPT};
use crate::utils::error::HistogramError;
use log::debug;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;

/// Runs `<program> <script> <samples.csv> <dir>/<name>.png`
///
/// The samples go to a temporary CSV file that is removed once the tool
/// exits. Without an explicit script the bundled one is written next to
/// it, so rendering does not depend on the working directory. There is
/// no timeout: a hung tool hangs the caller.
#[derive(Debug, Clone)]
pub struct RscriptRenderer {
    program: PathBuf,
    script: Option<PathBuf>,
    output_dir: PathBuf,
}

impl RscriptRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: PathBuf::from(DEFAULT_RSCRIPT),
            script: None,
            output_dir: output_dir.into(),
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Use a script from disk instead of the bundled one
    pub fn with_script(mut self, script: impl Into<PathBuf>) -> Self {
        self.script = Some(script.into());
        self
    }
}

impl HistogramRenderer for RscriptRenderer {
    fn render(&self, name: &str, samples: &[f64]) -> Result<PathBuf, HistogramError> {
        if samples.is_empty() {
            return Err(HistogramError::EmptySamples(name.to_string()));
        }

        std::fs::create_dir_all(&self.output_dir)?;
        let output = image_path(&self.output_dir, name, "png");

        let csv = scratch_file(".csv", &join_values(samples))?;

        // kept alive until the tool exits
        let bundled;
        let script: &Path = match &self.script {
            Some(path) => path,
            None => {
                bundled = scratch_file(".R", BUNDLED_R_SCRIPT)?;
                bundled.path()
            }
        };

        let program = self.program.display().to_string();
        debug!(
            "Running {} {} {} {}",
            program,
            script.display(),
            csv.path().display(),
            output.display()
        );

        let status = Command::new(&self.program)
            .arg(script)
            .arg(csv.path())
            .arg(&output)
            .status()
            .map_err(|source| HistogramError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(HistogramError::ToolFailed { program, status });
        }

        Ok(output)
    }
}

/// Write `content` to a fresh temporary file
fn scratch_file(suffix: &str, content: &str) -> Result<NamedTempFile, HistogramError> {
    let mut file = tempfile::Builder::new()
        .prefix("histogram-")
        .suffix(suffix)
        .tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_samples() {
        let temp_dir = tempfile::tempdir().unwrap();
        let renderer = RscriptRenderer::new(temp_dir.path());
        assert!(matches!(
            renderer.render("x", &[]),
            Err(HistogramError::EmptySamples(_))
        ));
    }

    #[test]
    fn test_missing_program() {
        let temp_dir = tempfile::tempdir().unwrap();
        let renderer = RscriptRenderer::new(temp_dir.path())
            .with_program("definitely-not-an-installed-program-4711");

        assert!(matches!(
            renderer.render("x", &[1.0, 2.0]),
            Err(HistogramError::Spawn { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit() {
        let temp_dir = tempfile::tempdir().unwrap();
        let renderer = RscriptRenderer::new(temp_dir.path()).with_program("false");

        assert!(matches!(
            renderer.render("x", &[1.0, 2.0]),
            Err(HistogramError::ToolFailed { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_success_returns_png_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let renderer = RscriptRenderer::new(temp_dir.path()).with_program("true");

        let path = renderer.render("client_latency", &[1.0, 2.0]).unwrap();
        assert_eq!(path, temp_dir.path().join("client_latency.png"));
    }

    /// Program that succeeds only if its first argument is an R script on disk
    #[cfg(unix)]
    fn script_checker(dir: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("check_script.sh");
        std::fs::write(
            &path,
            "#!/bin/sh\ntest -f \"$1\" && grep -q commandArgs \"$1\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_bundled_script_outside_crate_root() {
        let tools = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let renderer = RscriptRenderer::new(output.path()).with_program(script_checker(tools.path()));

        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(elsewhere.path()).unwrap();
        let result = renderer.render("nested_latency", &[1.0, 2.0]);
        std::env::set_current_dir(original_dir).unwrap();

        assert_eq!(result.unwrap(), output.path().join("nested_latency.png"));
    }

    #[cfg(unix)]
    #[test]
    fn test_explicit_script_is_passed_through() {
        let tools = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let checker = script_checker(tools.path());

        let missing = RscriptRenderer::new(output.path())
            .with_program(&checker)
            .with_script(tools.path().join("missing.R"));
        assert!(matches!(
            missing.render("x", &[1.0, 2.0]),
            Err(HistogramError::ToolFailed { .. })
        ));

        let script = tools.path().join("custom.R");
        std::fs::write(&script, BUNDLED_R_SCRIPT).unwrap();
        let custom = RscriptRenderer::new(output.path())
            .with_program(&checker)
            .with_script(&script);
        assert!(custom.render("x", &[1.0, 2.0]).is_ok());
    }
}
