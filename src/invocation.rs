// src/invocation.rs
use crate::config::AppConfig;
use crate::errors::{PlaygroundError, Result};
use crate::models::VerificationRequest;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const INPUT_FILE_NAME: &str = "input.gobra";
pub const STATS_FILE_NAME: &str = "stats.json";

/// Scratch directory owned by a single verification run.
///
/// Removed recursively when dropped, so every early return cleans up.
/// `close` does the same but reports failures.
#[derive(Debug)]
pub struct WorkArea {
    dir: TempDir,
}

impl WorkArea {
    pub fn create(run_id: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("gobra-playground-{}-", run_id))
            .tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn close(self) -> Result<()> {
        Ok(self.dir.close()?)
    }
}

/// Everything needed to start one verifier process.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub work_dir: PathBuf,
    pub input_path: PathBuf,
    pub stats_path: PathBuf,
}

impl Invocation {
    /// Write the submitted source into `work_area` and describe the
    /// `java ... gobra.jar` command that verifies it. Nothing is started.
    pub fn build(config: &AppConfig, request: &VerificationRequest, work_area: &WorkArea) -> Result<Self> {
        if config.java_stack_size.trim().is_empty() {
            return Err(PlaygroundError::Config("JAVA_STACK_SIZE must not be empty".to_string()));
        }

        let work_dir = work_area.path().to_path_buf();
        let input_path = work_dir.join(INPUT_FILE_NAME);
        let stats_path = work_dir.join(STATS_FILE_NAME);

        // Blocking write: the build step stays synchronous and runs before the
        // process exists, so it never overlaps the timed part of the run.
        std::fs::write(&input_path, &request.source)?;

        let args = vec![
            OsString::from(format!("-Xss{}", config.java_stack_size.trim())),
            OsString::from("-jar"),
            config.gobra_jar.clone().into_os_string(),
            OsString::from("--input"),
            input_path.clone().into_os_string(),
            OsString::from("-g"),
            work_dir.clone().into_os_string(),
        ];

        Ok(Self {
            program: config.java_path.clone(),
            args,
            work_dir,
            input_path,
            stats_path,
        })
    }

    /// Human-readable command line for logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(|a| a.as_os_str()))
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
