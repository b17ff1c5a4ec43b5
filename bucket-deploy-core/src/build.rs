use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::contract::BuildRunner;
use crate::error::DeployError;

/// Name of the directory the front-end build writes its output to.
pub const BUILD_DIR_NAME: &str = "build";

pub fn build_dir(working_dir: &Path) -> PathBuf {
    working_dir.join(BUILD_DIR_NAME)
}

/// Remove a stale `build/` directory so the next build starts clean.
///
/// Does nothing if there is no such directory.
pub fn clean_build_dir(working_dir: &Path) -> Result<(), DeployError> {
    let dir = build_dir(working_dir);
    if !dir.exists() {
        tracing::debug!(path = %dir.display(), "No previous build output to remove");
        return Ok(());
    }

    match fs::remove_dir_all(&dir) {
        Ok(()) => {
            tracing::info!(path = %dir.display(), "Removed previous build output");
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                error = ?e,
                path = %dir.display(),
                "Failed to remove previous build output"
            );
            Err(DeployError::filesystem(dir, e))
        }
    }
}

/// Runs the build as an external process, without a shell.
///
/// The child inherits the environment and stdio, so its output streams to
/// the console as it runs.
#[derive(Debug, Clone)]
pub struct CommandBuildRunner {
    program: String,
    args: Vec<String>,
}

impl CommandBuildRunner {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a `[program, args...]` list, as found in `deployment.json`.
    pub fn from_command_line(command: &[String]) -> Result<Self, DeployError> {
        match command.split_first() {
            Some((program, args)) if !program.is_empty() => {
                Ok(Self::new(program.clone(), args.to_vec()))
            }
            _ => Err(DeployError::Config(
                "build_command must name a program to run".to_string(),
            )),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl BuildRunner for CommandBuildRunner {
    fn build(&self, working_dir: &Path) -> Result<(), DeployError> {
        tracing::info!(
            program = %self.program,
            args = ?self.args,
            working_dir = %working_dir.display(),
            "Running build command"
        );

        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(working_dir)
            .status();

        match status {
            Ok(s) if s.success() => {
                tracing::info!(program = %self.program, status = ?s, "Build finished successfully");
                Ok(())
            }
            Ok(s) => {
                let reason = match s.code() {
                    Some(code) => format!("exited with code {code}"),
                    None => "was terminated by a signal".to_string(),
                };
                tracing::error!(program = %self.program, status = ?s, "Build command {}", reason);
                Err(DeployError::Build(format!("`{}` {}", self.describe(), reason)))
            }
            Err(e) => {
                tracing::error!(error = ?e, program = %self.program, "Failed to launch build process");
                Err(DeployError::Build(format!(
                    "could not start `{}`: {}",
                    self.describe(),
                    e
                )))
            }
        }
    }
}
