/// `load_config` module: reads `deployment.json` into a [`DeploymentConfig`].
///
/// This is the only place the user-supplied JSON is parsed. Only the presence
/// of `bucket_name` is checked; optional keys fall back to their defaults and
/// unknown keys are ignored.
///
/// # Errors
/// Every failure is a [`DeployError::Config`] naming the file and the cause.
use bucket_deploy_core::config::DeploymentConfig;
use bucket_deploy_core::DeployError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "deployment.json";

pub fn config_path(working_dir: &Path) -> PathBuf {
    working_dir.join(CONFIG_FILE_NAME)
}

/// Load `<working_dir>/deployment.json`.
pub fn load_from_working_dir(working_dir: &Path) -> Result<DeploymentConfig, DeployError> {
    load_config(config_path(working_dir))
}

/// Load and parse a deployment config from `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DeploymentConfig, DeployError> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(DeployError::Config(format!(
                "failed to read config file {}: {}",
                path_ref.display(),
                e
            )));
        }
    };

    let config: DeploymentConfig = match serde_json::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config JSON successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config JSON");
            return Err(DeployError::Config(format!(
                "failed to parse config JSON in {}: {e}",
                path_ref.display()
            )));
        }
    };

    if matches!(&config.build_command, Some(cmd) if cmd.is_empty()) {
        error!(config_path = ?path_ref, "build_command is empty");
        return Err(DeployError::Config(format!(
            "build_command in {} must name a program to run",
            path_ref.display()
        )));
    }

    config.trace_loaded();
    Ok(config)
}
