use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Build command used when `deployment.json` does not name one.
pub const DEFAULT_BUILD_COMMAND: [&str; 3] = ["npm", "run", "build"];

/// Contents of `deployment.json`.
///
/// Only `bucket_name` is required. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    pub bucket_name: String,
    /// Program followed by its arguments, run without a shell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_command: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Endpoint override for S3-compatible services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
}

impl DeploymentConfig {
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            build_command: None,
            region: None,
            endpoint_url: None,
        }
    }

    /// The build command as program + args, falling back to `npm run build`.
    pub fn build_command(&self) -> Vec<String> {
        match &self.build_command {
            Some(cmd) => cmd.clone(),
            None => DEFAULT_BUILD_COMMAND.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            bucket = %self.bucket_name,
            build_command = ?self.build_command(),
            region = self.region.as_deref().unwrap_or("<default>"),
            "Loaded DeploymentConfig"
        );
        debug!(?self, "DeploymentConfig loaded (full debug)");
    }
}
