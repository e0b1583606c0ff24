//! Thin async wrapper around the `aws` command line tool.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::StoreError;

/// How to invoke the AWS CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsCliConfig {
    /// Program name or path of the AWS CLI.
    pub program: String,
    pub region: Option<String>,
    pub profile: Option<String>,
}

impl Default for AwsCliConfig {
    fn default() -> Self {
        Self {
            program: "aws".to_string(),
            region: None,
            profile: None,
        }
    }
}

impl AwsCliConfig {
    fn global_args(&self) -> Vec<&str> {
        let mut args = Vec::new();
        if let Some(region) = &self.region {
            args.extend(["--region", region.as_str()]);
        }
        if let Some(profile) = &self.profile {
            args.extend(["--profile", profile.as_str()]);
        }
        args
    }

    /// Run an AWS CLI command and return its stdout.
    ///
    /// Returns `Ok(None)` when the command fails and stderr contains one of
    /// `not_found_markers`; any other non-zero exit is an error.
    pub(crate) async fn run(&self, args: &[&str], not_found_markers: &[&str]) -> Result<Option<Vec<u8>>, StoreError> {
        debug!(program = %self.program, command = ?args, "running aws cli");

        let output = Command::new(&self.program)
            .args(args)
            .args(self.global_args())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| StoreError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(Some(output.stdout));
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if not_found_markers.iter().any(|marker| stderr.contains(marker)) {
            debug!(program = %self.program, "aws cli reported a missing item");
            return Ok(None);
        }

        Err(StoreError::CommandFailed {
            program: self.program.clone(),
            status: output.status.to_string(),
            stderr,
        })
    }
}

/// Test helper that writes an executable shell script standing in for the AWS CLI.
#[cfg(all(test, unix))]
pub(crate) fn fake_cli(dir: &std::path::Path, script: &str) -> AwsCliConfig {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("aws");
    std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).expect("write fake cli");
    let mut permissions = std::fs::metadata(&path).expect("metadata").permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&path, permissions).expect("chmod fake cli");

    AwsCliConfig {
        program: path.to_string_lossy().into_owned(),
        ..AwsCliConfig::default()
    }
}
