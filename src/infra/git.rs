use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::branch::BranchName;
use crate::error::{AppError, AppResult};
use crate::services::{BranchFilter, VersionControlService};

pub struct GitCli {
    repository: Option<PathBuf>,
}

impl GitCli {
    pub fn new(repository: Option<PathBuf>) -> Self {
        Self { repository }
    }

    fn command(&self) -> Command {
        let mut command = Command::new("git");
        if let Some(repository) = &self.repository {
            command.arg("-C").arg(repository);
        }
        command
    }
}

#[async_trait]
impl VersionControlService for GitCli {
    async fn list_remote_branches(&self, filter: &BranchFilter) -> AppResult<Vec<BranchName>> {
        debug!(filter = filter.as_str(), "listing remote branches");
        let output = self
            .command()
            .args(["branch", "-r"])
            .output()
            .await
            .map_err(|err| AppError::VersionControl(format!("failed to run git: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::VersionControl(format!(
                "git branch -r exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_remote_branches(&stdout, filter))
    }
}

/// Parses `git branch -r` output, keeping branches that pass `filter`.
pub fn parse_remote_branches(output: &str, filter: &BranchFilter) -> Vec<BranchName> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.contains(" -> "))
        .filter(|line| filter.is_match(line))
        .map(BranchName::new)
        .collect()
}
