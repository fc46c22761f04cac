use async_trait::async_trait;
use regex::{Regex, RegexBuilder};

use crate::domain::branch::BranchName;
use crate::domain::ticket::TicketSet;
use crate::error::{AppError, AppResult};

/// Selects remote branches mentioning any ticket of a set.
///
/// Identifiers are escaped and joined into one case-insensitive alternation.
/// The guards around it keep `AB-1` from selecting `feature/AB-10` or `XAB-1`.
#[derive(Debug, Clone)]
pub struct BranchFilter {
    pattern: Regex,
}

impl BranchFilter {
    /// `None` for an empty ticket set: there is nothing to look for.
    pub fn for_tickets(tickets: &TicketSet) -> AppResult<Option<Self>> {
        if tickets.is_empty() {
            return Ok(None);
        }
        let alternation = tickets
            .iter()
            .map(|ticket| regex::escape(ticket.as_str()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = RegexBuilder::new(&format!("(?:^|[^A-Z])(?:{alternation})(?:[^0-9]|$)"))
            .case_insensitive(true)
            .build()
            .map_err(|err| {
                AppError::VersionControl(format!("invalid branch filter: {err}"))
            })?;
        Ok(Some(Self { pattern }))
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn is_match(&self, branch: &str) -> bool {
        self.pattern.is_match(branch)
    }
}

#[async_trait]
pub trait VersionControlService: Send + Sync {
    /// Remote branches whose name passes `filter`, in listing order.
    async fn list_remote_branches(&self, filter: &BranchFilter) -> AppResult<Vec<BranchName>>;
}
