use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::ticket::{TicketIdentifier, TicketSet};

const REMOTE_PREFIX: &str = "origin/";
const UNKNOWN_TICKET: &str = "UNKNOWN";

static TICKET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[A-Z]+-[0-9]+").expect("ticket pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchName(pub String);

impl BranchName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name with a leading `origin/` removed.
    pub fn without_remote(&self) -> &str {
        self.0.strip_prefix(REMOTE_PREFIX).unwrap_or(&self.0)
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Every listed branch becomes a deletion candidate.
    #[default]
    Permissive,
    /// Only branches naming a ticket from the search result qualify.
    Strict,
}

impl MatchPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            MatchPolicy::Strict
        } else {
            MatchPolicy::Permissive
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub branch: BranchName,
    pub ticket: Option<TicketIdentifier>,
    pub in_ticket_set: bool,
    pub accepted: bool,
}

impl MatchResult {
    pub fn ticket_label(&self) -> &str {
        self.ticket
            .as_ref()
            .map(TicketIdentifier::as_str)
            .unwrap_or(UNKNOWN_TICKET)
    }

    pub fn deletion_candidate(&self) -> Option<&str> {
        self.accepted.then(|| self.branch.without_remote())
    }
}

/// First ticket-shaped token in a branch name, if any.
pub fn extract_identifier(branch: &str) -> Option<TicketIdentifier> {
    TICKET_PATTERN
        .find(branch)
        .map(|found| TicketIdentifier::new(found.as_str()))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BranchMatcher {
    policy: MatchPolicy,
}

impl BranchMatcher {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn match_branches(&self, branches: &[BranchName], tickets: &TicketSet) -> Vec<MatchResult> {
        branches
            .iter()
            .map(|branch| self.match_branch(branch, tickets))
            .collect()
    }

    fn match_branch(&self, branch: &BranchName, tickets: &TicketSet) -> MatchResult {
        let first = extract_identifier(branch.as_str());

        let (ticket, accepted) = match self.policy {
            MatchPolicy::Permissive => (first, true),
            MatchPolicy::Strict => {
                // A later token may name the ticket, e.g. `hotfix-2-AB-1`.
                let confirmed = TICKET_PATTERN
                    .find_iter(branch.as_str())
                    .map(|found| TicketIdentifier::new(found.as_str()))
                    .find(|ticket| tickets.contains(ticket));
                match confirmed {
                    Some(ticket) => (Some(ticket), true),
                    None => (first, false),
                }
            }
        };
        let in_ticket_set = ticket.as_ref().is_some_and(|t| tickets.contains(t));

        MatchResult {
            branch: branch.clone(),
            ticket,
            in_ticket_set,
            accepted,
        }
    }
}

/// Names to hand to the delete commands, remote prefix stripped.
pub fn deletion_candidates(matches: &[MatchResult]) -> Vec<String> {
    matches
        .iter()
        .filter_map(MatchResult::deletion_candidate)
        .map(str::to_string)
        .collect()
}
