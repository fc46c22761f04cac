use tracing::{debug, info};

use crate::context::AppContext;
use crate::domain::branch::{BranchMatcher, MatchPolicy, MatchResult, deletion_candidates};
use crate::domain::query::SearchQuery;
use crate::domain::report::DeletionReport;
use crate::domain::ticket::SearchResult;
use crate::error::AppResult;
use crate::services::BranchFilter;

pub struct CleanupOutcome {
    pub search: SearchResult,
    pub matches: Vec<MatchResult>,
    pub report: Option<DeletionReport>,
}

pub async fn find_stale_branches(
    ctx: &AppContext,
    query: &SearchQuery,
    policy: MatchPolicy,
) -> AppResult<CleanupOutcome> {
    let search = ctx.issue_tracker.search_tickets(&query.to_jql()).await?;
    info!(
        tickets = search.tickets.len(),
        reported = ?search.reported_total,
        "tracker search finished"
    );

    let branches = match BranchFilter::for_tickets(&search.tickets)? {
        Some(filter) => ctx.version_control.list_remote_branches(&filter).await?,
        None => {
            debug!("no tickets found, skipping branch listing");
            Vec::new()
        }
    };

    let matches = BranchMatcher::new(policy).match_branches(&branches, &search.tickets);
    let report = DeletionReport::render(&deletion_candidates(&matches));

    Ok(CleanupOutcome {
        search,
        matches,
        report,
    })
}
