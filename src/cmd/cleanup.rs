use std::io::Write;

use crate::context::AppContext;
use crate::domain::branch::MatchPolicy;
use crate::domain::query::SearchQuery;
use crate::error::AppResult;
use crate::workflow::cleanup::find_stale_branches;

#[derive(Debug, Clone, Default)]
pub struct CleanupCommandArgs {
    /// Only propose branches naming a ticket from the search result.
    pub strict: bool,
}

pub async fn run<W: Write>(
    ctx: &AppContext,
    args: CleanupCommandArgs,
    out: &mut W,
) -> AppResult<()> {
    let query = SearchQuery::from_config(&ctx.config);
    let policy = MatchPolicy::from_strict(args.strict || ctx.config.strict_match);
    let jql = query.to_jql();

    writeln!(out, "Searching for tickets with the following jql: {jql}")?;
    writeln!(out, "Calling URL: {}", ctx.issue_tracker.request_url(&jql)?)?;

    let outcome = find_stale_branches(ctx, &query, policy).await?;

    let total = outcome
        .search
        .reported_total
        .unwrap_or(outcome.search.tickets.len() as u64);
    writeln!(out, "Found {total} tickets")?;
    writeln!(out, "Found {} branches", outcome.matches.len())?;
    for result in &outcome.matches {
        let note = match (result.accepted, result.in_ticket_set) {
            (true, true) => "",
            (true, false) => " (ticket not in search result)",
            (false, _) => " (kept, ticket not in search result)",
        };
        writeln!(
            out,
            "TaskID: {} - {}{note}",
            result.ticket_label(),
            result.branch
        )?;
    }

    if let Some(report) = &outcome.report {
        writeln!(out, "{report}")?;
    }
    Ok(())
}
