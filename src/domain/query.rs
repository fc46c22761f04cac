use crate::config::AppConfig;

pub const DEFAULT_STATUS: &str = "Resolved";
pub const CURRENT_USER: &str = "currentUser()";

/// The tracker filter for tickets whose branches can go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub project: String,
    pub statuses: Vec<String>,
    pub users: Vec<String>,
    pub weeks: u32,
}

impl SearchQuery {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            project: config.project.clone(),
            statuses: config.statuses.clone(),
            users: config.users.clone(),
            weeks: config.weeks,
        }
    }

    /// Tokens are joined as given; quoting is the caller's concern.
    pub fn to_jql(&self) -> String {
        let statuses = join_or_default(&self.statuses, DEFAULT_STATUS);
        let users = join_or_default(&self.users, CURRENT_USER);

        [
            format!("project = {}", self.project),
            format!("status in ({statuses})"),
            format!("updated >= -{}w", self.weeks),
            format!("assignee IN ({users})"),
        ]
        .join(" AND ")
    }
}

fn join_or_default(values: &[String], default: &str) -> String {
    if values.is_empty() {
        default.to_string()
    } else {
        values.join(", ")
    }
}
