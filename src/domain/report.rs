use std::fmt;

const SEPARATOR: &str = "************************************************";

/// Ready-to-run commands deleting the candidate branches locally and on `origin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionReport {
    pub local: String,
    pub remote: String,
}

impl DeletionReport {
    /// Returns `None` when there is nothing to delete.
    pub fn render(candidates: &[String]) -> Option<Self> {
        if candidates.is_empty() {
            return None;
        }
        let names = candidates.join(" ");
        Some(Self {
            local: format!("git branch -d {names}"),
            remote: format!("git push origin --delete {names}"),
        })
    }
}

impl fmt::Display for DeletionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "***** Run command to delete local branches *****")?;
        writeln!(f, "{}", self.local)?;
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "***** Run command to delete remote branches *****")?;
        writeln!(f, "{}", self.remote)?;
        write!(f, "{SEPARATOR}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_space_joined_commands() {
        let report = DeletionReport::render(&["AB-1-fix".to_string(), "AB-2".to_string()])
            .expect("report for non-empty list");
        assert_eq!(report.local, "git branch -d AB-1-fix AB-2");
        assert_eq!(report.remote, "git push origin --delete AB-1-fix AB-2");

        let text = report.to_string();
        assert!(text.starts_with(SEPARATOR));
        assert!(text.ends_with(SEPARATOR));
        assert_eq!(text.lines().filter(|line| *line == SEPARATOR).count(), 3);
    }

    #[test]
    fn renders_nothing_for_empty_list() {
        assert_eq!(DeletionReport::render(&[]), None);
    }
}
