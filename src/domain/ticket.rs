use std::collections::HashSet;
use std::fmt;

/// A work item key such as `AB-123`, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TicketIdentifier(String);

impl TicketIdentifier {
    pub fn new(key: &str) -> Self {
        Self(key.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tickets returned by one tracker search, in response order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketSet {
    ordered: Vec<TicketIdentifier>,
    index: HashSet<TicketIdentifier>,
}

impl TicketSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ticket: TicketIdentifier) -> bool {
        if !self.index.insert(ticket.clone()) {
            return false;
        }
        self.ordered.push(ticket);
        true
    }

    pub fn contains(&self, ticket: &TicketIdentifier) -> bool {
        self.index.contains(ticket)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TicketIdentifier> {
        self.ordered.iter()
    }
}

impl FromIterator<TicketIdentifier> for TicketSet {
    fn from_iter<I: IntoIterator<Item = TicketIdentifier>>(iter: I) -> Self {
        let mut set = TicketSet::new();
        for ticket in iter {
            set.insert(ticket);
        }
        set
    }
}

/// Outcome of a tracker search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Count reported by the tracker; may differ from `tickets.len()`.
    pub reported_total: Option<u64>,
    pub tickets: TicketSet,
}
