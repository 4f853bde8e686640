use std::collections::HashSet;

/// Ordered, deduplicated work list of URLs pending a visit
///
/// The frontier is a LIFO stack with set-backed membership checks, so a URL
/// can appear at most once no matter how many pages link to it.
#[derive(Debug, Default)]
pub struct Frontier {
    stack: Vec<String>,
    members: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a URL unless it is already queued; returns whether it was added
    pub fn push(&mut self, url: String) -> bool {
        if self.members.contains(&url) {
            return false;
        }
        self.members.insert(url.clone());
        self.stack.push(url);
        true
    }

    /// Pops the most recently pushed URL
    pub fn pop(&mut self) -> Option<String> {
        let url = self.stack.pop()?;
        self.members.remove(&url);
        Some(url)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_rejects_duplicates() {
        let mut frontier = Frontier::new();
        assert!(frontier.push("a".to_string()));
        assert!(!frontier.push("a".to_string()));
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn test_pop_order_is_lifo() {
        let mut frontier = Frontier::new();
        frontier.push("a".to_string());
        frontier.push("b".to_string());
        assert_eq!(frontier.pop().as_deref(), Some("b"));
        assert_eq!(frontier.pop().as_deref(), Some("a"));
        assert!(frontier.pop().is_none());
    }

    #[test]
    fn test_pop_releases_membership() {
        let mut frontier = Frontier::new();
        frontier.push("a".to_string());
        frontier.pop();
        // Re-queueing after a pop is the session's job to prevent, not the
        // frontier's.
        assert!(frontier.push("a".to_string()));
    }
}
