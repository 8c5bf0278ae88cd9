use serde::{Deserialize, Serialize};

/// Result of adding a domain to the block-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// Ordered list of blocked domains, persisted as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockList {
    domains: Vec<String>,
}

impl BlockList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a list exactly as given. Used for imports, which are applied
    /// wholesale without per-entry validation.
    pub fn from_raw(domains: Vec<String>) -> Self {
        Self { domains }
    }

    /// Append a domain unless it is already listed.
    pub fn add(&mut self, domain: &str) -> AddOutcome {
        if self.contains(domain) {
            return AddOutcome::AlreadyPresent;
        }
        self.domains.push(domain.to_string());
        AddOutcome::Added
    }

    /// Remove every entry equal to `domain`. Returns whether anything was removed.
    pub fn remove(&mut self, domain: &str) -> bool {
        let before = self.domains.len();
        self.domains.retain(|d| d != domain);
        self.domains.len() != before
    }

    /// Exact host match, as the extension compares hostnames.
    pub fn contains(&self, host: &str) -> bool {
        self.domains.iter().any(|d| d == host)
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn into_domains(self) -> Vec<String> {
        self.domains
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_contains() {
        let mut list = BlockList::new();
        assert!(list.is_empty());

        assert_eq!(list.add("x.com"), AddOutcome::Added);
        assert!(list.contains("x.com"));
        assert!(!list.contains("www.x.com"));
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut list = BlockList::new();
        list.add("x.com");
        assert_eq!(list.add("x.com"), AddOutcome::AlreadyPresent);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut list = BlockList::from_raw(vec!["a.com".into(), "b.com".into()]);
        assert!(list.remove("a.com"));
        assert!(!list.remove("a.com"));
        assert_eq!(list.domains(), ["b.com".to_string()]);
    }

    #[test]
    fn test_serializes_as_array_in_order() {
        let list = BlockList::from_raw(vec!["b.com".into(), "a.com".into()]);
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, r#"["b.com","a.com"]"#);

        let back: BlockList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }
}
