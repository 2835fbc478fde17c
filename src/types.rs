use std::collections::btree_set;
use std::collections::BTreeSet;

/// Role of an input list in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Base64-encoded GFWList; must yield at least one root domain
    Primary,
    /// Bundled extension list (plain text)
    Extension,
    /// User-supplied list (plain text)
    User,
}

impl SourceKind {
    /// Whether raw bytes of this kind are base64-encoded
    pub fn is_encoded(&self) -> bool {
        matches!(self, SourceKind::Primary)
    }
}

/// An input list to be fetched and normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSource {
    /// Local path or URL
    pub location: String,
    /// Role of the list
    pub kind: SourceKind,
}

impl ListSource {
    pub fn new(location: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            location: location.into(),
            kind,
        }
    }

    pub fn primary(location: impl Into<String>) -> Self {
        Self::new(location, SourceKind::Primary)
    }

    pub fn extension(location: impl Into<String>) -> Self {
        Self::new(location, SourceKind::Extension)
    }

    pub fn user(location: impl Into<String>) -> Self {
        Self::new(location, SourceKind::User)
    }
}

/// Classification of a single rule line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleLine {
    /// `! Last Modified: ...` annotation
    UpdateTime(String),
    /// `!` comment
    Comment,
    /// Blank line
    Empty,
    /// `@@||` whitelist rule
    Whitelist,
    /// Candidate host, prefix already stripped
    Token(String),
}

/// Output of the rule parser for one list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedList {
    /// Host tokens in input order
    pub tokens: Vec<String>,
    /// Value of the last `Last Modified` annotation seen
    pub update_time: Option<String>,
    /// Number of lines accepted as tokens
    pub accepted: usize,
}

/// Set of unique root domains.
///
/// Iterates in sorted order so rendered output is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootDomainSet {
    domains: BTreeSet<String>,
}

impl RootDomainSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a root domain. Returns false if it was already present.
    pub fn insert(&mut self, domain: impl Into<String>) -> bool {
        self.domains.insert(domain.into())
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.domains.iter()
    }
}

impl<'a> IntoIterator for &'a RootDomainSet {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.domains.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for RootDomainSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = RootDomainSet::new();
        for domain in iter {
            set.insert(domain);
        }
        set
    }
}

/// Per-source result handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    source: String,
    update_time: Option<String>,
    root_domains: RootDomainSet,
}

impl SourceRecord {
    pub fn new(source: impl Into<String>, update_time: Option<String>, root_domains: RootDomainSet) -> Self {
        Self {
            source: source.into(),
            update_time,
            root_domains,
        }
    }

    /// Location the list was read from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Update time announced by the list, if any
    pub fn update_time(&self) -> Option<&str> {
        self.update_time.as_deref()
    }

    /// Number of distinct root domains
    pub fn root_domain_count(&self) -> usize {
        self.root_domains.len()
    }

    pub fn root_domains(&self) -> &RootDomainSet {
        &self.root_domains
    }
}
