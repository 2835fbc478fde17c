//! Root domain reduction.
//!
//! A hostname is walked from its last label towards the front, one label at a
//! time. Once a tail matches a known public suffix, the first longer tail that
//! is not itself a public suffix is the root domain. Tails tried before any
//! match only let a multi-label suffix (`co.uk`) be found when its last label
//! (`uk`) is not listed on its own.

use crate::suffix::SuffixTable;
use crate::types::RootDomainSet;

/// Reduce one hostname to its root domain.
///
/// Returns `None` when no tail of the hostname is a public suffix, or when
/// the whole hostname is a public suffix.
pub fn root_domain(hostname: &str, suffixes: &SuffixTable) -> Option<String> {
    let labels: Vec<&str> = hostname.split('.').collect();
    let len = labels.len();
    let mut matched = false;

    for i in 0..len {
        let candidate = labels[len - i - 1..].join(".");
        if suffixes.is_public_suffix(&candidate) {
            matched = true;
        } else if matched {
            return Some(candidate);
        }
    }

    None
}

/// Reduce hostnames to the set of distinct root domains.
pub fn reduce<I, S>(hostnames: I, suffixes: &SuffixTable) -> RootDomainSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = RootDomainSet::new();
    for hostname in hostnames {
        if let Some(root) = root_domain(hostname.as_ref(), suffixes) {
            set.insert(root);
        }
    }
    set
}
