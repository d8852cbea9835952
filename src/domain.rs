//! Domain selection for conventions.
//!
//! A convention can be reachable under several virtual-site domains. It is
//! published when *any* of them matches the run's pattern, and is then written
//! under one canonical domain: the longest, with ties broken by the
//! lexically greatest. The canonical domain need not be the one that matched.

use crate::store::{ArchiveSource, StoreResult};
use crate::types::Event;
use regex::Regex;

/// The domains of a convention that passed the filter.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainSelection {
    /// Used for the output directory and template lookup.
    pub canonical: String,
    /// First domain (in source order) that matched the pattern.
    pub matched: String,
    pub all: Vec<String>,
}

/// Pick the canonical domain: max by `(length, domain)`.
pub fn canonical_domain(domains: &[String]) -> Option<&str> {
    domains
        .iter()
        .max_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
        .map(String::as_str)
}

/// Apply the pattern to a convention's domains.
///
/// Returns `None` when no domain matches (including when there are none).
pub fn select_from(domains: Vec<String>, pattern: &Regex) -> Option<DomainSelection> {
    let matched = domains.iter().find(|d| pattern.is_match(d))?.clone();
    let canonical = canonical_domain(&domains)?.to_string();
    Some(DomainSelection {
        canonical,
        matched,
        all: domains,
    })
}

/// Look up a convention's domains and select among them.
pub fn select_domain(
    source: &dyn ArchiveSource,
    convention: &Event,
    pattern: &Regex,
) -> StoreResult<Option<DomainSelection>> {
    let domains = source.domains_for_event(convention.id)?;
    Ok(select_from(domains, pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn domains(list: &[&str]) -> Vec<String> {
        list.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn canonical_prefers_longest() {
        let d = domains(&["f.example.org", "foo.example.org"]);
        assert_eq!(canonical_domain(&d), Some("foo.example.org"));
    }

    #[test]
    fn canonical_breaks_length_ties_lexically() {
        let d = domains(&["bbb.org", "ccc.org", "aaa.org"]);
        assert_eq!(canonical_domain(&d), Some("ccc.org"));
    }

    #[test]
    fn canonical_is_order_independent() {
        let mut d = domains(&["x.net", "longer.net", "other.net", "zz.net"]);
        let first = canonical_domain(&d).map(str::to_string);
        d.reverse();
        assert_eq!(canonical_domain(&d).map(str::to_string), first);
    }

    #[test]
    fn canonical_of_nothing_is_none() {
        assert_eq!(canonical_domain(&[]), None);
    }

    #[test]
    fn shorter_match_still_publishes_under_canonical() {
        let pattern = Regex::new(r"^f\.example\.org$").unwrap();
        let selection =
            select_from(domains(&["foo.example.org", "f.example.org"]), &pattern).unwrap();
        assert_eq!(selection.matched, "f.example.org");
        assert_eq!(selection.canonical, "foo.example.org");
    }

    #[test]
    fn no_match_skips() {
        let pattern = Regex::new(r"example\.com$").unwrap();
        assert!(select_from(domains(&["foo.example.org"]), &pattern).is_none());
    }

    #[test]
    fn zero_domains_never_match() {
        let pattern = Regex::new(".*").unwrap();
        assert!(select_from(Vec::new(), &pattern).is_none());
    }

    #[test]
    fn select_domain_reads_virtual_sites() {
        let source = fixture_source();
        let con = insert_event(&source, None, "Con", None, None);
        insert_virtual_site(&source, "foo.example.org", con, None);
        insert_virtual_site(&source, "f.example.org", con, None);

        let pattern = Regex::new(r"example\.org$").unwrap();
        let convention = source.conventions().unwrap().remove(0);
        let selection = select_domain(&source, &convention, &pattern)
            .unwrap()
            .unwrap();
        assert_eq!(selection.canonical, "foo.example.org");
        assert_eq!(selection.all.len(), 2);
    }
}
