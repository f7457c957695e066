//! The ignore rules in effect at a point in the tree.

use std::sync::Arc;

use super::rules::{Rule, RuleSet};

/// A persistent list of [`RuleSet`]s, innermost directory first.
///
/// Extending a chain returns a new chain sharing its tail with the old one;
/// existing chains are never modified, so a parent's chain is unaffected by
/// anything its children add.
#[derive(Debug, Clone, Default)]
pub struct RuleChain {
    head: Option<Arc<Link>>,
}

#[derive(Debug)]
struct Link {
    rules: RuleSet,
    outer: RuleChain,
}

impl RuleChain {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A new chain with `rules` as its innermost set.
    pub fn extend(&self, rules: RuleSet) -> Self {
        Self {
            head: Some(Arc::new(Link {
                rules,
                outer: self.clone(),
            })),
        }
    }

    /// Number of rule sets in the chain.
    pub fn depth(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Rule sets from the innermost directory out to the root.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Whether any rule anywhere in the chain excludes `path`.
    pub fn matches(&self, path: &str) -> bool {
        self.first_match(path).is_some()
    }

    /// The first excluding rule, searching innermost set first.
    pub fn first_match(&self, path: &str) -> Option<(&RuleSet, &Rule)> {
        self.iter()
            .find_map(|set| set.first_match(path).map(|rule| (set, rule)))
    }
}

pub struct Iter<'a> {
    next: Option<&'a Link>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a RuleSet;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.next?;
        self.next = link.outer.head.as_deref();
        Some(&link.rules)
    }
}
