//! Site-specific rewrite rules applied before content location.
//!
//! Some sites defeat generic heuristics: the article lives in a div the
//! scorer dislikes, or boilerplate masquerades as content. A rule is an
//! opaque document rewrite registered against a hostname; the engine runs
//! matching rules as a pre-pass and otherwise knows nothing about them.

use log::debug;

use crate::dom::Document;

type RuleFn = Box<dyn Fn(&mut Document) + Send + Sync>;

struct Rule {
    host: String,
    apply: RuleFn,
}

/// A registry of per-host document rewrites.
#[derive(Default)]
pub struct SiteRules {
    rules: Vec<Rule>,
}

impl SiteRules {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rewrite for `host`. The rule fires for the exact host
    /// and for any subdomain of it.
    pub fn register<F>(&mut self, host: impl Into<String>, rule: F)
    where
        F: Fn(&mut Document) + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            host: host.into().to_ascii_lowercase(),
            apply: Box::new(rule),
        });
    }

    /// Apply every rule registered for `hostname`, in registration order.
    /// Returns the number of rules that fired.
    pub fn apply(&self, doc: &mut Document, hostname: &str) -> usize {
        let hostname = hostname.to_ascii_lowercase();
        let mut fired = 0;
        for rule in &self.rules {
            if host_matches(&hostname, &rule.host) {
                debug!("applying site rule for {}", rule.host);
                (rule.apply)(doc);
                fired += 1;
            }
        }
        fired
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn host_matches(hostname: &str, rule_host: &str) -> bool {
    hostname == rule_host
        || hostname
            .strip_suffix(rule_host)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
