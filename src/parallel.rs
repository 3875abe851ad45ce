//! Batch traversal and order-preserving parallel mapping.
//!
//! `parallel_map` fans work out over scoped threads and returns results in
//! input order. Small batches stay sequential: thread startup costs more
//! than the work. Mid-sized batches are split into one contiguous block
//! per worker; large batches switch to dynamic block claiming so a few
//! slow items cannot strand a whole block on one thread.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crate::dom::{Document, NodeId, Selector};

/// Below this many items the map runs on the calling thread.
const PARALLEL_THRESHOLD: usize = 32;

/// Above this many items workers claim fixed-size blocks dynamically
/// instead of pre-partitioned contiguous ranges.
const STATIC_PARTITION_MAX: usize = 4096;

/// Block size for dynamic claiming.
const CLAIM_BLOCK: usize = 64;

/// Apply `f` to every node in `doc` matching `selector`.
///
/// The match set is snapshotted before the first call, so `f` may mutate
/// the tree freely; nodes detached by an earlier call are skipped.
pub fn for_each_match<F>(doc: &mut Document, selector: &str, mut f: F)
where
    F: FnMut(&mut Document, NodeId),
{
    let matches = doc.select(doc.html(), selector);
    for node in matches {
        if attached(doc, node) {
            f(doc, node);
        }
    }
}

/// A selector paired with the action to run on its matches.
pub struct BatchRule<'a> {
    selector: Selector,
    action: Box<dyn FnMut(&mut Document, NodeId) + 'a>,
}

impl<'a> BatchRule<'a> {
    /// Returns `None` when the selector does not parse.
    #[must_use]
    pub fn new<F>(selector: &str, action: F) -> Option<Self>
    where
        F: FnMut(&mut Document, NodeId) + 'a,
    {
        Some(Self {
            selector: Selector::parse(selector)?,
            action: Box::new(action),
        })
    }
}

/// Apply a batch of selector/action rules in one document-order traversal
/// instead of one traversal per selector.
///
/// Every rule whose selector matches a node fires on it, in rule order.
/// The traversal order is snapshotted up front; nodes detached by earlier
/// actions are skipped.
pub fn batch_apply(doc: &mut Document, rules: &mut [BatchRule<'_>]) {
    let root = doc.html();
    let nodes = doc.descendants(root);
    for node in nodes {
        for rule in rules.iter_mut() {
            if attached(doc, node) && rule.selector.matches(doc, root, node) {
                (rule.action)(doc, node);
            }
        }
    }
}

/// Whether a node is still reachable from the document root.
fn attached(doc: &Document, mut id: NodeId) -> bool {
    loop {
        if id == doc.html() {
            return true;
        }
        match doc.parent(id) {
            Some(parent) => id = parent,
            None => return false,
        }
    }
}

/// Map `f` over `items`, possibly in parallel, preserving input order.
///
/// The output at position `i` is always `f(&items[i])` regardless of which
/// thread computed it.
pub fn parallel_map<T, U, F>(items: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync,
{
    if items.len() < PARALLEL_THRESHOLD {
        return items.iter().map(f).collect();
    }

    let workers = thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
        .min(items.len());
    if workers <= 1 {
        return items.iter().map(f).collect();
    }

    let block = if items.len() <= STATIC_PARTITION_MAX {
        items.len().div_ceil(workers)
    } else {
        CLAIM_BLOCK
    };

    let next = AtomicUsize::new(0);
    let mut indexed: Vec<(usize, U)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                scope.spawn(|| {
                    let mut local: Vec<(usize, U)> = Vec::new();
                    loop {
                        let start = next.fetch_add(block, Ordering::Relaxed);
                        if start >= items.len() {
                            break;
                        }
                        let end = (start + block).min(items.len());
                        for (i, item) in items[start..end].iter().enumerate() {
                            local.push((start + i, f(item)));
                        }
                    }
                    local
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| match h.join() {
                Ok(local) => local,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    indexed.sort_unstable_by_key(|(i, _)| *i);
    indexed.into_iter().map(|(_, u)| u).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn small_batches_run_sequentially_in_order() {
        let items: Vec<u32> = (0..10).collect();
        let out = parallel_map(&items, |x| x * 2);
        assert_eq!(out, (0..10).map(|x| x * 2).collect::<Vec<_>>());
    }

    #[test]
    fn mid_sized_batches_preserve_order() {
        let items: Vec<u32> = (0..1000).collect();
        let out = parallel_map(&items, |x| x + 1);
        assert_eq!(out, (1..=1000).collect::<Vec<_>>());
    }

    #[test]
    fn large_batches_preserve_order() {
        let items: Vec<usize> = (0..10_000).collect();
        let out = parallel_map(&items, |x| x * x);
        for (i, v) in out.iter().enumerate() {
            assert_eq!(*v, i * i);
        }
    }

    #[test]
    fn parallel_equals_sequential() {
        let items: Vec<String> = (0..500).map(|i| format!("item {i}")).collect();
        let sequential: Vec<usize> = items.iter().map(String::len).collect();
        let parallel: Vec<usize> = parallel_map(&items, |s| s.len());
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn every_item_is_visited_exactly_once() {
        let counter = AtomicUsize::new(0);
        let items: Vec<u32> = (0..5000).collect();
        let _ = parallel_map(&items, |_| counter.fetch_add(1, Ordering::Relaxed));
        assert_eq!(counter.load(Ordering::Relaxed), 5000);
    }

    #[test]
    fn for_each_match_visits_all_matches() {
        #[allow(clippy::unwrap_used)]
        let mut doc = Document::parse("<p>a</p><div><p>b</p></div><p>c</p>").unwrap();
        let mut seen = Vec::new();
        for_each_match(&mut doc, "p", |doc, node| {
            seen.push(doc.text(node));
        });
        assert_eq!(seen, vec!["a", "b", "c"]);
    }

    #[test]
    fn batch_apply_fires_every_matching_rule_in_one_pass() {
        #[allow(clippy::unwrap_used)]
        let mut doc = Document::parse(
            r#"<p class="x">a</p><div>b</div><p>c</p>"#,
        )
        .unwrap();
        let mut paragraphs = 0;
        let mut classed = 0;
        {
            #[allow(clippy::unwrap_used)]
            let mut rules = vec![
                BatchRule::new("p", |_, _| paragraphs += 1).unwrap(),
                BatchRule::new(".x", |_, _| classed += 1).unwrap(),
            ];
            batch_apply(&mut doc, &mut rules);
        }
        assert_eq!(paragraphs, 2);
        assert_eq!(classed, 1);
    }

    #[test]
    fn for_each_match_skips_nodes_detached_by_earlier_calls() {
        #[allow(clippy::unwrap_used)]
        let mut doc = Document::parse("<div><p>a</p></div><p>b</p>").unwrap();
        for_each_match(&mut doc, "div, p", |doc, node| {
            // Removing the div detaches the first paragraph before its turn.
            doc.remove(node);
        });
        // Only the div and the top-level paragraph were actually removed.
        assert!(doc.select(doc.body(), "p").is_empty());
    }
}
