//! Configuration options for simplification and scoring.
//!
//! The `Options` struct enumerates the pipeline stages to enable, each
//! independently toggleable. Disabling an earlier stage that a later one
//! depends on is permitted but may leave artifacts (enabling break
//! insertion without empty-node removal can retain stray empty
//! paragraphs); that is the caller's responsibility and is not validated.

use serde::{Deserialize, Serialize};

/// Pipeline stage toggles and tuning knobs.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for the canonical minimal-HTML output.
///
/// # Example
///
/// ```rust
/// use rs_readable::Options;
///
/// let options = Options {
///     add_content_digests: true,
///     add_node_indexes: true,
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Stamp `data-content-digest` on digestible nodes.
    ///
    /// Default: `false`
    pub add_content_digests: bool,

    /// Stamp `data-node-index` dot paths on every element.
    ///
    /// Default: `false`
    pub add_node_indexes: bool,

    /// Remove blacklisted elements (forms, media, scripting, navigation)
    /// and subtrees whose link density exceeds the pruning threshold.
    ///
    /// Default: `true`
    pub remove_blacklist: bool,

    /// Unwrap inline/formatting elements, keeping their children.
    ///
    /// Default: `true`
    pub unwrap_elements: bool,

    /// Transform `<q>`/`<sub>`/`<sup>` into plain-text equivalents.
    ///
    /// Default: `true`
    pub process_special: bool,

    /// Consolidate adjacent text nodes into single text nodes.
    ///
    /// Default: `true`
    pub consolidate_text: bool,

    /// Remove nodes that are empty after normalization, to a fixpoint.
    ///
    /// Default: `true`
    pub remove_empty: bool,

    /// Split paragraphs around block elements illegally nested in them.
    ///
    /// Default: `true`
    pub unnest_paragraphs: bool,

    /// Convert `<br>`/`<hr>` runs into paragraph breaks.
    ///
    /// Default: `true`
    pub insert_breaks: bool,

    /// Wrap bare text that is a direct child of a block container in `<p>`.
    ///
    /// Default: `true`
    pub wrap_bare_text: bool,

    /// Scoring constants. The defaults reproduce reference behavior; they
    /// are empirically tuned, not derived.
    pub weights: ScoringWeights,

    /// Minimum characters of text for a `div`/`section` to qualify in the
    /// locator's full-scan fallback tier.
    ///
    /// Default: `100`
    pub fallback_min_text_len: usize,

    /// Link-density bound above which a subtree is pruned as boilerplate.
    ///
    /// Default: `0.5`
    pub max_link_density: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            add_content_digests: false,
            add_node_indexes: false,
            remove_blacklist: true,
            unwrap_elements: true,
            process_special: true,
            consolidate_text: true,
            remove_empty: true,
            unnest_paragraphs: true,
            insert_breaks: true,
            wrap_bare_text: true,
            weights: ScoringWeights::default(),
            fallback_min_text_len: 100,
            max_link_density: 0.5,
        }
    }
}

/// Weights combined into the content score.
///
/// These reproduce the reference ranking; change them only with a corpus
/// to validate against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Multiplier for text/HTML ratio. Default: `50.0`
    pub text_density: f64,
    /// Multiplier for paragraph density. Default: `20.0`
    pub paragraph_density: f64,
    /// Multiplier for sentence density. Default: `15.0`
    pub sentence_density: f64,
    /// Multiplier for word density. Default: `15.0`
    pub word_density: f64,
    /// Multiplier for heading density. Default: `10.0`
    pub heading_density: f64,
    /// Multiplier for list density. Default: `5.0`
    pub list_density: f64,
    /// Multiplier for image density. Default: `3.0`
    pub image_density: f64,
    /// Boost added when the id matches a content keyword. Default: `5.0`
    pub id_keyword_boost: f64,
    /// Boost added when the class matches a content keyword. Default: `3.0`
    pub class_keyword_boost: f64,
    /// Multiplier applied on a non-content keyword match. Default: `0.5`
    pub non_content_penalty: f64,
    /// Bonus per direct `<p>` child. Default: `5.0`
    pub paragraph_child_bonus: f64,
    /// Bonus per figure containing both an image and a figcaption.
    /// Default: `10.0`
    pub figure_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            text_density: 50.0,
            paragraph_density: 20.0,
            sentence_density: 15.0,
            word_density: 15.0,
            heading_density: 10.0,
            list_density: 5.0,
            image_density: 3.0,
            id_keyword_boost: 5.0,
            class_keyword_boost: 3.0,
            non_content_penalty: 0.5,
            paragraph_child_bonus: 5.0,
            figure_bonus: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_all_transform_stages() {
        let opts = Options::default();
        assert!(opts.remove_blacklist);
        assert!(opts.unwrap_elements);
        assert!(opts.process_special);
        assert!(opts.consolidate_text);
        assert!(opts.remove_empty);
        assert!(opts.unnest_paragraphs);
        assert!(opts.insert_breaks);
        assert!(opts.wrap_bare_text);
    }

    #[test]
    fn default_disables_annotation_stages() {
        let opts = Options::default();
        assert!(!opts.add_content_digests);
        assert!(!opts.add_node_indexes);
    }

    #[test]
    fn default_thresholds() {
        let opts = Options::default();
        assert_eq!(opts.fallback_min_text_len, 100);
        assert!((opts.max_link_density - 0.5).abs() < f64::EPSILON);
        assert!((opts.weights.text_density - 50.0).abs() < f64::EPSILON);
        assert!((opts.weights.paragraph_density - 20.0).abs() < f64::EPSILON);
        assert!((opts.weights.sentence_density - 15.0).abs() < f64::EPSILON);
        assert!((opts.weights.word_density - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stage_toggles_are_independent() {
        let opts = Options {
            insert_breaks: false,
            remove_empty: false,
            ..Options::default()
        };
        assert!(!opts.insert_breaks);
        assert!(!opts.remove_empty);
        assert!(opts.unnest_paragraphs);
    }
}
