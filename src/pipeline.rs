//! Transform pipeline: ordered application of filter/map/sort operations
//! over a file trie.
//!
//! Rules are declarative enums with a `Custom` escape hatch holding a
//! strategy closure. Declarative variants serialize into the hydration
//! payload; custom strategies are described opaquely so the client knows
//! to re-register a pre-compiled strategy instead of re-deriving it.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Peekable;
use std::sync::Arc;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{ExplorerError, Result};
use crate::trie::{FileTrieNode, MapTarget};

/// Predicate strategy for filter steps.
pub type FilterFn = Arc<dyn Fn(&FileTrieNode) -> bool + Send + Sync>;
/// Mutation strategy for map steps.
pub type MapFn = Arc<dyn Fn(&mut MapTarget<'_>) + Send + Sync>;
/// Comparator strategy for sort steps.
pub type SortFn = Arc<dyn Fn(&FileTrieNode, &FileTrieNode) -> Ordering + Send + Sync>;

/// A transform operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Filter,
    Map,
    Sort,
}

impl OpKind {
    /// Parse an operation name from configuration.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "filter" => Ok(OpKind::Filter),
            "map" => Ok(OpKind::Map),
            "sort" => Ok(OpKind::Sort),
            other => Err(ExplorerError::Configuration(format!(
                "unknown transform operation `{other}`"
            ))),
        }
    }

    /// Parse a full order list, failing fast on any unknown kind.
    pub fn parse_order(names: &[String]) -> Result<Vec<Self>> {
        names.iter().map(|n| Self::parse(n)).collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Filter => "filter",
            OpKind::Map => "map",
            OpKind::Sort => "sort",
        }
    }
}

/// Filter rule: which nodes survive a filter step.
#[derive(Clone)]
pub enum FilterRule {
    /// Keep everything.
    All,
    /// Drop nodes whose slug segment is in the list.
    ExcludeSegments(Vec<String>),
    /// Keep nodes carrying at least one of the listed tags.
    RequireTags(Vec<String>),
    /// Keep nodes whose display name fuzzy-matches the pattern.
    Fuzzy(String),
    /// Pre-compiled strategy object.
    Custom(FilterFn),
}

impl FilterRule {
    fn accepts(&self, node: &FileTrieNode, matcher: &SkimMatcherV2) -> bool {
        match self {
            FilterRule::All => true,
            FilterRule::ExcludeSegments(segments) => {
                !segments.iter().any(|s| s == node.slug_segment())
            }
            FilterRule::RequireTags(tags) => tags.iter().any(|t| node.meta.tags.contains(t)),
            FilterRule::Fuzzy(pattern) => {
                matcher.fuzzy_match(&node.display_name, pattern).is_some()
            }
            FilterRule::Custom(f) => f(node),
        }
    }

    /// Declarative description for the hydration payload.
    pub fn describe(&self) -> Value {
        match self {
            FilterRule::All => json!({"kind": "all"}),
            FilterRule::ExcludeSegments(segments) => {
                json!({"kind": "exclude-segments", "segments": segments})
            }
            FilterRule::RequireTags(tags) => json!({"kind": "require-tags", "tags": tags}),
            FilterRule::Fuzzy(pattern) => json!({"kind": "fuzzy", "pattern": pattern}),
            FilterRule::Custom(_) => json!({"kind": "custom"}),
        }
    }
}

impl fmt::Debug for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FilterRule({})", self.describe())
    }
}

/// Map rule: metadata mutation applied to every node pre-order.
#[derive(Clone)]
pub enum MapRule {
    Identity,
    /// Cut the trailing extension from file display names.
    StripExtension,
    Custom(MapFn),
}

impl MapRule {
    fn apply(&self, target: &mut MapTarget<'_>) {
        match self {
            MapRule::Identity => {}
            MapRule::StripExtension => {
                if !target.is_folder() {
                    if let Some(dot) = target.display_name.rfind('.') {
                        if dot > 0 {
                            target.display_name.truncate(dot);
                        }
                    }
                }
            }
            MapRule::Custom(f) => f(target),
        }
    }

    pub fn describe(&self) -> Value {
        match self {
            MapRule::Identity => json!({"kind": "identity"}),
            MapRule::StripExtension => json!({"kind": "strip-extension"}),
            MapRule::Custom(_) => json!({"kind": "custom"}),
        }
    }
}

impl fmt::Debug for MapRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MapRule({})", self.describe())
    }
}

/// Sort rule: comparator for each folder's direct children.
#[derive(Clone)]
pub enum SortRule {
    /// Folders before files, then natural-order display names.
    FoldersFirstAlphabetical,
    /// Natural-order display names regardless of kind.
    Alphabetical,
    Custom(SortFn),
}

impl SortRule {
    fn compare(&self, a: &FileTrieNode, b: &FileTrieNode) -> Ordering {
        match self {
            SortRule::FoldersFirstAlphabetical => b
                .is_folder()
                .cmp(&a.is_folder())
                .then_with(|| natural_cmp(&a.display_name, &b.display_name)),
            SortRule::Alphabetical => natural_cmp(&a.display_name, &b.display_name),
            SortRule::Custom(f) => f(a, b),
        }
    }

    pub fn describe(&self) -> Value {
        match self {
            SortRule::FoldersFirstAlphabetical => json!({"kind": "folders-first-alphabetical"}),
            SortRule::Alphabetical => json!({"kind": "alphabetical"}),
            SortRule::Custom(_) => json!({"kind": "custom"}),
        }
    }
}

impl fmt::Debug for SortRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SortRule({})", self.describe())
    }
}

/// Case-insensitive comparison with numeric collation, so that
/// "page2" sorts before "page10".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    fn take_digits<I: Iterator<Item = char>>(it: &mut Peekable<I>) -> String {
        let mut run = String::new();
        while let Some(c) = it.peek() {
            if c.is_ascii_digit() {
                run.push(*c);
                it.next();
            } else {
                break;
            }
        }
        run
    }

    let mut ai = a.chars().flat_map(char::to_lowercase).peekable();
    let mut bi = b.chars().flat_map(char::to_lowercase).peekable();
    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let run_a = take_digits(&mut ai);
                let run_b = take_digits(&mut bi);
                let num_a = run_a.trim_start_matches('0');
                let num_b = run_b.trim_start_matches('0');
                let ord = num_a
                    .len()
                    .cmp(&num_b.len())
                    .then_with(|| num_a.cmp(num_b));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                ai.next();
                bi.next();
            }
        }
    }
}

/// The full transform specification: operation order plus one rule per
/// operation kind.
#[derive(Debug, Clone)]
pub struct TransformSpec {
    pub order: Vec<OpKind>,
    pub filter: FilterRule,
    pub map: MapRule,
    pub sort: SortRule,
}

impl Default for TransformSpec {
    fn default() -> Self {
        Self {
            order: vec![OpKind::Filter, OpKind::Map, OpKind::Sort],
            filter: FilterRule::ExcludeSegments(vec!["tags".to_string()]),
            map: MapRule::Identity,
            sort: SortRule::FoldersFirstAlphabetical,
        }
    }
}

impl TransformSpec {
    /// A no-op pass: all operations run but none changes the tree.
    pub fn identity() -> Self {
        Self {
            order: vec![OpKind::Filter, OpKind::Map, OpKind::Sort],
            filter: FilterRule::All,
            map: MapRule::Identity,
            sort: SortRule::Custom(Arc::new(|_, _| Ordering::Equal)),
        }
    }

    /// Declarative description for the hydration payload.
    pub fn describe(&self) -> Value {
        json!({
            "order": self.order.iter().map(|op| op.as_str()).collect::<Vec<_>>(),
            "filter": self.filter.describe(),
            "map": self.map.describe(),
            "sort": self.sort.describe(),
        })
    }
}

/// Applies a [`TransformSpec`] to a trie, producing the display tree.
pub struct TransformPipeline {
    spec: TransformSpec,
    matcher: SkimMatcherV2,
}

impl TransformPipeline {
    pub fn new(spec: TransformSpec) -> Self {
        Self {
            spec,
            matcher: SkimMatcherV2::default(),
        }
    }

    pub fn spec(&self) -> &TransformSpec {
        &self.spec
    }

    /// Apply the configured operations, in order, to a deep copy of the
    /// input tree. The input is never mutated, so the same raw tree can
    /// be reused across invocations.
    pub fn apply(&self, tree: &FileTrieNode) -> FileTrieNode {
        let mut out = tree.clone();
        for op in &self.spec.order {
            debug!(op = op.as_str(), "applying transform step");
            match op {
                OpKind::Filter => {
                    out.children
                        .retain_mut(|child| Self::keep(child, &self.spec.filter, &self.matcher));
                }
                OpKind::Map => Self::map_node(&mut out, &self.spec.map),
                OpKind::Sort => Self::sort_node(&mut out, &self.spec.sort),
            }
        }
        out
    }

    /// A file survives iff it passes the predicate. A folder survives if
    /// it passes the predicate or keeps at least one descendant, checked
    /// recursively so a match deep under empty intermediate folders still
    /// retains the whole chain.
    fn keep(node: &mut FileTrieNode, rule: &FilterRule, matcher: &SkimMatcherV2) -> bool {
        if node.is_folder() {
            node.children
                .retain_mut(|child| Self::keep(child, rule, matcher));
            rule.accepts(node, matcher) || !node.children.is_empty()
        } else {
            rule.accepts(node, matcher)
        }
    }

    fn map_node(node: &mut FileTrieNode, rule: &MapRule) {
        rule.apply(&mut node.map_target());
        for child in &mut node.children {
            Self::map_node(child, rule);
        }
    }

    fn sort_node(node: &mut FileTrieNode, rule: &SortRule) {
        // Vec::sort_by is stable: equal elements keep their input order.
        node.children.sort_by(|a, b| rule.compare(a, b));
        for child in &mut node.children {
            Self::sort_node(child, rule);
        }
    }
}
