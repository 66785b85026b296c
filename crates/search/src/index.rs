//! Four-level keyword index
//!
//! This module provides:
//! - KeywordIndex: pure ligature → ligature → pure keyword → keyword → keys
//! - Incremental add/remove with cascading pruning
//! - Diff-based re-indexing (only changed keywords are touched)
//! - Bulk build from many records
//! - MatchSets: the four nested key sets a query keyword reaches
//!
//! # Structure
//!
//! ```text
//! "kh"                      pure ligature (level 0)
//!  └─ "kh"                  ligature (level 1)
//!      └─ "khach"           pure keyword (level 2)
//!          ├─ "khách" {1,2} keyword (level 3) → keys
//!          └─ "khach" {3}
//! ```
//!
//! # Invariants
//!
//! - A key sits at a leaf iff that exact keyword was extracted from the key's
//!   current text.
//! - No empty leaf or branch persists.
//! - Every branch's `postings` equals the number of (key, leaf) memberships
//!   beneath it, so emptiness and size checks are O(1).

use crate::tokenizer::Keyword;
use rustc_hash::{FxHashMap, FxHashSet};
use vnsearch_core::TextKey;

/// Keys stored at one keyword leaf
pub type Postings = FxHashSet<TextKey>;

// ============================================================================
// Branch
// ============================================================================

/// Interior node with an incrementally maintained posting counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch<T> {
    children: FxHashMap<String, T>,
    postings: usize,
}

impl<T> Default for Branch<T> {
    fn default() -> Self {
        Branch {
            children: FxHashMap::default(),
            postings: 0,
        }
    }
}

impl<T> Branch<T> {
    /// Child node by label
    pub fn child(&self, label: &str) -> Option<&T> {
        self.children.get(label)
    }

    /// Number of (key, leaf) memberships beneath this node
    pub fn postings(&self) -> usize {
        self.postings
    }
}

/// Level 2 node: keyword spellings sharing one pure keyword
pub type SpellingBranch = Branch<Postings>;
/// Level 1 node: pure keywords sharing one ligature
pub type WordBranch = Branch<SpellingBranch>;
/// Level 0 node: ligatures sharing one pure ligature
pub type LigatureBranch = Branch<WordBranch>;

/// Shared walk operations over every node level
trait Node {
    fn collect_keys<'a>(&'a self, out: &mut FxHashSet<&'a TextKey>);
    fn leaf_paths(&self) -> usize;
    fn posting_count(&self) -> usize;
    fn is_well_formed(&self) -> bool;
}

impl Node for Postings {
    fn collect_keys<'a>(&'a self, out: &mut FxHashSet<&'a TextKey>) {
        out.extend(self.iter());
    }

    fn leaf_paths(&self) -> usize {
        1
    }

    fn posting_count(&self) -> usize {
        self.len()
    }

    fn is_well_formed(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Node> Node for Branch<T> {
    fn collect_keys<'a>(&'a self, out: &mut FxHashSet<&'a TextKey>) {
        for child in self.children.values() {
            child.collect_keys(out);
        }
    }

    fn leaf_paths(&self) -> usize {
        self.children.values().map(Node::leaf_paths).sum()
    }

    fn posting_count(&self) -> usize {
        self.postings
    }

    fn is_well_formed(&self) -> bool {
        !self.children.is_empty()
            && self.children.values().all(Node::is_well_formed)
            && self.postings == self.children.values().map(Node::posting_count).sum::<usize>()
    }
}

fn keys_under<T: Node>(node: &T) -> FxHashSet<&TextKey> {
    let mut out = FxHashSet::default();
    node.collect_keys(&mut out);
    out
}

// ============================================================================
// MatchSets
// ============================================================================

/// Keys reachable from one query keyword at each index level
///
/// By construction `l3 ⊆ l2 ⊆ l1 ⊆ l0`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSets<'a> {
    /// Same pure ligature class (any accent, any spelling)
    pub l0: FxHashSet<&'a TextKey>,
    /// Same ligature class, accent-exact
    pub l1: FxHashSet<&'a TextKey>,
    /// Same keyword ignoring accents
    pub l2: FxHashSet<&'a TextKey>,
    /// Exact keyword
    pub l3: FxHashSet<&'a TextKey>,
}

impl MatchSets<'_> {
    /// True if no key matched at any level
    pub fn is_empty(&self) -> bool {
        self.l0.is_empty()
    }
}

// ============================================================================
// KeywordDiff
// ============================================================================

/// Keywords lost and gained between two versions of a record's text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordDiff {
    /// In old, not in new
    pub removed: Vec<Keyword>,
    /// In new, not in old
    pub added: Vec<Keyword>,
}

impl KeywordDiff {
    /// True if both versions have the same keyword set
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Exact-string set difference in both directions, preserving input order
pub fn diff_keywords(old: &[Keyword], new: &[Keyword]) -> KeywordDiff {
    let old_set: FxHashSet<&str> = old.iter().map(|k| k.text.as_str()).collect();
    let new_set: FxHashSet<&str> = new.iter().map(|k| k.text.as_str()).collect();

    KeywordDiff {
        removed: old
            .iter()
            .filter(|k| !new_set.contains(k.text.as_str()))
            .cloned()
            .collect(),
        added: new
            .iter()
            .filter(|k| !old_set.contains(k.text.as_str()))
            .cloned()
            .collect(),
    }
}

// ============================================================================
// BulkBuild
// ============================================================================

/// Outcome of [`KeywordIndex::bulk_build`]
#[derive(Debug, Clone, Default)]
pub struct BulkBuild {
    /// The built (or extended) index
    pub index: KeywordIndex,
    /// Records that contributed at least one keyword
    pub indexed: usize,
    /// Records skipped because they yielded no keywords
    pub skipped: Vec<TextKey>,
}

// ============================================================================
// KeywordIndex
// ============================================================================

/// Four-level inverted index from keyword forms to record keys
///
/// The index knows nothing about record text; callers pass the keywords
/// extracted from it. Keeping the old keyword list consistent with what was
/// indexed is the caller's job (see the engine's dictionary).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordIndex {
    roots: FxHashMap<String, LigatureBranch>,
    postings: usize,
}

impl KeywordIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no key is indexed
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total (key, keyword) memberships, from the maintained counter
    pub fn postings(&self) -> usize {
        self.postings
    }

    /// Number of distinct keyword leaves, counted by walking the tree
    pub fn leaf_paths(&self) -> usize {
        self.roots.values().map(Node::leaf_paths).sum()
    }

    /// Number of level-0 branches
    pub fn sound_classes(&self) -> usize {
        self.roots.len()
    }

    /// Level-0 branch by pure ligature class
    pub fn branch(&self, pure_ligature: &str) -> Option<&LigatureBranch> {
        self.roots.get(pure_ligature)
    }

    /// Check counters against a full walk and that no empty node exists
    pub fn is_well_formed(&self) -> bool {
        self.roots.values().all(Node::is_well_formed)
            && self.postings == self.roots.values().map(Node::posting_count).sum::<usize>()
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.roots.clear();
        self.postings = 0;
    }

    /// True if `key` is stored at the leaf of `keyword`
    pub fn contains(&self, key: &TextKey, keyword: &Keyword) -> bool {
        self.leaf(keyword).is_some_and(|keys| keys.contains(key))
    }

    fn leaf(&self, keyword: &Keyword) -> Option<&Postings> {
        self.roots
            .get(&keyword.pure_ligature)?
            .children
            .get(&keyword.ligature)?
            .children
            .get(&keyword.pure)?
            .children
            .get(&keyword.text)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert `key` at one keyword leaf, creating the path on demand
    ///
    /// Returns false if the key was already there (no-op).
    pub fn insert(&mut self, key: &TextKey, keyword: &Keyword) -> bool {
        let ligatures = self.roots.entry(keyword.pure_ligature.clone()).or_default();
        let words = ligatures.children.entry(keyword.ligature.clone()).or_default();
        let spellings = words.children.entry(keyword.pure.clone()).or_default();
        let keys = spellings.children.entry(keyword.text.clone()).or_default();

        if !keys.insert(key.clone()) {
            return false;
        }
        spellings.postings += 1;
        words.postings += 1;
        ligatures.postings += 1;
        self.postings += 1;
        true
    }

    /// Remove `key` from one keyword leaf, pruning every node left empty
    ///
    /// Returns false if the path or the key was absent (no-op).
    pub fn remove(&mut self, key: &TextKey, keyword: &Keyword) -> bool {
        let Some(ligatures) = self.roots.get_mut(&keyword.pure_ligature) else {
            return false;
        };
        let Some(words) = ligatures.children.get_mut(&keyword.ligature) else {
            return false;
        };
        let Some(spellings) = words.children.get_mut(&keyword.pure) else {
            return false;
        };
        let Some(keys) = spellings.children.get_mut(&keyword.text) else {
            return false;
        };
        if !keys.remove(key) {
            return false;
        }

        if keys.is_empty() {
            spellings.children.remove(&keyword.text);
        }
        spellings.postings -= 1;

        if spellings.children.is_empty() {
            words.children.remove(&keyword.pure);
        }
        words.postings -= 1;

        if words.children.is_empty() {
            ligatures.children.remove(&keyword.ligature);
        }
        ligatures.postings -= 1;

        if ligatures.children.is_empty() {
            self.roots.remove(&keyword.pure_ligature);
        }
        self.postings -= 1;
        true
    }

    /// Index `key` under every keyword; returns how many leaves gained it
    pub fn add_contribution(&mut self, key: &TextKey, keywords: &[Keyword]) -> usize {
        keywords.iter().filter(|kw| self.insert(key, kw)).count()
    }

    /// Unindex `key` from every keyword; returns how many leaves lost it
    pub fn remove_contribution(&mut self, key: &TextKey, keywords: &[Keyword]) -> usize {
        keywords.iter().filter(|kw| self.remove(key, kw)).count()
    }

    /// Re-index `key` from `old` to `new` keywords, touching only the
    /// difference
    pub fn apply_diff(&mut self, key: &TextKey, old: &[Keyword], new: &[Keyword]) -> KeywordDiff {
        let diff = diff_keywords(old, new);
        if !diff.removed.is_empty() {
            self.remove_contribution(key, &diff.removed);
        }
        if !diff.added.is_empty() {
            self.add_contribution(key, &diff.added);
        }
        diff
    }

    /// Build (or extend `existing`) from many records in one pass
    ///
    /// Records with no keywords are skipped and reported, never an error.
    pub fn bulk_build<I>(entries: I, existing: Option<KeywordIndex>) -> BulkBuild
    where
        I: IntoIterator<Item = (TextKey, Vec<Keyword>)>,
    {
        let mut index = existing.unwrap_or_default();
        let mut indexed = 0;
        let mut skipped = Vec::new();

        for (key, keywords) in entries {
            if keywords.is_empty() {
                skipped.push(key);
                continue;
            }
            index.add_contribution(&key, &keywords);
            indexed += 1;
        }

        tracing::debug!(
            target: "vnsearch::index",
            indexed,
            skipped = skipped.len(),
            leaves = index.leaf_paths(),
            "Bulk build finished"
        );

        BulkBuild {
            index,
            indexed,
            skipped,
        }
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Collect the four nested key sets reachable from `keyword`
    pub fn match_sets(&self, keyword: &Keyword) -> MatchSets<'_> {
        let mut sets = MatchSets::default();

        let Some(ligatures) = self.roots.get(&keyword.pure_ligature) else {
            return sets;
        };
        sets.l0 = keys_under(ligatures);

        let Some(words) = ligatures.children.get(&keyword.ligature) else {
            return sets;
        };
        sets.l1 = keys_under(words);

        let Some(spellings) = words.children.get(&keyword.pure) else {
            return sets;
        };
        sets.l2 = keys_under(spellings);

        if let Some(keys) = spellings.children.get(&keyword.text) {
            sets.l3 = keys.iter().collect();
        }
        sets
    }
}
