//! Search coordinator: the stateful entry point of the engine
//!
//! `TextSearch` owns every partition and exposes:
//! - initialize / initialize_json (bulk build)
//! - search across selected partitions
//! - add, update and remove, single and batch
//! - partition removal and statistics
//!
//! Every mutating call validates its whole input before touching any index
//! or dictionary, so a failed call leaves the engine exactly as it was.
//!
//! Mutations take `&mut self` and searches `&self`: any number of searches
//! may share an instance, mutations are exclusive.

use crate::partition::Partition;
use crate::results::{
    AddOptions, IndexStats, InitSummary, MutationSummary, RecordError, RemoveOptions,
    SearchHit, SearchResults, UpdateOptions,
};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};
use vnsearch_core::{
    Error, PartitionName, Result, SearchConfig, SearchOptions, SortOrder, TextKey, TextRecord,
};
use vnsearch_search::{extract_keywords, merge_scores, Keyword, LevelScorer};

/// A record that passed validation, routed to its partition
struct Routed {
    partition: PartitionName,
    record: TextRecord,
}

/// A routed record with its extracted keywords
struct Prepared {
    partition: PartitionName,
    record: TextRecord,
    keywords: Vec<Keyword>,
}

/// Extract keywords for every record in parallel, keeping input order
fn prepare(routed: Vec<Routed>, fold_case: bool) -> Vec<Prepared> {
    routed
        .into_par_iter()
        .map(|r| Prepared {
            keywords: extract_keywords(&r.record.text, fold_case),
            partition: r.partition,
            record: r.record,
        })
        .collect()
}

/// In-memory Vietnamese text search engine
///
/// # Example
///
/// ```
/// use vnsearch_core::{SearchConfig, SearchOptions, TextRecord};
/// use vnsearch_engine::TextSearch;
///
/// let records = vec![
///     TextRecord::new("1", "Khách sạn Vincom"),
///     TextRecord::new("2", "Nhà hàng ABC"),
/// ];
/// let (search, summary) = TextSearch::initialize(records, SearchConfig::default()).unwrap();
/// assert_eq!(summary.indexed, 2);
///
/// let results = search.search("khach san", &SearchOptions::default()).unwrap();
/// assert_eq!(results.keys(), vec!["1"]);
/// ```
#[derive(Debug, Clone)]
pub struct TextSearch {
    config: SearchConfig,
    partitions: BTreeMap<PartitionName, Partition>,
    scorer: LevelScorer,
}

impl TextSearch {
    // ========================================================================
    // Initialization
    // ========================================================================

    /// Build an engine from records
    ///
    /// Invalid records, records routed to a partition that may not be
    /// created and later duplicates of a (partition, key) pair are reported
    /// in `InitSummary::errors`. Records yielding no keywords are reported in
    /// `InitSummary::skipped`. Neither kind is stored.
    ///
    /// # Errors
    ///
    /// `Configuration` if `config` is invalid.
    pub fn initialize(
        records: Vec<TextRecord>,
        config: SearchConfig,
    ) -> Result<(Self, InitSummary)> {
        Self::build(records.into_iter().map(Ok).collect(), config)
    }

    /// Build an engine from JSON objects, read through the configured field
    /// names
    ///
    /// Objects that cannot be read as records are reported like invalid
    /// records.
    pub fn initialize_json(
        values: &[serde_json::Value],
        config: SearchConfig,
    ) -> Result<(Self, InitSummary)> {
        let candidates = values
            .iter()
            .map(|v| TextRecord::from_json(v, &config))
            .collect();
        Self::build(candidates, config)
    }

    /// An engine with only the default partition
    pub fn empty(config: SearchConfig) -> Result<Self> {
        Self::initialize(Vec::new(), config).map(|(search, _)| search)
    }

    fn build(
        candidates: Vec<Result<TextRecord>>,
        config: SearchConfig,
    ) -> Result<(Self, InitSummary)> {
        config.validate()?;

        let mut summary = InitSummary::default();
        let mut seen: FxHashSet<(PartitionName, TextKey)> = FxHashSet::default();
        let mut routed = Vec::with_capacity(candidates.len());

        for (position, candidate) in candidates.into_iter().enumerate() {
            let key = candidate.as_ref().ok().map(|r| r.key.clone());
            let checked = candidate.and_then(|record| {
                record.validate()?;
                let partition = route_initial(&record, &config)?;
                if !seen.insert((partition.clone(), record.key.clone())) {
                    return Err(Error::duplicate_key(partition.as_str(), record.key.as_str()));
                }
                Ok(Routed { partition, record })
            });
            match checked {
                Ok(r) => routed.push(r),
                Err(error) => {
                    warn!(target: "vnsearch::engine", position, error = %error, "Record rejected");
                    summary.errors.push(RecordError {
                        position,
                        key,
                        error,
                    });
                }
            }
        }

        let mut grouped: BTreeMap<PartitionName, Vec<(TextRecord, Vec<Keyword>)>> =
            BTreeMap::new();
        grouped.insert(PartitionName::default_partition(), Vec::new());
        for p in prepare(routed, config.fold_case) {
            grouped
                .entry(p.partition)
                .or_default()
                .push((p.record, p.keywords));
        }

        let mut partitions = BTreeMap::new();
        for (name, entries) in grouped {
            let (partition, skipped) = Partition::build(name.clone(), entries);
            for key in &skipped {
                warn!(
                    target: "vnsearch::engine",
                    partition = %name,
                    key = %key,
                    "Record has no keywords, skipped"
                );
            }
            summary.indexed += partition.len();
            summary.skipped.extend(skipped);
            partitions.insert(name, partition);
        }
        summary.partitions = partitions.len();

        info!(
            target: "vnsearch::engine",
            indexed = summary.indexed,
            partitions = summary.partitions,
            skipped = summary.skipped.len(),
            errors = summary.errors.len(),
            "Search engine initialized"
        );

        let search = TextSearch {
            config,
            partitions,
            scorer: LevelScorer::default(),
        };
        Ok((search, summary))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Init-time configuration
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Partition names in order
    pub fn partition_names(&self) -> Vec<&str> {
        self.partitions.keys().map(PartitionName::as_str).collect()
    }

    /// Partition by name
    pub fn partition(&self, name: &str) -> Option<&Partition> {
        self.partitions.get(name)
    }

    /// Stored record; `partition` defaults to the default partition
    pub fn get_object(&self, key: &str, partition: Option<&str>) -> Option<&TextRecord> {
        self.partitions
            .get(partition.unwrap_or(vnsearch_core::DEFAULT_PARTITION))?
            .get(key)
    }

    /// True if `key` is stored; `partition` defaults to the default partition
    pub fn contains(&self, key: &str, partition: Option<&str>) -> bool {
        self.get_object(key, partition).is_some()
    }

    /// Records across all partitions
    pub fn len(&self) -> usize {
        self.partitions.values().map(Partition::len).sum()
    }

    /// True if no partition holds a record
    pub fn is_empty(&self) -> bool {
        self.partitions.values().all(Partition::is_empty)
    }

    /// Sizes of every partition, from a walk of each index
    pub fn stats(&self) -> IndexStats {
        self.partitions.values().map(Partition::stats).collect()
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Rank records against `query`
    ///
    /// The query goes through the same keyword extraction as indexed text.
    /// Scores are summed across query keywords and across the selected
    /// partitions; only scores strictly above the threshold are kept. Equal
    /// scores are ordered by key.
    ///
    /// # Errors
    ///
    /// - `Configuration` for an invalid threshold override
    /// - `Validation` for a malformed partition name
    /// - `PartitionNotFound` for a partition that does not exist
    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchResults> {
        let resolved = options.resolve(&self.config)?;

        let selected: Vec<&Partition> = match &resolved.partitions {
            None => self.partitions.values().collect(),
            Some(names) => {
                let unique: BTreeSet<&PartitionName> = names.iter().collect();
                unique
                    .into_iter()
                    .map(|name| {
                        self.partitions
                            .get(name)
                            .ok_or_else(|| Error::PartitionNotFound(name.to_string()))
                    })
                    .collect::<Result<_>>()?
            }
        };

        let keywords = extract_keywords(query, self.config.fold_case);
        let merged = merge_scores(
            selected
                .iter()
                .map(|p| p.score(&keywords, &self.scorer, resolved.use_score_bias)),
        )
        .finish();

        let mut ranked: Vec<(&TextKey, f64)> = merged
            .into_iter()
            .filter(|(_, score)| *score > resolved.threshold_score)
            .collect();
        ranked.sort_by(|a, b| rank(a, b, resolved.sort_order));

        let total = ranked.len();
        let page_size = if resolved.limit == 0 {
            usize::MAX
        } else {
            resolved.limit
        };
        let hits: Vec<SearchHit> = ranked
            .into_iter()
            .skip(resolved.offset)
            .take(page_size)
            .map(|(key, score)| SearchHit {
                key: key.clone(),
                score,
            })
            .collect();

        let keyword_texts: Vec<String> = keywords.into_iter().map(|k| k.text).collect();
        debug!(
            target: "vnsearch::engine",
            query = %query,
            keywords = keyword_texts.len(),
            partitions = selected.len(),
            total,
            returned = hits.len(),
            "Search completed"
        );

        Ok(SearchResults {
            hits,
            total,
            threshold_score: resolved.threshold_score,
            offset: resolved.offset,
            limit: resolved.limit,
            sort_order: resolved.sort_order,
            partitions: selected.iter().map(|p| p.name().to_string()).collect(),
            text: keyword_texts.join(" "),
            keywords: keyword_texts,
        })
    }

    // ========================================================================
    // Add
    // ========================================================================

    /// Add one record
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty key or text, or a malformed partition name
    /// - `DuplicateKey` if the key exists and `replace` is off
    /// - `PartitionNotFound` if the partition is missing and may not be created
    pub fn add_object(
        &mut self,
        record: TextRecord,
        options: AddOptions,
    ) -> Result<MutationSummary> {
        self.add_many_objects(vec![record], options)
    }

    /// Add many records, validating all of them before indexing any
    ///
    /// With `replace`, existing keys are updated in place. A (partition, key)
    /// pair may appear only once per batch. Records yielding no keywords are
    /// skipped and reported, not stored.
    pub fn add_many_objects(
        &mut self,
        records: Vec<TextRecord>,
        options: AddOptions,
    ) -> Result<MutationSummary> {
        let mut seen = FxHashSet::default();
        let mut routed = Vec::with_capacity(records.len());
        for record in records {
            record.validate()?;
            let partition = self.route(record.partition.as_deref())?;
            if !seen.insert((partition.clone(), record.key.clone())) {
                return Err(Error::duplicate_key(partition.as_str(), record.key.as_str()));
            }
            if !options.replace && self.stored(&partition, record.key.as_str()) {
                return Err(Error::duplicate_key(partition.as_str(), record.key.as_str()));
            }
            routed.push(Routed { partition, record });
        }

        let fold_case = self.config.fold_case;
        let mut summary = MutationSummary::default();
        for p in prepare(routed, fold_case) {
            let name = p.partition.to_string();
            let exists = self.stored(&p.partition, p.record.key.as_str());
            if !exists && p.keywords.is_empty() {
                warn!(
                    target: "vnsearch::engine",
                    partition = %name,
                    key = %p.record.key,
                    "Record has no keywords, skipped"
                );
                summary.record_skipped(&name, p.record.key);
                continue;
            }

            let partition = self.partition_mut(p.partition);
            let diff = partition.upsert(p.record, &p.keywords, fold_case);
            if exists {
                summary.record_updated(&name, &diff.added, &diff.removed);
            } else {
                summary.record_added(&name, &diff.added);
            }
        }

        let summary = summary.finish();
        debug!(
            target: "vnsearch::engine",
            added = summary.added,
            updated = summary.updated,
            skipped = summary.skipped.len(),
            new_keywords = summary.new_keywords.len(),
            "Records added"
        );
        Ok(summary)
    }

    // ========================================================================
    // Update
    // ========================================================================

    /// Update one record
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty key or text, or a malformed partition name
    /// - `KeyNotFound` if the key is missing and `upsert` is off
    /// - `PartitionNotFound` if the partition is missing and may not be created
    pub fn update_object(
        &mut self,
        record: TextRecord,
        options: UpdateOptions,
    ) -> Result<MutationSummary> {
        self.update_many_objects(vec![record], options)
    }

    /// Update many records, validating all of them before indexing any
    ///
    /// Only keywords that differ between the stored and the incoming text
    /// touch the index; the stored record is always replaced. With `upsert`,
    /// missing keys are added instead.
    pub fn update_many_objects(
        &mut self,
        records: Vec<TextRecord>,
        options: UpdateOptions,
    ) -> Result<MutationSummary> {
        let mut seen = FxHashSet::default();
        let mut routed = Vec::with_capacity(records.len());
        for record in records {
            record.validate()?;
            let partition = if options.upsert {
                self.route(record.partition.as_deref())?
            } else {
                self.existing(record.partition.as_deref())?
            };
            if !seen.insert((partition.clone(), record.key.clone())) {
                return Err(Error::duplicate_key(partition.as_str(), record.key.as_str()));
            }
            if !options.upsert && !self.stored(&partition, record.key.as_str()) {
                return Err(Error::key_not_found(partition.as_str(), record.key.as_str()));
            }
            routed.push(Routed { partition, record });
        }

        let fold_case = self.config.fold_case;
        let mut summary = MutationSummary::default();
        for p in prepare(routed, fold_case) {
            let name = p.partition.to_string();
            let exists = self.stored(&p.partition, p.record.key.as_str());
            if !exists && p.keywords.is_empty() {
                warn!(
                    target: "vnsearch::engine",
                    partition = %name,
                    key = %p.record.key,
                    "Record has no keywords, skipped"
                );
                summary.record_skipped(&name, p.record.key);
                continue;
            }

            let partition = self.partition_mut(p.partition);
            let diff = partition.upsert(p.record, &p.keywords, fold_case);
            if exists {
                summary.record_updated(&name, &diff.added, &diff.removed);
            } else {
                summary.record_added(&name, &diff.added);
            }
        }

        let summary = summary.finish();
        debug!(
            target: "vnsearch::engine",
            updated = summary.updated,
            added = summary.added,
            new_keywords = summary.new_keywords.len(),
            removed_keywords = summary.removed_keywords.len(),
            "Records updated"
        );
        Ok(summary)
    }

    // ========================================================================
    // Remove
    // ========================================================================

    /// Remove one record; `partition` defaults to the default partition
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty key or a malformed partition name
    /// - `KeyNotFound` / `PartitionNotFound` unless `force` is set
    pub fn remove_object(
        &mut self,
        key: &str,
        partition: Option<&str>,
        options: RemoveOptions,
    ) -> Result<MutationSummary> {
        if key.trim().is_empty() {
            return Err(Error::validation("record key must not be empty"));
        }
        self.remove_many_objects(&[key], partition, options)
    }

    /// Remove many records from one partition
    ///
    /// An empty `keys` list clears the scope instead: the named partition, or
    /// every partition when `partition` is `None`. Cleared partitions are
    /// kept. Repeated keys are removed once.
    pub fn remove_many_objects<K: AsRef<str>>(
        &mut self,
        keys: &[K],
        partition: Option<&str>,
        options: RemoveOptions,
    ) -> Result<MutationSummary> {
        if keys.is_empty() {
            return self.clear_scope(partition, options);
        }

        let name = match self.existing(partition) {
            Ok(name) => name,
            Err(Error::PartitionNotFound(_)) if options.force => {
                return Ok(MutationSummary::default());
            }
            Err(e) => return Err(e),
        };

        let mut unique: Vec<&str> = Vec::with_capacity(keys.len());
        let mut seen = FxHashSet::default();
        for key in keys {
            let key: &str = key.as_ref();
            if key.trim().is_empty() {
                return Err(Error::validation("record key must not be empty"));
            }
            if !seen.insert(key) {
                continue;
            }
            if self.stored(&name, key) {
                unique.push(key);
            } else if !options.force {
                return Err(Error::key_not_found(name.as_str(), key));
            }
        }

        let fold_case = self.config.fold_case;
        let mut summary = MutationSummary::default();
        if let Some(target) = self.partitions.get_mut(&name) {
            for key in unique {
                if let Some((_, keywords)) = target.remove(key, fold_case) {
                    summary.record_removed(name.as_str(), &keywords);
                }
            }
        }

        let summary = summary.finish();
        debug!(
            target: "vnsearch::engine",
            partition = %name,
            removed = summary.removed,
            removed_keywords = summary.removed_keywords.len(),
            "Records removed"
        );
        Ok(summary)
    }

    fn clear_scope(
        &mut self,
        partition: Option<&str>,
        options: RemoveOptions,
    ) -> Result<MutationSummary> {
        let names: Vec<PartitionName> = match partition {
            None => self.partitions.keys().cloned().collect(),
            Some(name) => match self.existing(Some(name)) {
                Ok(name) => vec![name],
                Err(Error::PartitionNotFound(_)) if options.force => Vec::new(),
                Err(e) => return Err(e),
            },
        };

        let fold_case = self.config.fold_case;
        let mut summary = MutationSummary::default();
        for name in names {
            if let Some(target) = self.partitions.get_mut(&name) {
                for (_, keywords) in target.clear(fold_case) {
                    summary.record_removed(name.as_str(), &keywords);
                }
            }
        }

        let summary = summary.finish();
        info!(
            target: "vnsearch::engine",
            removed = summary.removed,
            partitions = summary.partitions.len(),
            "Partitions cleared"
        );
        Ok(summary)
    }

    /// Delete whole partitions
    ///
    /// All names are checked before any partition is dropped.
    ///
    /// # Errors
    ///
    /// - `Validation` for a malformed name or the default partition
    /// - `PartitionNotFound` for a partition that does not exist
    pub fn remove_partitions<N: AsRef<str>>(&mut self, names: &[N]) -> Result<MutationSummary> {
        let mut targets = BTreeSet::new();
        for name in names {
            let name: &str = name.as_ref();
            let name = PartitionName::new(name)?;
            if name.is_default() {
                return Err(Error::validation("the default partition cannot be removed"));
            }
            if !self.partitions.contains_key(&name) {
                return Err(Error::PartitionNotFound(name.into_inner()));
            }
            targets.insert(name);
        }

        let fold_case = self.config.fold_case;
        let mut summary = MutationSummary::default();
        for name in targets {
            if let Some(mut partition) = self.partitions.remove(&name) {
                let records = partition.clear(fold_case);
                summary.partitions.entry(name.to_string()).or_default();
                for (_, keywords) in records {
                    summary.record_removed(name.as_str(), &keywords);
                }
                info!(target: "vnsearch::engine", partition = %name, "Partition removed");
            }
        }
        Ok(summary.finish())
    }

    // ========================================================================
    // Routing
    // ========================================================================

    /// Resolve a partition for writing: existing, or creatable
    fn route(&self, partition: Option<&str>) -> Result<PartitionName> {
        let name = partition_name(partition)?;
        if self.partitions.contains_key(&name) || self.config.auto_create_partitions {
            Ok(name)
        } else {
            Err(Error::PartitionNotFound(name.into_inner()))
        }
    }

    /// Resolve a partition that must already exist
    fn existing(&self, partition: Option<&str>) -> Result<PartitionName> {
        let name = partition_name(partition)?;
        if self.partitions.contains_key(&name) {
            Ok(name)
        } else {
            Err(Error::PartitionNotFound(name.into_inner()))
        }
    }

    fn stored(&self, partition: &PartitionName, key: &str) -> bool {
        self.partitions
            .get(partition)
            .is_some_and(|p| p.contains(key))
    }

    fn partition_mut(&mut self, name: PartitionName) -> &mut Partition {
        self.partitions.entry(name).or_insert_with_key(|name| {
            info!(target: "vnsearch::engine", partition = %name, "Partition created");
            Partition::new(name.clone())
        })
    }
}

fn partition_name(partition: Option<&str>) -> Result<PartitionName> {
    match partition {
        None => Ok(PartitionName::default_partition()),
        Some(name) => Ok(PartitionName::new(name)?),
    }
}

/// Route a record during initialization, where only the default partition
/// exists up front
fn route_initial(record: &TextRecord, config: &SearchConfig) -> Result<PartitionName> {
    let name = partition_name(record.partition.as_deref())?;
    if name.is_default() || config.auto_create_partitions {
        Ok(name)
    } else {
        Err(Error::PartitionNotFound(name.into_inner()))
    }
}

/// Order by score per `order`, then by key ascending
fn rank(a: &(&TextKey, f64), b: &(&TextKey, f64), order: SortOrder) -> Ordering {
    let by_score = match order {
        SortOrder::Descending => b.1.total_cmp(&a.1),
        SortOrder::Ascending => a.1.total_cmp(&b.1),
    };
    by_score.then_with(|| a.0.cmp(b.0))
}
