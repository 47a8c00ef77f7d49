//! AggregationReporter - counts and distinct-value lists over a snapshot.

use std::collections::{BTreeMap, HashMap};

use fieldops_models::{normalize, Bucket};
use serde::Serialize;

/// One value and its count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry<K> {
    pub value: K,
    pub count: usize,
}

/// Counts ordered by count descending, ties broken by value ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Counts<K> {
    entries: Vec<CountEntry<K>>,
}

impl<K: PartialEq> Counts<K> {
    /// Entries in report order.
    pub fn entries(&self) -> &[CountEntry<K>] {
        &self.entries
    }

    /// Count for `value`, zero if absent.
    pub fn get(&self, value: &K) -> usize {
        self.entries
            .iter()
            .find(|e| &e.value == value)
            .map(|e| e.count)
            .unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K> Counts<K> {
    /// Relabels each value, keeping the report order.
    pub fn map_values<U, F>(self, mut f: F) -> Counts<U>
    where
        F: FnMut(K) -> U,
    {
        Counts {
            entries: self
                .entries
                .into_iter()
                .map(|e| CountEntry {
                    value: f(e.value),
                    count: e.count,
                })
                .collect(),
        }
    }
}

/// Groups `items` by `dimension` and counts each group.
///
/// Items for which `dimension` returns `None` are not counted, so the total
/// equals `items.len()` exactly when the dimension is defined for every item.
pub fn count_by<T, K, F>(items: &[T], dimension: F) -> Counts<K>
where
    K: Ord,
    F: Fn(&T) -> Option<K>,
{
    let mut groups: BTreeMap<K, usize> = BTreeMap::new();
    for item in items {
        if let Some(key) = dimension(item) {
            *groups.entry(key).or_insert(0) += 1;
        }
    }

    // BTreeMap yields values ascending; the stable sort keeps that order for ties.
    let mut entries: Vec<CountEntry<K>> = groups
        .into_iter()
        .map(|(value, count)| CountEntry { value, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    Counts { entries }
}

/// Distinct non-blank values of `field`, sorted case-insensitively.
///
/// Values equal after trimming and case folding collapse to one entry that
/// keeps the first-seen spelling (trimmed).
pub fn distinct_values<T, F>(items: &[T], field: F) -> Vec<String>
where
    F: for<'a> Fn(&'a T) -> Option<&'a str>,
{
    let mut seen: HashMap<String, String> = HashMap::new();
    for item in items {
        let Some(value) = field(item).map(str::trim).filter(|v| !v.is_empty()) else {
            continue;
        };
        seen.entry(normalize(value))
            .or_insert_with(|| value.to_string());
    }

    let mut values: Vec<(String, String)> = seen.into_iter().collect();
    values.sort_by(|a, b| a.0.cmp(&b.0));
    values.into_iter().map(|(_, display)| display).collect()
}

/// Dashboard counts for every bucket, zeros included, in bucket order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BucketCounts {
    counts: BTreeMap<Bucket, usize>,
}

impl BucketCounts {
    /// Creates counts with every bucket at zero.
    pub fn new() -> Self {
        Self {
            counts: Bucket::ALL.into_iter().map(|b| (b, 0)).collect(),
        }
    }

    /// Adds one item to `bucket`.
    pub fn record(&mut self, bucket: Bucket) {
        *self.counts.entry(bucket).or_insert(0) += 1;
    }

    pub fn get(&self, bucket: Bucket) -> usize {
        self.counts.get(&bucket).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Buckets and counts in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, usize)> + '_ {
        self.counts.iter().map(|(b, c)| (*b, *c))
    }
}

impl Default for BucketCounts {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Bucket> for BucketCounts {
    fn from_iter<I: IntoIterator<Item = Bucket>>(iter: I) -> Self {
        let mut counts = Self::new();
        for bucket in iter {
            counts.record(bucket);
        }
        counts
    }
}

/// Counts buckets, reporting all six.
pub fn bucket_counts(buckets: impl IntoIterator<Item = Bucket>) -> BucketCounts {
    buckets.into_iter().collect()
}
