//! Tracker service coordinating the lifecycle engine with a data source.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use fieldops_lifecycle::{
    bucket_of, count_by, distinct_values, legacy_window, tracking_bucket, BucketCounts, Counts,
    Field, FilterResolver, FilterSpec, LegacyWindow, LifecycleError, LifecycleValidator, RawCriteria,
    StatusCatalog,
};
use fieldops_models::{normalize, Bucket, ItemType, WorkItem, WorkItemId};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, StoreError, TrackerError};
use crate::source::{DataSource, StatusUpdate};

/// One item on the tracking calendar with its bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedItem {
    pub item: WorkItem,
    pub bucket: Bucket,
}

/// Tools-tracking calendar: items inside the legacy window, bucketed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingCalendar {
    pub window: LegacyWindow,
    /// Items sorted by due date.
    pub entries: Vec<TrackedItem>,
    pub counts: BucketCounts,
}

/// Fetch-then-process service over a [`DataSource`].
///
/// Read operations fetch a snapshot through the source, re-apply the
/// resolved filter and aggregate in memory. Status updates fetch the
/// freshest item, validate, and persist conditionally on its stamp.
pub struct Tracker<D> {
    catalog: Arc<StatusCatalog>,
    source: D,
}

impl<D: DataSource> Tracker<D> {
    pub fn new(catalog: Arc<StatusCatalog>, source: D) -> Self {
        Self { catalog, source }
    }

    pub fn catalog(&self) -> &StatusCatalog {
        &self.catalog
    }

    pub fn source(&self) -> &D {
        &self.source
    }

    /// Resolves raw filter input for `item_type`.
    pub fn resolve(&self, item_type: ItemType, raw: &RawCriteria) -> Result<FilterSpec> {
        Ok(FilterResolver::new(&self.catalog).resolve(item_type, raw)?)
    }

    async fn snapshot(&self, spec: &FilterSpec) -> Result<Vec<WorkItem>> {
        let item_type = spec.item_type();
        let items = self
            .source
            .fetch(item_type, spec)
            .await
            .map_err(|source| TrackerError::Fetch { item_type, source })?;

        // Sources may return a superset.
        Ok(spec.apply(items))
    }

    /// Items of `item_type` matching `raw`.
    pub async fn list(&self, item_type: ItemType, raw: &RawCriteria) -> Result<Vec<WorkItem>> {
        let spec = self.resolve(item_type, raw)?;
        self.snapshot(&spec).await
    }

    /// Item count per status.
    pub async fn status_counts(&self, item_type: ItemType, raw: &RawCriteria) -> Result<Counts<String>> {
        self.counts_by(item_type, raw, Field::Status).await
    }

    /// Item count per value of `field`.
    ///
    /// Values differing only in case or surrounding whitespace are counted
    /// together under their first-seen spelling.
    pub async fn counts_by(
        &self,
        item_type: ItemType,
        raw: &RawCriteria,
        field: Field,
    ) -> Result<Counts<String>> {
        let items = self.list(item_type, raw).await?;
        Ok(grouped_counts(&items, field))
    }

    /// Distinct non-blank values of `field`, for filter drop-downs.
    pub async fn distinct(&self, item_type: ItemType, raw: &RawCriteria, field: Field) -> Result<Vec<String>> {
        let items = self.list(item_type, raw).await?;
        Ok(distinct_values(&items, |item| field.value_of(item)))
    }

    /// Due-date bucket counts for every dated item. Undated items are left out.
    pub async fn due_dashboard(
        &self,
        item_type: ItemType,
        raw: &RawCriteria,
        reference: NaiveDate,
    ) -> Result<BucketCounts> {
        let items = self.list(item_type, raw).await?;
        Ok(items
            .iter()
            .filter_map(|item| item.due_date)
            .map(|due| bucket_of(due, reference))
            .collect())
    }

    /// Tools-tracking calendar around `reference`.
    ///
    /// Items are first restricted to the legacy window and only then
    /// bucketed.
    pub async fn tracking_calendar(
        &self,
        item_type: ItemType,
        raw: &RawCriteria,
        reference: NaiveDate,
    ) -> Result<TrackingCalendar> {
        let window = legacy_window(reference);
        let items = self.list(item_type, raw).await?;

        let mut entries: Vec<TrackedItem> = items
            .into_iter()
            .filter_map(|item| {
                let bucket = tracking_bucket(item.due_date, reference)?;
                Some(TrackedItem { bucket, item })
            })
            .collect();
        entries.sort_by(|a, b| a.item.due_date.cmp(&b.item.due_date));

        let counts = entries.iter().map(|entry| entry.bucket).collect();

        Ok(TrackingCalendar {
            window,
            entries,
            counts,
        })
    }

    /// Moves an item to `requested` on behalf of `actor`.
    ///
    /// The item is re-read from the source, validated, and written only if
    /// nobody changed it in between. Requesting the current status returns
    /// the item unchanged without a write.
    pub async fn update_status(
        &self,
        item_type: ItemType,
        id: &WorkItemId,
        requested: &str,
        actor: &str,
    ) -> Result<WorkItem> {
        let store_error = |source: StoreError| TrackerError::Store {
            item_type,
            id: id.clone(),
            attempted: requested.trim().to_string(),
            source,
        };

        let current = self
            .source
            .get(item_type, id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| TrackerError::NotFound {
                item_type,
                id: id.clone(),
            })?;

        let next = LifecycleValidator::new(&self.catalog).apply_transition(&current, requested, actor)?;
        if next.status_code == current.status_code {
            debug!(item_type = %item_type, id = %id, status = %current.status_code, "Status unchanged");
            return Ok(current);
        }

        let update = StatusUpdate {
            item_type,
            id: id.clone(),
            status_code: next.status_code.clone(),
            actor: actor.trim().to_string(),
            expected_modified_on: current.modified_on,
        };
        let stored = self.source.persist(&update).await.map_err(store_error)?;

        info!(
            item_type = %item_type,
            id = %id,
            from = %current.status_code,
            to = %stored.status_code,
            actor = %update.actor,
            "Status updated"
        );

        Ok(stored)
    }

    /// Records a new work item.
    ///
    /// The initial status must exist in the catalog and is stored in the
    /// catalog's spelling.
    pub async fn intake(&self, mut item: WorkItem) -> Result<WorkItem> {
        let code = self
            .catalog
            .canonical_code(item.item_type, &item.status_code)?
            .ok_or_else(|| {
                LifecycleError::validation(
                    "status",
                    format!("'{}' is not a {} status", item.status_code.trim(), item.item_type),
                )
            })?;
        item.status_code = code.to_string();

        let (item_type, id) = (item.item_type, item.id.clone());
        let attempted = item.status_code.clone();
        let stored = self
            .source
            .intake(item)
            .await
            .map_err(|source| TrackerError::Store {
                item_type,
                id: id.clone(),
                attempted,
                source,
            })?;

        info!(item_type = %item_type, id = %id, status = %stored.status_code, "Work item created");
        Ok(stored)
    }
}

/// Counts by `field`, folding case and whitespace; first-seen spelling wins.
///
/// Ties are ordered by the normalized value, not the displayed spelling.
fn grouped_counts(items: &[WorkItem], field: Field) -> Counts<String> {
    let mut display: HashMap<String, String> = HashMap::new();
    for item in items {
        if let Some(value) = field.value_of(item).map(str::trim).filter(|v| !v.is_empty()) {
            display
                .entry(normalize(value))
                .or_insert_with(|| value.to_string());
        }
    }

    count_by(items, |item| {
        field
            .value_of(item)
            .map(normalize)
            .filter(|key| display.contains_key(key))
    })
    .map_values(|key| display.remove(&key).unwrap_or(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use async_trait::async_trait;
    use fieldops_lifecycle::TransitionRejection;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tracker(items: impl IntoIterator<Item = WorkItem>) -> Tracker<MemorySource> {
        let catalog = Arc::new(StatusCatalog::embedded().unwrap());
        Tracker::new(catalog, MemorySource::with_items(items))
    }

    fn part(status: &str) -> WorkItem {
        WorkItem::new(ItemType::PartsRequest, status)
    }

    #[tokio::test]
    async fn test_list_by_legacy_key() {
        let tracker = tracker([
            part("Initiated").with_id("1"),
            part("Submitted").with_id("2"),
            part("Initiated").with_id("3").archived(),
        ]);

        let raw = RawCriteria::new().with("key", "8");
        let items = tracker.list(ItemType::PartsRequest, &raw).await.unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);

        let raw = RawCriteria::new().with("key", "8").include_archived();
        assert_eq!(tracker.list(ItemType::PartsRequest, &raw).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_rejects_bad_filter() {
        let tracker = tracker([]);
        let raw = RawCriteria::new().with("key", "eight");

        let result = tracker.list(ItemType::PartsRequest, &raw).await;
        assert!(matches!(
            result,
            Err(TrackerError::Lifecycle(LifecycleError::Validation { .. }))
        ));
    }

    #[tokio::test]
    async fn test_counts_fold_case() {
        let tracker = tracker([
            part("Shipped").with_make("Deere"),
            part("Shipped").with_make(" DEERE "),
            part("Urgent").with_make("Bobcat"),
            part("Urgent"),
        ]);

        let counts = tracker
            .counts_by(ItemType::PartsRequest, &RawCriteria::new(), Field::Make)
            .await
            .unwrap();
        assert_eq!(counts.get(&"Deere".to_string()), 2);
        assert_eq!(counts.get(&"Bobcat".to_string()), 1);
        assert_eq!(counts.total(), 3);

        let statuses = tracker
            .status_counts(ItemType::PartsRequest, &RawCriteria::new())
            .await
            .unwrap();
        assert_eq!(statuses.total(), 4);
    }

    #[tokio::test]
    async fn test_count_ties_ignore_spelling_case() {
        let tracker = tracker([
            part("Shipped").with_make("Bobcat"),
            part("Shipped").with_make("apple"),
            part("Shipped").with_make("Case"),
            part("Shipped").with_make("CASE"),
        ]);

        let counts = tracker
            .counts_by(ItemType::PartsRequest, &RawCriteria::new(), Field::Make)
            .await
            .unwrap();
        let values: Vec<&str> = counts.entries().iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["Case", "apple", "Bobcat"]);
    }

    #[tokio::test]
    async fn test_distinct_keeps_first_spelling() {
        let tracker = tracker([
            part("Shipped").with_assignee("dana"),
            part("Shipped").with_assignee("Dana"),
            part("Shipped").with_assignee("  "),
            part("Shipped").with_assignee("Avery"),
        ]);

        let values = tracker
            .distinct(ItemType::PartsRequest, &RawCriteria::new(), Field::Assignee)
            .await
            .unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], "Avery");
        assert!(values[1].eq_ignore_ascii_case("dana"));
    }

    #[tokio::test]
    async fn test_due_dashboard_skips_undated() {
        let reference = date(2024, 3, 20);
        let tracker = tracker([
            part("Submitted").with_due_date(date(2024, 4, 2)),
            part("Submitted").with_due_date(date(2024, 3, 10)),
            part("Submitted").with_due_date(date(2024, 9, 1)),
            part("Submitted"),
        ]);

        let counts = tracker
            .due_dashboard(ItemType::PartsRequest, &RawCriteria::new(), reference)
            .await
            .unwrap();
        assert_eq!(counts.get(Bucket::Due15), 1);
        assert_eq!(counts.get(Bucket::OverDue), 1);
        assert_eq!(counts.get(Bucket::NotDue), 1);
        assert_eq!(counts.total(), 3);
    }

    #[tokio::test]
    async fn test_tracking_calendar_filters_window_first() {
        let reference = date(2024, 3, 20);
        let tracker = tracker([
            part("Shipped").with_id("in-late").with_due_date(date(2024, 4, 15)),
            part("Shipped").with_id("in-early").with_due_date(date(2024, 2, 15)),
            part("Shipped").with_id("out").with_due_date(date(2024, 4, 16)),
            part("Shipped").with_id("undated"),
        ]);

        let calendar = tracker
            .tracking_calendar(ItemType::PartsRequest, &RawCriteria::new(), reference)
            .await
            .unwrap();

        assert_eq!(calendar.window.start, date(2024, 2, 15));
        assert_eq!(calendar.window.end, date(2024, 4, 15));

        let ids: Vec<&str> = calendar.entries.iter().map(|e| e.item.id.as_str()).collect();
        assert_eq!(ids, vec!["in-early", "in-late"]);
        assert_eq!(calendar.counts.get(Bucket::OverDue), 1);
        assert_eq!(calendar.counts.get(Bucket::Due30), 1);
        assert_eq!(calendar.counts.total(), 2);
    }

    #[tokio::test]
    async fn test_update_status_persists_and_stamps() {
        let item = part("Submitted").with_id("42");
        let tracker = tracker([item.clone()]);

        let stored = tracker
            .update_status(ItemType::PartsRequest, &item.id, " shipped ", "dana")
            .await
            .unwrap();
        assert_eq!(stored.status_code, "Shipped");
        assert_eq!(stored.modified_by.as_deref(), Some("dana"));
        assert!(stored.modified_on.is_some());

        // A second transition validates against the stored state.
        let delivered = tracker
            .update_status(ItemType::PartsRequest, &item.id, "Delivered", "lee")
            .await
            .unwrap();
        assert!(delivered.modified_on > stored.modified_on);
    }

    #[tokio::test]
    async fn test_update_status_rejects_leaving_terminal() {
        let item = WorkItem::new(ItemType::StrippedUnit, "Com").with_id("9");
        let tracker = tracker([item.clone()]);

        let err = tracker
            .update_status(ItemType::StrippedUnit, &item.id, "Inp", "dana")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Lifecycle(LifecycleError::InvalidTransition {
                reason: TransitionRejection::TerminalStatus,
                ..
            })
        ));

        let unchanged = tracker.source().get(ItemType::StrippedUnit, &item.id).await.unwrap();
        assert_eq!(unchanged, Some(item));
    }

    #[tokio::test]
    async fn test_update_status_same_status_is_noop() {
        let item = WorkItem::new(ItemType::StrippedUnit, "Com");
        let tracker = tracker([item.clone()]);

        let result = tracker
            .update_status(ItemType::StrippedUnit, &item.id, "COM", "dana")
            .await
            .unwrap();
        assert_eq!(result, item);
    }

    #[tokio::test]
    async fn test_update_status_missing_item() {
        let tracker = tracker([]);
        let id = WorkItemId::from_string("404");

        let err = tracker
            .update_status(ItemType::UnitTest, &id, "InTest", "dana")
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::NotFound { .. }));
    }

    /// Source whose stored stamp moves between the read and the write.
    struct RacingSource {
        inner: MemorySource,
    }

    #[async_trait]
    impl DataSource for RacingSource {
        async fn fetch(&self, item_type: ItemType, filter: &FilterSpec) -> crate::StoreResult<Vec<WorkItem>> {
            self.inner.fetch(item_type, filter).await
        }

        async fn get(&self, item_type: ItemType, id: &WorkItemId) -> crate::StoreResult<Option<WorkItem>> {
            let snapshot = self.inner.get(item_type, id).await?;
            if let Some(item) = &snapshot {
                self.inner
                    .persist(&StatusUpdate {
                        item_type,
                        id: id.clone(),
                        status_code: item.status_code.clone(),
                        actor: "someone-else".to_string(),
                        expected_modified_on: item.modified_on,
                    })
                    .await?;
            }
            Ok(snapshot)
        }

        async fn persist(&self, update: &StatusUpdate) -> crate::StoreResult<WorkItem> {
            self.inner.persist(update).await
        }

        async fn intake(&self, item: WorkItem) -> crate::StoreResult<WorkItem> {
            self.inner.intake(item).await
        }
    }

    #[tokio::test]
    async fn test_update_status_reports_conflict_with_context() {
        let item = WorkItem::new(ItemType::UnitTest, "Pending").with_id("77");
        let catalog = Arc::new(StatusCatalog::embedded().unwrap());
        let tracker = Tracker::new(
            catalog,
            RacingSource {
                inner: MemorySource::with_items([item.clone()]),
            },
        );

        let err = tracker
            .update_status(ItemType::UnitTest, &item.id, "InTest", "dana")
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        match err {
            TrackerError::Store {
                item_type,
                id,
                attempted,
                source: StoreError::Conflict { .. },
            } => {
                assert_eq!(item_type, ItemType::UnitTest);
                assert_eq!(id.as_str(), "77");
                assert_eq!(attempted, "InTest");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_intake_canonicalizes_status() {
        let tracker = tracker([]);

        let stored = tracker
            .intake(WorkItem::new(ItemType::UnitTest, " pending "))
            .await
            .unwrap();
        assert_eq!(stored.status_code, "Pending");
        assert_eq!(tracker.source().len().await, 1);
    }

    #[tokio::test]
    async fn test_intake_rejects_unknown_status() {
        let tracker = tracker([]);

        let err = tracker
            .intake(WorkItem::new(ItemType::UnitTest, "Exploded"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Lifecycle(LifecycleError::Validation { .. })
        ));
        assert!(tracker.source().is_empty().await);
    }
}
