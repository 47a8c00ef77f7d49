//! Data source contract and the in-memory implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fieldops_lifecycle::FilterSpec;
use fieldops_models::{ItemType, WorkItem, WorkItemId};
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};

/// A status change the data source should persist.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub item_type: ItemType,
    pub id: WorkItemId,
    /// New status, already validated and in catalog spelling.
    pub status_code: String,
    pub actor: String,
    /// `modified_on` stamp the change was validated against.
    pub expected_modified_on: Option<DateTime<Utc>>,
}

/// Supplier of work item snapshots and sink for accepted transitions.
///
/// Implementations may push `filter` down to their backend or return a
/// superset; the tracker re-applies it to whatever comes back.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetches items of `item_type`, optionally pre-filtered.
    async fn fetch(&self, item_type: ItemType, filter: &FilterSpec) -> StoreResult<Vec<WorkItem>>;

    /// Fetches one item by id.
    async fn get(&self, item_type: ItemType, id: &WorkItemId) -> StoreResult<Option<WorkItem>>;

    /// Persists a status change if the stored stamp matches
    /// `update.expected_modified_on`, stamping the item on success.
    async fn persist(&self, update: &StatusUpdate) -> StoreResult<WorkItem>;

    /// Stores a newly created item.
    async fn intake(&self, item: WorkItem) -> StoreResult<WorkItem>;
}

/// Data source holding items in memory.
#[derive(Debug, Default)]
pub struct MemorySource {
    items: RwLock<BTreeMap<(ItemType, WorkItemId), WorkItem>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source pre-loaded with `items`.
    pub fn with_items(items: impl IntoIterator<Item = WorkItem>) -> Self {
        let items = items
            .into_iter()
            .map(|item| ((item.item_type, item.id.clone()), item))
            .collect();
        Self {
            items: RwLock::new(items),
        }
    }

    /// Number of stored items across all types.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn fetch(&self, item_type: ItemType, filter: &FilterSpec) -> StoreResult<Vec<WorkItem>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|item| item.item_type == item_type && filter.matches(item))
            .cloned()
            .collect())
    }

    async fn get(&self, item_type: ItemType, id: &WorkItemId) -> StoreResult<Option<WorkItem>> {
        let items = self.items.read().await;
        Ok(items.get(&(item_type, id.clone())).cloned())
    }

    async fn persist(&self, update: &StatusUpdate) -> StoreResult<WorkItem> {
        let mut items = self.items.write().await;
        let item = items
            .get_mut(&(update.item_type, update.id.clone()))
            .ok_or(StoreError::NotFound)?;

        if item.modified_on != update.expected_modified_on {
            return Err(StoreError::Conflict {
                expected: update.expected_modified_on,
                actual: item.modified_on,
            });
        }

        item.record_status(update.status_code.as_str(), update.actor.as_str());
        Ok(item.clone())
    }

    async fn intake(&self, item: WorkItem) -> StoreResult<WorkItem> {
        let mut items = self.items.write().await;
        let key = (item.item_type, item.id.clone());
        if items.contains_key(&key) {
            return Err(StoreError::Duplicate);
        }
        items.insert(key, item.clone());
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(item: &WorkItem, status: &str, expected: Option<DateTime<Utc>>) -> StatusUpdate {
        StatusUpdate {
            item_type: item.item_type,
            id: item.id.clone(),
            status_code: status.to_string(),
            actor: "dana".to_string(),
            expected_modified_on: expected,
        }
    }

    #[tokio::test]
    async fn test_fetch_filters_by_type_and_criteria() {
        let source = MemorySource::with_items([
            WorkItem::new(ItemType::UnitTest, "Pending"),
            WorkItem::new(ItemType::UnitTest, "Pending").archived(),
            WorkItem::new(ItemType::StrippedUnit, "Inp"),
        ]);

        let items = source
            .fetch(ItemType::UnitTest, &FilterSpec::new(ItemType::UnitTest))
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(source.len().await, 3);
    }

    #[tokio::test]
    async fn test_get_is_scoped_to_item_type() {
        let item = WorkItem::new(ItemType::UnitTest, "Pending").with_id("5");
        let source = MemorySource::with_items([item.clone()]);

        assert_eq!(source.get(ItemType::UnitTest, &item.id).await.unwrap(), Some(item.clone()));
        assert_eq!(source.get(ItemType::PartsRequest, &item.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_persist_is_conditional() {
        let item = WorkItem::new(ItemType::UnitTest, "Pending");
        let source = MemorySource::with_items([item.clone()]);

        let stored = source.persist(&update(&item, "InTest", None)).await.unwrap();
        assert_eq!(stored.status_code, "InTest");
        assert_eq!(stored.modified_by.as_deref(), Some("dana"));

        let stale = source.persist(&update(&item, "Passed", None)).await;
        assert!(matches!(stale, Err(StoreError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_persist_moves_stamp_forward() {
        let mut item = WorkItem::new(ItemType::UnitTest, "Pending");
        let future = Utc::now() + chrono::Duration::hours(1);
        item.modified_on = Some(future);
        let source = MemorySource::with_items([item.clone()]);

        let stored = source.persist(&update(&item, "InTest", Some(future))).await.unwrap();
        assert!(stored.modified_on > Some(future));
    }

    #[tokio::test]
    async fn test_persist_missing_item() {
        let source = MemorySource::new();
        let item = WorkItem::new(ItemType::UnitTest, "Pending");

        let result = source.persist(&update(&item, "InTest", None)).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_intake_rejects_duplicate_id() {
        let source = MemorySource::new();
        let item = WorkItem::new(ItemType::UnitTest, "Pending");

        source.intake(item.clone()).await.unwrap();
        assert!(matches!(source.intake(item).await, Err(StoreError::Duplicate)));
    }
}
