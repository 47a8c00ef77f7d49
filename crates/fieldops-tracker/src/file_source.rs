//! [`DataSource`] over the file-backed [`WorkStore`].
//!
//! File I/O runs on tokio's blocking pool so the async contract holds.

use async_trait::async_trait;
use fieldops_lifecycle::FilterSpec;
use fieldops_models::{ItemType, WorkItem, WorkItemId};
use fieldops_persistence::WorkStore;

use crate::error::{StoreError, StoreResult};
use crate::source::{DataSource, StatusUpdate};

async fn blocking<T, F>(store: &WorkStore, op: F) -> StoreResult<T>
where
    T: Send + 'static,
    F: FnOnce(&WorkStore) -> fieldops_persistence::Result<T> + Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| StoreError::Backend(format!("store task failed: {}", e)))?
        .map_err(StoreError::from)
}

#[async_trait]
impl DataSource for WorkStore {
    async fn fetch(&self, item_type: ItemType, filter: &FilterSpec) -> StoreResult<Vec<WorkItem>> {
        let items = blocking(self, move |store| store.list_work(item_type)).await?;
        Ok(filter.apply(items))
    }

    async fn get(&self, item_type: ItemType, id: &WorkItemId) -> StoreResult<Option<WorkItem>> {
        let id = id.clone();
        blocking(self, move |store| store.find_work(item_type, &id)).await
    }

    async fn persist(&self, update: &StatusUpdate) -> StoreResult<WorkItem> {
        let update = update.clone();
        blocking(self, move |store| {
            store.update_status(
                update.item_type,
                &update.id,
                &update.status_code,
                &update.actor,
                update.expected_modified_on,
            )
        })
        .await
    }

    async fn intake(&self, item: WorkItem) -> StoreResult<WorkItem> {
        blocking(self, move |store| store.insert_work(&item).map(|()| item)).await
    }
}
