//! Work item types.
//!
//! A work item is one tracked parts request, order request, unit test or
//! stripped unit. Its status only changes through the lifecycle validator;
//! modification stamps are written by the data source when it persists.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::WorkItemId;
use crate::item_type::ItemType;

/// A tracked unit of field-service work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique identifier (or legacy row index) of the item.
    pub id: WorkItemId,

    /// Kind of work item.
    pub item_type: ItemType,

    /// Current status code, as listed in the item type's catalog.
    pub status_code: String,

    /// Person the item is assigned to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// Equipment make.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,

    /// Equipment model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Free-form description entered at intake.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Calendar due date, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// When the item was created.
    pub created_on: DateTime<Utc>,

    /// Whether the item has been archived.
    #[serde(default)]
    pub archived: bool,

    /// When the data source last persisted a change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,

    /// Who made the last persisted change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
}

impl WorkItem {
    /// Creates a new, unarchived work item in the given status.
    pub fn new(item_type: ItemType, status_code: impl Into<String>) -> Self {
        Self {
            id: WorkItemId::new(),
            item_type,
            status_code: status_code.into(),
            assignee: None,
            make: None,
            model: None,
            description: None,
            due_date: None,
            created_on: Utc::now(),
            archived: false,
            modified_on: None,
            modified_by: None,
        }
    }

    /// Sets the id.
    pub fn with_id(mut self, id: impl Into<WorkItemId>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the assignee.
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Sets the make.
    pub fn with_make(mut self, make: impl Into<String>) -> Self {
        self.make = Some(make.into());
        self
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the due date.
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Marks the item archived.
    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }

    /// Returns true if the item counts toward active aggregations.
    pub fn is_active(&self) -> bool {
        !self.archived
    }

    /// Sets a new status and stamps the change with `actor`.
    ///
    /// `modified_on` always moves forward, even if the clock has not
    /// advanced past the previous stamp.
    pub fn record_status(&mut self, status_code: impl Into<String>, actor: impl Into<String>) {
        let now = Utc::now();
        self.status_code = status_code.into();
        self.modified_on = Some(match self.modified_on {
            Some(prev) if now <= prev => prev + chrono::Duration::microseconds(1),
            _ => now,
        });
        self.modified_by = Some(actor.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_item_creation() {
        let item = WorkItem::new(ItemType::PartsRequest, "Initiated");

        assert!(item.id.as_str().starts_with("wi-"));
        assert_eq!(item.item_type, ItemType::PartsRequest);
        assert_eq!(item.status_code, "Initiated");
        assert!(item.is_active());
        assert!(item.due_date.is_none());
        assert!(item.modified_on.is_none());
    }

    #[test]
    fn test_work_item_builders() {
        let due = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        let item = WorkItem::new(ItemType::UnitTest, "Pending")
            .with_id("1042")
            .with_assignee("dana")
            .with_make("Caterpillar")
            .with_model("C15")
            .with_due_date(due)
            .archived();

        assert_eq!(item.id.as_str(), "1042");
        assert_eq!(item.assignee.as_deref(), Some("dana"));
        assert_eq!(item.make.as_deref(), Some("Caterpillar"));
        assert_eq!(item.model.as_deref(), Some("C15"));
        assert_eq!(item.due_date, Some(due));
        assert!(!item.is_active());
    }

    #[test]
    fn test_work_item_serialization_roundtrip() {
        let item = WorkItem::new(ItemType::StrippedUnit, "Inp")
            .with_make("Deere")
            .with_due_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());

        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"due_date\":\"2024-03-15\""));
        assert!(!json.contains("assignee"));

        let parsed: WorkItem = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, item);
    }

    #[test]
    fn test_record_status_stamps_change() {
        let mut item = WorkItem::new(ItemType::PartsRequest, "Initiated");
        item.record_status("Staging", "dana");

        assert_eq!(item.status_code, "Staging");
        assert_eq!(item.modified_by.as_deref(), Some("dana"));
        assert!(item.modified_on.is_some());
    }

    #[test]
    fn test_record_status_stamp_strictly_increases() {
        let future = Utc::now() + chrono::Duration::hours(1);
        let mut item = WorkItem::new(ItemType::PartsRequest, "Initiated");
        item.modified_on = Some(future);

        item.record_status("Staging", "lee");
        assert!(item.modified_on > Some(future));
    }
}
