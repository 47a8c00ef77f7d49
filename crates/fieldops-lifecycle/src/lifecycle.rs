//! LifecycleValidator - checks and applies status transitions.
//!
//! Validation and application are pure: no I/O, no clock reads. The data
//! source stamps modification metadata when it persists the new value, and
//! callers must validate against freshly fetched state.

use fieldops_models::WorkItem;
use tracing::debug;

use crate::catalog::StatusCatalog;
use crate::error::{LifecycleError, Result, TransitionRejection};

/// Validates status transitions against a [`StatusCatalog`].
pub struct LifecycleValidator<'a> {
    catalog: &'a StatusCatalog,
}

impl<'a> LifecycleValidator<'a> {
    pub fn new(catalog: &'a StatusCatalog) -> Self {
        Self { catalog }
    }

    /// Checks whether `item` may move to `requested`.
    ///
    /// # Errors
    ///
    /// - Configuration error if the item type has no catalog or the item's
    ///   current status is not defined in it
    /// - Invalid transition if `requested` is undefined, the current status
    ///   is terminal, or `requested` is not an allowed next status
    pub fn can_transition(&self, item: &WorkItem, requested: &str) -> Result<()> {
        let item_type = item.item_type;

        let current = self
            .catalog
            .definition(item_type, &item.status_code)?
            .ok_or_else(|| LifecycleError::UndefinedStatus {
                item_type,
                code: item.status_code.clone(),
            })?;

        let reject = |reason| LifecycleError::InvalidTransition {
            item_type,
            id: item.id.clone(),
            from: item.status_code.clone(),
            to: requested.trim().to_string(),
            reason,
        };

        let target = self
            .catalog
            .definition(item_type, requested)?
            .ok_or_else(|| reject(TransitionRejection::UnknownStatus))?;

        if current.is(&target.code) {
            return Ok(());
        }

        if current.terminal {
            return Err(reject(TransitionRejection::TerminalStatus));
        }

        if !current.allows(&target.code) {
            return Err(reject(TransitionRejection::NotAllowed));
        }

        Ok(())
    }

    /// Returns a copy of `item` moved to `requested`.
    ///
    /// Only the status code changes; it is set to the catalog's spelling.
    /// `actor` must be non-blank since the data source records it on persist.
    pub fn apply_transition(&self, item: &WorkItem, requested: &str, actor: &str) -> Result<WorkItem> {
        if actor.trim().is_empty() {
            return Err(LifecycleError::validation("actor", "must not be blank"));
        }

        self.can_transition(item, requested)?;

        let code = self
            .catalog
            .canonical_code(item.item_type, requested)?
            .ok_or_else(|| LifecycleError::UndefinedStatus {
                item_type: item.item_type,
                code: requested.to_string(),
            })?;

        debug!(
            item_type = %item.item_type,
            id = %item.id,
            from = %item.status_code,
            to = %code,
            actor = %actor.trim(),
            "Transition accepted"
        );

        let mut next = item.clone();
        next.status_code = code.to_string();
        Ok(next)
    }
}
