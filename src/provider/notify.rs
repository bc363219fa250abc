//! Change notifications and live query results.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, trace};

use super::resource::Resource;
use super::values::Row;

/// Published after a mutation that touched at least one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceChange {
    pub resource: Resource,
    pub rows_affected: u64,
}

/// Event bus keyed by resource address.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<ResourceChange>,
}

impl ChangeNotifier {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ResourceChange> {
        self.sender.subscribe()
    }

    /// Publishes a change for `resource`; a zero count publishes nothing.
    pub fn notify(&self, resource: Resource, rows_affected: u64) {
        if rows_affected == 0 {
            return;
        }
        let change = ResourceChange {
            resource,
            rows_affected,
        };
        // No subscribers is not an error.
        match self.sender.send(change) {
            Ok(receivers) => trace!(%resource, rows_affected, receivers, "change published"),
            Err(_) => trace!(%resource, rows_affected, "change published with no observers"),
        }
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Query result that can wait for the data behind it to change.
///
/// The subscription is taken before the query runs, so a mutation that lands
/// between the read and the first [`LiveRows::changed`] call is not lost.
#[derive(Debug)]
pub struct LiveRows {
    resource: Resource,
    rows: Vec<Row>,
    changes: broadcast::Receiver<ResourceChange>,
}

impl LiveRows {
    pub(crate) fn new(
        resource: Resource,
        rows: Vec<Row>,
        changes: broadcast::Receiver<ResourceChange>,
    ) -> Self {
        Self {
            resource,
            rows,
            changes,
        }
    }

    #[must_use]
    pub const fn resource(&self) -> &Resource {
        &self.resource
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Waits until a table this result reads from changes.
    ///
    /// Returns `None` once the store that produced the result is gone. When
    /// the receiver fell behind, the missed changes are reported as a single
    /// change on this result's own resource.
    pub async fn changed(&mut self) -> Option<ResourceChange> {
        loop {
            match self.changes.recv().await {
                Ok(change) if self.resource.observes(&change.resource) => return Some(change),
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => {
                    debug!(resource = %self.resource, missed, "live result lagged behind changes");
                    return Some(ResourceChange {
                        resource: self.resource,
                        rows_affected: 0,
                    });
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`LiveRows::changed`].
    pub fn try_changed(&mut self) -> Option<ResourceChange> {
        loop {
            match self.changes.try_recv() {
                Ok(change) if self.resource.observes(&change.resource) => return Some(change),
                Ok(_) => {}
                Err(broadcast::error::TryRecvError::Lagged(_)) => {
                    return Some(ResourceChange {
                        resource: self.resource,
                        rows_affected: 0,
                    });
                }
                Err(_) => return None,
            }
        }
    }
}
