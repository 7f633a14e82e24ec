use std::rc::Rc;

use tracing::{error, info};

use crate::error::TransportError;
use crate::notify::Notifier;
use crate::request::Transport;
use crate::types::{UnitId, UnitPatch, UnitStatus};

use super::sync::SyncLoop;

/// The two statuses a unit can move to, never its current one.
pub fn targets(current: UnitStatus) -> [UnitStatus; 2] {
    match current {
        UnitStatus::Active => [UnitStatus::Idle, UnitStatus::Maintenance],
        UnitStatus::Idle => [UnitStatus::Active, UnitStatus::Maintenance],
        UnitStatus::Maintenance => [UnitStatus::Active, UnitStatus::Idle],
    }
}

/// Operational status changes. The shown status only moves after a confirmed refresh.
pub struct StatusTransition<T> {
    transport: Rc<T>,
    sync: Rc<SyncLoop<T>>,
    notifier: Rc<dyn Notifier>,
}

impl<T: Transport> StatusTransition<T> {
    pub fn new(transport: Rc<T>, sync: Rc<SyncLoop<T>>, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            transport,
            sync,
            notifier,
        }
    }

    pub async fn transition(&self, id: UnitId, target: UnitStatus) -> Result<(), TransportError> {
        match self
            .transport
            .update_unit(id, &UnitPatch::status(target))
            .await
        {
            Ok(()) => {
                info!(unit_id = id, status = %target, "status updated");
                self.notifier.success("Unit status updated");
                let _ = self.sync.refresh().await;
                Ok(())
            }
            Err(err) => {
                error!(unit_id = id, status = %target, "status update failed: {err}");
                self.notifier.error("Status could not be updated");
                Err(err)
            }
        }
    }
}
