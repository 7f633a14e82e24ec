use std::rc::Rc;

use tracing::{error, info};

use crate::error::{TransportError, UnitFormError};
use crate::notify::{Confirm, Notifier};
use crate::request::Transport;
use crate::types::{NewUnit, UnitId};

use super::sync::SyncLoop;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this unit?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    Cancelled,
    Rejected,
    Failed,
}

pub fn new_unit(name: &str, model: &str) -> Result<NewUnit, UnitFormError> {
    let name = name.trim();
    let model = model.trim();

    if name.is_empty() {
        return Err(UnitFormError::MissingName);
    }
    if model.is_empty() {
        return Err(UnitFormError::MissingModel);
    }

    Ok(NewUnit {
        name: name.to_string(),
        model: model.to_string(),
    })
}

/// Create, delete and simulate. Every success is followed by a refresh.
pub struct UnitActions<T> {
    transport: Rc<T>,
    sync: Rc<SyncLoop<T>>,
    notifier: Rc<dyn Notifier>,
    confirm: Rc<dyn Confirm>,
}

impl<T: Transport> UnitActions<T> {
    pub fn new(
        transport: Rc<T>,
        sync: Rc<SyncLoop<T>>,
        notifier: Rc<dyn Notifier>,
        confirm: Rc<dyn Confirm>,
    ) -> Self {
        Self {
            transport,
            sync,
            notifier,
            confirm,
        }
    }

    pub async fn create(&self, name: &str, model: &str) -> ActionOutcome {
        let unit = match new_unit(name, model) {
            Ok(unit) => unit,
            Err(err) => {
                info!("unit form rejected: {err}");
                self.notifier.error("Please fill in all fields");
                return ActionOutcome::Rejected;
            }
        };

        let result = self
            .transport
            .create_unit(&unit)
            .await
            .map(|created| info!(unit_id = created.id, "unit created"));
        self.settle(result, "Unit added", "Unit could not be added")
            .await
    }

    pub async fn delete(&self, id: UnitId) -> ActionOutcome {
        if !self.confirm.confirm(DELETE_PROMPT) {
            info!(unit_id = id, "deletion cancelled");
            return ActionOutcome::Cancelled;
        }

        let result = self.transport.delete_unit(id).await;
        self.settle(result, "Unit deleted", "Unit could not be deleted")
            .await
    }

    pub async fn simulate(&self, id: UnitId) -> ActionOutcome {
        let result = self.transport.simulate(id).await;
        self.settle(result, "Reading simulated", "Simulation failed")
            .await
    }

    async fn settle(
        &self,
        result: Result<(), TransportError>,
        success: &str,
        failure: &str,
    ) -> ActionOutcome {
        match result {
            Ok(()) => {
                let _ = self.sync.refresh().await;
                self.notifier.success(success);
                ActionOutcome::Done
            }
            Err(err) => {
                error!("{failure}: {err}");
                self.notifier.error(failure);
                ActionOutcome::Failed
            }
        }
    }
}
