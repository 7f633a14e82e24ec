use std::rc::Rc;

use crate::config::Config;
use crate::fleet::actions::UnitActions;
use crate::fleet::render::RenderSink;
use crate::fleet::status::StatusTransition;
use crate::fleet::sync::SyncLoop;
use crate::ingest::bulk::BulkIngestionAggregator;
use crate::ingest::single::IngestionPipeline;
use crate::notify::{Confirm, Notifier};
use crate::request::Transport;

/// Every service of the client, wired once from explicit collaborators.
pub struct FleetApp<T> {
    pub transport: Rc<T>,
    pub notifier: Rc<dyn Notifier>,
    pub sync: Rc<SyncLoop<T>>,
    pub actions: Rc<UnitActions<T>>,
    pub status: Rc<StatusTransition<T>>,
    pub ingest: Rc<IngestionPipeline<T>>,
    pub bulk: Rc<BulkIngestionAggregator<T>>,
}

impl<T: Transport> FleetApp<T> {
    pub fn new(
        config: &Config,
        transport: Rc<T>,
        sink: Rc<dyn RenderSink>,
        notifier: Rc<dyn Notifier>,
        confirm: Rc<dyn Confirm>,
    ) -> Self {
        let sync = Rc::new(SyncLoop::new(transport.clone(), sink, notifier.clone()));

        Self {
            actions: Rc::new(UnitActions::new(
                transport.clone(),
                sync.clone(),
                notifier.clone(),
                confirm,
            )),
            status: Rc::new(StatusTransition::new(
                transport.clone(),
                sync.clone(),
                notifier.clone(),
            )),
            ingest: Rc::new(IngestionPipeline::new(
                transport.clone(),
                sync.clone(),
                config.upload_extension,
            )),
            bulk: Rc::new(BulkIngestionAggregator::new(
                transport.clone(),
                sync.clone(),
                config.upload_extension,
            )),
            sync,
            transport,
            notifier,
        }
    }
}

impl<T> Clone for FleetApp<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            notifier: self.notifier.clone(),
            sync: self.sync.clone(),
            actions: self.actions.clone(),
            status: self.status.clone(),
            ingest: self.ingest.clone(),
            bulk: self.bulk.clone(),
        }
    }
}
