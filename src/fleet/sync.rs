use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, error};

use crate::error::TransportError;
use crate::notify::Notifier;
use crate::request::Transport;

use super::render::{render, FleetView, RenderSink};

/// Fetches the unit snapshot and hands the rendered view to the sink.
///
/// Timer ticks and post-mutation refreshes are not serialized: two refreshes may be
/// in flight at once, each renders when it completes and the last completion wins.
pub struct SyncLoop<T> {
    transport: Rc<T>,
    sink: Rc<dyn RenderSink>,
    notifier: Rc<dyn Notifier>,
    in_flight: Cell<usize>,
}

impl<T: Transport> SyncLoop<T> {
    pub fn new(transport: Rc<T>, sink: Rc<dyn RenderSink>, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            transport,
            sink,
            notifier,
            in_flight: Cell::new(0),
        }
    }

    pub async fn refresh(&self) -> Result<FleetView, TransportError> {
        let units = {
            let _in_flight = InFlight::enter(&self.in_flight);
            self.transport.list_units().await
        };

        match units {
            Ok(units) => {
                debug!(count = units.len(), "snapshot received");
                let view = render(&units);
                self.sink.render(view.clone());
                Ok(view)
            }
            Err(err) => {
                error!("snapshot refresh failed: {err}");
                self.notifier.error("Units could not be loaded");
                Err(err)
            }
        }
    }

    /// User requested refresh, confirmed with a notification.
    pub async fn refresh_now(&self) -> Result<FleetView, TransportError> {
        let view = self.refresh().await?;
        self.notifier.success("Data refreshed");
        Ok(view)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }
}

/// Counts a refresh while it waits on the transport, also when its future is dropped.
struct InFlight<'a>(&'a Cell<usize>);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a Cell<usize>) -> Self {
        counter.set(counter.get() + 1);
        if counter.get() > 1 {
            debug!(in_flight = counter.get(), "overlapping refresh");
        }
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}
