use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use tokio::sync::oneshot;

use crate::app::FleetApp;
use crate::config::Config;
use crate::error::{IngestError, TransportError};
use crate::fleet::render::{FleetView, RenderSink};
use crate::ingest::UploadFile;
use crate::notify::{Confirm, Level, Notification, Notifier};
use crate::request::Transport;
use crate::types::{
    Battery, BulkBatch, BulkIngestResponse, Created, NewUnit, PerUnitResult, Reading,
    RemoteStats, ReportRow, ReportScope, SingleBatch, SingleIngestResponse, Unit, UnitId,
    UnitPatch, UnitStatus,
};

pub fn unit(id: UnitId, status: UnitStatus, battery: i64) -> Unit {
    Unit {
        id,
        name: format!("Unit {id}"),
        model: "AX-1".to_string(),
        status,
        battery: Battery::try_from(battery).unwrap(),
        created_at: "2024-05-01 14:03".to_string(),
        sensor_count: None,
    }
}

pub fn reading(temperature: f64, humidity: f64, speed: f64, timestamp: &str) -> Reading {
    Reading {
        temperature,
        humidity,
        speed,
        timestamp: timestamp.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListUnits,
    CreateUnit(NewUnit),
    DeleteUnit(UnitId),
    UpdateUnit(UnitId, UnitPatch),
    Readings(UnitId),
    Simulate(UnitId),
    Ingest(UnitId, SingleBatch),
    BulkIngest(BulkBatch),
    Stats,
    ReportSummary,
    ExportReport(ReportScope),
}

/// In-memory stand-in for the fleet service, recording every call.
#[derive(Default)]
pub struct MockTransport {
    units: RefCell<Vec<Unit>>,
    readings: RefCell<Vec<Reading>>,
    calls: RefCell<Vec<Call>>,
    list_gates: RefCell<VecDeque<oneshot::Receiver<()>>>,
    fail_list: Cell<bool>,
    fail_updates: Cell<bool>,
    fail_simulate: Cell<bool>,
    ingest_error: RefCell<Option<TransportError>>,
    bulk_error: RefCell<Option<TransportError>>,
}

impl MockTransport {
    pub fn with_units(units: Vec<Unit>) -> Self {
        Self {
            units: RefCell::new(units),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn set_units(&self, units: Vec<Unit>) {
        *self.units.borrow_mut() = units;
    }

    /// The next `list_units` answers only once `gate` fires.
    pub fn gate_next_list(&self, gate: oneshot::Receiver<()>) {
        self.list_gates.borrow_mut().push_back(gate);
    }

    pub fn fail_list(&self) {
        self.fail_list.set(true);
    }

    pub fn fail_updates(&self) {
        self.fail_updates.set(true);
    }

    pub fn fail_simulate(&self) {
        self.fail_simulate.set(true);
    }

    pub fn fail_ingest(&self, err: TransportError) {
        *self.ingest_error.borrow_mut() = Some(err);
    }

    pub fn fail_bulk(&self, err: TransportError) {
        *self.bulk_error.borrow_mut() = Some(err);
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn unavailable() -> TransportError {
        TransportError::Network("connection refused".to_string())
    }
}

impl Transport for MockTransport {
    async fn list_units(&self) -> Result<Vec<Unit>, TransportError> {
        self.record(Call::ListUnits);
        let gate = self.list_gates.borrow_mut().pop_front();
        let result = if self.fail_list.get() {
            Err(Self::unavailable())
        } else {
            Ok(self.units.borrow().clone())
        };

        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }

    async fn create_unit(&self, unit: &NewUnit) -> Result<Created, TransportError> {
        self.record(Call::CreateUnit(unit.clone()));
        Ok(Created { id: 100 })
    }

    async fn delete_unit(&self, id: UnitId) -> Result<(), TransportError> {
        self.record(Call::DeleteUnit(id));
        Ok(())
    }

    async fn update_unit(&self, id: UnitId, patch: &UnitPatch) -> Result<(), TransportError> {
        self.record(Call::UpdateUnit(id, patch.clone()));
        if self.fail_updates.get() {
            return Err(Self::unavailable());
        }
        Ok(())
    }

    async fn readings(&self, id: UnitId) -> Result<Vec<Reading>, TransportError> {
        self.record(Call::Readings(id));
        Ok(self.readings.borrow().clone())
    }

    async fn simulate(&self, id: UnitId) -> Result<(), TransportError> {
        self.record(Call::Simulate(id));
        if self.fail_simulate.get() {
            return Err(Self::unavailable());
        }
        Ok(())
    }

    async fn ingest(
        &self,
        id: UnitId,
        batch: &SingleBatch,
    ) -> Result<SingleIngestResponse, TransportError> {
        self.record(Call::Ingest(id, batch.clone()));
        if let Some(err) = self.ingest_error.borrow_mut().take() {
            return Err(err);
        }
        Ok(SingleIngestResponse {
            count: batch.sensors.len() as u64,
        })
    }

    async fn bulk_ingest(&self, batch: &BulkBatch) -> Result<BulkIngestResponse, TransportError> {
        self.record(Call::BulkIngest(batch.clone()));
        if let Some(err) = self.bulk_error.borrow_mut().take() {
            return Err(err);
        }

        let units = self.units.borrow();
        let mut total_sensors = 0;
        let results = batch
            .robots
            .iter()
            .map(|entry| {
                let Some(robot_id) = entry.robot_id else {
                    return PerUnitResult::Error {
                        robot_id: None,
                        message: Some("robot_id required".to_string()),
                    };
                };
                match units.iter().find(|unit| unit.id == robot_id) {
                    Some(unit) => {
                        let count = entry.sensors.len() as u64;
                        total_sensors += count;
                        PerUnitResult::Success {
                            robot_id: unit.id,
                            robot_name: unit.name.clone(),
                            count,
                        }
                    }
                    None => PerUnitResult::Error {
                        robot_id: Some(robot_id),
                        message: Some("unit not found".to_string()),
                    },
                }
            })
            .collect();

        Ok(BulkIngestResponse {
            total_sensors,
            results,
        })
    }

    async fn stats(&self) -> Result<RemoteStats, TransportError> {
        self.record(Call::Stats);
        let units = self.units.borrow();
        Ok(RemoteStats {
            total_robots: units.len() as u64,
            active_robots: units
                .iter()
                .filter(|unit| unit.status == UnitStatus::Active)
                .count() as u64,
            total_sensors: self.readings.borrow().len() as u64,
        })
    }

    async fn report_summary(&self) -> Result<Vec<ReportRow>, TransportError> {
        self.record(Call::ReportSummary);
        Ok(Vec::new())
    }

    async fn export_report(&self, scope: ReportScope) -> Result<Vec<u8>, TransportError> {
        self.record(Call::ExportReport(scope));
        Ok(b"PK\x03\x04".to_vec())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    views: RefCell<Vec<FleetView>>,
}

impl RecordingSink {
    pub fn renders(&self) -> usize {
        self.views.borrow().len()
    }

    pub fn last(&self) -> Option<FleetView> {
        self.views.borrow().last().cloned()
    }
}

impl RenderSink for RecordingSink {
    fn render(&self, view: FleetView) {
        self.views.borrow_mut().push(view);
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notifications: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn levels(&self) -> Vec<Level> {
        self.notifications
            .borrow()
            .iter()
            .map(|notification| notification.level)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.borrow_mut().push(notification);
    }
}

#[derive(Default)]
pub struct ScriptedConfirm {
    answer: Cell<bool>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn answer(&self, answer: bool) {
        self.answer.set(answer);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.answer.get()
    }
}

pub struct MemoryFile {
    name: String,
    content: Option<String>,
    reads: Cell<usize>,
}

impl MemoryFile {
    pub fn new(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            content: Some(content.to_string()),
            reads: Cell::new(0),
        }
    }

    /// A file whose content cannot be read, like one removed after being picked.
    pub fn unreadable(name: &str) -> Self {
        Self {
            name: name.to_string(),
            content: None,
            reads: Cell::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl UploadFile for MemoryFile {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn read_text(&self) -> Result<String, IngestError> {
        self.reads.set(self.reads.get() + 1);
        self.content
            .clone()
            .ok_or_else(|| IngestError::Read("NotReadableError".to_string()))
    }
}

pub struct Harness {
    pub transport: Rc<MockTransport>,
    pub sink: Rc<RecordingSink>,
    pub notifier: Rc<RecordingNotifier>,
    pub confirm: Rc<ScriptedConfirm>,
    pub app: FleetApp<MockTransport>,
}

impl Harness {
    pub fn new(units: Vec<Unit>) -> Self {
        let transport = Rc::new(MockTransport::with_units(units));
        let sink = Rc::new(RecordingSink::default());
        let notifier = Rc::new(RecordingNotifier::default());
        let confirm = Rc::new(ScriptedConfirm::default());

        let app = FleetApp::new(
            &Config::default(),
            transport.clone(),
            sink.clone(),
            notifier.clone(),
            confirm.clone(),
        );

        Self {
            transport,
            sink,
            notifier,
            confirm,
            app,
        }
    }
}
