//! Mock adapters for integration tests.
//!
//! Record every port call so tests can assert on the full history without
//! touching real GPIO registers or a BLE stack.

use gradelight::app::commands::LightId;
use gradelight::app::events::AppEvent;
use gradelight::app::ports::{
    EventSink, LightPort, SleepPort, TransportError, TransportPort, WakeInputPort,
};

// ── Hardware ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwCall {
    SetLight { light: LightId, on: bool },
    DeepSleep,
}

pub struct MockHardware {
    pub calls: Vec<HwCall>,
    pub wake_high: bool,
    levels: [bool; LightId::COUNT],
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            wake_high: false,
            levels: [false; LightId::COUNT],
        }
    }

    /// Physical level, as last written.
    pub fn is_lit(&self, light: LightId) -> bool {
        self.levels[light.index()]
    }

    pub fn lit(&self) -> Vec<LightId> {
        LightId::ALL.into_iter().filter(|l| self.is_lit(*l)).collect()
    }

    pub fn light_writes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HwCall::SetLight { .. }))
            .count()
    }

    pub fn slept(&self) -> bool {
        self.calls.contains(&HwCall::DeepSleep)
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl LightPort for MockHardware {
    fn set_light(&mut self, light: LightId, on: bool) {
        self.levels[light.index()] = on;
        self.calls.push(HwCall::SetLight { light, on });
    }
}

impl WakeInputPort for MockHardware {
    fn wake_input_high(&mut self) -> bool {
        self.wake_high
    }
}

impl SleepPort for MockHardware {
    fn enter_deep_sleep(&mut self) {
        self.calls.push(HwCall::DeepSleep);
    }
}

// ── Transport ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioCall {
    Notify(String),
    StartAdvertising,
    StopAdvertising,
}

pub struct MockTransport {
    pub calls: Vec<RadioCall>,
    pub advertising: bool,
    /// When set, every call fails with this error.
    pub fail_with: Option<TransportError>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            advertising: false,
            fail_with: None,
        }
    }

    pub fn notifications(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RadioCall::Notify(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportPort for MockTransport {
    fn notify(&mut self, payload: &str) -> Result<(), TransportError> {
        if let Some(e) = self.fail_with {
            return Err(e);
        }
        self.calls.push(RadioCall::Notify(payload.to_string()));
        Ok(())
    }

    fn start_advertising(&mut self) -> Result<(), TransportError> {
        if let Some(e) = self.fail_with {
            return Err(e);
        }
        self.advertising = true;
        self.calls.push(RadioCall::StartAdvertising);
        Ok(())
    }

    fn stop_advertising(&mut self) -> Result<(), TransportError> {
        if let Some(e) = self.fail_with {
            return Err(e);
        }
        self.advertising = false;
        self.calls.push(RadioCall::StopAdvertising);
        Ok(())
    }
}

// ── Event sink ────────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn last(&self) -> Option<&AppEvent> {
        self.events.last()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
