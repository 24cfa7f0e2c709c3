//! Device service — the hexagonal core.
//!
//! [`DeviceService`] owns all mutable device state: the illumination
//! controller (light mirror + pulse timer) and the power manager
//! (activity clock + power FSM).  Every entry point takes the current time
//! and the ports it needs, so the whole service runs against mock adapters
//! on the host.
//!
//! ```text
//!  TransportPort ◀──┐                         ┌──▶ EventSink
//!                   │  ┌───────────────────┐  │
//!  on_connect ─────▶├──│   DeviceService   │──┤
//!  on_write   ─────▶│  │ Illumination·Power│  │
//!  tick       ─────▶│  └───────────────────┘  │
//!                   └──▶ LightPort · WakeInputPort · SleepPort
//! ```

use embassy_time::Instant;
use log::{debug, info, warn};

use crate::config::{DeviceConfig, WakeMode};
use crate::fsm::PowerState;
use crate::fsm::context::PowerCommands;
use crate::power::{PowerManager, PowerTransition, WakeReason};

use super::commands::{self, Command, Vocabulary};
use super::events::{AppEvent, Notification};
use super::illumination::IlluminationController;
use super::lights::LightBank;
use super::ports::{
    CommandChannelHandler, EventSink, LightPort, SleepPort, TransportPort, WakeInputPort,
};
use super::pulse::ActivePulse;

// ───────────────────────────────────────────────────────────────
// DeviceService
// ───────────────────────────────────────────────────────────────

pub struct DeviceService {
    illumination: IlluminationController,
    power: PowerManager,
    vocabulary: Vocabulary,
}

impl DeviceService {
    /// Construct the service.  `now` is process start; the inactivity
    /// clock runs from there.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: &DeviceConfig, now: Instant) -> Self {
        Self {
            illumination: IlluminationController::new(config.pulse_duration()),
            power: PowerManager::new(config, now),
            vocabulary: config.vocabulary,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Force the outputs dark, start advertising and announce the boot.
    pub fn start(
        &mut self,
        wake: WakeReason,
        hw: &mut (impl LightPort + SleepPort),
        transport: &mut impl TransportPort,
        sink: &mut impl EventSink,
    ) {
        self.illumination.init(hw);
        let cmds = self.power.start();
        self.apply_power_commands(cmds, hw, transport);
        sink.emit(&AppEvent::Started(wake));
        info!("DeviceService started ({})", wake.as_str());
    }

    // ── Transport entry points ────────────────────────────────

    pub fn on_connect(&mut self, now: Instant, sink: &mut impl EventSink) {
        if !self.power.is_awake() {
            debug!("connect while asleep ignored");
            return;
        }
        self.power.record_activity(now);
        sink.emit(&AppEvent::Connected);
    }

    /// Controller went away.  Re-advertises while awake so it can
    /// reconnect.
    pub fn on_disconnect(
        &mut self,
        now: Instant,
        transport: &mut impl TransportPort,
        sink: &mut impl EventSink,
    ) {
        if !self.power.is_awake() {
            debug!("disconnect while asleep ignored");
            return;
        }
        self.power.record_activity(now);
        if let Err(e) = transport.start_advertising() {
            warn!("re-advertise failed: {}", e);
        }
        sink.emit(&AppEvent::Disconnected);
    }

    /// Raw characteristic write.  Returns the command that was applied.
    pub fn on_write(
        &mut self,
        now: Instant,
        payload: &[u8],
        hw: &mut impl LightPort,
        transport: &mut impl TransportPort,
        sink: &mut impl EventSink,
    ) -> Option<Command> {
        if !self.power.is_awake() {
            debug!("write while asleep ignored ({} bytes)", payload.len());
            return None;
        }

        let cmd = commands::parse(payload, self.vocabulary);
        if cmd.is_none() {
            debug!("unrecognised command ignored ({} bytes)", payload.len());
            return None;
        }

        let notification = self.illumination.apply(cmd, now, hw)?;
        self.power.record_activity(now);
        info!("command {} -> {}", cmd.token(), notification.as_str());

        let delivered = Self::notify(notification, transport);
        sink.emit(&AppEvent::CommandApplied {
            command: cmd,
            notification,
            delivered,
        });
        Some(cmd)
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// One cooperative tick: pulse timer, then power watchdog.
    ///
    /// While asleep only the power manager runs; in software-poll mode it
    /// samples the wake input.
    pub fn tick(
        &mut self,
        now: Instant,
        hw: &mut (impl LightPort + WakeInputPort + SleepPort),
        transport: &mut impl TransportPort,
        sink: &mut impl EventSink,
    ) {
        let awake = self.power.is_awake();

        if awake {
            if let Some((light, notification)) = self.illumination.tick(now, hw) {
                Self::notify(notification, transport);
                sink.emit(&AppEvent::PulseExpired(light));
            }
        }

        let wake_high = !awake
            && self.power.wake_mode() == WakeMode::SoftwarePoll
            && hw.wake_input_high();

        match self.power.poll(now, wake_high) {
            Some(PowerTransition::Sleep { idle }) => {
                sink.emit(&AppEvent::EnteringSleep {
                    idle_ms: idle.as_millis(),
                });
                let cmds = self.power.take_commands();
                self.apply_power_commands(cmds, hw, transport);
            }
            Some(PowerTransition::Wake) => {
                let cmds = self.power.take_commands();
                self.apply_power_commands(cmds, hw, transport);
                sink.emit(&AppEvent::Woke { at: now });
            }
            None => {}
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn lights(&self) -> &LightBank {
        self.illumination.lights()
    }

    pub fn pending_pulse(&self) -> Option<ActivePulse> {
        self.illumination.pending_pulse()
    }

    pub fn power_state(&self) -> PowerState {
        self.power.state()
    }

    pub fn last_activity(&self) -> Instant {
        self.power.last_activity()
    }

    // ── Internal ──────────────────────────────────────────────

    /// Send a status notification.  Failures are logged and dropped; the
    /// light change that produced it stands.
    fn notify(notification: Notification, transport: &mut impl TransportPort) -> bool {
        match transport.notify(notification.as_str()) {
            Ok(()) => true,
            Err(e) => {
                debug!("notify {} dropped: {}", notification.as_str(), e);
                false
            }
        }
    }

    /// Carry out what the power FSM asked for.  A failing advertising
    /// call does not stop the remaining steps.
    fn apply_power_commands(
        &mut self,
        cmds: PowerCommands,
        hw: &mut (impl LightPort + SleepPort),
        transport: &mut impl TransportPort,
    ) {
        if cmds.lights_off {
            self.illumination.all_off(hw);
        }
        match cmds.advertising {
            Some(true) => {
                if let Err(e) = transport.start_advertising() {
                    warn!("start advertising failed: {}", e);
                }
            }
            Some(false) => {
                if let Err(e) = transport.stop_advertising() {
                    warn!("stop advertising failed: {}", e);
                }
            }
            None => {}
        }
        if cmds.suspend {
            hw.enter_deep_sleep();
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Transport callback binding
// ───────────────────────────────────────────────────────────────

/// Binds a [`DeviceService`] to its ports for one batch of transport
/// events, so callbacks can be dispatched through
/// [`CommandChannelHandler`].
pub struct ServiceBinding<'a, H, T, S> {
    pub service: &'a mut DeviceService,
    pub hw: &'a mut H,
    pub transport: &'a mut T,
    pub sink: &'a mut S,
    pub now: Instant,
}

impl<H, T, S> CommandChannelHandler for ServiceBinding<'_, H, T, S>
where
    H: LightPort,
    T: TransportPort,
    S: EventSink,
{
    fn on_connect(&mut self) {
        self.service.on_connect(self.now, self.sink);
    }

    fn on_disconnect(&mut self) {
        self.service.on_disconnect(self.now, self.transport, self.sink);
    }

    fn on_write(&mut self, payload: &[u8]) {
        self.service
            .on_write(self.now, payload, self.hw, self.transport, self.sink);
    }
}
