//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (USB-CDC serial on the XIAO).

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(reason) => {
                info!("START | wake={}", reason.as_str());
            }
            AppEvent::Connected => {
                info!("LINK  | controller connected");
            }
            AppEvent::Disconnected => {
                info!("LINK  | controller disconnected, advertising");
            }
            AppEvent::CommandApplied {
                command,
                notification,
                delivered,
            } => {
                info!(
                    "CMD   | {} -> {}{}",
                    command.token(),
                    notification.as_str(),
                    if *delivered { "" } else { " (not delivered)" }
                );
            }
            AppEvent::PulseExpired(light) => {
                info!("PULSE | {} off", light.name());
            }
            AppEvent::EnteringSleep { idle_ms } => {
                info!("POWER | idle {} ms, sleeping", idle_ms);
            }
            AppEvent::Woke { at } => {
                info!("POWER | woke at {} ms", at.as_millis());
            }
        }
    }
}
