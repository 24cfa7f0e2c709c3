//! Transport event bridge.
//!
//! The BLE stack invokes its GATT callbacks on the Bluetooth task, not on
//! the main loop.  Callbacks never touch device state; they push
//! [`TransportEvent`]s into a bounded channel, and the main loop drains it
//! into a [`CommandChannelHandler`] before each tick.
//!
//! ```text
//! ┌─────────────┐     ┌────────────────┐     ┌──────────────┐
//! │ GATT connect│────▶│                │     │              │
//! │ GATT disc.  │────▶│ TransportQueue │────▶│  Main Loop   │
//! │ GATT write  │────▶│ (crit. section)│     │  (consumer)  │
//! └─────────────┘     └────────────────┘     └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;
use log::warn;

use crate::app::ports::CommandChannelHandler;

/// Longest characteristic write kept.  Longer writes are truncated, which
/// makes them unparseable.
pub const MAX_WRITE_LEN: usize = 32;

/// Maximum number of pending events.
const EVENT_QUEUE_CAP: usize = 16;

pub type WritePayload = Vec<u8, MAX_WRITE_LEN>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Connected,
    Disconnected,
    Write(WritePayload),
}

impl TransportEvent {
    /// Build a write event, truncating to [`MAX_WRITE_LEN`].
    pub fn write(data: &[u8]) -> Self {
        let len = data.len().min(MAX_WRITE_LEN);
        let mut payload = WritePayload::new();
        // len <= capacity
        let _ = payload.extend_from_slice(&data[..len]);
        Self::Write(payload)
    }

    /// Hand the event to `handler`.
    pub fn dispatch(&self, handler: &mut impl CommandChannelHandler) {
        match self {
            Self::Connected => handler.on_connect(),
            Self::Disconnected => handler.on_disconnect(),
            Self::Write(payload) => handler.on_write(payload),
        }
    }
}

/// Bounded multi-producer queue of transport events.
pub struct TransportQueue {
    channel: Channel<CriticalSectionRawMutex, TransportEvent, EVENT_QUEUE_CAP>,
}

impl TransportQueue {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue from callback context.  Returns `false` if the queue was
    /// full and the event was dropped.
    pub fn push(&self, event: TransportEvent) -> bool {
        match self.channel.try_send(event) {
            Ok(()) => true,
            Err(_) => {
                warn!("transport event queue full, event dropped");
                false
            }
        }
    }

    pub fn pop(&self) -> Option<TransportEvent> {
        self.channel.try_receive().ok()
    }

    /// Dispatch every pending event, FIFO.  Returns how many ran.
    pub fn drain_into(&self, handler: &mut impl CommandChannelHandler) -> usize {
        let mut n = 0;
        while let Some(event) = self.pop() {
            event.dispatch(handler);
            n += 1;
        }
        n
    }
}

impl Default for TransportQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Queue shared between the BLE callbacks and the main loop.
pub static TRANSPORT_EVENTS: TransportQueue = TransportQueue::new();

/// Push into [`TRANSPORT_EVENTS`].  Safe from any task.
pub fn push_event(event: TransportEvent) -> bool {
    TRANSPORT_EVENTS.push(event)
}

/// Drain [`TRANSPORT_EVENTS`] into `handler`.
pub fn drain_events(handler: &mut impl CommandChannelHandler) -> usize {
    TRANSPORT_EVENTS.drain_into(handler)
}
