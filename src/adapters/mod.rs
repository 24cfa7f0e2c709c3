//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements         | Connects to                 |
//! |-------------|--------------------|-----------------------------|
//! | `ble`       | TransportPort      | Bluedroid GATT server       |
//! | `hardware`  | LightPort          | Light outputs (PinDriver)   |
//! |             | WakeInputPort      | Wake GPIO                   |
//! |             | SleepPort          | ESP32-C3 deep sleep         |
//! | `log_sink`  | EventSink          | Serial log output           |
//! | `time`      | —                  | ESP32 system timer          |

pub mod ble;
pub mod hardware;
pub mod log_sink;
pub mod time;
