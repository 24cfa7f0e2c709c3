//! Concrete power-state handlers and table builder.
//!
//! ```text
//!  AWAKE ──[idle > timeout]──▶ ASLEEP
//!    ▲                           │
//!    └──[wake input LOW→HIGH]────┘   (software-poll mode only)
//! ```
//!
//! In deep-sleep mode `ASLEEP` is terminal for this boot: the chip is
//! suspended on entry and only a reset (wake input LOW) brings it back.

use super::context::PowerContext;
use super::{PowerState, StateDescriptor};
use crate::config::WakeMode;
use log::info;

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; PowerState::COUNT] {
    [
        // Index 0 — Awake
        StateDescriptor {
            id: PowerState::Awake,
            name: "Awake",
            on_enter: Some(awake_enter),
            on_exit: None,
            on_update: awake_update,
        },
        // Index 1 — Asleep
        StateDescriptor {
            id: PowerState::Asleep,
            name: "Asleep",
            on_enter: Some(asleep_enter),
            on_exit: None,
            on_update: asleep_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  AWAKE
// ═══════════════════════════════════════════════════════════════════════════

/// Runs at boot and on software wake: clean slate, advertising on.
fn awake_enter(ctx: &mut PowerContext) {
    ctx.last_activity = ctx.now;
    ctx.commands.lights_off = true;
    ctx.commands.advertising = Some(true);
    info!(
        "AWAKE: advertising, sleep after {} ms idle",
        ctx.inactivity_timeout.as_millis()
    );
}

fn awake_update(ctx: &mut PowerContext) -> Option<PowerState> {
    if ctx.inactivity_expired() {
        info!("AWAKE: idle for {} ms", ctx.idle_for().as_millis());
        return Some(PowerState::Asleep);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ASLEEP
// ═══════════════════════════════════════════════════════════════════════════

fn asleep_enter(ctx: &mut PowerContext) {
    ctx.commands.lights_off = true;
    ctx.commands.advertising = Some(false);
    ctx.commands.suspend = ctx.wake_mode == WakeMode::DeepSleep;
    ctx.wake_armed = false;
    match ctx.wake_mode {
        WakeMode::DeepSleep => info!("ASLEEP: deep sleep, wake input LOW resets the chip"),
        WakeMode::SoftwarePoll => info!("ASLEEP: polling wake input for a rising edge"),
    }
}

fn asleep_update(ctx: &mut PowerContext) -> Option<PowerState> {
    if ctx.wake_mode != WakeMode::SoftwarePoll {
        return None;
    }
    if !ctx.wake_input_high {
        ctx.wake_armed = true;
        return None;
    }
    ctx.wake_armed.then_some(PowerState::Awake)
}
