//! Inbound commands and the token parser.
//!
//! A controller writes a short ASCII token to the command characteristic.
//! [`parse`] maps it onto a [`Command`]; anything outside the active
//! [`Vocabulary`] becomes [`Command::None`], which the caller ignores.

use serde::{Deserialize, Serialize};

/// The four directional lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LightId {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl LightId {
    /// Number of lights, used to size per-light arrays.
    pub const COUNT: usize = 4;

    /// Every light, in index order.
    pub const ALL: [LightId; LightId::COUNT] =
        [LightId::Up, LightId::Down, LightId::Left, LightId::Right];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Commands a controller can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Unrecognised input.  Never applied.
    None,
    UpPulse,
    DownPulse,
    LeftPulse,
    RightPulse,
    /// Set all four lights on (absolute, not a toggle).
    ToggleAllOn,
    /// Set all four lights off (absolute, not a toggle).
    ToggleAllOff,
}

/// What applying a command does to the light bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Light exactly one lamp for the pulse duration.
    Pulse(LightId),
    /// Drive every lamp to the same level.
    SetAll(bool),
    Ignore,
}

impl Command {
    pub const fn action(self) -> Action {
        match self {
            Self::UpPulse => Action::Pulse(LightId::Up),
            Self::DownPulse => Action::Pulse(LightId::Down),
            Self::LeftPulse => Action::Pulse(LightId::Left),
            Self::RightPulse => Action::Pulse(LightId::Right),
            Self::ToggleAllOn => Action::SetAll(true),
            Self::ToggleAllOff => Action::SetAll(false),
            Self::None => Action::Ignore,
        }
    }

    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Canonical wire token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::UpPulse => "UpPulse",
            Self::DownPulse => "DownPulse",
            Self::LeftPulse => "LeftPulse",
            Self::RightPulse => "RightPulse",
            Self::ToggleAllOn => "ToggleAllOn",
            Self::ToggleAllOff => "ToggleAllOff",
        }
    }
}

/// Token sets accepted by different controller generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vocabulary {
    /// `UpPulse` … `ToggleAllOff` only.
    Standard,
    /// Standard plus the lowercase `up`/`down`/`left`/`right`/`off` tokens.
    WithLegacy,
}

/// Decode a raw characteristic write.  Case-sensitive, exact match.
pub fn parse(token: &[u8], vocabulary: Vocabulary) -> Command {
    let Ok(token) = core::str::from_utf8(token) else {
        return Command::None;
    };

    match token {
        "UpPulse" => Command::UpPulse,
        "DownPulse" => Command::DownPulse,
        "LeftPulse" => Command::LeftPulse,
        "RightPulse" => Command::RightPulse,
        "ToggleAllOn" => Command::ToggleAllOn,
        "ToggleAllOff" => Command::ToggleAllOff,
        legacy if vocabulary == Vocabulary::WithLegacy => match legacy {
            "up" => Command::UpPulse,
            "down" => Command::DownPulse,
            "left" => Command::LeftPulse,
            "right" => Command::RightPulse,
            "off" => Command::ToggleAllOff,
            _ => Command::None,
        },
        _ => Command::None,
    }
}
