// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Framing-style FSM used inside the layout-detective stage.
//!
//! Runtime machinery for dynamic style switching while classifying a video;
//! deliberately not part of [`RunState`](crate::run::RunState).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime framing state for dynamic style switching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FramingState {
    Solo,
    DuoSplit,
    DuoPip,
    ScreenShare,
    CinematicSolo,
}

impl FramingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FramingState::Solo => "solo",
            FramingState::DuoSplit => "duo_split",
            FramingState::DuoPip => "duo_pip",
            FramingState::ScreenShare => "screen_share",
            FramingState::CinematicSolo => "cinematic_solo",
        }
    }
}

impl fmt::Display for FramingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events driven by face-count changes, screen-share detection, and user
/// style requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FramingEvent {
    FaceCountIncrease,
    FaceCountDecrease,
    PipRequested,
    SplitRequested,
    ScreenShareDetected,
    ScreenShareEnded,
    CinematicRequested,
}

/// Framing transition table: `(current, event) -> next`.
pub const FRAMING_TRANSITIONS: &[(FramingState, FramingEvent, FramingState)] = &[
    // Solo <-> duo
    (
        FramingState::Solo,
        FramingEvent::FaceCountIncrease,
        FramingState::DuoSplit,
    ),
    (
        FramingState::DuoSplit,
        FramingEvent::FaceCountDecrease,
        FramingState::Solo,
    ),
    (
        FramingState::DuoPip,
        FramingEvent::FaceCountDecrease,
        FramingState::Solo,
    ),
    // Duo mode switching
    (
        FramingState::DuoSplit,
        FramingEvent::PipRequested,
        FramingState::DuoPip,
    ),
    (
        FramingState::DuoPip,
        FramingEvent::SplitRequested,
        FramingState::DuoSplit,
    ),
    // Screen share
    (
        FramingState::Solo,
        FramingEvent::ScreenShareDetected,
        FramingState::ScreenShare,
    ),
    (
        FramingState::DuoSplit,
        FramingEvent::ScreenShareDetected,
        FramingState::ScreenShare,
    ),
    (
        FramingState::DuoPip,
        FramingEvent::ScreenShareDetected,
        FramingState::ScreenShare,
    ),
    (
        FramingState::ScreenShare,
        FramingEvent::FaceCountIncrease,
        FramingState::DuoSplit,
    ),
    (
        FramingState::ScreenShare,
        FramingEvent::ScreenShareEnded,
        FramingState::Solo,
    ),
    // Cinematic solo (single speaker close-up)
    (
        FramingState::Solo,
        FramingEvent::CinematicRequested,
        FramingState::CinematicSolo,
    ),
    (
        FramingState::CinematicSolo,
        FramingEvent::FaceCountIncrease,
        FramingState::DuoSplit,
    ),
    (
        FramingState::CinematicSolo,
        FramingEvent::ScreenShareDetected,
        FramingState::ScreenShare,
    ),
];

/// Look up the next framing state; `None` when the pair is undefined.
pub fn next_framing_state(current: FramingState, event: FramingEvent) -> Option<FramingState> {
    FRAMING_TRANSITIONS
        .iter()
        .find(|(from, ev, _)| *from == current && *ev == event)
        .map(|(_, _, to)| *to)
}

#[cfg(test)]
#[path = "framing_tests.rs"]
mod tests;
