// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    solo_gains_face     = { FramingState::Solo, FramingEvent::FaceCountIncrease, Some(FramingState::DuoSplit) },
    split_loses_face    = { FramingState::DuoSplit, FramingEvent::FaceCountDecrease, Some(FramingState::Solo) },
    pip_loses_face      = { FramingState::DuoPip, FramingEvent::FaceCountDecrease, Some(FramingState::Solo) },
    split_to_pip        = { FramingState::DuoSplit, FramingEvent::PipRequested, Some(FramingState::DuoPip) },
    pip_to_split        = { FramingState::DuoPip, FramingEvent::SplitRequested, Some(FramingState::DuoSplit) },
    solo_share          = { FramingState::Solo, FramingEvent::ScreenShareDetected, Some(FramingState::ScreenShare) },
    share_ends          = { FramingState::ScreenShare, FramingEvent::ScreenShareEnded, Some(FramingState::Solo) },
    share_gains_face    = { FramingState::ScreenShare, FramingEvent::FaceCountIncrease, Some(FramingState::DuoSplit) },
    solo_cinematic      = { FramingState::Solo, FramingEvent::CinematicRequested, Some(FramingState::CinematicSolo) },
    cinematic_gains     = { FramingState::CinematicSolo, FramingEvent::FaceCountIncrease, Some(FramingState::DuoSplit) },
    solo_loses_face     = { FramingState::Solo, FramingEvent::FaceCountDecrease, None },
    pip_from_solo       = { FramingState::Solo, FramingEvent::PipRequested, None },
    cinematic_from_duo  = { FramingState::DuoSplit, FramingEvent::CinematicRequested, None },
)]
fn framing_transitions(current: FramingState, event: FramingEvent, expected: Option<FramingState>) {
    assert_eq!(next_framing_state(current, event), expected);
}

#[test]
fn every_duo_state_yields_to_screen_share() {
    for state in [FramingState::Solo, FramingState::DuoSplit, FramingState::DuoPip] {
        assert_eq!(
            next_framing_state(state, FramingEvent::ScreenShareDetected),
            Some(FramingState::ScreenShare)
        );
    }
}
