// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    router    = { Stage::Router, "router", Some(1) },
    research  = { Stage::Research, "research", Some(2) },
    layout    = { Stage::LayoutDetective, "layout_detective", Some(5) },
    ffmpeg    = { Stage::FfmpegEngineer, "ffmpeg_engineer", Some(6) },
    veo3      = { Stage::Veo3Await, "veo3_await", None },
    delivery  = { Stage::Delivery, "delivery", Some(8) },
    completed = { Stage::Completed, "completed", None },
)]
fn stage_names_and_numbers(stage: Stage, name: &str, number: Option<usize>) {
    assert_eq!(stage.as_str(), name);
    assert_eq!(stage.number(), number);
    assert_eq!(name.parse::<Stage>().unwrap(), stage);
}

#[test]
fn only_completed_and_failed_are_terminal() {
    for stage in STAGE_SEQUENCE {
        assert!(!stage.is_terminal(), "{stage} must not be terminal");
    }
    assert!(!Stage::Veo3Await.is_terminal());
    assert!(Stage::Completed.is_terminal());
    assert!(Stage::Failed.is_terminal());
}

#[test]
fn sequence_starts_at_router_and_ends_at_delivery() {
    assert_eq!(STAGE_SEQUENCE[0], Stage::Router);
    assert_eq!(STAGE_SEQUENCE[TOTAL_STAGES - 1], Stage::Delivery);
    assert_eq!(TOTAL_STAGES, 8);
}

#[test]
fn unknown_stage_fails_to_parse() {
    assert!("editing".parse::<Stage>().is_err());
}

#[test]
fn serde_uses_snake_case_strings() {
    let json = serde_json::to_string(&Stage::LayoutDetective).unwrap();
    assert_eq!(json, "\"layout_detective\"");
    let parsed: Stage = serde_json::from_str("\"ffmpeg_engineer\"").unwrap();
    assert_eq!(parsed, Stage::FfmpegEngineer);
}
