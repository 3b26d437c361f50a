// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rw_adapters::{FakeMessenger, NoOpMessenger};
use std::path::PathBuf;
use tempfile::tempdir;

fn handler_with(messenger: FakeMessenger, dir: &Path) -> LayoutEscalationHandler<FakeMessenger> {
    LayoutEscalationHandler::new(
        messenger,
        YamlKnowledgeBase::new(dir.join("crop-strategies.yaml")),
    )
}

#[tokio::test]
async fn option_reply_resolves_and_learns_the_layout() {
    let dir = tempdir().unwrap();
    let messenger = FakeMessenger::new();
    messenger.push_reply("B");
    let handler = handler_with(messenger.clone(), dir.path());

    let crop = handler
        .escalate(&PathBuf::from("/tmp/frame-042.png"), "podcast_triple", 12.5)
        .await
        .unwrap();

    assert_eq!((crop.x, crop.y, crop.width, crop.height), (1380, 0, 540, 1080));
    assert_eq!(crop.layout_name, "podcast_triple");

    // Frame attachment went out with the layout context
    let files = messenger.files();
    assert_eq!(files.len(), 1);
    assert!(files[0].caption.contains("podcast_triple"));
    assert!(files[0].caption.contains("12.5s"));

    // Strategy persisted for next time
    let kb = YamlKnowledgeBase::new(dir.path().join("crop-strategies.yaml"));
    assert!(kb.get_strategy("podcast_triple").await.unwrap().is_some());

    // Confirmation notification sent
    assert!(messenger.notifications().iter().any(|n| n.contains("Learned layout")));
}

#[tokio::test]
async fn custom_crop_reply_is_parsed() {
    let dir = tempdir().unwrap();
    let messenger = FakeMessenger::new();
    messenger.push_reply("100, 50, 540, 960");
    let handler = handler_with(messenger, dir.path());

    let crop = handler
        .escalate(&PathBuf::from("/tmp/frame.png"), "webinar_side", 3.0)
        .await
        .unwrap();
    assert_eq!((crop.x, crop.y, crop.width, crop.height), (100, 50, 540, 960));
}

#[tokio::test]
async fn nonsense_reply_is_unparseable_guidance() {
    let dir = tempdir().unwrap();
    let messenger = FakeMessenger::new();
    messenger.push_reply("just make it look nice");
    let handler = handler_with(messenger, dir.path());

    let err = handler
        .escalate(&PathBuf::from("/tmp/frame.png"), "mystery", 0.0)
        .await
        .unwrap_err();
    assert!(matches!(err, LayoutError::UnparseableGuidance { .. }));
}

#[tokio::test]
async fn no_interactive_channel_bubbles_as_messaging_error() {
    let dir = tempdir().unwrap();
    let handler = LayoutEscalationHandler::new(
        NoOpMessenger,
        YamlKnowledgeBase::new(dir.path().join("crop-strategies.yaml")),
    );

    let err = handler
        .escalate(&PathBuf::from("/tmp/frame.png"), "mystery", 0.0)
        .await
        .unwrap_err();
    assert!(matches!(err, LayoutError::Messaging(MessagingError::Unavailable)));
}

#[yare::parameterized(
    plain_a     = { "A", (0, 0, 540, 1080) },
    parens_c    = { "(C)", (690, 0, 540, 1080) },
    lowercase_b = { "b", (1380, 0, 540, 1080) },
    padded      = { "  A  ", (0, 0, 540, 1080) },
)]
fn option_replies_map_to_standard_crops(reply: &str, expected: (u32, u32, u32, u32)) {
    let crop = parse_guidance(reply, "layout").unwrap();
    assert_eq!((crop.x, crop.y, crop.width, crop.height), expected);
}

#[yare::parameterized(
    too_few    = { "1,2,3" },
    not_numbers = { "a,b,c,d" },
    zero_size  = { "0,0,0,0" },
    option_d   = { "D" },
)]
fn bad_custom_replies_are_rejected(reply: &str) {
    assert!(parse_guidance(reply, "layout").is_err());
}
