// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{TimeZone, Utc};
use rw_core::QueueItem;
use tempfile::tempdir;

fn item(update_id: i64, secs: u32) -> QueueItem {
    QueueItem::new(
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        update_id,
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, secs).unwrap(),
    )
    .unwrap()
}

#[test]
fn enqueue_names_sort_chronologically() {
    let dir = tempdir().unwrap();
    let queue = FileQueue::new(dir.path());
    let first = queue.enqueue(&item(1, 0)).unwrap();
    let second = queue.enqueue(&item(2, 1)).unwrap();
    assert!(first.file_name().unwrap() < second.file_name().unwrap());
    assert_eq!(queue.pending_count(), 2);
}

#[test]
fn claim_is_fifo_and_moves_to_processing() {
    let dir = tempdir().unwrap();
    let queue = FileQueue::new(dir.path());
    queue.enqueue(&item(1, 0)).unwrap();
    queue.enqueue(&item(2, 1)).unwrap();

    let (claimed, processing_path) = queue.claim_next().unwrap().unwrap();
    assert_eq!(claimed.update_id, 1);
    assert!(processing_path.starts_with(dir.path().join("processing")));
    assert_eq!(queue.pending_count(), 1);
    assert_eq!(queue.processing_count(), 1);
}

#[test]
fn empty_inbox_claims_nothing() {
    let dir = tempdir().unwrap();
    let queue = FileQueue::new(dir.path());
    assert!(queue.claim_next().unwrap().is_none());
    assert_eq!(queue.pending_count(), 0);
}

#[test]
fn complete_moves_item_to_completed() {
    let dir = tempdir().unwrap();
    let queue = FileQueue::new(dir.path());
    queue.enqueue(&item(1, 0)).unwrap();
    let (_, processing_path) = queue.claim_next().unwrap().unwrap();

    let completed_path = queue.complete(&processing_path).unwrap();
    assert!(completed_path.starts_with(dir.path().join("completed")));
    assert_eq!(queue.processing_count(), 0);
    assert_eq!(queue.completed_count(), 1);
}

#[test]
fn fail_returns_item_to_inbox() {
    let dir = tempdir().unwrap();
    let queue = FileQueue::new(dir.path());
    queue.enqueue(&item(1, 0)).unwrap();
    let (_, processing_path) = queue.claim_next().unwrap().unwrap();

    queue.fail(&processing_path).unwrap();
    assert_eq!(queue.pending_count(), 1);
    assert_eq!(queue.processing_count(), 0);

    let (reclaimed, _) = queue.claim_next().unwrap().unwrap();
    assert_eq!(reclaimed.update_id, 1);
}

#[test]
fn payload_is_preserved_bit_for_bit_through_the_lifecycle() {
    let dir = tempdir().unwrap();
    let queue = FileQueue::new(dir.path());
    let original = item(9, 0).with_topic_focus("borrow checker");
    let inbox_path = queue.enqueue(&original).unwrap();
    let inbox_bytes = std::fs::read(&inbox_path).unwrap();

    let (claimed, processing_path) = queue.claim_next().unwrap().unwrap();
    assert_eq!(claimed, original);

    let completed_path = queue.complete(&processing_path).unwrap();
    let completed_bytes = std::fs::read(&completed_path).unwrap();
    assert_eq!(inbox_bytes, completed_bytes);
}

#[test]
fn partially_written_items_are_skipped() {
    let dir = tempdir().unwrap();
    let queue = FileQueue::new(dir.path());
    queue.ensure_dirs().unwrap();
    std::fs::write(dir.path().join("inbox/1000-aaaaaaaa.json"), "{\"url\": \"trunc").unwrap();
    queue.enqueue(&item(3, 5)).unwrap();

    let (claimed, _) = queue.claim_next().unwrap().unwrap();
    assert_eq!(claimed.update_id, 3);
    // The malformed file stays in the inbox for a later repair or sweep
    assert_eq!(queue.pending_count(), 1);
}

#[test]
fn non_json_files_are_ignored() {
    let dir = tempdir().unwrap();
    let queue = FileQueue::new(dir.path());
    queue.ensure_dirs().unwrap();
    std::fs::write(dir.path().join("inbox/notes.txt"), "not a queue item").unwrap();
    assert_eq!(queue.pending_count(), 0);
    assert!(queue.claim_next().unwrap().is_none());
}

#[test]
fn locked_candidate_is_skipped() {
    use fs2::FileExt;

    let dir = tempdir().unwrap();
    let queue = FileQueue::new(dir.path());
    let first_path = queue.enqueue(&item(1, 0)).unwrap();
    queue.enqueue(&item(2, 1)).unwrap();

    // Hold the first candidate's lock as a competing consumer would
    let lock_path = first_path.with_extension("lock");
    let held = std::fs::File::create(&lock_path).unwrap();
    held.lock_exclusive().unwrap();

    let (claimed, _) = queue.claim_next().unwrap().unwrap();
    assert_eq!(claimed.update_id, 2);
}

#[test]
fn no_lock_files_linger_after_claim() {
    let dir = tempdir().unwrap();
    let queue = FileQueue::new(dir.path());
    queue.enqueue(&item(1, 0)).unwrap();
    queue.claim_next().unwrap().unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("inbox"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert!(leftovers.is_empty(), "inbox should be empty: {leftovers:?}");
}
