// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[tokio::test]
async fn absent_file_is_an_empty_knowledge_base() {
    let dir = tempdir().unwrap();
    let kb = YamlKnowledgeBase::new(dir.path().join("crop-strategies.yaml"));
    assert!(kb.get_strategy("podcast_split").await.unwrap().is_none());
    assert!(kb.list_strategies().await.unwrap().is_empty());
}

#[tokio::test]
async fn saved_strategy_reads_back() {
    let dir = tempdir().unwrap();
    let kb = YamlKnowledgeBase::new(dir.path().join("crop-strategies.yaml"));
    let crop = CropRegion::new(1380, 0, 540, 1080, "speaker_right").unwrap();

    kb.save_strategy("speaker_right", &crop).await.unwrap();
    let loaded = kb.get_strategy("speaker_right").await.unwrap().unwrap();
    assert_eq!(loaded, crop);
}

#[tokio::test]
async fn save_preserves_other_entries() {
    let dir = tempdir().unwrap();
    let kb = YamlKnowledgeBase::new(dir.path().join("crop-strategies.yaml"));
    let left = CropRegion::new(0, 0, 540, 1080, "speaker_left").unwrap();
    let center = CropRegion::new(690, 0, 540, 1080, "speaker_center").unwrap();

    kb.save_strategy("speaker_left", &left).await.unwrap();
    kb.save_strategy("speaker_center", &center).await.unwrap();

    let all = kb.list_strategies().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all.get("speaker_left"), Some(&left));
}

#[tokio::test]
async fn malformed_yaml_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("crop-strategies.yaml");
    std::fs::write(&path, "speaker_left: [not a map\n").unwrap();
    let kb = YamlKnowledgeBase::new(&path);
    assert!(matches!(
        kb.list_strategies().await.unwrap_err(),
        KnowledgeError::Malformed(_)
    ));
}
