// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crop strategies learned from user guidance.
//!
//! Backed by a single `crop-strategies.yaml` mapping layout names to crop
//! rectangles. Reads tolerate an absent file (empty knowledge base); saves
//! rewrite the whole map.

use rw_core::CropRegion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Errors from knowledge-base operations.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed knowledge base: {0}")]
    Malformed(#[from] serde_yaml::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredRegion {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

/// YAML-file-backed crop-strategy store.
#[derive(Debug, Clone)]
pub struct YamlKnowledgeBase {
    path: PathBuf,
}

impl YamlKnowledgeBase {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Crop strategy for a layout, if one has been learned.
    pub async fn get_strategy(&self, layout_name: &str) -> Result<Option<CropRegion>, KnowledgeError> {
        Ok(self.load().await?.remove(layout_name).map(|r| to_region(layout_name, r)))
    }

    /// Persist a strategy, replacing any previous entry for the layout.
    pub async fn save_strategy(
        &self,
        layout_name: &str,
        region: &CropRegion,
    ) -> Result<(), KnowledgeError> {
        let mut strategies = self.load().await?;
        strategies.insert(
            layout_name.to_string(),
            StoredRegion {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
            },
        );

        let body = serde_yaml::to_string(&strategies)?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, body).await?;
        info!(layout = layout_name, "saved crop strategy");
        Ok(())
    }

    /// All learned strategies keyed by layout name.
    pub async fn list_strategies(&self) -> Result<BTreeMap<String, CropRegion>, KnowledgeError> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .map(|(name, region)| {
                let crop = to_region(&name, region);
                (name, crop)
            })
            .collect())
    }

    async fn load(&self) -> Result<BTreeMap<String, StoredRegion>, KnowledgeError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_yaml::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

fn to_region(layout_name: &str, stored: StoredRegion) -> CropRegion {
    CropRegion {
        x: stored.x,
        y: stored.y,
        width: stored.width,
        height: stored.height,
        layout_name: layout_name.to_string(),
    }
}

#[cfg(test)]
#[path = "knowledge_tests.rs"]
mod tests;
