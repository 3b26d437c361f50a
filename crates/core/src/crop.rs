// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crop coordinates for a layout strategy

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Video crop rectangle resolved for a named layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub layout_name: String,
}

impl CropRegion {
    /// Build a crop region; width and height must be positive.
    pub fn new(
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        layout_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if width == 0 || height == 0 {
            return Err(ValidationError::new(format!(
                "width and height must be positive, got {width}x{height}"
            )));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
            layout_name: layout_name.into(),
        })
    }
}

#[cfg(test)]
#[path = "crop_tests.rs"]
mod tests;
