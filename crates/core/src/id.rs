// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier newtypes and run-id generation

use chrono::{DateTime, Utc};

/// Define a newtype ID wrapper around `String`.
///
/// Generates `new()`, `as_str()`, `Display`, `From<String>`, `From<&str>`,
/// and `PartialEq<&str>` implementations.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
        )]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

define_id! {
    /// Identifier for one pass of a URL through the pipeline.
    ///
    /// Timestamp-derived so lexicographic order matches creation order.
    pub struct RunId;
}

define_id! {
    /// Opaque session identifier assigned by the agent backend.
    pub struct SessionId;
}

define_id! {
    /// Name of a QA gate (scoring rubric) applied to a stage's artifacts.
    pub struct GateName;
}

/// Build a `YYYYMMDD-HHMMSS-<nonce>` identifier from a timestamp plus a
/// 6-hex-digit random nonce.
///
/// Used for both run ids and workspace directory names; names sort
/// chronologically and collide only if two are generated in the same second
/// with the same nonce.
pub fn timestamped_id(now: DateTime<Utc>) -> String {
    let nonce = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", now.format("%Y%m%d-%H%M%S"), &nonce[..6])
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
