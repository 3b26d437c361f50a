// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! YouTube URL validation over submitted text.
//!
//! Accepts watch, short, embed, `/v/`, and shorts URLs; rejects playlists,
//! channel pages, and everything that is not a single video.

use url::Url;

const YOUTUBE_HOSTS: [&str; 5] = [
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "youtu.be",
    "www.youtu.be",
];

/// Whether the text is a URL for exactly one YouTube video.
pub fn is_watch_url(text: &str) -> bool {
    extract_video_id(text).is_some()
}

/// Extract the 11-character video id, or `None` for anything that is not a
/// single-video URL.
pub fn extract_video_id(text: &str) -> Option<String> {
    let parsed = Url::parse(text.trim()).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let host = parsed.host_str()?.to_ascii_lowercase();
    if !YOUTUBE_HOSTS.contains(&host.as_str()) {
        return None;
    }

    // Short URL: youtu.be/VIDEO_ID
    if host == "youtu.be" || host == "www.youtu.be" {
        let id = parsed.path_segments()?.next()?.to_string();
        return valid_id(id);
    }

    // Standard URL: youtube.com/watch?v=VIDEO_ID
    if parsed.path() == "/watch" {
        let id = parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())?;
        return valid_id(id);
    }

    // Path-style URLs: /embed/ID, /v/ID, /shorts/ID
    let mut segments = parsed.path_segments()?;
    let kind = segments.next()?;
    if matches!(kind, "embed" | "v" | "shorts") {
        let id = segments.next()?.to_string();
        return valid_id(id);
    }

    None
}

/// Video ids are exactly 11 characters of `[A-Za-z0-9_-]`.
fn valid_id(id: String) -> Option<String> {
    let ok = id.len() == 11
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    ok.then_some(id)
}

#[cfg(test)]
#[path = "watch_url_tests.rs"]
mod tests;
