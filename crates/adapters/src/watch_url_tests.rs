// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    watch       = { "https://www.youtube.com/watch?v=dQw4w9WgXcQ" },
    watch_mobile = { "https://m.youtube.com/watch?v=dQw4w9WgXcQ" },
    short_url   = { "https://youtu.be/dQw4w9WgXcQ" },
    embed       = { "https://www.youtube.com/embed/dQw4w9WgXcQ" },
    v_path      = { "https://www.youtube.com/v/dQw4w9WgXcQ" },
    shorts      = { "https://www.youtube.com/shorts/dQw4w9WgXcQ" },
    extra_query = { "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s" },
    surrounding_space = { "  https://youtu.be/dQw4w9WgXcQ  " },
)]
fn valid_video_urls(text: &str) {
    assert_eq!(extract_video_id(text).as_deref(), Some("dQw4w9WgXcQ"));
    assert!(is_watch_url(text));
}

#[yare::parameterized(
    empty          = { "" },
    not_a_url      = { "please make me a reel" },
    wrong_host     = { "https://vimeo.com/watch?v=dQw4w9WgXcQ" },
    lookalike_host = { "https://notyoutube.com/watch?v=dQw4w9WgXcQ" },
    ftp_scheme     = { "ftp://youtube.com/watch?v=dQw4w9WgXcQ" },
    playlist_only  = { "https://www.youtube.com/playlist?list=PL1234567890" },
    channel_page   = { "https://www.youtube.com/@somechannel" },
    short_id       = { "https://youtu.be/abc" },
    long_id        = { "https://youtu.be/dQw4w9WgXcQextra" },
    bad_id_chars   = { "https://www.youtube.com/watch?v=dQw4w9WgX!Q" },
    missing_v      = { "https://www.youtube.com/watch?list=PL123" },
)]
fn invalid_submissions(text: &str) {
    assert_eq!(extract_video_id(text), None);
    assert!(!is_watch_url(text));
}
