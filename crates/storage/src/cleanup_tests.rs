// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

fn seed_run(runs_dir: &Path, name: &str) -> PathBuf {
    let run_dir = runs_dir.join(name);
    std::fs::create_dir_all(run_dir.join("assets")).unwrap();
    std::fs::write(run_dir.join("run.md"), "---\nrun_id: x\n---\n").unwrap();
    std::fs::write(run_dir.join("events.log"), "log line\n").unwrap();
    std::fs::write(run_dir.join("final-reel.mp4"), vec![0u8; 64]).unwrap();
    std::fs::write(run_dir.join("assets/transcript.vtt"), vec![0u8; 512]).unwrap();
    std::fs::write(run_dir.join("assets/frame-001.png"), vec![0u8; 256]).unwrap();
    run_dir
}

#[test]
fn fresh_runs_are_left_alone() {
    let dir = tempdir().unwrap();
    let run_dir = seed_run(dir.path(), "20260301-093000-aaaaaa");
    let cleaner = RunCleaner::new(dir.path());

    let result = cleaner.clean_sync().unwrap();
    assert_eq!(result.runs_scanned, 1);
    assert_eq!(result.runs_cleaned, 0);
    assert!(run_dir.join("assets/transcript.vtt").exists());
}

#[test]
fn old_runs_keep_only_metadata_and_video() {
    let dir = tempdir().unwrap();
    let run_dir = seed_run(dir.path(), "20260101-093000-bbbbbb");
    // Zero-day retention treats every run as expired
    let cleaner = RunCleaner::new(dir.path()).with_retention_days(0);

    let result = cleaner.clean_sync().unwrap();
    assert_eq!(result.runs_cleaned, 1);
    assert_eq!(result.bytes_freed, 768);
    assert!(run_dir.join("run.md").exists());
    assert!(run_dir.join("events.log").exists());
    assert!(run_dir.join("final-reel.mp4").exists());
    assert!(!run_dir.join("assets").exists(), "emptied dirs are removed");
}

#[test]
fn missing_runs_dir_reports_empty_result() {
    let dir = tempdir().unwrap();
    let cleaner = RunCleaner::new(dir.path().join("absent"));
    let result = cleaner.clean_sync().unwrap();
    assert_eq!(
        result,
        CleanupResult {
            runs_scanned: 0,
            runs_cleaned: 0,
            bytes_freed: 0
        }
    );
}

#[test]
fn runs_without_run_md_are_skipped() {
    let dir = tempdir().unwrap();
    let stray = dir.path().join("not-a-run");
    std::fs::create_dir_all(&stray).unwrap();
    std::fs::write(stray.join("junk.bin"), vec![0u8; 128]).unwrap();

    let cleaner = RunCleaner::new(dir.path()).with_retention_days(0);
    let result = cleaner.clean_sync().unwrap();
    assert_eq!(result.runs_cleaned, 0);
    assert!(stray.join("junk.bin").exists());
}
