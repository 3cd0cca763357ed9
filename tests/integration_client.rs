// Integration tests driving FilterClient against fake filter executables —
// small shell scripts standing in for the real binary, so the full
// spawn/collect/normalize path runs without the actual filter installed.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;

use firebreak::screen::{FilterClient, FilterMode, FilterResult, InvocationDefaults};

/// Write an executable shell script into `dir` and return its path.
fn fake_filter(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("ai-filter");
    fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A filter whose verdict depends on the text it is given: BLOCK → blocked
/// with a filtered rendition, GARBAGE → non-JSON stdout, CRASH → exit 3
/// with stderr, anything else → safe.
fn scripted_filter(dir: &TempDir) -> PathBuf {
    fake_filter(
        dir,
        r#"case "$2" in
  *BLOCK*) printf '{"safe": false, "reason": "blocked_term", "matched_rules": ["kw"], "filtered_content": "[redacted]"}'; exit 1 ;;
  *GARBAGE*) printf 'not json'; exit 0 ;;
  *CRASH*) echo "internal filter panic" >&2; exit 3 ;;
  *) printf '{"safe": true, "score": 0.95}'; exit 0 ;;
esac
"#,
    )
}

// ============================================================
// Construction
// ============================================================

#[test]
fn construction_fails_fast_for_missing_executable() {
    let result = FilterClient::new("/nonexistent/ai-filter", InvocationDefaults::default());
    let err = result.err().expect("construction should fail");
    assert!(err.to_string().contains("not found"), "error was: {err}");
}

// ============================================================
// Blocking mode
// ============================================================

#[test]
fn blocking_check_parses_safe_verdict() {
    let dir = TempDir::new().unwrap();
    let client = FilterClient::new(scripted_filter(&dir), InvocationDefaults::default()).unwrap();

    match client.check("all good here") {
        FilterResult::Evaluated(v) => {
            assert!(v.safe);
            assert_eq!(v.score, Some(0.95));
        }
        other => panic!("expected Evaluated, got {other:?}"),
    }
}

#[test]
fn blocking_check_treats_exit_one_as_blocked_verdict() {
    let dir = TempDir::new().unwrap();
    let client = FilterClient::new(scripted_filter(&dir), InvocationDefaults::default()).unwrap();

    match client.check("please BLOCK this") {
        FilterResult::Evaluated(v) => {
            assert!(!v.safe);
            assert_eq!(v.reason.as_deref(), Some("blocked_term"));
            assert_eq!(v.filtered_content.as_deref(), Some("[redacted]"));
        }
        other => panic!("expected Evaluated, got {other:?}"),
    }
}

#[test]
fn blocking_check_times_out_and_kills_the_filter() {
    let dir = TempDir::new().unwrap();
    let slow = fake_filter(&dir, "sleep 5\n");
    let client = FilterClient::new(slow, InvocationDefaults::default())
        .unwrap()
        .with_timeout(Duration::from_millis(200));

    match client.check("anything") {
        FilterResult::ToolFailure { message } => {
            assert!(message.contains("timed out"), "message was: {message}");
        }
        other => panic!("expected ToolFailure, got {other:?}"),
    }
}

#[test]
fn filter_text_substitutes_blocked_content() {
    let dir = TempDir::new().unwrap();
    let client = FilterClient::new(scripted_filter(&dir), InvocationDefaults::default()).unwrap();

    assert_eq!(client.filter_text("fine text"), "fine text");
    assert_eq!(client.filter_text("BLOCK me"), "[redacted]");
}

#[test]
fn filter_text_falls_back_to_replacement_on_tool_failure() {
    let dir = TempDir::new().unwrap();
    let client = FilterClient::new(scripted_filter(&dir), InvocationDefaults::default())
        .unwrap()
        .with_replacement("[unavailable]");

    // GARBAGE makes the filter emit non-JSON: a tool failure, and the
    // original text must not leak through.
    assert_eq!(client.filter_text("GARBAGE in"), "[unavailable]");
}

// ============================================================
// Concurrent mode
// ============================================================

#[tokio::test]
async fn async_check_parses_verdicts() {
    let dir = TempDir::new().unwrap();
    let client = FilterClient::new(scripted_filter(&dir), InvocationDefaults::default()).unwrap();

    assert!(client.check_async("hello").await.is_safe());
    match client.check_async("BLOCK it").await {
        FilterResult::Evaluated(v) => assert!(!v.safe),
        other => panic!("expected Evaluated, got {other:?}"),
    }
}

#[tokio::test]
async fn async_check_surfaces_crash_with_stderr() {
    let dir = TempDir::new().unwrap();
    let client = FilterClient::new(scripted_filter(&dir), InvocationDefaults::default()).unwrap();

    match client.check_async("CRASH now").await {
        FilterResult::ToolFailure { message } => {
            assert!(message.contains("exit status 3"), "message was: {message}");
            assert!(
                message.contains("internal filter panic"),
                "message was: {message}"
            );
        }
        other => panic!("expected ToolFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn async_check_times_out() {
    let dir = TempDir::new().unwrap();
    let slow = fake_filter(&dir, "sleep 5\n");
    let client = FilterClient::new(slow, InvocationDefaults::default())
        .unwrap()
        .with_timeout(Duration::from_millis(200));

    match client.check_async("anything").await {
        FilterResult::ToolFailure { message } => {
            assert!(message.contains("timed out"), "message was: {message}");
        }
        other => panic!("expected ToolFailure, got {other:?}"),
    }
}

// ============================================================
// Argument passing
// ============================================================

#[tokio::test]
async fn text_with_shell_metacharacters_arrives_as_one_argument() {
    let dir = TempDir::new().unwrap();
    // Record argc and the raw text argument, then report safe.
    let recorder = fake_filter(
        &dir,
        r#"out="$(dirname "$0")/args.txt"
printf '%s\n' "$#" > "$out"
printf '%s' "$2" >> "$out"
printf '{"safe": true}'
"#,
    );
    let client = FilterClient::new(recorder, InvocationDefaults::default()).unwrap();

    let tricky = r#"rm -rf /; echo "pwned" `id` --mode strict"#;
    assert!(client.check_async(tricky).await.is_safe());

    let recorded = fs::read_to_string(dir.path().join("args.txt")).unwrap();
    let (argc, text) = recorded.split_once('\n').unwrap();
    assert_eq!(argc, "2");
    assert_eq!(text, tricky);
}

#[tokio::test]
async fn config_and_mode_defaults_are_passed_through() {
    let dir = TempDir::new().unwrap();
    let recorder = fake_filter(
        &dir,
        r#"printf '%s\n' "$@" > "$(dirname "$0")/args.txt"
printf '{"safe": true}'
"#,
    );
    let defaults = InvocationDefaults {
        config_path: Some(dir.path().join("rules.yaml")),
        mode: Some(FilterMode::Strict),
    };
    let client = FilterClient::new(recorder, defaults).unwrap();

    assert!(client.check_async("text").await.is_safe());

    let recorded = fs::read_to_string(dir.path().join("args.txt")).unwrap();
    let args: Vec<&str> = recorded.lines().collect();
    assert_eq!(args[0], "check");
    assert_eq!(args[1], "text");
    assert_eq!(args[2], "--config");
    assert!(args[3].ends_with("rules.yaml"));
    assert_eq!(args[4], "--mode");
    assert_eq!(args[5], "strict");
}

// ============================================================
// Batch
// ============================================================

#[tokio::test]
async fn batch_preserves_order_and_isolates_failures() {
    let dir = TempDir::new().unwrap();
    let client = FilterClient::new(scripted_filter(&dir), InvocationDefaults::default()).unwrap();

    let texts: Vec<String> = [
        "first is fine",
        "GARBAGE in the middle",
        "third is fine",
        "BLOCK the fourth",
        "fifth is fine",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let results = client.check_batch(&texts, 3).await;
    assert_eq!(results.len(), 5);

    assert!(results[0].is_safe());
    assert!(matches!(results[1], FilterResult::ToolFailure { .. }));
    assert!(results[2].is_safe());
    match &results[3] {
        FilterResult::Evaluated(v) => assert!(!v.safe),
        other => panic!("expected Evaluated at index 3, got {other:?}"),
    }
    assert!(results[4].is_safe());
}
