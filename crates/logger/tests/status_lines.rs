//! Tests for quiet mode, status lines and file logging.

use logger::{failure, info, is_quiet, progress, set_quiet, success, warn, Level, Status};

#[test]
fn level_names_from_config_values() {
    assert_eq!(Level::parse("error"), Some(Level::Error));
    assert_eq!(Level::parse("err"), Some(Level::Error));
    assert_eq!(Level::parse("WARNING"), Some(Level::Warn));
    assert_eq!(Level::parse(" info "), Some(Level::Info));
    assert_eq!(Level::parse("Debug"), Some(Level::Debug));
    assert_eq!(Level::parse("loud"), None);
    assert_eq!(Level::parse(""), None);
    assert!(Level::Warn < Level::Debug);
    assert_eq!(Level::Warn.tag(), "[WARN]");
}

#[test]
fn status_markers() {
    assert_eq!(Status::Success.marker(), "✓");
    assert_eq!(Status::Failure.marker(), "✗");
}

#[test]
fn quiet_mode_toggles() {
    set_quiet(true);
    assert!(is_quiet());
    progress!("This should not appear");
    success!("Nor this");
    failure!("This always appears");

    set_quiet(false);
    assert!(!is_quiet());
    progress!("Progress line {}", 42);
}

#[cfg(feature = "file-logging")]
#[test]
fn file_logging_captures_tagged_and_status_lines() {
    use logger::{close_file_logging, init_file_logging, set_level, Level};
    use std::fs;

    let dir = tempfile::tempdir().expect("temp dir");
    let log_path = dir.path().join("greenmove.log");

    set_level(Level::Info);
    assert!(init_file_logging(&log_path));

    info!("Loaded 12 trips");
    warn!("3 values could not be parsed");
    success!("Report written: global.pdf");
    failure!("No data for user u-404");
    progress!("progress text is console only");

    close_file_logging();

    let contents = fs::read_to_string(&log_path).expect("read log file");
    assert!(contents.contains("[INFO] Loaded 12 trips"));
    assert!(contents.contains("[WARN] 3 values could not be parsed"));
    assert!(contents.contains("✓ Report written: global.pdf"));
    assert!(contents.contains("✗ No data for user u-404"));
    assert!(!contents.contains("progress text"));
}
