//! Integration tests for the cached detector through the public API.

use chrono::{Duration, Utc};
use devkit_detect::config::DetectorConfig;
use devkit_detect::detector::FeatureDetector;
use devkit_detect::probe::mock::{self, MockProvider};
use devkit_detect::probe::{OfficeKey, RawResult};
use devkit_detect::records::Category;
use devkit_detect::DetectError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const FEATURE_LIST: &str = "Feature Name : NetFx3\r\nState : Enabled\r\n\r\nFeature Name : TelnetClient\r\nState : Disabled\r\n";

fn config(dir: &Path) -> DetectorConfig {
    DetectorConfig::default().with_cache_dir(dir)
}

fn git_provider() -> MockProvider {
    MockProvider::new().with_tool("git", "git version 2.43.0.windows.1")
}

fn write_office_entry(dir: &Path, age: Duration) {
    let timestamp = (Utc::now() - age).to_rfc3339();
    let content = format!(
        r#"{{"office": {{"data": {{"installed": true, "edition": "Cached"}}, "timestamp": "{}"}}}}"#,
        timestamp
    );
    fs::write(dir.join("feature_cache.json"), content).unwrap();
}

#[test]
fn two_calls_within_ttl_probe_once() {
    let temp = TempDir::new().unwrap();
    let detector = FeatureDetector::with_provider(config(temp.path()), git_provider());

    let first = detector.detect_software(false);
    let second = detector.detect_software(false);

    assert_eq!(first, second);
    assert_eq!(detector.provider().calls(&mock::locate_key("git")), 1);
}

#[test]
fn force_refresh_probes_exactly_once_more() {
    let temp = TempDir::new().unwrap();
    let detector = FeatureDetector::with_provider(config(temp.path()), git_provider());

    detector.detect_software(false);
    detector.detect_software(true);

    assert_eq!(detector.provider().calls(&mock::locate_key("git")), 2);
}

#[test]
fn cache_survives_restart() {
    let temp = TempDir::new().unwrap();
    let first = FeatureDetector::with_provider(config(temp.path()), git_provider());
    let software = first.detect_software(false);

    let second = FeatureDetector::with_provider(config(temp.path()), git_provider());
    assert_eq!(second.detect_software(false), software);
    assert_eq!(second.provider().total_calls(), 0);
}

#[test]
fn one_hour_old_entry_is_served_without_probing() {
    let temp = TempDir::new().unwrap();
    write_office_entry(temp.path(), Duration::hours(1));

    let detector = FeatureDetector::with_provider(config(temp.path()), MockProvider::new());
    let office = detector.detect_office(false);

    assert_eq!(office.edition.as_deref(), Some("Cached"));
    assert_eq!(detector.provider().total_calls(), 0);
}

#[test]
fn twenty_five_hour_old_entry_is_reprobed() {
    let temp = TempDir::new().unwrap();
    write_office_entry(temp.path(), Duration::hours(25));

    let provider = MockProvider::new().with_output(
        mock::office_key(OfficeKey::ClickToRun),
        "    ProductReleaseIds    REG_SZ    O365ProPlusRetail\r\n",
    );
    let detector = FeatureDetector::with_provider(config(temp.path()), provider);
    let office = detector.detect_office(false);

    assert_eq!(office.edition.as_deref(), Some("O365ProPlusRetail"));
    assert_eq!(
        detector.provider().calls(&mock::office_key(OfficeKey::ClickToRun)),
        1
    );
    let age = Utc::now() - detector.fetched_at(Category::Office).unwrap();
    assert!(age < Duration::minutes(1));
}

#[test]
fn clear_cache_deletes_file_and_next_call_recreates_it() {
    let temp = TempDir::new().unwrap();
    let detector = FeatureDetector::with_provider(config(temp.path()), git_provider());

    detector.detect_software(false);
    assert!(detector.cache_path().exists());

    detector.clear_cache();
    assert!(!detector.cache_path().exists());
    assert_eq!(detector.fetched_at(Category::Software), None);

    detector.detect_software(false);
    assert!(detector.cache_path().exists());
    assert_eq!(detector.provider().calls(&mock::locate_key("git")), 2);
}

#[test]
fn corrupt_cache_file_degrades_to_fresh_probe() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("feature_cache.json"), "\u{0}\u{1}not json at all").unwrap();

    let detector = FeatureDetector::with_provider(config(temp.path()), git_provider());
    let software = detector.detect_software(false);

    assert!(software.is_installed("git"));
    assert_eq!(detector.provider().calls(&mock::locate_key("git")), 1);

    let rewritten: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(detector.cache_path()).unwrap()).unwrap();
    assert!(rewritten.get("software").is_some());
}

#[test]
fn cache_file_deleted_between_runs() {
    let temp = TempDir::new().unwrap();
    let first = FeatureDetector::with_provider(config(temp.path()), git_provider());
    first.detect_software(false);
    fs::remove_file(first.cache_path()).unwrap();

    let second = FeatureDetector::with_provider(config(temp.path()), git_provider());
    assert!(second.detect_software(false).is_installed("git"));
    assert_eq!(second.provider().calls(&mock::locate_key("git")), 1);
}

#[test]
fn failing_category_does_not_block_siblings() {
    let temp = TempDir::new().unwrap();
    let provider = git_provider()
        .with_result(mock::LIST_FEATURES, RawResult::failed("Error: 740"))
        .with_output(
            mock::office_key(OfficeKey::ClickToRun),
            "    ProductReleaseIds    REG_SZ    ProPlus2021Volume\r\n",
        );
    let detector = FeatureDetector::with_provider(config(temp.path()), provider);

    let snapshot = detector.get_all_features(false);

    assert!(snapshot.windows_features.is_empty());
    assert!(snapshot.software.is_installed("git"));
    assert!(snapshot.office.installed);
    for category in Category::ALL {
        assert!(detector.fetched_at(category).is_some());
    }
}

#[test]
fn windows_features_from_list_and_details() {
    let temp = TempDir::new().unwrap();
    let provider = MockProvider::new().with_features(
        FEATURE_LIST,
        &[("TelnetClient", "Feature Name : TelnetClient\r\nState : Enabled\r\nRestart Required : Possible\r\n")],
    );
    let detector = FeatureDetector::with_provider(config(temp.path()), provider);

    let features = detector.detect_windows_features(false);

    assert_eq!(features.len(), 2);
    assert!(features.get("NetFx3").unwrap().installed);
    let telnet = features.get("TelnetClient").unwrap();
    assert!(telnet.installed);
    assert_eq!(telnet.details.get("Restart Required").unwrap(), "Possible");
}

#[test]
fn unknown_category_fails_loudly() {
    let temp = TempDir::new().unwrap();
    let detector = FeatureDetector::with_provider(config(temp.path()), MockProvider::new());

    let err = detector.detect_by_name("printers", false).unwrap_err();
    assert!(matches!(err, DetectError::UnknownCategory { ref name } if name == "printers"));
    assert!(!detector.cache_path().exists());
}

#[test]
fn snapshot_timestamp_is_call_time() {
    let temp = TempDir::new().unwrap();
    write_office_entry(temp.path(), Duration::hours(20));
    let detector = FeatureDetector::with_provider(config(temp.path()), MockProvider::new());

    let before = Utc::now();
    let snapshot = detector.get_all_features(false);

    assert!(snapshot.snapshot_timestamp >= before);
    let office_fetched = detector.fetched_at(Category::Office).unwrap();
    assert!(snapshot.snapshot_timestamp - office_fetched >= Duration::hours(20));
}

#[test]
fn future_dated_entry_is_reprobed() {
    let temp = TempDir::new().unwrap();
    write_office_entry(temp.path(), -Duration::days(365 * 50));

    let provider = MockProvider::new().with_output(
        mock::office_key(OfficeKey::ClickToRun),
        "    ProductReleaseIds    REG_SZ    O365ProPlusRetail\r\n",
    );
    let detector = FeatureDetector::with_provider(config(temp.path()), provider);
    let office = detector.detect_office(false);

    assert_eq!(office.edition.as_deref(), Some("O365ProPlusRetail"));
    assert_eq!(
        detector.provider().calls(&mock::office_key(OfficeKey::ClickToRun)),
        1
    );
    let fetched = detector.fetched_at(Category::Office).unwrap();
    assert!(fetched <= Utc::now() + Duration::minutes(1));
}

#[test]
fn unwritable_cache_dir_keeps_memory_authoritative() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not-a-dir");
    fs::write(&blocker, "plain file").unwrap();

    let detector = FeatureDetector::with_provider(config(&blocker.join("cache")), git_provider());
    let first = detector.detect_software(false);
    let second = detector.detect_software(false);

    assert!(first.is_installed("git"));
    assert_eq!(first, second);
    assert_eq!(detector.provider().calls(&mock::locate_key("git")), 1);
    assert!(!detector.cache_path().exists());
}
