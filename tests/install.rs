// tests/install.rs

//! Installation flow tests: directory matching, malformed entries, failures.

mod common;

use common::{MemoryIndex, RecordingInstaller, RecordingRepacker, context, setup_output_root};
use debcollect::{InstallIssue, InvocationOutcome, PackageKey, collect, install};
use std::fs;

#[test]
fn test_install_single_archive() {
    let (_temp, root) = setup_output_root();
    let dir = root.path().join("foo_bionic_amd64");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("foo_1.0_amd64.deb"), b"!<arch>\n").unwrap();

    let index = MemoryIndex::new();
    let repacker = RecordingRepacker::new();
    let installer = RecordingInstaller::new();
    let ctx = context(&root, "bionic", &index, &repacker, &installer);

    let report = install(&ctx, &["foo"]).unwrap();

    assert!(report.is_clean(), "unexpected issues: {:?}", report.issues);
    let calls = installer.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, vec![dir.join("foo_1.0_amd64.deb")]);
    assert!(calls[0].1, "force flags expected by default");
    assert_eq!(calls[0].2, dir);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.installed[0].key, PackageKey::new("foo", "bionic", "amd64"));
}

#[test]
fn test_install_reports_malformed_entry() {
    let (_temp, root) = setup_output_root();
    fs::create_dir(root.path().join("bad-entry")).unwrap();

    let index = MemoryIndex::new();
    let repacker = RecordingRepacker::new();
    let installer = RecordingInstaller::new();
    let ctx = context(&root, "bionic", &index, &repacker, &installer);

    let report = install(&ctx, &["anything"]).unwrap();

    assert_eq!(report.invalid_entries(), vec!["bad-entry"]);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].to_string(), "invalid directory name: bad-entry");
    assert!(installer.calls.borrow().is_empty());
    assert_eq!(report.unmatched, vec!["anything"]);
}

#[test]
fn test_install_only_requested_names() {
    let (_temp, root) = setup_output_root();
    for dir_name in ["foo_bionic_amd64", "bar_bionic_amd64", "foobar_bionic_amd64"] {
        let dir = root.path().join(dir_name);
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("pkg_1.0_amd64.deb"), b"!<arch>\n").unwrap();
    }

    let index = MemoryIndex::new();
    let repacker = RecordingRepacker::new();
    let installer = RecordingInstaller::new();
    let ctx = context(&root, "bionic", &index, &repacker, &installer);

    let report = install(&ctx, &["foo"]).unwrap();

    let calls = installer.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].2, root.path().join("foo_bionic_amd64"));
    assert_eq!(report.skipped, 2);
    assert!(report.unmatched.is_empty());
}

#[test]
fn test_install_every_matching_directory() {
    let (_temp, root) = setup_output_root();
    for dir_name in ["foo_bionic_amd64", "foo_bionic_i386"] {
        let dir = root.path().join(dir_name);
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("foo_1.0.deb"), b"!<arch>\n").unwrap();
    }

    let index = MemoryIndex::new();
    let repacker = RecordingRepacker::new();
    let installer = RecordingInstaller::new();
    let ctx = context(&root, "bionic", &index, &repacker, &installer);

    let report = install(&ctx, &["foo"]).unwrap();

    assert_eq!(report.installed.len(), 2);
    assert_eq!(installer.calls.borrow().len(), 2);
}

#[test]
fn test_install_failure_is_reported_and_batch_continues() {
    let (_temp, root) = setup_output_root();
    for dir_name in ["bar_bionic_amd64", "foo_bionic_amd64"] {
        let dir = root.path().join(dir_name);
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("x_1.0_amd64.deb"), b"!<arch>\n").unwrap();
    }

    let index = MemoryIndex::new();
    let repacker = RecordingRepacker::new();
    let installer = RecordingInstaller::returning(InvocationOutcome::Failed { code: Some(1) });
    let ctx = context(&root, "bionic", &index, &repacker, &installer);

    let report = install(&ctx, &["foo", "bar"]).unwrap();

    assert_eq!(installer.calls.borrow().len(), 2);
    assert_eq!(report.succeeded(), 0);
    assert_eq!(report.issues.len(), 2);
    assert!(report
        .issues
        .iter()
        .all(|issue| matches!(issue, InstallIssue::Install { .. })));
}

#[test]
fn test_install_directory_without_archives() {
    let (_temp, root) = setup_output_root();
    let dir = root.path().join("foo_bionic_amd64");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("collection.toml"), "").unwrap();

    let index = MemoryIndex::new();
    let repacker = RecordingRepacker::new();
    let installer = RecordingInstaller::new();
    let ctx = context(&root, "bionic", &index, &repacker, &installer);

    let report = install(&ctx, &["foo"]).unwrap();

    assert!(installer.calls.borrow().is_empty());
    assert!(matches!(
        &report.issues[..],
        [InstallIssue::NoArchives { entry }] if entry == "foo_bionic_amd64"
    ));
}

#[test]
fn test_install_respects_force_setting() {
    let (_temp, root) = setup_output_root();
    let dir = root.path().join("foo_bionic_amd64");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("foo_1.0_amd64.deb"), b"!<arch>\n").unwrap();

    let index = MemoryIndex::new();
    let repacker = RecordingRepacker::new();
    let installer = RecordingInstaller::new();
    let ctx = context(&root, "bionic", &index, &repacker, &installer).with_force(false);

    install(&ctx, &["foo"]).unwrap();

    assert!(!installer.calls.borrow()[0].1);
}

#[test]
fn test_install_plain_file_entry() {
    let (_temp, root) = setup_output_root();
    fs::write(root.path().join("foo_bionic_amd64"), b"").unwrap();

    let index = MemoryIndex::new();
    let repacker = RecordingRepacker::new();
    let installer = RecordingInstaller::new();
    let ctx = context(&root, "bionic", &index, &repacker, &installer);

    let report = install(&ctx, &["foo"]).unwrap();

    assert!(installer.calls.borrow().is_empty());
    assert!(matches!(&report.issues[..], [InstallIssue::NotADirectory { .. }]));
}

#[test]
fn test_collect_then_install() {
    let (_temp, root) = setup_output_root();
    let index = MemoryIndex::new()
        .with_package("curl", "amd64", &[&["libc6"], &["libcurl4"]])
        .with_package("odd_name", "amd64", &[&["libfoo"]]);
    let repacker = RecordingRepacker::new();
    let installer = RecordingInstaller::new();
    let ctx = context(&root, "bionic", &index, &repacker, &installer);

    let collected = collect(&ctx, &["curl", "odd_name"]);
    assert!(collected.is_clean());

    let report = install(&ctx, &["curl", "odd_name"]).unwrap();

    assert!(report.is_clean(), "unexpected issues: {:?}", report.issues);
    let calls = installer.calls.borrow();
    assert_eq!(calls.len(), 2);

    let curl_dir = root.path().join("curl_bionic_amd64");
    let curl_call = calls.iter().find(|c| c.2 == curl_dir).unwrap();
    assert_eq!(
        curl_call.0,
        vec![
            curl_dir.join("libc6_1.0_all.deb"),
            curl_dir.join("libcurl4_1.0_all.deb")
        ]
    );

    let names: Vec<&str> = report.installed.iter().map(|d| d.key.name.as_str()).collect();
    assert!(names.contains(&"odd_name"));
}

#[test]
fn test_install_missing_output_root_fails() {
    let temp = tempfile::tempdir().unwrap();
    let root = debcollect::OutputRoot::new(temp.path().join("absent"));

    let index = MemoryIndex::new();
    let repacker = RecordingRepacker::new();
    let installer = RecordingInstaller::new();
    let ctx = context(&root, "bionic", &index, &repacker, &installer);

    assert!(install(&ctx, &["foo"]).is_err());
}

#[test]
fn test_install_legacy_entry_with_empty_distribution() {
    let (_temp, root) = setup_output_root();
    let dir = root.path().join("foo__amd64");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("foo_1.0_amd64.deb"), b"!<arch>\n").unwrap();

    let index = MemoryIndex::new();
    let repacker = RecordingRepacker::new();
    let installer = RecordingInstaller::new();
    let ctx = context(&root, "bionic", &index, &repacker, &installer);

    let report = install(&ctx, &["foo"]).unwrap();

    assert!(report.is_clean(), "unexpected issues: {:?}", report.issues);
    let calls = installer.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, vec![dir.join("foo_1.0_amd64.deb")]);
    assert_eq!(report.installed[0].key, PackageKey::new("foo", "", "amd64"));
}
