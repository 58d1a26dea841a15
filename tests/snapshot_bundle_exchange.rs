use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use wellbeingd::backup;
use wellbeingd::model::{AgeGroup, CheckIn, Feeling};
use wellbeingd::{Action, Store};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn populated_workspace() -> (PathBuf, wellbeingd::AppState) {
    let workspace = temp_dir("wellbeing-bundle-src");
    let mut store = Store::open(&workspace).expect("open workspace");
    store
        .dispatch(Action::AddCheckIn {
            check_in: CheckIn {
                id: "c1".to_string(),
                student_id: "stu_1".to_string(),
                created_at: 1_000,
                feeling: Feeling::Happy,
                age_group: AgeGroup::Ages11To17,
                answers: Default::default(),
            },
        })
        .expect("check-in");
    let state = store.state().clone();
    (workspace, state)
}

#[test]
fn export_then_import_moves_the_snapshot_between_workspaces() {
    let (src, expected) = populated_workspace();
    let bundle = temp_dir("wellbeing-bundle-out").join("snapshot.zip");
    let summary = backup::export_snapshot_bundle(&src, &bundle).expect("export");
    assert_eq!(summary.bundle_format, backup::BUNDLE_FORMAT_V1);
    assert_eq!(summary.entry_count, 2);

    let dst = temp_dir("wellbeing-bundle-dst");
    let imported = backup::import_snapshot_bundle(&bundle, &dst).expect("import");
    assert_eq!(imported.bundle_format_detected, backup::BUNDLE_FORMAT_V1);
    assert_eq!(imported.state, expected);

    let reopened = Store::open(&dst).expect("reopen imported workspace");
    assert_eq!(reopened.state(), &expected);
}

#[test]
fn bare_json_snapshot_imports_as_legacy() {
    let (_src, expected) = populated_workspace();
    // Write the raw state as a plain .json file, no bundle wrapper.
    let raw = serde_json::to_string(&expected).expect("serialize");
    let json_path = temp_dir("wellbeing-bundle-raw").join("state.json");
    std::fs::write(&json_path, raw).expect("write raw snapshot");

    let dst = temp_dir("wellbeing-bundle-dst2");
    let imported = backup::import_snapshot_bundle(&json_path, &dst).expect("import");
    assert_eq!(imported.bundle_format_detected, "legacy-json");
    assert_eq!(imported.state, expected);
}

#[test]
fn tampered_state_entry_fails_the_digest_check() {
    let (src, _) = populated_workspace();
    let bundle_dir = temp_dir("wellbeing-bundle-tamper");
    let bundle = bundle_dir.join("snapshot.zip");
    backup::export_snapshot_bundle(&src, &bundle).expect("export");

    // Rebuild the zip with a modified state entry but the original manifest.
    let file = std::fs::File::open(&bundle).expect("open bundle");
    let mut archive = zip::ZipArchive::new(file).expect("read bundle");
    let mut manifest = String::new();
    let mut state = String::new();
    {
        use std::io::Read;
        archive
            .by_name("manifest.json")
            .expect("manifest")
            .read_to_string(&mut manifest)
            .expect("read manifest");
        archive
            .by_name("state/state.json")
            .expect("state")
            .read_to_string(&mut state)
            .expect("read state");
    }
    state.push(' ');
    let tampered = bundle_dir.join("tampered.zip");
    {
        use std::io::Write;
        let out = std::fs::File::create(&tampered).expect("create tampered");
        let mut zip = zip::ZipWriter::new(out);
        let opts = zip::write::FileOptions::default();
        zip.start_file("manifest.json", opts).expect("start manifest");
        zip.write_all(manifest.as_bytes()).expect("write manifest");
        zip.start_file("state/state.json", opts).expect("start state");
        zip.write_all(state.as_bytes()).expect("write state");
        zip.finish().expect("finish");
    }

    let dst = temp_dir("wellbeing-bundle-dst3");
    let err = backup::import_snapshot_bundle(&tampered, &dst);
    assert!(err.is_err());
    assert!(err.unwrap_err().to_string().contains("digest mismatch"));
}
