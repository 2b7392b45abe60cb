// tests/end_to_end.rs
use std::fs;
use std::path::Path;

use lichen_territory::config::options::PassOptions;
use lichen_territory::progress::{NullProgress, RecordingProgress};
use lichen_territory::runner::{run, Pass};
use lichen_territory::store::MappingStore;
use lichen_territory::{s, PassError, TerritoryEntry};

const RECORDS: &str = "\
Photo Name,Description,Price
DSC0001,\"Credit: J. Doe. territorial acknowledgement to the Secwepemc.\",10
DSC0002,\"Crustose lichen, Credit: A. Smith. Donated.\",10
DSC0003,\"Territorial acknowledgement to the Coast Salish Nations of Musqueam, Tsleil-Waututh and Squamish.\",10
";

fn workspace(dir: &Path, mapping: &str) -> PassOptions {
    let mapping_path = dir.join("corrected_territorial_mapping.json");
    let records_path = dir.join("output.csv");
    fs::write(&mapping_path, mapping).unwrap();
    fs::write(&records_path, RECORDS).unwrap();
    PassOptions::with_paths(mapping_path, records_path)
}

#[test]
fn extract_from_empty_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let opts = workspace(dir.path(), "{}");
    fs::write(
        &opts.records,
        "Photo Name,Description\nDSC0001,Credit: J. Doe. territorial acknowledgement to the Secwepemc.\n",
    )
    .unwrap();

    let report = run(Pass::Extract, &opts, &mut NullProgress).unwrap();
    assert!(report.persisted);
    assert_eq!(report.count_added(), 1);

    let text = fs::read_to_string(&opts.mapping).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "DSC0001": {
                "first_nation": "Secwepemc",
                "full_acknowledgement": "territorial acknowledgement to the Secwepemc"
            }
        })
    );
}

#[test]
fn extract_fills_only_missing_and_counts() {
    let dir = tempfile::tempdir().unwrap();
    let opts = workspace(
        dir.path(),
        r#"{"DSC0001": {"first_nation": "Tahltan", "full_acknowledgement": "hand written"}}"#,
    );

    let mut progress = RecordingProgress::default();
    let report = run(Pass::Extract, &opts, &mut progress).unwrap();

    assert_eq!(report.skipped_existing, 1);
    assert_eq!(report.unmatched, 1);
    assert_eq!(report.count_added(), 1);
    assert_eq!(progress.total, Some(3));
    assert_eq!(progress.items.len(), 2);
    assert!(progress.finished);

    let m = MappingStore::new(&opts.mapping).load().unwrap();
    assert_eq!(m.get("DSC0001").unwrap().first_nation, "Tahltan");
    assert_eq!(m.get("DSC0003").unwrap().first_nation, "Musqueam, Tsleil-Waututh, Squamish");
    assert!(!m.contains("DSC0002"));
    assert_eq!(report.tally.get("Tahltan"), 1);
}

#[test]
fn dry_run_leaves_document_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = workspace(dir.path(), "{}");
    opts.dry_run = true;

    let report = run(Pass::Extract, &opts, &mut NullProgress).unwrap();
    assert_eq!(report.count_added(), 2);
    assert!(!report.persisted);
    assert_eq!(fs::read_to_string(&opts.mapping).unwrap(), "{}");
}

#[test]
fn missing_inputs_abort_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = workspace(dir.path(), "{}");
    opts.records = dir.path().join("absent.csv");
    let err = run(Pass::Extract, &opts, &mut NullProgress).unwrap_err();
    assert!(err.is_missing_input());
    assert_eq!(fs::read_to_string(&opts.mapping).unwrap(), "{}");

    opts.mapping = dir.path().join("absent.json");
    let err = run(Pass::Tally, &opts, &mut NullProgress).unwrap_err();
    assert!(matches!(err, PassError::MissingInputFile(p) if p.ends_with("absent.json")));
}

#[test]
fn init_creates_once() {
    let dir = tempfile::tempdir().unwrap();
    let opts = PassOptions::with_paths(dir.path().join("new/mapping.json"), dir.path().join("r.csv"));

    let first = run(Pass::Init, &opts, &mut NullProgress).unwrap();
    assert!(first.persisted);
    let second = run(Pass::Init, &opts, &mut NullProgress).unwrap();
    assert!(!second.persisted);
    assert_eq!(second.entries, 0);
}

#[test]
fn fix_remove_and_normalize_passes() {
    let dir = tempfile::tempdir().unwrap();
    let opts = workspace(
        dir.path(),
        r#"{
            "DSC0001": {"first_nation": "MUSQUEAM", "full_acknowledgement": "a"},
            "DSC0002": {"first_nation": "Tahltan", "full_acknowledgement": "b"}
        }"#,
    );

    let fix = Pass::Fix(vec![(s!("DSC0009"), TerritoryEntry { first_nation: s!("Gitxsan"), full_acknowledgement: s!() })]);
    assert_eq!(run(fix, &opts, &mut NullProgress).unwrap().count_added(), 1);

    let bad = Pass::Fix(vec![(s!("DSC0002"), TerritoryEntry { first_nation: s!(""), full_acknowledgement: s!() })]);
    assert!(matches!(run(bad, &opts, &mut NullProgress), Err(PassError::EmptyNation { .. })));

    let removed = run(Pass::Remove(vec![s!("DSC0002"), s!("DSC4242")]), &opts, &mut NullProgress).unwrap();
    assert_eq!(removed.count_removed(), 1);

    let normalized = run(Pass::Renormalize, &opts, &mut NullProgress).unwrap();
    assert_eq!(normalized.count_replaced(), 1);

    let m = MappingStore::new(&opts.mapping).load().unwrap();
    assert_eq!(m.len(), 2);
    assert_eq!(m.get("DSC0001").unwrap().first_nation, "Musqueam");
    assert_eq!(m.get("DSC0009").unwrap().full_acknowledgement, "territorial acknowledgement to the Gitxsan");
}

#[test]
fn audit_is_read_only_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    let opts = workspace(dir.path(), "{}");
    let out = dir.path().join("reports/unmapped.csv");

    let report = run(Pass::Audit { out: Some(out.clone()) }, &opts, &mut NullProgress).unwrap();
    let audit = report.audit.unwrap();
    assert_eq!(audit.unmapped.len(), 3);
    assert_eq!(audit.extractable(), 2);
    assert!(!report.persisted);
    assert_eq!(fs::read_to_string(&opts.mapping).unwrap(), "{}");

    let csv = fs::read_to_string(&out).unwrap();
    assert!(csv.starts_with("photo_id,hint,would_extract,description\n"));
    assert_eq!(csv.lines().filter(|l| l.starts_with("DSC")).count(), 3);
}

#[test]
fn blank_nation_entry_blocks_writes_until_removed() {
    let dir = tempfile::tempdir().unwrap();
    let original = r#"{"BAD": {"first_nation": " , ", "full_acknowledgement": ""}}"#;
    let opts = workspace(dir.path(), original);

    let tally = run(Pass::Tally, &opts, &mut NullProgress).unwrap();
    assert_eq!(tally.invalid, vec!["BAD"]);

    let err = run(Pass::Extract, &opts, &mut NullProgress).unwrap_err();
    assert!(matches!(&err, PassError::InvalidEntries { keys, .. } if keys == &vec![s!("BAD")]));
    assert_eq!(fs::read_to_string(&opts.mapping).unwrap(), original);

    let removed = run(Pass::Remove(vec![s!("BAD")]), &opts, &mut NullProgress).unwrap();
    assert!(removed.persisted);
    assert!(removed.invalid.is_empty());

    let report = run(Pass::Extract, &opts, &mut NullProgress).unwrap();
    assert!(report.persisted);
    assert_eq!(report.count_added(), 2);
}

#[test]
fn remove_reports_only_truly_absent_ids() {
    let dir = tempfile::tempdir().unwrap();
    let opts = workspace(
        dir.path(),
        r#"{
            "DSC0001": {"first_nation": "Tahltan", "full_acknowledgement": "a"},
            "DSC0002": {"first_nation": "Gitxsan", "full_acknowledgement": "b"}
        }"#,
    );

    let mut progress = RecordingProgress::default();
    let report = run(Pass::Remove(vec![s!("DSC0001"), s!("DSC0001")]), &opts, &mut progress).unwrap();
    assert_eq!(report.count_removed(), 1);
    assert!(report.not_found.is_empty());
    assert!(progress.lines.is_empty());

    let mut progress = RecordingProgress::default();
    let report = run(Pass::Remove(vec![s!("DSC0002"), s!("DSC4242"), s!("DSC4242")]), &opts, &mut progress).unwrap();
    assert_eq!(report.not_found, vec!["DSC4242"]);
    assert_eq!(progress.lines, vec!["1 id(s) were not in the mapping"]);
}
