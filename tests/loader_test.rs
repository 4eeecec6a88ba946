//! Integration tests for loading venue and suburb group documents

use brunch_directory::domain::suburb_groups::OTHERS_GROUP;
use brunch_directory::domain::LoadReport;
use brunch_directory::io::{DataSource, Loader};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

const VENUES: &str = r#"[
    {"name": "Bondi Social", "suburb": "Bondi", "cuisine": "Modern Australian",
     "packages": [{"price": 79, "days": ["Saturday", "Sunday"]}]},
    {"name": "Trattoria Enmore", "suburb": "Enmore", "cuisine": "Italian",
     "packages": [{"price": "65", "days": [6, 7]}]},
    {"suburb": "Newtown", "cuisine": "Mexican"},
    "not a venue",
    {"name": "Sakura Lane", "suburb": "Surry Hills", "cuisine": "Japanese"}
]"#;

const GROUPS: &str = r#"{"Eastern Suburbs": ["Bondi", "Coogee"], "Inner West": ["Enmore", "Newtown"]}"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> DataSource {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    DataSource::File(path)
}

fn loader() -> Loader {
    Loader::new(Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_load_store_from_files() {
    let dir = TempDir::new().unwrap();
    let venues = write(&dir, "venues.json", VENUES);
    let groups = write(&dir, "groups.json", GROUPS);

    let (store, report) = loader().load_store(&venues, Some(&groups)).await.unwrap();

    assert_eq!(report, LoadReport { loaded: 3, skipped: 2 });
    let names: Vec<&str> = store.venues().iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["Bondi Social", "Trattoria Enmore", "Sakura Lane"]);

    let labels: Vec<&str> = store.groups().iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["Eastern Suburbs", "Inner West", OTHERS_GROUP]);
    assert_eq!(store.groups().get(OTHERS_GROUP).unwrap().suburbs, vec!["Surry Hills"]);
}

#[tokio::test]
async fn test_without_groups_everything_is_others() {
    let dir = TempDir::new().unwrap();
    let venues = write(&dir, "venues.json", VENUES);

    let (store, _) = loader().load_store(&venues, None).await.unwrap();
    assert_eq!(store.groups().len(), 1);
    assert_eq!(
        store.groups().get(OTHERS_GROUP).unwrap().suburbs,
        vec!["Bondi", "Enmore", "Surry Hills"]
    );
}

#[tokio::test]
async fn test_missing_file_names_the_source() {
    let missing = DataSource::File(Path::new("/nonexistent/venues.json").to_path_buf());
    let err = loader().load_store(&missing, None).await.unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/venues.json"));
}

#[tokio::test]
async fn test_top_level_must_be_array() {
    let dir = TempDir::new().unwrap();
    let venues = write(&dir, "venues.json", r#"{"venues": []}"#);
    let err = loader().load_venue_records(&venues).await.unwrap_err();
    assert!(format!("{err:#}").contains("expected an array"));
}

#[tokio::test]
async fn test_bad_groups_document_fails() {
    let dir = TempDir::new().unwrap();
    let venues = write(&dir, "venues.json", VENUES);
    let groups = write(&dir, "groups.json", r#"["Bondi"]"#);
    assert!(loader().load_store(&venues, Some(&groups)).await.is_err());
}
