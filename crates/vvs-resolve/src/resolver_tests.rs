use chrono::{Duration, TimeZone};
use serde_json::json;
use vvs_core::{FileEntry, MemoryStore, ParentRef};

use super::*;
use crate::freshness::LAST_OPENED_KEY;
use crate::selection::LINKED_RESOURCES_KEY;

fn t(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes)
}

/// `study` holds `ct` (one file), `series` (sub-folder with two slices)
/// and a viewer config file.
fn study() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.insert_folder(Folder::new("study", "Study", ParentRef::Collection("c".into()), t(0)));
    store.insert_folder(Folder::new("series", "series", ParentRef::Folder("study".into()), t(0)));
    add_item(&mut store, "ct", "ct.nrrd", "study", t(0), &["ct.nrrd"]);
    add_item(&mut store, "cfg", ".volview_config.yaml", "study", t(0), &[".volview_config.yaml"]);
    add_item(&mut store, "slices", "slices", "series", t(0), &["IM1.dcm", "IM2.dcm"]);
    store
}

fn add_item(
    store: &mut MemoryStore,
    id: &str,
    name: &str,
    folder: &str,
    created: DateTime<Utc>,
    files: &[&str],
) {
    store.insert_item(Item::new(id, name, folder, created));
    for (n, file) in files.iter().enumerate() {
        store.insert_file(FileEntry::new(&format!("{id}-{n}"), file, id, 1), None);
    }
}

fn add_session(
    store: &mut MemoryStore,
    id: &str,
    folder: &str,
    created: DateTime<Utc>,
    linked: Option<serde_json::Value>,
) {
    add_item(store, id, "session.volview.zip", folder, created, &["session.volview.zip"]);
    if let Some(linked) = linked {
        let mut item = store.item(id).unwrap().unwrap();
        item.meta.insert(LINKED_RESOURCES_KEY.into(), linked);
        store.insert_item(item);
    }
}

fn paths(resolution: &Resolution) -> Vec<&str> {
    resolution.files().iter().map(|f| f.path.as_str()).collect()
}

fn rules() -> LoadableRules {
    LoadableRules::default()
}

#[test]
fn test_folder_without_session_lists_loadable_tree() {
    let mut store = study();
    // a session nested one level down is not a direct child
    add_session(&mut store, "nested", "series", t(5), None);

    let resolution = resolve_files(&store, "study", None, &rules()).unwrap();
    assert!(resolution.session().is_none());
    assert_eq!(
        paths(&resolution),
        vec!["ct.nrrd", "series/slices/IM1.dcm", "series/slices/IM2.dcm"]
    );
}

#[test]
fn test_newest_direct_session_wins_without_selection() {
    let mut store = study();
    add_session(&mut store, "old", "study", t(1), None);
    add_session(&mut store, "new", "study", t(9), None);

    let resolution = resolve_files(&store, "study", None, &rules()).unwrap();
    assert_eq!(resolution.session().unwrap().id, "new");
    assert_eq!(paths(&resolution), vec!["session.volview.zip"]);
}

#[test]
fn test_empty_selection_behaves_like_none() {
    let mut store = study();
    add_session(&mut store, "s", "study", t(1), None);
    let empty = SelectionSet::default();
    let resolution = resolve_files(&store, "study", Some(&empty), &rules()).unwrap();
    assert_eq!(resolution.session().unwrap().id, "s");
}

#[test]
fn test_selected_session_supersedes_selection() {
    let mut store = study();
    add_session(&mut store, "s1", "study", t(1), None);
    add_session(&mut store, "s2", "study", t(3), None);

    let selection = SelectionSet::new(Vec::<String>::new(), ["ct", "s1", "s2", "gone"]);
    let resolution = resolve_files(&store, "study", Some(&selection), &rules()).unwrap();
    assert_eq!(resolution.session().unwrap().id, "s2");
}

#[test]
fn test_matching_session_at_same_time_as_inputs_is_used() {
    let mut store = study();
    add_session(
        &mut store,
        "s",
        "study",
        t(0),
        Some(json!({"folders": ["series"], "items": ["ct"]})),
    );

    let selection = SelectionSet::new(["series"], ["ct"]);
    let resolution = resolve_files(&store, "study", Some(&selection), &rules()).unwrap();
    assert_eq!(resolution.session().unwrap().id, "s");
}

#[test]
fn test_stale_matching_session_falls_back_to_files() {
    let mut store = study();
    add_session(
        &mut store,
        "s",
        "study",
        t(10),
        Some(json!({"folders": ["series"], "items": ["ct"]})),
    );
    let mut ct = store.item("ct").unwrap().unwrap();
    ct.meta.insert(LAST_OPENED_KEY.into(), json!("2024-06-01T09:20:00.000Z"));
    store.insert_item(ct);

    let selection = SelectionSet::new(["series"], ["ct"]);
    let resolution = resolve_files(&store, "study", Some(&selection), &rules()).unwrap();
    assert!(resolution.session().is_none());
    assert_eq!(
        paths(&resolution),
        vec!["slices/IM1.dcm", "slices/IM2.dcm", "ct.nrrd"]
    );
}

#[test]
fn test_session_for_other_selection_is_ignored() {
    let mut store = study();
    add_session(
        &mut store,
        "s",
        "study",
        t(30),
        Some(json!({"folders": [], "items": ["ct"]})),
    );

    let selection = SelectionSet::new(["series"], ["ct"]);
    let resolution = resolve_files(&store, "study", Some(&selection), &rules()).unwrap();
    assert!(resolution.session().is_none());
    assert_eq!(resolution.files().len(), 3);
}

#[test]
fn test_newest_matching_session_is_chosen() {
    let mut store = study();
    let linked = json!({"folders": [], "items": ["ct"]});
    add_session(&mut store, "a", "study", t(5), Some(linked.clone()));
    add_session(&mut store, "b", "study", t(7), Some(linked));

    let selection = SelectionSet::new(Vec::<String>::new(), ["ct"]);
    let resolution = resolve_files(&store, "study", Some(&selection), &rules()).unwrap();
    assert_eq!(resolution.session().unwrap().id, "b");
}

#[test]
fn test_selection_files_skip_session_and_config_artifacts() {
    let mut store = study();
    add_session(&mut store, "nested", "series", t(0), None);

    let selection = SelectionSet::new(["study"], Vec::<String>::new());
    let resolution = resolve_files(&store, "study", Some(&selection), &rules()).unwrap();
    let listed = paths(&resolution);
    assert!(listed.iter().all(|p| !p.contains("volview")));
    assert_eq!(listed.len(), 3);
}

#[test]
fn test_missing_folder_is_not_found() {
    let err = resolve_files(&study(), "nope", None, &rules()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::NotFound { kind, .. }) if kind == "Folder"
    ));
}

#[test]
fn test_session_download_without_session_is_not_found() {
    let err = resolve_session_download(&study(), "study", None, &rules()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::NotFound { kind, .. }) if kind == "Session"
    ));
}

#[test]
fn test_session_download_returns_session_files() {
    let mut store = study();
    add_session(&mut store, "s", "study", t(2), None);
    let session = resolve_session_download(&store, "study", None, &rules()).unwrap();
    assert_eq!(session.item.id, "s");
    assert_eq!(session.files[0].file.id, "s-0");
}
