use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracescope_engine::RuleCatalog;
use tracescope_runtime::store::{LOGS_DIR, SESSION_FILE};
use tracescope_runtime::{Error, SessionStore, export_notes};

const SERVER_LOG: &str = "\
2024-05-01 10:00:01 ERROR [http-1] request failed
com.acme.widgets.core.NullPointerException: widget id was null
\tat com.acme.widgets.core.Registry.lookup(Registry.java:88)
2024-05-01 10:00:02 ERROR [http-2] request failed
com.acme.widgets.core.NullPointerException: widget id was null
\tat com.acme.widgets.core.Registry.lookup(Registry.java:88)
2024-05-01 10:00:03 INFO [main] ok
";

const WORKER_LOG: &str = "\
Traceback (most recent call last):
  File \"/srv/jobs.py\", line 4, in run
ZeroDivisionError: division by zero
2024-05-01 10:00:04 INFO worker idle
";

struct Fixture {
    _dir: TempDir,
    inputs: PathBuf,
    store: SessionStore,
    catalog: RuleCatalog,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let inputs = dir.path().join("inputs");
        std::fs::create_dir_all(&inputs).unwrap();
        std::fs::write(inputs.join("server.log"), SERVER_LOG).unwrap();
        std::fs::write(inputs.join("worker.txt"), WORKER_LOG).unwrap();

        let store = SessionStore::open(dir.path().join("sessions")).unwrap();
        let catalog = RuleCatalog::from_json_str(
            r#"{
                "NullPointerException": {"definition": "Null dereference.", "weighting": 5},
                "ZeroDivisionError": {"definition": "Division by zero.", "weighting": 3},
                "com.acme.widgets": {"definition": "Widget registry."}
            }"#,
        )
        .unwrap();

        Self {
            _dir: dir,
            inputs,
            store,
            catalog,
        }
    }

    fn input(&self, name: &str) -> PathBuf {
        self.inputs.join(name)
    }

    fn create(&self, name: &str) -> tracescope_types::SessionData {
        self.store
            .create(
                &[self.input("server.log"), self.input("worker.txt")],
                Some(name),
                &self.catalog,
            )
            .unwrap()
    }
}

fn session_dir(store: &SessionStore, name: &str) -> PathBuf {
    store.root().join(name)
}

fn assert_is_file(path: &Path) {
    assert!(path.is_file(), "expected file at {}", path.display());
}

#[test]
fn test_create_copies_logs_and_classifies() {
    let fx = Fixture::new();
    let session = fx.create("Incident-1");

    let dir = session_dir(&fx.store, "Incident-1");
    assert_eq!(session.files_path, dir);
    assert_is_file(&dir.join(SESSION_FILE));
    assert_is_file(&dir.join(LOGS_DIR).join("server.log"));
    assert_is_file(&dir.join(LOGS_DIR).join("worker.txt"));

    assert_eq!(session.traces.len(), 2);
    let npe = session
        .traces
        .values()
        .find(|r| r.class_key.as_deref() == Some("NullPointerException"))
        .unwrap();
    assert_eq!(npe.count, 2);
    assert_eq!(npe.package_key.as_deref(), Some("com.acme.widgets"));

    assert_eq!(fx.store.load("Incident-1").unwrap(), session);
}

#[test]
fn test_create_rejects_existing_name() {
    let fx = Fixture::new();
    fx.create("Incident-1");
    let err = fx
        .store
        .create(&[fx.input("server.log")], Some("Incident-1"), &fx.catalog)
        .unwrap_err();
    assert!(matches!(err, Error::SessionExists(ref name) if name == "Incident-1"));
}

#[test]
fn test_create_skips_unreadable_inputs() {
    let fx = Fixture::new();
    let session = fx
        .store
        .create(
            &[fx.input("missing.log"), fx.input("worker.txt")],
            None,
            &fx.catalog,
        )
        .unwrap();
    assert!(session.session_name.starts_with("Session_"));
    assert_eq!(session.traces.len(), 1);
    assert!(!session.files_path.join(LOGS_DIR).join("missing.log").exists());
}

#[test]
fn test_list_newest_name_first() {
    let fx = Fixture::new();
    fx.create("A-session");
    let mut b = fx.create("B-session");
    b.notes = "first line of notes\nsecond".to_string();
    fx.store.save(&b).unwrap();

    let listed = fx.store.list().unwrap();
    let names: Vec<_> = listed.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["B-session", "A-session"]);
    assert_eq!(listed[0].trace_count, Some(2));
    assert_eq!(listed[0].notes_preview.as_deref(), Some("first line of notes"));
}

#[test]
fn test_list_tolerates_broken_session_file() {
    let fx = Fixture::new();
    fx.create("Broken");
    std::fs::write(session_dir(&fx.store, "Broken").join(SESSION_FILE), "{").unwrap();

    let listed = fx.store.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].trace_count, None);
}

#[test]
fn test_select_by_position_and_text() {
    let fx = Fixture::new();
    fx.create("Incident-1");

    let session = fx.store.select("Incident-1", "1").unwrap();
    let (trace, record) = session.selected().unwrap();
    assert_eq!(record.weight, 5);
    assert!(record.selected);
    let npe_trace = trace.to_string();

    let session = fx.store.select("Incident-1", "2").unwrap();
    assert!(!session.traces[&npe_trace].selected);
    assert_eq!(session.selected().unwrap().1.display_name, "ZeroDivisionError");

    let session = fx.store.select("Incident-1", &npe_trace).unwrap();
    assert_eq!(session.selected_trace.as_deref(), Some(npe_trace.as_str()));
    assert_eq!(session.traces.values().filter(|r| r.selected).count(), 1);

    let err = fx.store.select("Incident-1", "9").unwrap_err();
    assert!(matches!(err, Error::TraceNotFound(_)));
}

#[test]
fn test_notes_are_trimmed_and_exported() {
    let fx = Fixture::new();
    fx.create("Incident-1");
    fx.store.select("Incident-1", "1").unwrap();
    let session = fx
        .store
        .set_notes("Incident-1", "\n  Pool exhausted after deploy.  \n")
        .unwrap();
    assert_eq!(session.notes, "Pool exhausted after deploy.");

    let export = export_notes(&fx.store.load("Incident-1").unwrap());
    assert!(export.contains("h1. Troubleshooting Notes: Incident-1"));
    assert!(export.contains("com.acme.widgets.core.NullPointerException\n"));
    assert!(export.contains("Pool exhausted after deploy."));
}

#[test]
fn test_rename_moves_directory() {
    let fx = Fixture::new();
    fx.create("Old");
    fx.create("Taken");

    let session = fx.store.rename("Old", "  New ").unwrap();
    assert_eq!(session.session_name, "New");
    assert_eq!(session.files_path, session_dir(&fx.store, "New"));
    assert!(!session_dir(&fx.store, "Old").exists());
    assert_is_file(&session_dir(&fx.store, "New").join(LOGS_DIR).join("server.log"));
    assert_eq!(fx.store.load("New").unwrap().session_name, "New");
    assert!(matches!(fx.store.load("Old"), Err(Error::SessionNotFound(_))));

    assert!(matches!(fx.store.rename("New", "Taken"), Err(Error::SessionExists(_))));
    assert!(matches!(fx.store.rename("New", "New"), Err(Error::InvalidName { .. })));
    assert!(matches!(fx.store.rename("New", " "), Err(Error::InvalidName { .. })));
    assert!(matches!(fx.store.rename("Nope", "Other"), Err(Error::SessionNotFound(_))));
}

#[test]
fn test_delete_removes_index_entry_and_directory() {
    let fx = Fixture::new();
    fx.create("Gone");
    fx.store.delete("Gone").unwrap();
    assert!(!session_dir(&fx.store, "Gone").exists());
    assert!(fx.store.list().unwrap().is_empty());
    assert!(matches!(fx.store.delete("Gone"), Err(Error::SessionNotFound(_))));
}

#[test]
fn test_delete_tolerates_missing_directory() {
    let fx = Fixture::new();
    fx.create("Half");
    std::fs::remove_dir_all(session_dir(&fx.store, "Half")).unwrap();
    fx.store.delete("Half").unwrap();
    assert!(fx.store.index().unwrap().is_empty());
}

#[test]
fn test_reanalyze_is_idempotent_and_keeps_selection() {
    let fx = Fixture::new();
    fx.create("Incident-1");
    let selected = fx.store.select("Incident-1", "1").unwrap();

    let outcome = fx.store.reanalyze("Incident-1", &fx.catalog).unwrap();
    assert_eq!(outcome.files_read, 2);
    assert_eq!(outcome.session.traces, selected.traces);
    assert_eq!(outcome.session.selected_trace, selected.selected_trace);
}

#[test]
fn test_reanalyze_joins_logs_in_creation_order() {
    let fx = Fixture::new();
    // No terminator at the end of z.log: the block swallows the first line of the next file.
    let z = fx.input("z.log");
    let a = fx.input("a.log");
    std::fs::write(&z, "Traceback (most recent call last):\n  File \"x\", line 1\nValueError: v").unwrap();
    std::fs::write(&a, "worker restarted\n").unwrap();

    let created = fx.store.create(&[z, a], Some("Order"), &fx.catalog).unwrap();
    assert_eq!(created.log_files, vec!["z.log", "a.log"]);
    let key = "Traceback (most recent call last):\n  File \"x\", line 1\nValueError: v\nworker restarted";
    assert!(created.traces.contains_key(key));

    let selected = fx.store.select("Order", "1").unwrap();
    let outcome = fx.store.reanalyze("Order", &fx.catalog).unwrap();
    assert_eq!(outcome.session.traces, selected.traces);
    assert_eq!(outcome.session.selected_trace.as_deref(), Some(key));
    assert_eq!(outcome.session.log_files, vec!["z.log", "a.log"]);
}

#[test]
fn test_create_keeps_inputs_with_same_file_name() {
    let fx = Fixture::new();
    let node1 = fx.input("node1");
    let node2 = fx.input("node2");
    std::fs::create_dir_all(&node1).unwrap();
    std::fs::create_dir_all(&node2).unwrap();
    std::fs::write(node1.join("server.log"), SERVER_LOG).unwrap();
    std::fs::write(node2.join("server.log"), WORKER_LOG).unwrap();

    let session = fx
        .store
        .create(&[node1.join("server.log"), node2.join("server.log")], Some("Nodes"), &fx.catalog)
        .unwrap();
    assert_eq!(session.log_files, vec!["server.log", "server_1.log"]);
    assert_is_file(&session.files_path.join(LOGS_DIR).join("server.log"));
    assert_is_file(&session.files_path.join(LOGS_DIR).join("server_1.log"));
    assert_eq!(session.traces.len(), 2);
    assert!(
        session
            .traces
            .values()
            .any(|r| r.class_key.as_deref() == Some("ZeroDivisionError"))
    );

    let outcome = fx.store.reanalyze("Nodes", &fx.catalog).unwrap();
    assert_eq!(outcome.files_read, 2);
    assert_eq!(outcome.session.traces, session.traces);
}

#[test]
fn test_reanalyze_drops_selection_of_vanished_trace() {
    let fx = Fixture::new();
    fx.create("Incident-1");
    let session = fx.store.select("Incident-1", "1").unwrap();
    assert!(session.selected_trace.is_some());

    let logs = session.files_path.join(LOGS_DIR);
    std::fs::remove_file(logs.join("server.log")).unwrap();

    let outcome = fx.store.reanalyze("Incident-1", &fx.catalog).unwrap();
    assert_eq!(outcome.files_read, 1);
    assert_eq!(outcome.session.traces.len(), 1);
    assert!(outcome.session.selected_trace.is_none());
    assert!(outcome.session.traces.values().all(|r| !r.selected));
}

#[test]
fn test_reanalyze_without_logs_keeps_traces() {
    let fx = Fixture::new();
    let session = fx.create("Incident-1");
    std::fs::remove_dir_all(session.files_path.join(LOGS_DIR)).unwrap();

    let outcome = fx.store.reanalyze("Incident-1", &fx.catalog).unwrap();
    assert_eq!(outcome.files_read, 0);
    assert_eq!(outcome.session.traces, session.traces);
}

#[test]
fn test_attach_copies_into_session_root() {
    let fx = Fixture::new();
    fx.create("Incident-1");
    let extra = fx.input("heap.hprof.txt");
    std::fs::write(&extra, "dump").unwrap();

    let copied = fx
        .store
        .attach("Incident-1", &[extra, fx.input("nope.bin")])
        .unwrap();
    assert_eq!(copied, vec![session_dir(&fx.store, "Incident-1").join("heap.hprof.txt")]);
    assert_is_file(&copied[0]);
}
