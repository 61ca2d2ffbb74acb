use healthtrack::notify::Notifier;
use healthtrack::session::clock::{KEY_IS_PAUSED, KEY_PAUSE_START, KEY_START_TIME, KEY_TOTAL_PAUSE};
use healthtrack::session::job::{self, FALLBACK_BODY};
use healthtrack::session::{ElapsedReading, SessionStatus, lifecycle, read_elapsed};
use healthtrack::store::{FileStore, KeyValueStore};
use std::fs;
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use tempfile::tempdir;

const T: i64 = 1_767_225_600_000;

#[derive(Default)]
struct Recorder {
    bodies: Mutex<Vec<String>>,
}

impl Notifier for Recorder {
    fn emit(&self, _title: &str, body: &str) -> anyhow::Result<()> {
        self.bodies.lock().unwrap().push(body.to_string());
        Ok(())
    }
}

#[test]
fn test_lifecycle_through_file_store() {
    let dir = tempdir().unwrap();
    let store = FileStore::in_dir(dir.path());

    lifecycle::start(&store, T).unwrap();
    lifecycle::pause(&store, T + 60_000).unwrap();

    // A separate reader (the background job) sees the same clock
    let reader = FileStore::in_dir(dir.path());
    assert_eq!(read_elapsed(&reader, T + 90_000), ElapsedReading::Known(60_000));
    assert_eq!(read_elapsed(&reader, T + 600_000), ElapsedReading::Known(60_000));

    lifecycle::resume(&store, T + 120_000).unwrap();
    assert_eq!(
        lifecycle::status(&reader, T + 125_000).unwrap(),
        SessionStatus::Running { elapsed_ms: 65_000 }
    );

    assert_eq!(lifecycle::stop(&store, T + 130_000).unwrap(), 70_000);
    assert_eq!(read_elapsed(&reader, T + 140_000), ElapsedReading::Known(0));
}

#[test]
fn test_stop_clears_only_session_keys() {
    let dir = tempdir().unwrap();
    let store = FileStore::in_dir(dir.path());
    store.set_many(&[("unit_water", "ml".to_string())]).unwrap();

    lifecycle::start(&store, T).unwrap();
    lifecycle::stop(&store, T + 1).unwrap();

    for key in [KEY_START_TIME, KEY_IS_PAUSED, KEY_PAUSE_START, KEY_TOTAL_PAUSE] {
        assert_eq!(store.get(key).unwrap(), None);
    }
    assert_eq!(store.get("unit_water").unwrap().as_deref(), Some("ml"));
}

#[test]
fn test_tick_on_hand_written_partial_state() {
    let dir = tempdir().unwrap();
    let store = FileStore::in_dir(dir.path());
    fs::write(
        store.data_path(),
        format!(
            r#"{{ "{}": "{}", "{}": "7000" }}"#,
            KEY_START_TIME, T, KEY_TOTAL_PAUSE
        ),
    )
    .unwrap();

    let recorder = Recorder::default();
    let reading = job::tick(&store, &recorder, "Run", T + 72_000);

    assert_eq!(reading, ElapsedReading::Known(65_000));
    assert_eq!(recorder.bodies.lock().unwrap()[0], "Elapsed 01:05");
}

#[test]
fn test_tick_on_corrupt_store_uses_fallback() {
    let dir = tempdir().unwrap();
    let store = FileStore::in_dir(dir.path());
    fs::write(store.data_path(), "{ not json").unwrap();

    let recorder = Recorder::default();
    let reading = job::tick(&store, &recorder, "Run", T);

    assert_eq!(reading, ElapsedReading::Unavailable);
    assert_eq!(reading.millis(), None);
    assert_eq!(recorder.bodies.lock().unwrap()[0], FALLBACK_BODY);
}

#[test]
fn test_concurrent_starts_admit_one_session() {
    let dir = tempdir().unwrap();
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let path = dir.path().to_path_buf();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let store = FileStore::in_dir(&path);
                barrier.wait();
                lifecycle::start(&store, T + i).is_ok()
            })
        })
        .collect();

    let started = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(started, 1);

    let store = FileStore::in_dir(dir.path());
    assert!(matches!(
        lifecycle::status(&store, T + 1_000).unwrap(),
        SessionStatus::Running { .. }
    ));
}
