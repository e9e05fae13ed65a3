mod common;

use chrono::Utc;
use compressx_core::{analytics, bytes_to_mb, Session};
use compressx_simulate::Simulator;
use compressx_store::{FileStore, KeyValueStore, MemoryStore, SqliteStore, UserId};

const MB: u64 = 1024 * 1024;

async fn compress_into(store: &mut dyn KeyValueStore, user: &str, files: &[(&str, u64)]) {
    let simulator = Simulator::new(common::sample_settings(), common::FractionReencoder(0.5));
    let pending: Vec<_> = files
        .iter()
        .map(|(name, size)| {
            let upload = common::upload(name, *size);
            (upload.clone(), simulator.spawn(upload))
        })
        .collect();

    let mut session = Session::open(store, UserId::new(user).unwrap()).unwrap();
    for (upload, handle) in pending {
        let output = handle.wait().await.unwrap();
        session
            .record(
                bytes_to_mb(upload.size),
                bytes_to_mb(output.output_size),
                &upload.name,
                Utc::now(),
            )
            .unwrap();
    }
}

#[tokio::test(start_paused = true)]
async fn test_compress_record_and_restore() {
    let mut store = MemoryStore::new();
    compress_into(&mut store, "amy@x.io", &[("a.png", 10 * MB), ("b.pdf", 20 * MB)]).await;

    let session = Session::open(&mut store, UserId::new("amy@x.io").unwrap()).unwrap();
    let summary = session.summary();
    assert_eq!(summary.count, 2);

    let records = session.ledger().records();
    assert!((records[0].saved_percent - 50.0).abs() < 1e-9);
    assert!(records[1].saved_percent > 30.0 && records[1].saved_percent <= 60.0 + 1e-9);

    let expected_saved: f64 = records.iter().map(|r| r.original_size - r.compressed_size).sum();
    assert!((summary.total_space_saved - expected_saved).abs() < 1e-9);

    let recent = session.recent(5);
    assert_eq!(recent[0].name, "b.pdf");
    assert_eq!(recent[1].name, "a.png");
}

#[tokio::test(start_paused = true)]
async fn test_delete_all_returns_to_zero_state() {
    let mut store = MemoryStore::new();
    compress_into(
        &mut store,
        "amy@x.io",
        &[("a.png", MB), ("b.pdf", 3 * MB), ("c.gif", 5 * MB)],
    )
    .await;

    let mut session = Session::open(&mut store, UserId::new("amy@x.io").unwrap()).unwrap();
    session.remove_at(1).unwrap();
    session.remove_at(1).unwrap();
    session.remove_at(0).unwrap();

    let summary = session.summary();
    assert_eq!(summary.count, 0);
    assert_eq!(summary.total_space_saved, 0.0);
    assert_eq!(summary.average_compression, 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_backends_agree() {
    let temp = tempfile::TempDir::new().unwrap();
    let mut file_store = FileStore::new(temp.path().join("data"));
    let mut sqlite_store = SqliteStore::new(&temp.path().join("cx.db")).unwrap();

    for store in [
        &mut file_store as &mut dyn KeyValueStore,
        &mut sqlite_store as &mut dyn KeyValueStore,
    ] {
        compress_into(store, "amy@x.io", &[("a.png", 2 * MB)]).await;
        compress_into(store, "bob@x.io", &[("b.jpg", 4 * MB), ("c.webp", MB)]).await;

        let users = analytics::load_all(store).unwrap();
        assert_eq!(users.len(), 2);

        let stats = analytics::global_stats(&users);
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_files, 3);
        assert!((stats.total_space_saved - 3.5).abs() < 1e-9);
        assert!((stats.average_compression - 50.0).abs() < 1e-9);

        let top = analytics::top_users(&users, 1);
        assert_eq!(top[0].user.as_str(), "bob@x.io");
    }
}
