//! Many writers against one database file.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use chirpy_db::{Database, DbError};

fn open() -> (tempfile::TempDir, Arc<Database>) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&dir.path().join("database.json")).unwrap();
    (dir, Arc::new(db))
}

#[test]
fn concurrent_registrations_get_distinct_ids() {
    let (_dir, db) = open();

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let db = db.clone();
            thread::spawn(move || db.create_user(&format!("user{i}@example.com"), "pw").unwrap())
        })
        .collect();
    let ids: HashSet<i64> = handles.into_iter().map(|h| h.join().unwrap().id).collect();

    assert_eq!(ids, (1..=6).collect::<HashSet<i64>>());
    assert_eq!(db.list_users().unwrap().len(), 6);
}

#[test]
fn racing_same_email_registers_once() {
    let (_dir, db) = open();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let db = db.clone();
            thread::spawn(move || db.create_user("same@example.com", "pw"))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let created = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(DbError::EmailExists)))
        .count();
    assert_eq!(created, 1);
    assert_eq!(rejected, 3);
    assert_eq!(db.list_users().unwrap().len(), 1);
}

#[test]
fn concurrent_chirps_and_readers() {
    let (_dir, db) = open();

    let writers: Vec<_> = (0..4)
        .map(|author| {
            let db = db.clone();
            thread::spawn(move || {
                (0..25)
                    .map(|n| db.create_chirp(&format!("{author}/{n}"), author).unwrap().id)
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let db = db.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    let chirps = db.list_chirps(None).unwrap();
                    assert!(chirps.windows(2).all(|w| w[0].id < w[1].id));
                }
            })
        })
        .collect();

    let mut ids = Vec::new();
    for w in writers {
        let mine = w.join().unwrap();
        assert!(mine.windows(2).all(|p| p[0] < p[1]));
        ids.extend(mine);
    }
    for r in readers {
        r.join().unwrap();
    }

    let unique: HashSet<i64> = ids.iter().copied().collect();
    assert_eq!(unique.len(), 100);
    assert_eq!(db.list_chirps(None).unwrap().len(), 100);
    assert_eq!(db.store().load().unwrap().next_chirp_id, 101);
}
