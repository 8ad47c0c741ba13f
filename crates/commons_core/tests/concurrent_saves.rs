use commons_core::db::open_db;
use commons_core::{Category, CategoryDao, CategoryRepository, SqliteChannel};
use std::thread;

const WRITERS: usize = 4;
const SAVES_PER_WRITER: usize = 25;

#[test]
fn concurrent_saves_with_distinct_names_never_collide() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("concurrent.db");
    drop(open_db(&path).unwrap());

    thread::scope(|scope| {
        for writer in 0..WRITERS {
            let path = &path;
            scope.spawn(move || {
                let conn = open_db(path).unwrap();
                let dao = CategoryDao::new(SqliteChannel::new(&conn));
                for index in 0..SAVES_PER_WRITER {
                    let mut category =
                        Category::with_usage(format!("w{writer}-c{index}"), index as i64, 1);
                    dao.save(&mut category).unwrap();
                }
            });
        }
    });

    let conn = open_db(&path).unwrap();
    let dao = CategoryDao::new(SqliteChannel::new(&conn));
    for writer in 0..WRITERS {
        for index in 0..SAVES_PER_WRITER {
            let name = format!("w{writer}-c{index}");
            let found = dao.find(&name).unwrap().unwrap();
            assert_eq!(found.last_used, index as i64);
        }
    }

    let rows: i64 = conn
        .query_row("SELECT COUNT(DISTINCT _id) FROM categories;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, (WRITERS * SAVES_PER_WRITER) as i64);
}

#[test]
fn concurrent_updates_to_same_row_leave_one_complete_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("same_row.db");

    let mut seed = Category::with_usage("Shared", 0, 0);
    {
        let conn = open_db(&path).unwrap();
        CategoryDao::new(SqliteChannel::new(&conn))
            .save(&mut seed)
            .unwrap();
    }

    thread::scope(|scope| {
        for writer in 1..=WRITERS {
            let path = &path;
            let mut category = seed.clone();
            scope.spawn(move || {
                let conn = open_db(path).unwrap();
                let dao = CategoryDao::new(SqliteChannel::new(&conn));
                category.last_used = writer as i64;
                category.times_used = writer as u32;
                dao.save(&mut category).unwrap();
            });
        }
    });

    let conn = open_db(&path).unwrap();
    let stored = CategoryDao::new(SqliteChannel::new(&conn))
        .find("Shared")
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, seed.id);
    assert_eq!(i64::from(stored.times_used), stored.last_used);
    assert!((1..=WRITERS as u32).contains(&stored.times_used));
}
