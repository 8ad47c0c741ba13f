use commons_core::db::open_db_in_memory;
use commons_core::{
    now_epoch_ms, Category, CategoryDao, CategoryService, RepoError, SqliteChannel,
    RECENT_DEFAULT_LIMIT,
};

#[test]
fn record_use_creates_then_increments() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(CategoryDao::new(SqliteChannel::new(&conn)));

    let first = service.record_use("Lighthouses", 1_000).unwrap();
    assert!(first.is_persisted());
    assert_eq!(first.times_used, 1);
    assert_eq!(first.last_used, 1_000);

    let second = service.record_use("Lighthouses", 2_000).unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.times_used, 2);
    assert_eq!(second.last_used, 2_000);

    let stored = service.find("Lighthouses").unwrap().unwrap();
    assert_eq!(stored, second);
}

#[test]
fn record_use_moves_category_to_front_of_recent_list() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(CategoryDao::new(SqliteChannel::new(&conn)));

    service.record_use("a", 10).unwrap();
    service.record_use("b", 20).unwrap();
    service.record_use("c", 30).unwrap();
    assert_eq!(service.recent_categories(3).unwrap(), vec!["c", "b", "a"]);

    service.record_use("a", 40).unwrap();
    assert_eq!(service.recent_categories(2).unwrap(), vec!["a", "c"]);
}

#[test]
fn recent_category_names_defaults_limit() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(CategoryDao::new(SqliteChannel::new(&conn)));

    let total = RECENT_DEFAULT_LIMIT + 5;
    for index in 0..total {
        service.record_use(&format!("category {index}"), index).unwrap();
    }

    let names = service.recent_category_names(None).unwrap();
    assert_eq!(names.len() as i64, RECENT_DEFAULT_LIMIT);
    assert_eq!(names[0], format!("category {}", total - 1));

    assert_eq!(service.recent_category_names(Some(1)).unwrap().len(), 1);
}

#[test]
fn record_use_rejects_blank_name() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(CategoryDao::new(SqliteChannel::new(&conn)));

    let err = service.record_use("", 1).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(service.recent_categories(5).unwrap().is_empty());
}

#[test]
fn save_passes_through_to_repository() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(CategoryDao::new(SqliteChannel::new(&conn)));

    let mut category = Category::with_usage("Imported", 5, 9);
    service.save(&mut category).unwrap();
    assert_eq!(service.find("Imported").unwrap().unwrap().times_used, 9);
}

#[test]
fn now_epoch_ms_is_after_2020() {
    assert!(now_epoch_ms() > 1_577_836_800_000);
}
