use std::fs;
use serde_json::Value;
use taskboard::todo::item::parse_due_date;
use taskboard::todo::{
    JsonFileStorage, NewTodo, Priority, RecurringPattern, TodoError, TodoManager, TodoStorage,
};
use tempfile::TempDir;

fn store_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("todos.json")
}

#[test]
fn every_mutation_is_written_through() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir);
    let mut manager = TodoManager::open_file(&path);

    let todo = manager.add(NewTodo::titled("Persist me")).unwrap();
    let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk[0]["title"], "Persist me");
    assert_eq!(on_disk[0]["completed"], false);

    manager.toggle_completion(todo.id).unwrap();
    let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk[0]["completed"], true);

    manager.remove(todo.id).unwrap();
    let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, Value::Array(vec![]));
}

#[test]
fn save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir);

    let mut manager = TodoManager::open_file(&path);
    manager
        .add(NewTodo {
            title: "Pay rent".into(),
            description: "landlord".into(),
            priority: Priority::High,
            category: "bills".into(),
            due_date: parse_due_date("2024-02-01").unwrap(),
            recurring_pattern: RecurringPattern::Monthly,
        })
        .unwrap();
    manager.add(NewTodo::titled("Call mum")).unwrap();
    manager.toggle_completion(1).unwrap();

    let reloaded = TodoManager::open_file(&path);
    assert_eq!(reloaded.items(), manager.items());
    assert_eq!(reloaded.len(), 3);
    assert_eq!(
        reloaded.get(3).unwrap().due_date,
        parse_due_date("2024-03-02").unwrap()
    );
}

#[test]
fn file_uses_two_space_indentation_and_frozen_fields() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir);
    let mut manager = TodoManager::open_file(&path);
    manager.add(NewTodo::titled("Shape")).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("[\n  {\n    \"id\": 1,"));

    let on_disk: Value = serde_json::from_str(&text).unwrap();
    let keys: Vec<&String> = on_disk[0].as_object().unwrap().keys().collect();
    let mut keys: Vec<&str> = keys.into_iter().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "category",
            "completed",
            "created_at",
            "description",
            "due_date",
            "id",
            "priority",
            "recurring_pattern",
            "title",
            "updated_at",
        ]
    );
}

#[test]
fn malformed_file_loads_as_empty() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir);

    fs::write(&path, "{ not json").unwrap();
    assert!(JsonFileStorage::new(&path).load().is_empty());

    fs::write(&path, r#"[{"id": 1, "title": "ok"}, {"title": "no id"}]"#).unwrap();
    assert!(JsonFileStorage::new(&path).load().is_empty());

    fs::write(&path, "").unwrap();
    let mut manager = TodoManager::open_file(&path);
    assert!(manager.is_empty());
    assert_eq!(manager.add(NewTodo::titled("fresh")).unwrap().id, 1);
}

#[test]
fn missing_file_starts_empty_and_is_not_created_until_a_change() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir);

    let manager = TodoManager::open_file(&path);
    assert!(manager.is_empty());
    assert!(!path.exists());
}

#[test]
fn records_from_older_files_get_defaults() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir);
    fs::write(
        &path,
        r#"[{"id": 4, "title": "legacy", "created_at": "2024-01-01T09:30:00.123456"}]"#,
    )
    .unwrap();

    let mut manager = TodoManager::open_file(&path);
    let legacy = manager.get(4).unwrap();
    assert_eq!(legacy.priority, Priority::Medium);
    assert_eq!(legacy.recurring_pattern, RecurringPattern::Never);
    assert_eq!(legacy.due_date, None);
    assert_eq!(legacy.created_at.to_string(), "2024-01-01 09:30:00.123456");

    assert_eq!(manager.add(NewTodo::titled("next")).unwrap().id, 5);
}

#[test]
fn ids_restart_after_everything_is_deleted_and_reloaded() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir);

    let mut manager = TodoManager::open_file(&path);
    let a = manager.add(NewTodo::titled("a")).unwrap();
    let b = manager.add(NewTodo::titled("b")).unwrap();
    manager.remove(a.id).unwrap();
    manager.remove(b.id).unwrap();
    assert_eq!(manager.add(NewTodo::titled("c")).unwrap().id, 3);
    manager.remove(3).unwrap();

    let mut reopened = TodoManager::open_file(&path);
    assert_eq!(reopened.add(NewTodo::titled("d")).unwrap().id, 1);
}

#[test]
fn failed_write_leaves_the_list_unchanged() {
    let dir = TempDir::new().unwrap();
    // A directory can be neither read as a todo file nor written over.
    let mut manager = TodoManager::open_file(dir.path());
    assert!(manager.is_empty());

    let first = manager.add(NewTodo::titled("lost"));
    assert!(matches!(first, Err(TodoError::Storage { .. })));
    assert!(manager.is_empty());

    let second = manager.add(NewTodo::titled("also lost"));
    assert!(matches!(second, Err(TodoError::Storage { .. })));
    assert!(manager.is_empty());
}

#[test]
fn largest_possible_id_loads_but_blocks_further_adds() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir);
    fs::write(&path, r#"[{"id": 4294967295, "title": "big"}]"#).unwrap();

    let mut manager = TodoManager::open_file(&path);
    assert_eq!(manager.get(u32::MAX).unwrap().title, "big");

    let result = manager.add(NewTodo::titled("one too many"));
    assert!(matches!(result, Err(TodoError::IdsExhausted)));
    assert_eq!(manager.len(), 1);

    let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk.as_array().unwrap().len(), 1);
}
