//! 类别索引映射单元测试

use hotel_image_detection::LabelMap;
use std::collections::HashMap;

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("class_indices.json");
    std::fs::write(&path, r#"{"bathroom": 0, "bedroom": 1, "lobby": 2}"#)
        .expect("Failed to write class indices");

    let labels = LabelMap::load(&path).expect("Failed to load label map");
    assert_eq!(labels.len(), 3);
    assert_eq!(labels.name(0), Some("bathroom"));
    assert_eq!(labels.name(1), Some("bedroom"));
    assert_eq!(labels.name(2), Some("lobby"));
    assert_eq!(labels.name(3), None);
    println!("✓ 类别映射加载成功: {:?}", labels.names());
}

#[test]
fn test_missing_file_errors() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let result = LabelMap::load(&dir.path().join("does_not_exist.json"));
    assert!(result.is_err());
}

#[test]
fn test_malformed_json_errors() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("class_indices.json");
    std::fs::write(&path, "not json at all").expect("Failed to write file");
    assert!(LabelMap::load(&path).is_err());
}

#[test]
fn test_rejects_empty_map() {
    let result = LabelMap::from_class_indices(HashMap::new());
    assert!(result.is_err());
}

#[test]
fn test_rejects_index_gap() {
    // 索引 0 和 2，缺少 1：不连续应当被拒绝
    let mut map = HashMap::new();
    map.insert("bathroom".to_string(), 0);
    map.insert("lobby".to_string(), 2);
    let result = LabelMap::from_class_indices(map);
    assert!(result.is_err());
}

#[test]
fn test_rejects_duplicate_index() {
    let mut map = HashMap::new();
    map.insert("bathroom".to_string(), 0);
    map.insert("bedroom".to_string(), 0);
    let result = LabelMap::from_class_indices(map);
    assert!(result.is_err());
}

#[test]
fn test_single_class_map() {
    let mut map = HashMap::new();
    map.insert("exterior".to_string(), 0);
    let labels = LabelMap::from_class_indices(map).expect("Single class map should load");
    assert_eq!(labels.len(), 1);
    assert_eq!(labels.name(0), Some("exterior"));
}
