#![cfg(feature = "serde")]

use sorted_map::SortedMap;

#[test]
fn serializes_in_iteration_order() {
    let map: SortedMap<i32, &str> = [(3, "c"), (1, "a"), (2, "b")].into_iter().collect();
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"1":"a","2":"b","3":"c"}"#);
}

#[test]
fn serializes_reversed_map_descending() {
    let mut map: SortedMap<String, i32> = [("a".to_string(), 1), ("b".to_string(), 2)]
        .into_iter()
        .collect();
    map.reverse();
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"b":2,"a":1}"#);
}

#[test]
fn round_trips_through_json() {
    let map: SortedMap<String, Vec<u8>> = (0..20)
        .map(|i| (format!("key{i:02}"), vec![i; 3]))
        .collect();
    let json = serde_json::to_string(&map).unwrap();
    let restored: SortedMap<String, Vec<u8>> = serde_json::from_str(&json).unwrap();
    restored.assert_valid().unwrap();

    let before: Vec<_> = map.iter().collect();
    let after: Vec<_> = restored.iter().collect();
    assert_eq!(before, after);
}

#[test]
fn deserialize_sorts_and_keeps_last_duplicate() {
    let restored: SortedMap<String, i32> =
        serde_json::from_str(r#"{"z":1,"a":2,"m":3,"a":4}"#).unwrap();
    let entries: Vec<(&str, i32)> = restored.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    assert_eq!(entries, vec![("a", 4), ("m", 3), ("z", 1)]);
}

#[test]
fn rejects_non_map_input() {
    assert!(serde_json::from_str::<SortedMap<String, i32>>("[1, 2]").is_err());
}
