//! Streaming Query Tests
//!
//! keys, values, entries, to_array, to_json, for_each, size, find, filter,
//! search and random.

use crate::*;

async fn targets() -> DocumentStore {
    let store = ephemeral();
    store.set("a", Value::from("x"), None).await.unwrap();
    store.set("b", Value::from("target"), None).await.unwrap();
    store.set("c", Value::from("target"), None).await.unwrap();
    store
}

// =============================================================================
// ITERATION
// =============================================================================

#[tokio::test]
async fn test_iteration_is_key_ordered() {
    let store = ephemeral();
    for key in ["delta", "alpha", "charlie", "bravo"] {
        store.set(key, Value::from(key), None).await.unwrap();
    }

    assert_eq!(
        store.keys().await.unwrap(),
        vec!["alpha", "bravo", "charlie", "delta"]
    );
    assert_eq!(
        store.values().await.unwrap(),
        vec![
            Value::from("alpha"),
            Value::from("bravo"),
            Value::from("charlie"),
            Value::from("delta")
        ]
    );
    let entries = store.entries().await.unwrap();
    assert_eq!(entries[0], ("alpha".to_string(), Value::from("alpha")));
    assert_eq!(store.size().await.unwrap(), 4);
}

#[tokio::test]
async fn test_to_array_and_to_json() {
    let store = ephemeral();
    store.set("k1", Value::from(1), None).await.unwrap();
    store.set("k2", doc(json!({"x": true})), None).await.unwrap();

    assert_eq!(
        store.to_array().await.unwrap(),
        vec![doc(json!(["k1", 1])), doc(json!(["k2", {"x": true}]))]
    );

    let map = store.to_json().await.unwrap();
    assert_eq!(Value::Object(map), doc(json!({"k1": 1, "k2": {"x": true}})));
}

#[tokio::test]
async fn test_for_each_visits_every_entry() {
    let store = targets().await;
    let mut seen = Vec::new();
    store
        .for_each(|key, value| seen.push(format!("{key}={}", value.as_str().unwrap())))
        .await
        .unwrap();
    assert_eq!(seen, vec!["a=x", "b=target", "c=target"]);
}

#[tokio::test]
async fn test_scans_bypass_cache() {
    let (store, backend) = over_memory(CacheConfig::bounded(4));
    store.set("k", Value::from(1), None).await.unwrap();
    backend.put("k", "2").unwrap();
    backend.put("other", "3").unwrap();

    assert_eq!(store.values().await.unwrap(), vec![Value::from(2), Value::from(3)]);
    assert!(!store.is_cached("other"));
}

#[tokio::test]
async fn test_cursor_is_restartable() {
    let store = targets().await;
    let mut first = store.cursor();
    assert_eq!(first.next().await.unwrap().map(|(k, _)| k).as_deref(), Some("a"));
    drop(first);

    let mut second = store.cursor();
    assert_eq!(second.next_key().await.unwrap().as_deref(), Some("a"));
}

#[tokio::test]
async fn test_empty_store_iteration() {
    let store = ephemeral();
    assert!(store.keys().await.unwrap().is_empty());
    assert!(store.to_json().await.unwrap().is_empty());
    assert_eq!(store.size().await.unwrap(), 0);
}

// =============================================================================
// FIND / FILTER
// =============================================================================

#[tokio::test]
async fn test_find_returns_first_match_only() {
    let store = targets().await;
    let found = store
        .find(|value, _key| value.as_str() == Some("target"))
        .await
        .unwrap();
    assert_eq!(Value::Object(found), doc(json!({"b": "target"})));
}

#[tokio::test]
async fn test_filter_matches_find() {
    let store = targets().await;
    let filtered = store
        .filter(|value, _key| value.as_str() == Some("target"))
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(Value::Object(filtered), doc(json!({"b": "target"})));
}

#[tokio::test]
async fn test_find_stops_at_first_match() {
    let store = targets().await;
    let mut visited = Vec::new();
    store
        .find(|_value, key| {
            visited.push(key.to_string());
            key == "b"
        })
        .await
        .unwrap();
    assert_eq!(visited, vec!["a", "b"]);
}

#[tokio::test]
async fn test_find_without_match_is_empty() {
    let store = targets().await;
    assert!(store.find(|_, _| false).await.unwrap().is_empty());
}

// =============================================================================
// SEARCH
// =============================================================================

#[tokio::test]
async fn test_search_limit_returns_one_extra() {
    let store = targets().await;
    store.set("d", Value::from("target"), None).await.unwrap();

    let results = store.search("target", Some(1)).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, "b");
    assert_eq!(results[1].0, "c");
}

#[tokio::test]
async fn test_search_matches_key_or_value() {
    let store = ephemeral();
    store.set("user:ada", Value::from("x"), None).await.unwrap();
    store.set("k", doc(json!({"name": "ada lovelace"})), None).await.unwrap();
    store.set("z", Value::from("nothing"), None).await.unwrap();

    let keys: Vec<_> = store
        .search("ada", None)
        .await
        .unwrap()
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    assert_eq!(keys, vec!["k", "user:ada"]);
}

#[tokio::test]
async fn test_search_without_limit_returns_all() {
    let store = targets().await;
    assert_eq!(store.search("target", None).await.unwrap().len(), 2);
}

// =============================================================================
// RANDOM
// =============================================================================

#[tokio::test]
async fn test_random_picks_existing_entry() {
    let store = targets().await;
    for _ in 0..10 {
        let picked = store.random().await.unwrap();
        assert_eq!(picked.len(), 1);
        let (key, value) = picked.into_iter().next().unwrap();
        assert_eq!(store.get(&key, None).await.unwrap(), Some(value));
    }
}

#[tokio::test]
async fn test_search_matches_encoded_markers() {
    let store = ephemeral();
    store.set("blob", Value::bytes(vec![1u8, 2]), None).await.unwrap();
    store.set("colon", Value::from(":one"), None).await.unwrap();
    store.set("plain", Value::from("one"), None).await.unwrap();

    let keys = |results: Vec<(String, Value)>| -> Vec<String> {
        results.into_iter().map(|(k, _)| k).collect()
    };
    assert_eq!(keys(store.search("binary", None).await.unwrap()), vec!["blob"]);
    assert_eq!(keys(store.search("::", None).await.unwrap()), vec!["colon"]);
    assert_eq!(
        store.get("colon", None).await.unwrap(),
        Some(Value::from(":one"))
    );
}
