//! Array Mutation Tests
//!
//! push, pop, shift, unshift, splice and includes, including the no-op
//! behaviour on non-array targets.

use crate::*;

// =============================================================================
// PUSH / POP
// =============================================================================

#[tokio::test]
async fn test_push_appends_last() {
    let store = ephemeral();
    store.set("list", doc(json!([1, 2])), None).await.unwrap();

    let edit = store.push("list", Value::from(3), None).await.unwrap();
    assert_eq!(edit, Edit::Applied(None));
    assert_eq!(
        store.get("list", None).await.unwrap(),
        Some(doc(json!([1, 2, 3])))
    );
}

#[tokio::test]
async fn test_push_pop_on_empty_and_single() {
    let store = ephemeral();
    store.set("list", doc(json!([])), None).await.unwrap();

    store.push("list", Value::from("only"), None).await.unwrap();
    assert_eq!(store.get("list", None).await.unwrap(), Some(doc(json!(["only"]))));

    let popped = store.pop("list", None).await.unwrap();
    assert_eq!(popped.removed(), Some(Value::from("only")));
    assert_eq!(store.get("list", None).await.unwrap(), Some(doc(json!([]))));

    let again = store.pop("list", None).await.unwrap();
    assert_eq!(again, Edit::Applied(None));
}

#[tokio::test]
async fn test_push_at_nested_path() {
    let store = ephemeral();
    store
        .set("user", doc(json!({"roles": ["reader"]})), None)
        .await
        .unwrap();
    store
        .push("user", Value::from("admin"), Some("roles"))
        .await
        .unwrap();
    assert_eq!(
        store.get("user", Some("roles")).await.unwrap(),
        Some(doc(json!(["reader", "admin"])))
    );
}

#[tokio::test]
async fn test_push_is_persisted() {
    let (store, backend) = over_memory(CacheConfig::bounded(4));
    store.set("list", doc(json!([1])), None).await.unwrap();
    store.push("list", Value::from(2), None).await.unwrap();
    assert_eq!(backend.get("list").unwrap().as_deref(), Some("[1,2]"));
}

// =============================================================================
// SHIFT / UNSHIFT / SPLICE
// =============================================================================

#[tokio::test]
async fn test_shift_and_unshift() {
    let store = ephemeral();
    store.set("q", doc(json!(["a", "b"])), None).await.unwrap();

    store.unshift("q", Value::from("z"), None).await.unwrap();
    assert_eq!(store.get("q", None).await.unwrap(), Some(doc(json!(["z", "a", "b"]))));

    let shifted = store.shift("q", None).await.unwrap();
    assert_eq!(shifted.removed(), Some(Value::from("z")));
    assert_eq!(store.get("q", None).await.unwrap(), Some(doc(json!(["a", "b"]))));
}

#[tokio::test]
async fn test_unshift_array_item_is_single_element() {
    let store = ephemeral();
    store.set("q", doc(json!([3])), None).await.unwrap();
    store.unshift("q", doc(json!([1, 2])), None).await.unwrap();
    assert_eq!(store.get("q", None).await.unwrap(), Some(doc(json!([[1, 2], 3]))));
}

#[tokio::test]
async fn test_splice_positions() {
    let store = ephemeral();
    store.set("s", doc(json!([0, 1, 2, 3, 4])), None).await.unwrap();

    assert_eq!(store.splice("s", 1, None).await.unwrap().removed(), Some(Value::from(1)));
    assert_eq!(store.splice("s", -1, None).await.unwrap().removed(), Some(Value::from(4)));
    assert_eq!(store.get("s", None).await.unwrap(), Some(doc(json!([0, 2, 3]))));

    let out_of_range = store.splice("s", 10, None).await.unwrap();
    assert_eq!(out_of_range, Edit::Applied(None));
    assert_eq!(store.get("s", None).await.unwrap(), Some(doc(json!([0, 2, 3]))));
}

// =============================================================================
// NO-OP SENTINEL
// =============================================================================

#[tokio::test]
async fn test_mutations_on_map_are_skipped() {
    let (store, backend) = over_memory(CacheConfig::bounded(4));
    let original = doc(json!({"a": {"b": 1}}));
    store.set("m", original.clone(), None).await.unwrap();
    let stored_before = backend.get("m").unwrap();

    assert!(store.push("m", Value::from(1), None).await.unwrap().is_skipped());
    assert!(store.pop("m", Some("a")).await.unwrap().is_skipped());
    assert!(store.shift("m", None).await.unwrap().is_skipped());
    assert!(store.unshift("m", Value::from(1), None).await.unwrap().is_skipped());
    assert!(store.splice("m", 0, Some("a")).await.unwrap().is_skipped());

    assert_eq!(store.get("m", None).await.unwrap(), Some(original));
    assert_eq!(backend.get("m").unwrap(), stored_before);
}

#[tokio::test]
async fn test_mutations_on_missing_path_are_skipped() {
    let store = ephemeral();
    store.set("m", doc(json!({"a": 1})), None).await.unwrap();
    assert!(store.push("m", Value::from(1), Some("nope")).await.unwrap().is_skipped());
    assert!(store.pop("absent", None).await.unwrap().is_skipped());
}

// =============================================================================
// INCLUDES
// =============================================================================

#[tokio::test]
async fn test_includes_on_array() {
    let store = ephemeral();
    store
        .set("a", doc(json!([1, "two", {"three": 3}])), None)
        .await
        .unwrap();

    assert_eq!(store.includes("a", &Value::from("two"), None).await.unwrap(), Some(true));
    assert_eq!(
        store.includes("a", &doc(json!({"three": 3})), None).await.unwrap(),
        Some(true)
    );
    assert_eq!(store.includes("a", &Value::from(2), None).await.unwrap(), Some(false));
}

#[tokio::test]
async fn test_includes_on_string() {
    let store = ephemeral();
    store
        .set("s", doc(json!({"bio": "likes rust"})), None)
        .await
        .unwrap();

    assert_eq!(
        store.includes("s", &Value::from("rust"), Some("bio")).await.unwrap(),
        Some(true)
    );
    assert_eq!(
        store.includes("s", &Value::from("go"), Some("bio")).await.unwrap(),
        Some(false)
    );
    assert_eq!(
        store.includes("s", &Value::from(1), Some("bio")).await.unwrap(),
        Some(false)
    );
}

#[tokio::test]
async fn test_includes_on_other_types_is_sentinel() {
    let store = ephemeral();
    store.set("n", doc(json!({"x": 5})), None).await.unwrap();
    assert_eq!(store.includes("n", &Value::from(5), None).await.unwrap(), None);
    assert_eq!(store.includes("n", &Value::from(5), Some("x")).await.unwrap(), None);
}
