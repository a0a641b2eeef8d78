//! Behaviour every engine must share, run against each backend

use crate::{PersistentStore, WriteBatch};

pub(crate) fn point_operations(store: &dyn PersistentStore) {
    assert_eq!(store.get("missing").unwrap(), None);

    store.put("k", "v1").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("v1"));

    store.put("k", "v2").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));

    store.delete("k").unwrap();
    assert_eq!(store.get("k").unwrap(), None);

    // Deleting twice is not an error
    store.delete("k").unwrap();
}

pub(crate) fn batch_commit(store: &dyn PersistentStore) {
    store.put("stale", "x").unwrap();

    let mut batch = WriteBatch::new();
    batch.put("a", "1");
    batch.put("b", "2");
    batch.delete("stale");
    batch.put("a", "3");
    assert_eq!(store.get("a").unwrap(), None);

    store.commit(batch).unwrap();
    assert_eq!(store.get("a").unwrap().as_deref(), Some("3"));
    assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    assert_eq!(store.get("stale").unwrap(), None);

    store.commit(WriteBatch::new()).unwrap();
}

pub(crate) fn scan_pages_in_order(store: &dyn PersistentStore) {
    assert!(store.scan(None, 10).unwrap().is_empty());

    for key in ["d", "a", "c", "b", "e"] {
        store.put(key, &key.to_uppercase()).unwrap();
    }

    let first = store.scan(None, 2).unwrap();
    assert_eq!(
        first,
        vec![("a".into(), "A".into()), ("b".into(), "B".into())]
    );

    let second = store.scan(Some("b"), 2).unwrap();
    let keys: Vec<_> = second.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["c", "d"]);

    // Cursor key need not exist
    let tail = store.scan(Some("cc"), 10).unwrap();
    let keys: Vec<_> = tail.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["d", "e"]);

    assert!(store.scan(Some("e"), 10).unwrap().is_empty());
}

pub(crate) fn clear(store: &dyn PersistentStore) {
    store.put("a", "1").unwrap();
    store.put("b", "2").unwrap();
    store.clear().unwrap();
    assert!(store.scan(None, 10).unwrap().is_empty());
    assert_eq!(store.get("a").unwrap(), None);

    // Usable after clear
    store.put("c", "3").unwrap();
    assert_eq!(store.get("c").unwrap().as_deref(), Some("3"));
}
