use std::panic::{catch_unwind, AssertUnwindSafe};

use check_rail::{ContextStore, ContextValue, ScopedContext};

fn rendered(store: &ContextStore, key: &str) -> Option<String> {
    store.get(key).map(|value| value.render())
}

#[test]
fn test_put_is_visible_until_close() {
    let store = ContextStore::new();
    let mut scope = store.scope();
    scope.put("user", "alice");
    assert_eq!(rendered(&store, "user").as_deref(), Some("\"alice\""));
    assert!(scope.contains("user"));

    scope.close();
    assert!(!store.contains("user"));
}

#[test]
fn test_close_restores_the_prior_value() {
    let store = ContextStore::new();
    let mut outer = store.scope();
    outer.put("user", "alice");

    let mut inner = store.scope();
    inner.put("user", "bob");
    assert_eq!(rendered(&store, "user").as_deref(), Some("\"bob\""));
    inner.close();

    assert_eq!(rendered(&store, "user").as_deref(), Some("\"alice\""));
}

#[test]
fn test_first_touch_wins() {
    let store = ContextStore::new();
    let mut outer = store.scope();
    outer.put("step", 1);

    let mut inner = store.scope();
    inner.put("step", 2).put("step", 3);
    inner.remove("step");
    inner.put("step", 4);
    assert_eq!(inner.touched_keys().collect::<Vec<_>>(), ["step"]);

    inner.close();
    assert_eq!(rendered(&store, "step").as_deref(), Some("1"));
}

#[test]
fn test_remove_is_undone() {
    let store = ContextStore::new();
    let mut outer = store.scope();
    outer.put("trace", "on");

    {
        let mut inner = store.scope();
        let removed = inner.remove("trace").unwrap();
        assert_eq!(removed.render(), "\"on\"");
        assert!(!store.contains("trace"));
        assert!(inner.remove("missing").is_none());
    }

    assert_eq!(rendered(&store, "trace").as_deref(), Some("\"on\""));
    assert!(!store.contains("missing"));
}

#[test]
fn test_nested_scopes_unwind_in_order() {
    let store = ContextStore::new();
    let mut first = store.scope();
    first.put("a", 1);
    let mut second = store.scope();
    second.put("a", 2).put("b", 2);
    let mut third = store.scope();
    third.put("b", 3).put("c", 3);

    third.close();
    assert_eq!(rendered(&store, "a").as_deref(), Some("2"));
    assert_eq!(rendered(&store, "b").as_deref(), Some("2"));
    assert!(!store.contains("c"));

    second.close();
    assert_eq!(rendered(&store, "a").as_deref(), Some("1"));
    assert!(!store.contains("b"));

    first.close();
    assert!(store.is_empty());
}

#[test]
fn test_close_is_idempotent() {
    let store = ContextStore::new();
    let mut outer = store.scope();
    outer.put("user", "alice");

    let mut inner = store.scope();
    inner.put("user", "bob");
    inner.close();

    // A later write by the outer scope survives a second close of the inner one.
    outer.put("user", "carol");
    inner.close();
    drop(inner);
    assert_eq!(rendered(&store, "user").as_deref(), Some("\"carol\""));
}

#[test]
fn test_drop_restores() {
    let store = ContextStore::new();
    {
        let mut scope = store.scope();
        scope.put("request", 17_u32);
    }
    assert!(store.is_empty());
}

#[test]
fn test_unwinding_restores() {
    let store = ContextStore::new();
    let result = catch_unwind(AssertUnwindSafe(|| {
        let mut scope = store.scope();
        scope.put("phase", "parse");
        panic!("parser failed");
    }));

    assert!(result.is_err());
    assert!(!store.contains("phase"));
}

#[test]
fn test_put_value_shares_the_value() {
    let store = ContextStore::new();
    let value = ContextValue::new(vec!["admin", "ops"]);
    let mut scope = store.scope();
    scope.put_value("roles", value.clone());

    assert!(store.get("roles").unwrap().ptr_eq(&value));
}

#[test]
fn test_current_scope_uses_the_thread_store() {
    let mut scope = ScopedContext::current();
    assert!(scope.store().ptr_eq(&ContextStore::current()));
    scope.put("scoped_current", true);
    assert_eq!(scope.get("scoped_current").unwrap().downcast_ref::<bool>(), Some(&true));

    drop(scope);
    assert!(!ContextStore::current().contains("scoped_current"));
}

#[test]
fn test_debug_lists_touched_keys() {
    let store = ContextStore::new();
    let mut scope = store.scope();
    scope.put("user", "alice");
    assert!(format!("{scope:?}").contains("touched_keys: [\"user\"]"));
}
