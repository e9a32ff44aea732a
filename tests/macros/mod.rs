use check_rail::{thread_context, ContextStore, Validators};

#[test]
fn test_thread_context_puts_every_pair() {
    let scope = thread_context!("job" => "reindex", "shard" => 4_u16,);
    let store = ContextStore::current();

    assert_eq!(store.get("job").unwrap().render(), "\"reindex\"");
    assert_eq!(store.get("shard").unwrap().downcast_ref::<u16>(), Some(&4));

    drop(scope);
    assert!(!store.contains("job"));
    assert!(!store.contains("shard"));
}

#[test]
fn test_thread_context_nests() {
    let _outer = thread_context!("attempt" => 1);
    {
        let _inner = thread_context!("attempt" => 2);
        assert_eq!(ContextStore::current().get("attempt").unwrap().render(), "2");
    }
    assert_eq!(ContextStore::current().get("attempt").unwrap().render(), "1");
}

#[test]
fn test_thread_context_accepts_computed_keys() {
    let key = format!("column_{}", 3);
    let _scope = thread_context!(key.clone() => "email");
    assert!(ContextStore::current().contains(&key));
}

#[test]
fn test_empty_thread_context() {
    let scope = thread_context!();
    assert_eq!(scope.touched_keys().count(), 0);
}

#[test]
fn test_failures_pick_up_thread_context() {
    let _scope = thread_context!("file" => "users.csv", "line" => 12_usize);
    let exception = Validators::default()
        .require_that("", "email")
        .satisfies(|email| email.contains('@'), "\"email\" must contain '@'")
        .or_throw()
        .unwrap_err();

    let context = exception.context();
    assert!(context.contains(&("file".to_owned(), "\"users.csv\"".to_owned())));
    assert!(context.contains(&("line".to_owned(), "12".to_owned())));
}
