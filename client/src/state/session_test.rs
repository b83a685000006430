use super::*;
use crate::util::storage::{KeyValueStorage, MemoryStorage};
use crate::util::token_store::{TOKEN_KEY, USER_KEY};
use std::sync::atomic::{AtomicUsize, Ordering};

struct Fixture {
    storage: Arc<MemoryStorage>,
    bus: LogoutBus,
    session: SessionContext,
}

fn fixture() -> Fixture {
    let storage = Arc::new(MemoryStorage::new());
    fixture_with(storage)
}

fn fixture_with(storage: Arc<MemoryStorage>) -> Fixture {
    let bus = LogoutBus::new();
    let session = SessionContext::new(TokenStore::new(storage.clone()), &bus);
    Fixture { storage, bus, session }
}

fn alice() -> User {
    User { id: 1, email: "a@b.com".to_owned(), name: Some("A".to_owned()) }
}

fn bob() -> User {
    User { id: 2, email: "bob@example.com".to_owned(), name: None }
}

// =============================================================
// initialize
// =============================================================

#[test]
fn new_session_is_loading_and_empty() {
    let f = fixture();
    assert!(f.session.is_loading());
    assert!(!f.session.is_authenticated());
    assert!(f.session.user().is_none());
}

#[test]
fn initialize_empty_storage_finishes_loading() {
    let f = fixture();
    f.session.initialize();
    assert!(!f.session.is_loading());
    assert!(!f.session.is_authenticated());
}

#[test]
fn login_survives_reload() {
    let f = fixture();
    f.session.initialize();
    f.session.login("abc123", alice()).unwrap();
    let before = f.session.snapshot();

    let reloaded = fixture_with(Arc::clone(&f.storage));
    reloaded.session.initialize();

    assert_eq!(reloaded.session.snapshot(), before);
    assert_eq!(reloaded.session.token().as_deref(), Some("abc123"));
    assert_eq!(reloaded.session.user(), Some(alice()));
}

#[test]
fn initialize_malformed_user_clears_storage() {
    for raw in ["{", "null", "42", r#"{"id":"x"}"#, r#"{"email":"a@b.com"}"#, "[]"] {
        let f = fixture();
        f.storage.set_item(TOKEN_KEY, "abc").unwrap();
        f.storage.set_item(USER_KEY, raw).unwrap();

        f.session.initialize();

        assert!(!f.session.is_authenticated(), "raw user {raw:?}");
        assert!(!f.session.is_loading());
        assert!(f.storage.is_empty(), "raw user {raw:?} should be cleared");
    }
}

#[test]
fn initialize_half_written_credential_clears_storage() {
    let f = fixture();
    f.storage.set_item(TOKEN_KEY, "orphan").unwrap();

    f.session.initialize();

    assert!(!f.session.is_authenticated());
    assert!(!f.session.is_loading());
    assert!(f.storage.is_empty());
    assert_eq!(f.session.store().token(), None);

    let g = fixture();
    g.storage.set_item(USER_KEY, &serde_json::to_string(&alice()).unwrap()).unwrap();
    g.session.initialize();
    assert!(g.storage.is_empty());
}

#[test]
fn initialize_runs_once() {
    let f = fixture();
    f.session.initialize();
    f.storage.set_item(TOKEN_KEY, "late").unwrap();
    f.storage.set_item(USER_KEY, &serde_json::to_string(&alice()).unwrap()).unwrap();

    f.session.initialize();
    assert!(!f.session.is_authenticated());
}

// =============================================================
// login / logout
// =============================================================

#[test]
fn login_then_logout_example() {
    let f = fixture();
    f.session.initialize();

    f.session.login("abc123", alice()).unwrap();
    assert!(f.session.is_authenticated());
    assert_eq!(f.storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("abc123"));

    f.session.logout();
    assert!(!f.session.is_authenticated());
    assert_eq!(f.storage.get_item(TOKEN_KEY).unwrap(), None);
    assert_eq!(f.storage.get_item(USER_KEY).unwrap(), None);
}

#[test]
fn logout_is_idempotent() {
    let f = fixture();
    f.session.initialize();
    f.session.logout();
    f.session.logout();
    assert!(!f.session.is_authenticated());
}

#[test]
fn token_and_user_always_paired() {
    let f = fixture();
    f.session.initialize();
    let steps: [Option<(&str, User)>; 6] = [
        Some(("t1", alice())),
        None,
        None,
        Some(("t2", bob())),
        Some(("t3", alice())),
        None,
    ];
    for step in steps {
        match step {
            Some((token, user)) => f.session.login(token, user).unwrap(),
            None => f.session.logout(),
        }
        let snap = f.session.snapshot();
        assert_eq!(snap.token().is_some(), snap.user().is_some());
        assert_eq!(snap.is_authenticated(), snap.token().is_some() && snap.user().is_some());
    }
}

#[test]
fn relogin_replaces_credential() {
    let f = fixture();
    f.session.login("t1", alice()).unwrap();
    f.session.login("t2", bob()).unwrap();
    assert_eq!(f.session.token().as_deref(), Some("t2"));
    assert_eq!(f.session.user(), Some(bob()));
    assert_eq!(f.session.store().token().as_deref(), Some("t2"));
}

// =============================================================
// external logout
// =============================================================

#[test]
fn logout_notice_clears_matching_session() {
    let f = fixture();
    f.session.login("abc", alice()).unwrap();

    f.bus.emit(&LogoutNotice { rejected_token: Some("abc".to_owned()) });
    assert!(!f.session.is_authenticated());
}

#[test]
fn logout_notice_without_token_clears_session() {
    let f = fixture();
    f.session.login("abc", alice()).unwrap();

    f.bus.emit(&LogoutNotice { rejected_token: None });
    assert!(!f.session.is_authenticated());
}

#[test]
fn stale_logout_notice_keeps_newer_login() {
    let f = fixture();
    f.session.login("old", alice()).unwrap();
    f.session.login("new", bob()).unwrap();

    f.bus.emit(&LogoutNotice { rejected_token: Some("old".to_owned()) });
    assert!(f.session.is_authenticated());
    assert_eq!(f.session.token().as_deref(), Some("new"));
}

#[test]
fn logout_notice_does_not_touch_storage() {
    let f = fixture();
    f.session.login("abc", alice()).unwrap();
    f.bus.emit(&LogoutNotice { rejected_token: Some("abc".to_owned()) });
    assert_eq!(f.storage.len(), 2);
}

#[test]
fn dropped_session_unsubscribes_from_bus() {
    let f = fixture();
    assert_eq!(f.bus.subscriber_count(), 1);
    let bus = f.bus.clone();
    drop(f);
    assert_eq!(bus.subscriber_count(), 0);
}

// =============================================================
// watch
// =============================================================

#[test]
fn watch_sees_each_change_once() {
    let f = fixture();
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let _sub = f.session.watch(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    f.session.initialize();
    f.session.login("abc", alice()).unwrap();
    f.session.logout();
    f.session.logout();

    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[test]
fn watch_observes_exactly_one_external_logout() {
    let f = fixture();
    f.session.login("abc", alice()).unwrap();
    let logouts = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&logouts);
    let _sub = f.session.watch(move |s| {
        if !s.is_authenticated() {
            seen.fetch_add(1, Ordering::SeqCst);
        }
    });

    let notice = LogoutNotice { rejected_token: Some("abc".to_owned()) };
    f.bus.emit(&notice);
    f.bus.emit(&notice);
    assert_eq!(logouts.load(Ordering::SeqCst), 1);
}
