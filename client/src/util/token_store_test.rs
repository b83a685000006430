use super::*;
use crate::util::storage::MemoryStorage;

fn store() -> (Arc<MemoryStorage>, TokenStore) {
    let storage = Arc::new(MemoryStorage::new());
    let store = TokenStore::new(storage.clone());
    (storage, store)
}

fn user() -> User {
    User { id: 1, email: "a@b.com".to_owned(), name: Some("A".to_owned()) }
}

#[test]
fn load_empty_storage_is_none() {
    let (_, store) = store();
    assert!(store.load().unwrap().is_none());
}

#[test]
fn save_then_load_round_trips_pair() {
    let (storage, store) = store();
    store.save("abc123", &user()).unwrap();

    assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("abc123"));
    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded, Credential { token: "abc123".to_owned(), user: user() });
}

#[test]
fn load_token_without_user_is_incomplete() {
    let (storage, store) = store();
    storage.set_item(TOKEN_KEY, "abc").unwrap();
    assert!(matches!(store.load(), Err(CredentialError::Incomplete)));
}

#[test]
fn load_user_without_token_is_incomplete() {
    let (storage, store) = store();
    storage.set_item(USER_KEY, &serde_json::to_string(&user()).unwrap()).unwrap();
    assert!(matches!(store.load(), Err(CredentialError::Incomplete)));
}

#[test]
fn load_malformed_user_is_error() {
    let (storage, store) = store();
    storage.set_item(TOKEN_KEY, "abc").unwrap();
    storage.set_item(USER_KEY, "{not json").unwrap();
    assert!(matches!(store.load(), Err(CredentialError::MalformedUser(_))));
}

#[test]
fn load_wrong_shape_user_is_error() {
    let (storage, store) = store();
    storage.set_item(TOKEN_KEY, "abc").unwrap();
    storage.set_item(USER_KEY, r#"{"id":"one","email":3}"#).unwrap();
    assert!(matches!(store.load(), Err(CredentialError::MalformedUser(_))));
}

#[test]
fn load_blank_token_is_error() {
    let (storage, store) = store();
    storage.set_item(TOKEN_KEY, "  ").unwrap();
    storage.set_item(USER_KEY, &serde_json::to_string(&user()).unwrap()).unwrap();
    assert!(matches!(store.load(), Err(CredentialError::EmptyToken)));
}

#[test]
fn clear_removes_both_entries() {
    let (storage, store) = store();
    store.save("abc", &user()).unwrap();
    store.clear();
    assert!(storage.is_empty());
    assert!(store.token().is_none());
}

#[test]
fn clear_if_token_matches_current() {
    let (storage, store) = store();
    store.save("abc", &user()).unwrap();
    assert!(store.clear_if_token("abc"));
    assert!(storage.is_empty());
}

#[test]
fn clear_if_token_skips_newer_credential() {
    let (storage, store) = store();
    store.save("new", &user()).unwrap();
    assert!(!store.clear_if_token("old"));
    assert_eq!(storage.len(), 2);
}

#[test]
fn clear_if_token_on_empty_store_is_noop() {
    let (_, store) = store();
    assert!(!store.clear_if_token("abc"));
}
