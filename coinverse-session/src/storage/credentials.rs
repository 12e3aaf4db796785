use std::sync::Arc;

use super::{KeyValueStore, Shadowed};

const TOKEN_KEY: &str = "session_token";

/// Holder of the session token. An absent token means "signed out".
pub struct CredentialStore {
    token: Shadowed,
}

impl CredentialStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            token: Shadowed::new(TOKEN_KEY, backend),
        }
    }

    pub fn save(&self, token: Option<&str>) {
        self.token.set(token);
    }

    pub fn get(&self) -> Option<String> {
        self.token.get()
    }

    pub fn clear(&self) {
        self.save(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};

    fn store() -> CredentialStore {
        CredentialStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn starts_without_a_token() {
        assert_eq!(store().get(), None);
    }

    #[test]
    fn save_then_get_round_trips_any_string() {
        let store = store();
        for token in ["abc", "", "  ", "eyJhbGciOiJIUzI1NiJ9.e30.sig"] {
            store.save(Some(token));
            assert_eq!(store.get().as_deref(), Some(token));
        }
    }

    #[test]
    fn clear_forgets_the_token() {
        let store = store();
        store.save(Some("abc"));
        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn token_is_durable_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        CredentialStore::new(Arc::new(FileStore::open(dir.path()).unwrap())).save(Some("abc"));

        let reopened = CredentialStore::new(Arc::new(FileStore::open(dir.path()).unwrap()));
        assert_eq!(reopened.get().as_deref(), Some("abc"));
    }

    #[test]
    fn concurrent_readers_never_see_a_torn_value() {
        let store = Arc::new(store());
        store.save(Some("first"));

        let writer = {
            let store = store.clone();
            std::thread::spawn(move || {
                for i in 0..200 {
                    store.save(Some(&format!("token-{i}")));
                }
            })
        };

        for _ in 0..200 {
            let token = store.get().unwrap();
            assert!(token == "first" || token.starts_with("token-"));
        }
        writer.join().unwrap();
        assert_eq!(store.get().as_deref(), Some("token-199"));
    }
}
