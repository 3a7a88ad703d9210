//! Client-side session: a single `user_id` kept in key-value storage.
//!
//! There is no token and no expiry. Logging in overwrites the stored id and
//! nothing ever clears it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, warn};

/// Storage key holding the logged-in username.
pub const USER_ID_KEY: &str = "user_id";

/// Synchronous string key-value storage.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// In-process store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

/// Browser `window.localStorage`. Persists across page loads and is shared
/// by every tab on the origin, last writer wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl SessionStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    warn!(key, "localStorage rejected write");
                }
            }
            None => warn!(key, "localStorage unavailable, session not saved"),
        }
    }
}

/// The logged-in user, backed by a [`SessionStore`].
#[derive(Debug, Clone, Default)]
pub struct Session<S> {
    store: S,
}

impl<S: SessionStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stored user id. An empty string counts as logged out.
    pub fn current_user(&self) -> Option<String> {
        self.store.get(USER_ID_KEY).filter(|u| !u.is_empty())
    }

    pub fn set_user(&self, user_id: &str) {
        debug!(user_id, "session user stored");
        self.store.set(USER_ID_KEY, user_id);
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user().is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
