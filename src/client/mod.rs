//! Per-browser shell storage.
//!
//! Every browser is identified by an opaque id (carried in a cookie by the
//! server) and owns one [`Shell`]. The store is cheap to clone and shared by
//! all handlers. Clients idle for longer than the store's timeout are
//! dropped by [`ClientStore::cleanup_expired`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use vayama::client::ClientStore;
//! use vayama::config::TimingConfig;
//! use vayama::llm::{GeminiDriver, LlmSettings};
//! use vayama::prefs::Theme;
//!
//! let driver = Arc::new(GeminiDriver::new(LlmSettings::default()).unwrap());
//! let store = ClientStore::new(driver, TimingConfig::default(), Duration::from_secs(1800));
//! let (id, client) = store.create(Theme::Dark);
//! assert!(!client.lock().is_authenticated());
//! assert!(store.get(&id).is_some());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::config::TimingConfig;
use crate::llm::LlmDriver;
use crate::prefs::Theme;
use crate::screens::assistant::PendingTurn;
use crate::shell::Shell;

/// Shared handle to one browser's shell.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    shell: Arc<Mutex<Shell>>,
    last_activity: Arc<Mutex<Instant>>,
}

impl ClientHandle {
    fn new(shell: Shell, now: Instant) -> Self {
        Self {
            shell: Arc::new(Mutex::new(shell)),
            last_activity: Arc::new(Mutex::new(now)),
        }
    }

    /// Record a request from this client.
    pub fn touch(&self, now: Instant) {
        *self.last_activity.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    /// Whether the client has been idle for longer than `timeout` at `now`.
    #[must_use]
    pub fn is_expired_with_timeout(&self, now: Instant, timeout: Duration) -> bool {
        let last = *self.last_activity.lock().unwrap_or_else(PoisonError::into_inner);
        now.saturating_duration_since(last) > timeout
    }

    /// Lock the shell. Never hold the guard across an await.
    pub fn lock(&self) -> MutexGuard<'_, Shell> {
        self.shell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against a screen if it is the mounted one.
    ///
    /// Returns `None`, and logs, when the screen is not active.
    pub fn with_screen<S, T>(
        &self,
        screen: fn(&mut Shell) -> Option<&mut S>,
        f: impl FnOnce(&mut S) -> T,
    ) -> Option<T> {
        let mut shell = self.lock();
        let tab = shell.tab();
        let Some(target) = screen(&mut shell) else {
            tracing::debug!(%tab, "Ignoring action for an inactive screen");
            return None;
        };
        Some(f(target))
    }

    /// Wait for a planner call and apply it to this shell.
    pub async fn drive(&self, pending: PendingTurn) -> bool {
        let outcome = pending.run().await;
        self.lock().apply_turn(outcome)
    }
}

struct ClientStoreInner {
    clients: RwLock<HashMap<String, ClientHandle>>,
    driver: Arc<dyn LlmDriver>,
    timing: TimingConfig,
    idle_timeout: Duration,
}

/// Thread-safe store of every client's shell.
#[derive(Clone)]
pub struct ClientStore {
    inner: Arc<ClientStoreInner>,
}

impl fmt::Debug for ClientStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientStore")
            .field("clients", &self.len())
            .field("timing", &self.inner.timing)
            .field("idle_timeout", &self.inner.idle_timeout)
            .finish_non_exhaustive()
    }
}

impl ClientStore {
    #[must_use]
    pub fn new(driver: Arc<dyn LlmDriver>, timing: TimingConfig, idle_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(ClientStoreInner {
                clients: RwLock::new(HashMap::new()),
                driver,
                timing,
                idle_timeout,
            }),
        }
    }

    #[must_use]
    pub fn timing(&self) -> TimingConfig {
        self.inner.timing
    }

    /// Create a signed-out client and return its id.
    #[must_use]
    pub fn create(&self, theme: Theme) -> (String, ClientHandle) {
        let id = Uuid::new_v4().simple().to_string();
        let handle = ClientHandle::new(
            Shell::new(Arc::clone(&self.inner.driver), self.inner.timing, theme),
            Instant::now(),
        );
        self.inner
            .clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), handle.clone());
        tracing::debug!(client_id = %id, "Client created");
        (id, handle)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<ClientHandle> {
        self.inner
            .clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Look up `id`, creating a new client when it is unknown or absent.
    ///
    /// The returned id differs from `id` when a client was created.
    #[must_use]
    pub fn get_or_create(&self, id: Option<&str>, theme: Theme) -> (String, ClientHandle) {
        if let Some((id, handle)) = id.and_then(|id| self.get(id).map(|h| (id.to_string(), h))) {
            return (id, handle);
        }
        self.create(theme)
    }

    pub fn remove(&self, id: &str) -> Option<ClientHandle> {
        self.inner
            .clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove clients idle for longer than the store's timeout.
    ///
    /// Returns the number of clients removed.
    pub fn cleanup_expired(&self, now: Instant) -> usize {
        self.cleanup_expired_with_timeout(now, self.inner.idle_timeout)
    }

    /// Remove clients that have been idle longer than `timeout`.
    pub fn cleanup_expired_with_timeout(&self, now: Instant, timeout: Duration) -> usize {
        let mut guard = self.inner.clients.write().unwrap_or_else(PoisonError::into_inner);
        let before = guard.len();
        guard.retain(|_, client| !client.is_expired_with_timeout(now, timeout));
        before - guard.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::scripted::ScriptedDriver;
    use crate::screens::auth::Credentials;
    use crate::shell::Tab;

    const IDLE: Duration = Duration::from_secs(60);

    fn store(replies: Vec<Result<String, crate::llm::LlmError>>) -> ClientStore {
        ClientStore::new(ScriptedDriver::new(replies), TimingConfig::default(), IDLE)
    }

    fn sign_in(client: &ClientHandle) {
        client
            .lock()
            .login(&Credentials {
                name: None,
                email: "a@b.c".to_string(),
                password: "pw".to_string(),
            })
            .unwrap();
    }

    #[test]
    fn test_client_store_lifecycle() {
        let store = store(vec![]);
        assert!(store.is_empty());

        let (id, _) = store.create(Theme::Light);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().lock().theme(), Theme::Light);

        let (same, _) = store.get_or_create(Some(&id), Theme::Dark);
        assert_eq!(same, id);
        let (other, _) = store.get_or_create(Some("stale"), Theme::Dark);
        assert_ne!(other, "stale");
        assert_eq!(store.len(), 2);

        store.remove(&id);
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn test_idle_clients_are_evicted() {
        let store = store(vec![]);
        let (idle, _) = store.create(Theme::Dark);
        let (active, active_client) = store.create(Theme::Dark);
        let later = Instant::now() + IDLE + Duration::from_secs(1);

        assert_eq!(store.cleanup_expired(Instant::now()), 0);
        active_client.touch(later);
        assert_eq!(store.cleanup_expired(later), 1);
        assert!(store.get(&idle).is_none());
        assert!(store.get(&active).is_some());

        // A stale cookie after eviction gets a fresh client.
        let (fresh, _) = store.get_or_create(Some(&idle), Theme::Dark);
        assert_ne!(fresh, idle);
    }

    #[test]
    fn test_with_screen_ignores_inactive_screen() {
        let store = store(vec![]);
        let (_, client) = store.create(Theme::Dark);
        sign_in(&client);

        assert!(client.with_screen(Shell::reels_mut, |_| ()).is_none());
        client.lock().select_tab(Tab::Reels);
        assert_eq!(
            client.with_screen(Shell::reels_mut, |r| r.toggle_like(101)),
            Some(Ok(353))
        );
    }

    #[tokio::test]
    async fn test_drive_applies_reply() {
        let store = store(vec![Ok("Sure, tell me more!".to_string())]);
        let (_, client) = store.create(Theme::Dark);
        sign_in(&client);

        let pending = client.lock().begin_assistant_turn("hi").unwrap();
        assert!(client.drive(pending).await);
        let shell = client.lock();
        let assistant = shell.assistant().unwrap();
        assert_eq!(assistant.turns().last().unwrap().text, "Sure, tell me more!");
        assert!(!assistant.is_loading());
    }
}
