//! The process-wide home of the access token.
//!
//! Single writer: only [`SpotifyApi::acquire`](super::SpotifyApi::acquire) moves the state
//! forward. Fetchers only ever read it with [`CredentialStore::get`].

use std::sync::{LazyLock, PoisonError, RwLock};

use tracing::trace;

use super::Credential;

/// `Unset -> Acquiring -> Ready | Failed`. Only `Ready` lets fetchers run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TokenState {
    #[default]
    Unset,
    Acquiring,
    Ready(Credential),
    Failed(String),
}

#[derive(Debug, Default)]
pub struct CredentialStore {
    state: RwLock<TokenState>,
}

static GLOBAL: LazyLock<CredentialStore> = LazyLock::new(CredentialStore::new);

impl CredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The store shared by the whole process.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    #[must_use]
    pub fn state(&self) -> TokenState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The credential, if one is ready.
    #[must_use]
    pub fn get(&self) -> Option<Credential> {
        match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            TokenState::Ready(credential) => Some(credential.clone()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(
            *self.state.read().unwrap_or_else(PoisonError::into_inner),
            TokenState::Ready(_)
        )
    }

    pub(crate) fn begin(&self) {
        self.replace(TokenState::Acquiring);
    }

    pub(crate) fn set(&self, credential: Credential) {
        self.replace(TokenState::Ready(credential));
    }

    pub(crate) fn fail(&self, reason: String) {
        self.replace(TokenState::Failed(reason));
    }

    /// Forget the credential. Nothing calls this during a normal run.
    pub fn clear(&self) {
        self.replace(TokenState::Unset);
    }

    fn replace(&self, next: TokenState) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        trace!("token state {:?} -> {:?}", Kind(&state), Kind(&next));
        *state = next;
    }
}

/// Logs a state without its token.
struct Kind<'a>(&'a TokenState);

impl std::fmt::Debug for Kind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self.0 {
            TokenState::Unset => "Unset",
            TokenState::Acquiring => "Acquiring",
            TokenState::Ready(_) => "Ready",
            TokenState::Failed(_) => "Failed",
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn credential() -> Credential {
        Credential::new("tok".to_string(), "Bearer".to_string(), 3600, Utc::now())
    }

    #[test]
    fn starts_unset() {
        let store = CredentialStore::new();
        assert_eq!(store.state(), TokenState::Unset);
        assert!(store.get().is_none());
    }

    #[test]
    fn only_ready_yields_a_credential() {
        let store = CredentialStore::new();

        store.begin();
        assert_eq!(store.state(), TokenState::Acquiring);
        assert!(store.get().is_none());

        store.set(credential());
        assert!(store.is_ready());
        assert_eq!(store.get().map(|c| c.as_ref().to_string()), Some("tok".to_string()));
    }

    #[test]
    fn failed_blocks() {
        let store = CredentialStore::new();
        store.begin();
        store.fail("nope".to_string());

        assert_eq!(store.state(), TokenState::Failed("nope".to_string()));
        assert!(store.get().is_none());
    }

    #[test]
    fn clear_goes_back_to_unset() {
        let store = CredentialStore::new();
        store.begin();
        store.set(credential());
        store.clear();

        assert_eq!(store.state(), TokenState::Unset);
        assert!(!store.is_ready());
    }
}
