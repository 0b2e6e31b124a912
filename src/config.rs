use std::{env, time::Duration};

use anyhow::anyhow;
use dialoguer::{Input, Password};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{load, save};

pub const SPOTIFY_CONFIG_NAME: &str = "spotify_oauth.yaml";

const CLIENT_ID_VAR: &str = "SPOTIFY_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "SPOTIFY_CLIENT_SECRET";
const API_URL_VAR: &str = "SPTFYBROWSE_API_URL";
const TOKEN_URL_VAR: &str = "SPTFYBROWSE_TOKEN_URL";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client credentials of a spotify app.
///
/// <https://developer.spotify.com/documentation/web-api/tutorials/client-credentials-flow>
#[derive(Serialize, Deserialize, Clone)]
pub struct SpotifyOauth {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for SpotifyOauth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyOauth")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl SpotifyOauth {
    /// Read the credentials from `SPOTIFY_CLIENT_ID` and `SPOTIFY_CLIENT_SECRET`.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let client_id = env::var(CLIENT_ID_VAR).ok().filter(|v| !v.is_empty())?;
        let client_secret = env::var(CLIENT_SECRET_VAR).ok().filter(|v| !v.is_empty())?;

        Some(Self {
            client_id,
            client_secret,
        })
    }

    /// Find the credentials: the environment first, then the saved config, then a prompt.
    ///
    /// Prompted credentials are saved for next time.
    ///
    /// # Errors
    ///
    /// This function fails if:
    /// - Nothing was found and `no_interaction` was set.
    /// - The prompt failed.
    pub fn resolve(no_interaction: bool) -> anyhow::Result<Self> {
        if let Some(oauth) = Self::from_env() {
            debug!("got spotify credentials from env");
            return Ok(oauth);
        }

        if let Ok(oauth) = load::<Self>(SPOTIFY_CONFIG_NAME) {
            debug!("got spotify credentials from {SPOTIFY_CONFIG_NAME}");
            return Ok(oauth);
        }

        if no_interaction {
            return Err(anyhow!(
                "no spotify credentials in {CLIENT_ID_VAR}/{CLIENT_SECRET_VAR} or {SPOTIFY_CONFIG_NAME}, and --no-interaction was set."
            ));
        }

        let client_id = Input::new()
            .with_prompt("spotify client_id?")
            .interact_text()?;
        let client_secret = Password::new()
            .with_prompt("spotify client_secret?")
            .interact()?;

        let oauth = Self {
            client_id,
            client_secret,
        };

        if let Err(err) = save(&oauth, SPOTIFY_CONFIG_NAME) {
            warn!("failed to save spotify credentials: {err}");
        }

        Ok(oauth)
    }
}

/// Where requests go. Overridable so the api can be proxied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub token_url: String,
    /// No trailing slash.
    pub api_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            token_url: "https://accounts.spotify.com/api/token".to_string(),
            api_url: "https://api.spotify.com/v1".to_string(),
        }
    }
}

impl Endpoints {
    /// [`Endpoints::default`], with `SPTFYBROWSE_TOKEN_URL` and `SPTFYBROWSE_API_URL` applied.
    #[must_use]
    pub fn from_env() -> Self {
        let mut endpoints = Self::default();

        if let Ok(url) = env::var(TOKEN_URL_VAR) {
            endpoints.token_url = url;
        }
        if let Ok(url) = env::var(API_URL_VAR) {
            endpoints.api_url = url.trim_end_matches('/').to_string();
        }

        endpoints
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub oauth: SpotifyOauth,
    pub endpoints: Endpoints,
    /// Applies to each request on its own.
    pub request_timeout: Duration,
}

impl Config {
    #[must_use]
    pub fn new(oauth: SpotifyOauth, request_timeout: Duration) -> Self {
        Self {
            oauth,
            endpoints: Endpoints::from_env(),
            request_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        sync::{LazyLock, Mutex, MutexGuard},
    };

    use tempfile::TempDir;

    use super::*;

    /// Tests that touch the environment take this first.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// The config dir is picked once per process, so every test shares this one.
    static CONFIG_HOME: LazyLock<TempDir> =
        LazyLock::new(|| tempfile::tempdir().expect("temp dir"));

    fn lock_env() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Sets or removes a variable, and puts back the old value on drop.
    struct EnvVarGuard {
        key: &'static str,
        original: Option<String>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let original = env::var(key).ok();
            unsafe { env::set_var(key, value) };
            Self { key, original }
        }

        fn unset(key: &'static str) -> Self {
            let original = env::var(key).ok();
            unsafe { env::remove_var(key) };
            Self { key, original }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match &self.original {
                Some(value) => unsafe { env::set_var(self.key, value) },
                None => unsafe { env::remove_var(self.key) },
            }
        }
    }

    /// Point the config dir at [`CONFIG_HOME`] and start without a saved file.
    fn empty_config_home() -> EnvVarGuard {
        let guard = EnvVarGuard::set("XDG_CONFIG_HOME", &CONFIG_HOME.path().to_string_lossy());
        let saved = CONFIG_HOME.path().join("sptfybrowse").join(SPOTIFY_CONFIG_NAME);
        let _ = fs::remove_file(saved);
        guard
    }

    fn oauth(id: &str) -> SpotifyOauth {
        SpotifyOauth {
            client_id: id.to_string(),
            client_secret: format!("{id}-secret"),
        }
    }

    #[test]
    fn credentials_from_env() {
        let _lock = lock_env();

        let _id = EnvVarGuard::set(CLIENT_ID_VAR, "env-id");
        let _secret = EnvVarGuard::set(CLIENT_SECRET_VAR, "env-secret");
        let oauth = SpotifyOauth::from_env().expect("both set");
        assert_eq!(oauth.client_id, "env-id");
        assert_eq!(oauth.client_secret, "env-secret");

        let _secret = EnvVarGuard::unset(CLIENT_SECRET_VAR);
        assert!(SpotifyOauth::from_env().is_none());

        let _secret = EnvVarGuard::set(CLIENT_SECRET_VAR, "env-secret");
        let _id = EnvVarGuard::set(CLIENT_ID_VAR, "");
        assert!(SpotifyOauth::from_env().is_none());
    }

    #[test]
    fn api_url_loses_its_trailing_slash() {
        let _lock = lock_env();

        let _api = EnvVarGuard::set(API_URL_VAR, "http://proxy.test/v1/");
        let _token = EnvVarGuard::set(TOKEN_URL_VAR, "http://proxy.test/token");
        let endpoints = Endpoints::from_env();
        assert_eq!(endpoints.api_url, "http://proxy.test/v1");
        assert_eq!(endpoints.token_url, "http://proxy.test/token");

        let _api = EnvVarGuard::unset(API_URL_VAR);
        let _token = EnvVarGuard::unset(TOKEN_URL_VAR);
        assert_eq!(Endpoints::from_env(), Endpoints::default());
    }

    #[test]
    fn no_credentials_and_no_interaction_fails() {
        let _lock = lock_env();
        let _home = empty_config_home();
        let _id = EnvVarGuard::unset(CLIENT_ID_VAR);
        let _secret = EnvVarGuard::unset(CLIENT_SECRET_VAR);

        let err = SpotifyOauth::resolve(true).expect_err("nothing to find");
        assert!(err.to_string().contains("--no-interaction"));
    }

    #[test]
    fn env_comes_before_the_saved_file() {
        let _lock = lock_env();
        let _home = empty_config_home();
        let _id = EnvVarGuard::unset(CLIENT_ID_VAR);
        let _secret = EnvVarGuard::unset(CLIENT_SECRET_VAR);

        save(&oauth("file-id"), SPOTIFY_CONFIG_NAME).expect("saved");
        let resolved = SpotifyOauth::resolve(true).expect("from file");
        assert_eq!(resolved.client_id, "file-id");
        assert_eq!(resolved.client_secret, "file-id-secret");

        let _id = EnvVarGuard::set(CLIENT_ID_VAR, "env-id");
        let _secret = EnvVarGuard::set(CLIENT_SECRET_VAR, "env-secret");
        let resolved = SpotifyOauth::resolve(true).expect("from env");
        assert_eq!(resolved.client_id, "env-id");
    }

    #[test]
    fn default_endpoints_point_at_spotify() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.token_url, "https://accounts.spotify.com/api/token");
        assert_eq!(endpoints.api_url, "https://api.spotify.com/v1");
    }

    #[test]
    fn debug_hides_the_secret() {
        let oauth = SpotifyOauth {
            client_id: "id".to_string(),
            client_secret: "hunter2".to_string(),
        };
        let debugged = format!("{oauth:?}");
        assert!(debugged.contains("id"));
        assert!(!debugged.contains("hunter2"));
    }
}
