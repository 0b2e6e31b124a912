use base64::{Engine, engine::GeneralPurpose};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::time::timeout;
use tracing::{debug, error, info};

use crate::{config::SpotifyOauth, http::Transport};

use super::{Error, SpotifyApi};

/// A bearer token for the app itself. Never refreshed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    token_type: String,
    /// seconds, as reported. Not tracked.
    expires_in: u64,
    obtained_at: DateTime<Utc>,
}

impl AsRef<str> for Credential {
    fn as_ref(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("obtained_at", &self.obtained_at)
            .finish_non_exhaustive()
    }
}

impl Credential {
    #[must_use]
    pub fn new(
        token: String,
        token_type: String,
        expires_in: u64,
        obtained_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token,
            token_type,
            expires_in,
            obtained_at,
        }
    }

    #[must_use]
    pub fn obtained_at(&self) -> DateTime<Utc> {
        self.obtained_at
    }
}

/// Only `access_token` is required.
#[derive(Deserialize, Debug)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl<T: Transport> SpotifyApi<'_, T> {
    /// Get a new [`Credential`] with client credentials and put it in the store.
    ///
    /// One request per call, no retries. The store is `Acquiring` while this runs,
    /// then `Ready` or `Failed`.
    ///
    /// <https://developer.spotify.com/documentation/web-api/tutorials/client-credentials-flow>
    ///
    /// # Errors
    ///
    /// [`Error::Credential`] if the request failed, was not successful, or had no `access_token`.
    pub async fn acquire(&self, oauth: &SpotifyOauth) -> Result<Credential, Error> {
        self.store.begin();

        match self.exchange(oauth).await {
            Ok(credential) => {
                info!(
                    "got access token `{}`, expiring in {} secs",
                    credential.token_type, credential.expires_in
                );
                self.store.set(credential.clone());
                Ok(credential)
            }
            Err(err) => {
                error!("{err}");
                self.store.fail(err.to_string());
                Err(err)
            }
        }
    }

    async fn exchange(&self, oauth: &SpotifyOauth) -> Result<Credential, Error> {
        const BASE64: GeneralPurpose = base64::engine::general_purpose::STANDARD;

        debug!("requesting new spotify access token");

        let auth = BASE64.encode(format!("{}:{}", oauth.client_id, oauth.client_secret));

        let resp = timeout(
            self.timeout,
            self.transport.post_form(
                &self.endpoints.token_url,
                &auth,
                &[("grant_type", "client_credentials")],
            ),
        )
        .await
        .map_err(|_| Error::Credential(format!("timed out after {:?}", self.timeout)))?
        .map_err(|err| Error::Credential(err.to_string()))?;

        if !resp.status.is_success() {
            return Err(Error::Credential(format!(
                "got {}: {:?}",
                resp.status, resp.body
            )));
        }

        let resp: TokenResponse = serde_json::from_str(&resp.body)
            .map_err(|err| Error::Credential(format!("unexpected response: {err}")))?;

        let Some(token) = resp.access_token.filter(|t| !t.is_empty()) else {
            return Err(Error::Credential(
                "response had no `access_token`".to_string(),
            ));
        };

        Ok(Credential::new(
            token,
            resp.token_type.unwrap_or_else(|| "Bearer".to_string()),
            resp.expires_in.unwrap_or_default(),
            Utc::now(),
        ))
    }
}
