//! Credential types for the three authentication variants and the OAuth
//! refresh exchange payloads.

use serde::{Deserialize, Serialize};

use crate::config::{env_var, ConfigError};

/// An OAuth access/refresh token pair. Replaced as a whole after a refresh.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

// Tokens never end up in logs.
impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Integration settings plus the current token pair.
#[derive(Clone, Serialize, Deserialize)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub tokens: TokenPair,
}

impl OAuthCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: env_var("AMOCRM_CLIENT_ID")?,
            client_secret: env_var("AMOCRM_CLIENT_SECRET")?,
            redirect_uri: env_var("AMOCRM_REDIRECT_URI")?,
            tokens: TokenPair::new(
                env_var("AMOCRM_ACCESS_TOKEN")?,
                env_var("AMOCRM_REFRESH_TOKEN")?,
            ),
        })
    }

    pub(crate) fn refresh_request(&self) -> RefreshRequest<'_> {
        RefreshRequest {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            grant_type: "refresh_token",
            refresh_token: &self.tokens.refresh_token,
            redirect_uri: &self.redirect_uri,
        }
    }
}

impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("tokens", &self.tokens)
            .finish()
    }
}

/// User login and API hash for the legacy session endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct LegacyCredentials {
    pub login: String,
    pub api_hash: String,
}

impl LegacyCredentials {
    pub fn new(login: impl Into<String>, api_hash: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            api_hash: api_hash.into(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(env_var("AMOCRM_LOGIN")?, env_var("AMOCRM_API_HASH")?))
    }

    pub(crate) fn auth_request(&self) -> LegacyAuthRequest<'_> {
        LegacyAuthRequest {
            user_login: &self.login,
            user_hash: &self.api_hash,
        }
    }
}

impl std::fmt::Debug for LegacyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyCredentials")
            .field("login", &self.login)
            .field("api_hash", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /oauth2/access_token`.
#[derive(Debug, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub grant_type: &'a str,
    pub refresh_token: &'a str,
    pub redirect_uri: &'a str,
}

/// Successful token endpoint response. `token_type` and `expires_in` are
/// ignored: expiry is detected by the 401 on the next call.
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<RefreshResponse> for TokenPair {
    fn from(response: RefreshResponse) -> Self {
        TokenPair::new(response.access_token, response.refresh_token)
    }
}

/// Body of `POST /private/api/auth.php?type=json`.
#[derive(Debug, Serialize)]
pub(crate) struct LegacyAuthRequest<'a> {
    #[serde(rename = "USER_LOGIN")]
    pub user_login: &'a str,
    #[serde(rename = "USER_HASH")]
    pub user_hash: &'a str,
}
