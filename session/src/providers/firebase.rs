//! Identity Toolkit (Firebase Auth) REST client.

use super::{AuthGrant, IdentityProvider};
use crate::config::IdentityConfig;
use crate::error::{IdentityError, IdentityErrorCode};
use crate::user::{AuthMode, Credentials};
use chrono::TimeDelta;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Identity client speaking the Identity Toolkit REST protocol.
#[derive(Debug, Clone)]
pub struct FirebaseIdentityClient {
    client: Client,
    config: IdentityConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthRequest {
    email: String,
    password: String,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    id_token: String,
    email: String,
    #[serde(default)]
    refresh_token: String,
    expires_in: String,
    local_id: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl TryFrom<AuthResponse> for AuthGrant {
    type Error = IdentityError;

    fn try_from(response: AuthResponse) -> Result<Self, Self::Error> {
        let expires_in = response.expires_in.trim().parse::<i64>().map_err(|e| {
            IdentityError::MalformedResponse(format!(
                "expiresIn `{}` is not a number of seconds: {e}",
                response.expires_in
            ))
        })?;
        if TimeDelta::try_seconds(expires_in).is_none() {
            return Err(IdentityError::MalformedResponse(format!(
                "expiresIn `{expires_in}` is out of range"
            )));
        }

        Ok(Self {
            id_token: response.id_token,
            email: response.email,
            refresh_token: response.refresh_token,
            expires_in,
            local_id: response.local_id,
        })
    }
}

impl FirebaseIdentityClient {
    /// Create a client for `config`.
    #[must_use]
    pub fn new(config: IdentityConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Full URL (without the key) for `mode`.
    #[must_use]
    pub fn endpoint(&self, mode: AuthMode) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            mode.operation()
        )
    }
}

impl IdentityProvider for FirebaseIdentityClient {
    fn authenticate(
        &self,
        mode: AuthMode,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AuthGrant, IdentityError>> + Send {
        let client = self.client.clone();
        let url = self.endpoint(mode);
        let api_key = self.config.api_key.clone();
        let request = AuthRequest {
            email: credentials.email.clone(),
            password: credentials.password.clone(),
            return_secure_token: true,
        };

        async move {
            tracing::debug!(%mode, email = %request.email, "Calling identity service");

            let response = client
                .post(&url)
                .query(&[("key", api_key.as_str())])
                .json(&request)
                .send()
                .await
                .map_err(|e| IdentityError::Transport(e.to_string()))?;

            let status = response.status();
            if status.is_success() {
                let body = response
                    .json::<AuthResponse>()
                    .await
                    .map_err(|e| IdentityError::MalformedResponse(e.to_string()))?;
                return AuthGrant::try_from(body);
            }

            let body = response.text().await.unwrap_or_default();
            match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => Err(IdentityError::Rejected(IdentityErrorCode::parse(
                    &envelope.error.message,
                ))),
                Err(_) => Err(IdentityError::Transport(format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    body.chars().take(200).collect::<String>()
                ))),
            }
        }
    }
}
