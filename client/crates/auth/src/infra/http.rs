//! HTTP Gateway Implementations
//!
//! Talks to the hosted backend's REST surface. One [`ApiClient`] is
//! shared by every gateway so they agree on base URL, API key, request
//! timeout, and the current bearer token.

use std::sync::RwLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::domain::entity::{
    identity::Identity,
    profile::{Profile, ProfilePatch},
    session::Session,
};
use crate::domain::repository::{
    IdentityGateway, ProfileStore, TravelPreferencesStore,
};
use crate::domain::value_object::{email::Email, metadata::IdentityMetadata};
use crate::error::{AuthError, AuthResult};
use kernel::error::app_error::AppError;
use kernel::id::{Id, IdentityId};
use otp::domain::repository::CodeDelivery;
use otp::domain::value_objects::CodePurpose;
use otp::error::{OtpError, OtpResult};

/// Connection settings for the hosted backend
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// e.g. `https://api.example-travel.app`
    pub base_url: String,
    /// Anonymous API key sent with every request
    pub api_key: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// Shared HTTP client for all gateways
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    bearer: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> AuthResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AuthError::Internal(format!("HTTP client init failed: {e}")))?;

        Ok(Self {
            http,
            config,
            bearer: RwLock::new(None),
        })
    }

    /// Set the bearer token used for authenticated calls
    ///
    /// Wire this to the session manager's subscription so the client
    /// always sends the current access token.
    pub fn set_bearer(&self, token: Option<String>) {
        *self.bearer.write().expect("bearer lock poisoned") = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, self.url(path))
            .header("x-api-key", &self.config.api_key);
        let token = self.bearer.read().expect("bearer lock poisoned").clone();
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> AuthResult<reqwest::Response> {
        builder.send().await.map_err(transport_error)
    }

    async fn json_body<T: DeserializeOwned>(&self, response: reqwest::Response) -> AuthResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| AuthError::RemoteService(format!("malformed response body: {e}")))
    }
}

/// Map reqwest transport failures onto the auth taxonomy
fn transport_error(err: reqwest::Error) -> AuthError {
    if err.is_timeout() {
        AuthError::Timeout("remote call".into())
    } else if err.is_connect() {
        AuthError::NetworkUnavailable(err.to_string())
    } else {
        AuthError::RemoteService(err.to_string())
    }
}

/// Generic status mapping for calls without a more specific rule
fn status_error(status: StatusCode) -> AuthError {
    match status.as_u16() {
        401 | 403 => AuthError::SessionExpired,
        408 => AuthError::Timeout("remote call".into()),
        429 => AuthError::RemoteService("rate limited".into()),
        s => AuthError::RemoteService(format!("unexpected status {s}")),
    }
}

// ============================================================================
// Wire DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
struct IdentityDto {
    id: Uuid,
    email: String,
    email_verified: bool,
    #[serde(default)]
    metadata: IdentityMetadata,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IdentityDto {
    fn into_identity(self) -> Identity {
        Identity {
            identity_id: Id::from_uuid(self.id),
            email: Email::from_remote(self.email),
            email_verified: self.email_verified,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SessionDto {
    access_token: String,
    refresh_token: String,
    expires_at_ms: i64,
    user: IdentityDto,
}

impl SessionDto {
    fn into_session(self) -> Session {
        Session::new(
            self.access_token,
            self.refresh_token,
            self.expires_at_ms,
            self.user.into_identity(),
        )
    }
}

#[derive(Debug, Deserialize)]
struct ProfileDto {
    identity_id: Uuid,
    email: String,
    email_verified: bool,
    has_completed_onboarding: bool,
    first_name: Option<String>,
    last_name: Option<String>,
    home_airport: Option<String>,
    bio: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileDto {
    fn into_profile(self) -> Profile {
        Profile {
            identity_id: Id::from_uuid(self.identity_id),
            email: self.email,
            email_verified: self.email_verified,
            has_completed_onboarding: self.has_completed_onboarding,
            first_name: self.first_name,
            last_name: self.last_name,
            home_airport: self.home_airport,
            bio: self.bio,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Serialize)]
struct ProfilePatchDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    has_completed_onboarding: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    home_airport: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bio: Option<&'a str>,
}

impl<'a> ProfilePatchDto<'a> {
    fn from_patch(patch: &'a ProfilePatch) -> Self {
        Self {
            email: patch.email.as_deref(),
            email_verified: patch.email_verified,
            has_completed_onboarding: patch.has_completed_onboarding,
            first_name: patch.first_name.as_deref(),
            last_name: patch.last_name.as_deref(),
            home_airport: patch.home_airport.as_deref(),
            bio: patch.bio.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExistsDto {
    exists: bool,
}

// ============================================================================
// Identity Gateway Implementation
// ============================================================================

/// HTTP-backed identity service gateway
pub struct HttpIdentityGateway {
    client: std::sync::Arc<ApiClient>,
}

impl HttpIdentityGateway {
    pub fn new(client: std::sync::Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl IdentityGateway for HttpIdentityGateway {
    async fn create_identity(
        &self,
        email: &Email,
        password: &str,
        metadata: &IdentityMetadata,
    ) -> AuthResult<Identity> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            password: &'a str,
            metadata: &'a IdentityMetadata,
        }

        let response = self
            .client
            .send(self.client.request(Method::POST, "/auth/users").json(&Body {
                email: email.as_str(),
                password,
                metadata,
            }))
            .await?;

        match response.status() {
            status if status.is_success() => {
                let dto: IdentityDto = self.client.json_body(response).await?;
                Ok(dto.into_identity())
            }
            StatusCode::CONFLICT => Err(AppError::conflict(
                "An account with this email already exists",
            )
            .with_action("Sign in instead, or reset your password")
            .into()),
            status => Err(status_error(status)),
        }
    }

    async fn authenticate(&self, email: &Email, password: &str) -> AuthResult<Session> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            password: &'a str,
        }

        let response = self
            .client
            .send(
                self.client
                    .request(Method::POST, "/auth/sessions")
                    .json(&Body {
                        email: email.as_str(),
                        password,
                    }),
            )
            .await?;

        match response.status() {
            status if status.is_success() => {
                let dto: SessionDto = self.client.json_body(response).await?;
                Ok(dto.into_session())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AuthError::InvalidCredentials)
            }
            status => Err(status_error(status)),
        }
    }

    async fn refresh_session(&self, refresh_token: &str) -> AuthResult<Session> {
        #[derive(Serialize)]
        struct Body<'a> {
            refresh_token: &'a str,
        }

        let response = self
            .client
            .send(
                self.client
                    .request(Method::POST, "/auth/sessions/refresh")
                    .json(&Body { refresh_token }),
            )
            .await?;

        match response.status() {
            status if status.is_success() => {
                let dto: SessionDto = self.client.json_body(response).await?;
                Ok(dto.into_session())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AuthError::SessionExpired)
            }
            status => Err(status_error(status)),
        }
    }

    async fn get_identity(&self, identity_id: IdentityId) -> AuthResult<Option<Identity>> {
        let response = self
            .client
            .send(
                self.client
                    .request(Method::GET, &format!("/auth/users/{identity_id}")),
            )
            .await?;

        match response.status() {
            status if status.is_success() => {
                let dto: IdentityDto = self.client.json_body(response).await?;
                Ok(Some(dto.into_identity()))
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(status_error(status)),
        }
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>> {
        let response = self
            .client
            .send(
                self.client
                    .request(Method::GET, "/auth/users/lookup")
                    .query(&[("email", email.as_str())]),
            )
            .await?;

        match response.status() {
            status if status.is_success() => {
                let dto: IdentityDto = self.client.json_body(response).await?;
                Ok(Some(dto.into_identity()))
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(status_error(status)),
        }
    }

    async fn update_metadata(
        &self,
        identity_id: IdentityId,
        patch: &IdentityMetadata,
    ) -> AuthResult<Identity> {
        let response = self
            .client
            .send(
                self.client
                    .request(Method::PATCH, &format!("/auth/users/{identity_id}/metadata"))
                    .json(patch),
            )
            .await?;

        match response.status() {
            status if status.is_success() => {
                let dto: IdentityDto = self.client.json_body(response).await?;
                Ok(dto.into_identity())
            }
            status => Err(status_error(status)),
        }
    }

    async fn send_password_reset(&self, email: &Email) -> AuthResult<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
        }

        let response = self
            .client
            .send(
                self.client
                    .request(Method::POST, "/auth/password-resets")
                    .json(&Body {
                        email: email.as_str(),
                    }),
            )
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            // The use case swallows this for anti-enumeration
            StatusCode::NOT_FOUND => Err(AuthError::InvalidCredentials),
            status => Err(status_error(status)),
        }
    }

    async fn apply_password_reset(
        &self,
        recovery_token: &str,
        new_password: &str,
    ) -> AuthResult<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            recovery_token: &'a str,
            new_password: &'a str,
        }

        let response = self
            .client
            .send(
                self.client
                    .request(Method::POST, "/auth/password-resets/apply")
                    .json(&Body {
                        recovery_token,
                        new_password,
                    }),
            )
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::GONE => {
                Err(AuthError::SessionExpired)
            }
            status => Err(status_error(status)),
        }
    }

    async fn update_email(
        &self,
        identity_id: IdentityId,
        new_email: &Email,
        password: Option<&str>,
    ) -> AuthResult<Identity> {
        #[derive(Serialize)]
        struct Body<'a> {
            new_email: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            password: Option<&'a str>,
        }

        let response = self
            .client
            .send(
                self.client
                    .request(Method::PUT, &format!("/auth/users/{identity_id}/email"))
                    .json(&Body {
                        new_email: new_email.as_str(),
                        password,
                    }),
            )
            .await?;

        match response.status() {
            status if status.is_success() => {
                let dto: IdentityDto = self.client.json_body(response).await?;
                Ok(dto.into_identity())
            }
            StatusCode::UNAUTHORIZED => Err(AuthError::InvalidCredentials),
            status => Err(status_error(status)),
        }
    }

    async fn update_password(
        &self,
        identity_id: IdentityId,
        current_password: &str,
        new_password: &str,
    ) -> AuthResult<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            current_password: &'a str,
            new_password: &'a str,
        }

        let response = self
            .client
            .send(
                self.client
                    .request(Method::PUT, &format!("/auth/users/{identity_id}/password"))
                    .json(&Body {
                        current_password,
                        new_password,
                    }),
            )
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::InvalidCredentials),
            status => Err(status_error(status)),
        }
    }
}

// ============================================================================
// Profile Store Implementation
// ============================================================================

/// HTTP-backed profile store
pub struct HttpProfileStore {
    client: std::sync::Arc<ApiClient>,
}

impl HttpProfileStore {
    pub fn new(client: std::sync::Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl ProfileStore for HttpProfileStore {
    async fn get_profile(&self, identity_id: IdentityId) -> AuthResult<Option<Profile>> {
        let response = self
            .client
            .send(
                self.client
                    .request(Method::GET, &format!("/profiles/{identity_id}")),
            )
            .await?;

        match response.status() {
            status if status.is_success() => {
                let dto: ProfileDto = self.client.json_body(response).await?;
                Ok(Some(dto.into_profile()))
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(status_error(status)),
        }
    }

    async fn upsert_profile(
        &self,
        identity_id: IdentityId,
        patch: &ProfilePatch,
    ) -> AuthResult<Profile> {
        let response = self
            .client
            .send(
                self.client
                    .request(Method::PUT, &format!("/profiles/{identity_id}"))
                    .json(&ProfilePatchDto::from_patch(patch)),
            )
            .await?;

        match response.status() {
            status if status.is_success() => {
                let dto: ProfileDto = self.client.json_body(response).await?;
                Ok(dto.into_profile())
            }
            status => Err(status_error(status)),
        }
    }

    async fn profile_exists(&self, identity_id: IdentityId) -> AuthResult<bool> {
        let response = self
            .client
            .send(
                self.client
                    .request(Method::GET, &format!("/profiles/{identity_id}/exists")),
            )
            .await?;

        match response.status() {
            status if status.is_success() => {
                let dto: ExistsDto = self.client.json_body(response).await?;
                Ok(dto.exists)
            }
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(status_error(status)),
        }
    }
}

// ============================================================================
// Travel Preferences Store Implementation
// ============================================================================

/// HTTP-backed travel-preferences existence probe
pub struct HttpTravelPreferencesStore {
    client: std::sync::Arc<ApiClient>,
}

impl HttpTravelPreferencesStore {
    pub fn new(client: std::sync::Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl TravelPreferencesStore for HttpTravelPreferencesStore {
    async fn preferences_exist(&self, identity_id: IdentityId) -> AuthResult<bool> {
        let response = self
            .client
            .send(
                self.client
                    .request(Method::GET, &format!("/travel-preferences/{identity_id}/exists")),
            )
            .await?;

        match response.status() {
            status if status.is_success() => {
                let dto: ExistsDto = self.client.json_body(response).await?;
                Ok(dto.exists)
            }
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(status_error(status)),
        }
    }
}

// ============================================================================
// Code Delivery Implementation
// ============================================================================

/// Sends verification codes through the backend's notification endpoint
pub struct HttpCodeDelivery {
    client: std::sync::Arc<ApiClient>,
}

impl HttpCodeDelivery {
    pub fn new(client: std::sync::Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl CodeDelivery for HttpCodeDelivery {
    async fn deliver(&self, email: &str, purpose: CodePurpose, code: &str) -> OtpResult<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            purpose: &'a str,
            code: &'a str,
        }

        let response = self
            .client
            .request(Method::POST, "/notifications/verification-codes")
            .json(&Body {
                email,
                purpose: purpose.code(),
                code,
            })
            .send()
            .await
            .map_err(|e| OtpError::Delivery(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(OtpError::Delivery(format!(
                "notification endpoint returned {}",
                response.status()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ApiClient::new(ApiConfig::new("https://api.example.test/", "key")).unwrap();
        assert_eq!(
            client.url("/auth/users"),
            "https://api.example.test/auth/users"
        );
    }

    #[test]
    fn test_profile_patch_dto_skips_unset_fields() {
        let patch = ProfilePatch::onboarding(true);
        let json = serde_json::to_string(&ProfilePatchDto::from_patch(&patch)).unwrap();
        assert_eq!(json, r#"{"has_completed_onboarding":true}"#);
    }

    #[test]
    fn test_identity_dto_metadata_defaults_to_empty() {
        let json = r#"{
            "id": "7f8a6f2e-4b5e-4d9c-9c1a-2f3e4d5c6b7a",
            "email": "traveler@example.com",
            "email_verified": true,
            "created_at": "2026-08-01T00:00:00Z",
            "updated_at": "2026-08-01T00:00:00Z"
        }"#;
        let dto: IdentityDto = serde_json::from_str(json).unwrap();
        let identity = dto.into_identity();
        assert!(!identity.has_completed_onboarding());
        assert_eq!(identity.email.as_str(), "traveler@example.com");
    }
}
