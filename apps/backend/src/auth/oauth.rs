//! Google OAuth code flow, delegated to `openidconnect`.
//!
//! The handshake itself is the library's job; this module only wires it to
//! our configuration and reduces a verified ID token to a [`GoogleProfile`],
//! the input of the user upsert in `services::users`.

use dashmap::DashMap;
use openidconnect::core::{
    CoreAuthenticationFlow, CoreClient, CoreIdTokenClaims, CoreProviderMetadata,
};
use openidconnect::{
    AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointMaybeSet, EndpointNotSet,
    EndpointSet, IssuerUrl, Nonce, RedirectUrl, Scope, TokenResponse,
};
use tracing::{info, warn};

use crate::config::auth::GoogleConfig;
use crate::error::AppError;

pub const GOOGLE_ISSUER_URL: &str = "https://accounts.google.com";

/// Client type produced by provider-metadata discovery.
type OidcClient = CoreClient<
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointMaybeSet,
    EndpointMaybeSet,
>;

/// What we keep from a verified Google identity. Field names follow the
/// provider's claim names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleProfile {
    pub sub: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Discovered Google client plus the in-flight login state.
pub struct GoogleAuth {
    client: OidcClient,
    http: reqwest::Client,
    /// CSRF state -> nonce for logins that have been issued an authorization
    /// URL but not yet called back.
    pending: DashMap<String, Nonce>,
    pub frontend_url: String,
}

impl GoogleAuth {
    /// Run OIDC discovery against Google and build the client.
    pub async fn discover(config: GoogleConfig) -> Result<Self, AppError> {
        let http = reqwest::ClientBuilder::new()
            // Following redirects opens the client to SSRF on the token endpoint.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AppError::config(format!("failed to build OAuth HTTP client: {e}")))?;

        let issuer = IssuerUrl::new(GOOGLE_ISSUER_URL.to_string())
            .map_err(|e| AppError::config(format!("invalid issuer URL: {e}")))?;

        let provider_metadata = CoreProviderMetadata::discover_async(issuer, &http)
            .await
            .map_err(|e| AppError::config(format!("Google OIDC discovery failed: {e}")))?;

        let redirect = RedirectUrl::new(config.redirect_url)
            .map_err(|e| AppError::config(format!("invalid OAUTH_REDIRECT_URL: {e}")))?;

        let client = CoreClient::from_provider_metadata(
            provider_metadata,
            ClientId::new(config.client_id),
            Some(ClientSecret::new(config.client_secret)),
        )
        .set_redirect_uri(redirect);

        info!("oauth=ready issuer={GOOGLE_ISSUER_URL}");

        Ok(Self {
            client,
            http,
            pending: DashMap::new(),
            frontend_url: config.frontend_url,
        })
    }

    /// Anonymous -> Pending: issue the provider authorization URL and
    /// remember the state/nonce pair until the callback.
    pub fn begin_login(&self) -> String {
        let (auth_url, csrf_token, nonce) = self
            .client
            .authorize_url(
                CoreAuthenticationFlow::AuthorizationCode,
                CsrfToken::new_random,
                Nonce::new_random,
            )
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .url();

        self.pending.insert(csrf_token.secret().clone(), nonce);
        auth_url.to_string()
    }

    /// Pending -> Authenticated: exchange the callback code and verify the
    /// ID token. Any verification failure is Unauthorized; the state entry
    /// is consumed either way.
    pub async fn complete_login(&self, code: &str, state: &str) -> Result<GoogleProfile, AppError> {
        let (_, nonce) = self.pending.remove(state).ok_or_else(|| {
            warn!("oauth callback with unknown or replayed state");
            AppError::unauthorized()
        })?;

        let token_response = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .map_err(|e| AppError::config(format!("token endpoint not configured: {e}")))?
            .request_async(&self.http)
            .await
            .map_err(|e| {
                warn!(reason = %e, "code exchange failed");
                AppError::unauthorized()
            })?;

        let id_token = token_response
            .id_token()
            .ok_or_else(|| AppError::internal("Google token response had no ID token"))?;

        let claims = id_token
            .claims(&self.client.id_token_verifier(), &nonce)
            .map_err(|e| {
                warn!(reason = %e, "ID token verification failed");
                AppError::unauthorized()
            })?;

        profile_from_claims(claims)
    }
}

/// Reduce verified ID-token claims to the profile the upsert consumes.
fn profile_from_claims(claims: &CoreIdTokenClaims) -> Result<GoogleProfile, AppError> {
    let email = claims
        .email()
        .map(|e| e.to_string())
        .ok_or_else(|| {
            warn!("Google identity without an email claim");
            AppError::unauthorized()
        })?;

    Ok(GoogleProfile {
        sub: claims.subject().to_string(),
        email,
        name: claims
            .name()
            .and_then(|n| n.get(None))
            .map(|n| n.to_string()),
        picture: claims
            .picture()
            .and_then(|p| p.get(None))
            .map(|p| p.to_string()),
    })
}
