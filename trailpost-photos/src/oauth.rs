//! OAuth2 for the photo library: the one-time console flow that mints a
//! refresh token, and the refresh grant the collector runs with.

use crate::error::PhotosError;
use oauth2::basic::{BasicClient, BasicErrorResponse};
use oauth2::reqwest::async_http_client;
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, RedirectUrl,
    RefreshToken, RequestTokenError, Scope, TokenResponse, TokenUrl,
};
use trailpost_core::config::PhotosConfig;
use url::Url;

pub const PHOTOS_SCOPE: &str = "https://www.googleapis.com/auth/photoslibrary.readonly";

pub struct OAuthHelper {
    client: BasicClient,
}

impl OAuthHelper {
    pub fn new(
        config: &PhotosConfig,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Self, PhotosError> {
        let client = BasicClient::new(
            ClientId::new(client_id.to_string()),
            Some(ClientSecret::new(client_secret.to_string())),
            AuthUrl::new(config.auth_url.clone())?,
            Some(TokenUrl::new(config.token_url.clone())?),
        )
        .set_redirect_uri(RedirectUrl::new(config.redirect_uri.clone())?)
        .set_auth_type(AuthType::RequestBody);

        Ok(Self { client })
    }

    /// Consent URL asking for offline access, so the grant returns a refresh token
    pub fn authorize_url(&self) -> Url {
        let (url, _state) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new(PHOTOS_SCOPE.to_string()))
            .add_extra_param("access_type", "offline")
            .add_extra_param("prompt", "consent")
            .url();
        url
    }

    /// Redeem an authorization code for a refresh token
    pub async fn redeem_code(&self, code: &str) -> Result<String, PhotosError> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(extract_code(code).to_string()))
            .request_async(async_http_client)
            .await
            .map_err(describe)?;

        token
            .refresh_token()
            .map(|t| t.secret().clone())
            .ok_or(PhotosError::NoRefreshToken)
    }

    /// Short-lived access token from a long-lived refresh token
    pub async fn access_token(&self, refresh_token: &str) -> Result<String, PhotosError> {
        let token = self
            .client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(async_http_client)
            .await
            .map_err(describe)?;

        Ok(token.access_token().secret().clone())
    }
}

/// Accept a bare code or a pasted redirect URL containing `code=`
pub fn extract_code(input: &str) -> &str {
    let input = input.trim();
    match input.split_once("code=") {
        Some((_, rest)) => rest.split('&').next().unwrap_or(rest),
        None => input,
    }
}

fn describe<RE>(err: RequestTokenError<RE, BasicErrorResponse>) -> PhotosError
where
    RE: std::error::Error + 'static,
{
    let message = match err {
        RequestTokenError::ServerResponse(response) => response.to_string(),
        RequestTokenError::Request(e) => format!("request failed: {}", e),
        RequestTokenError::Parse(e, _) => format!("unreadable token response: {}", e),
        RequestTokenError::Other(message) => message,
    };
    PhotosError::Token(message)
}
