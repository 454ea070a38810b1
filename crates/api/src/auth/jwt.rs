//! Session token validation.
//!
//! Sessions are issued by the hosted auth provider as HS256-signed JWTs.
//! The server never issues tokens to clients; it only verifies them with the
//! project's shared secret and reads the account fields they carry.

use fixio_core::account::{Account, AudienceCategory, Session, DEFAULT_SUBSCRIPTION_PLAN};
use fixio_core::types::DbId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Audience the hosted provider stamps on signed-in users' tokens.
pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// Account metadata the provider embeds in the token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `"diy"` or `"pro"`; anything else reads as hobbyist.
    #[serde(default)]
    pub user_type: AudienceCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_plan: Option<String>,
}

/// JWT claims of a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject -- the account id.
    pub sub: DbId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl Claims {
    /// Build the read-only account view these claims describe.
    pub fn into_account(self) -> Account {
        Account {
            id: self.sub,
            email: self.email,
            name: self.user_metadata.name,
            audience: self.user_metadata.user_type,
            subscription_plan: self
                .user_metadata
                .subscription_plan
                .filter(|plan| !plan.is_empty())
                .unwrap_or_else(|| DEFAULT_SUBSCRIPTION_PLAN.to_string()),
        }
    }
}

/// Configuration for session token validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the auth provider.
    pub secret: String,
}

impl JwtConfig {
    /// Load from the environment.
    ///
    /// | Env Var               | Required |
    /// |-----------------------|----------|
    /// | `SUPABASE_JWT_SECRET` | **yes**  |
    ///
    /// # Panics
    ///
    /// Panics if `SUPABASE_JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("SUPABASE_JWT_SECRET")
            .expect("SUPABASE_JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "SUPABASE_JWT_SECRET must not be empty");
        Self { secret }
    }
}

/// Validate a session token, returning its [`Claims`].
///
/// Checks the signature, expiry and the `authenticated` audience.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[AUTHENTICATED_AUDIENCE]);
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// Turn a verified token into the per-request [`Session`].
pub fn session_from_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Session, jsonwebtoken::errors::Error> {
    let claims = validate_token(token, config)?;
    Ok(Session {
        account: claims.into_account(),
        access_token: token.to_string(),
    })
}

/// Sign claims the way the auth provider does. Used by tests and local
/// tooling that need a token without the provider.
pub fn sign_claims(
    claims: &Claims,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}
