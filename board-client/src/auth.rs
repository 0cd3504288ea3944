use crate::error::CredentialError;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimsData {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub data: ClaimsData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Parses the token payload. The signature is NOT checked; the backend stays the authority.
pub fn decode_unverified(token: &str) -> Result<Claims, CredentialError> {
    if token.trim().is_empty() {
        return Err(CredentialError::Missing);
    }

    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

/// Raw token plus its decoded claims, built once per session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    token: String,
    claims: Claims,
}

impl Session {
    pub fn from_token(token: impl Into<String>) -> Result<Self, CredentialError> {
        let token = token.into();
        let claims = decode_unverified(&token)?;
        Ok(Self { token, claims })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn user_id(&self) -> &str {
        &self.claims.data.id
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims
            .exp
            .and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    /// Tokens without `exp` never expire on the client.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expires_at) => expires_at <= now,
            None => false,
        }
    }
}

/// Where the raw credential lives (browser local storage, a token file, ...).
pub trait TokenSource {
    fn read_token(&self) -> Option<String>;
}

/// Fixed token, handy for tests and for tokens passed on the command line.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl TokenSource for StaticToken {
    fn read_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Authentication state of the running client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthContext {
    session: Option<Session>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self { session: None }
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn load(source: &dyn TokenSource, now: DateTime<Utc>) -> Self {
        let token = match source.read_token() {
            Some(token) => token,
            None => {
                tracing::debug!("No stored credential, continuing anonymously");
                return Self::anonymous();
            }
        };

        match Session::from_token(token) {
            Ok(session) if session.is_expired_at(now) => {
                tracing::info!("Stored credential for user {} has expired", session.user_id());
                Self::anonymous()
            }
            Ok(session) => {
                tracing::debug!("Session started for user {}", session.user_id());
                Self::with_session(session)
            }
            Err(e) => {
                tracing::warn!("Stored credential is unusable: {}", e);
                Self::anonymous()
            }
        }
    }

    /// The session, if one exists and has not expired at `now`.
    pub fn session_at(&self, now: DateTime<Utc>) -> Option<&Session> {
        self.session
            .as_ref()
            .filter(|session| !session.is_expired_at(now))
    }

    pub fn session(&self) -> Option<&Session> {
        self.session_at(Utc::now())
    }

    /// Re-reads the credential when there is no live session. Returns true if the state changed.
    pub fn revalidate(&mut self, source: &dyn TokenSource, now: DateTime<Utc>) -> bool {
        if self.session_at(now).is_some() {
            return false;
        }

        let reloaded = Self::load(source, now);
        let changed = reloaded != *self;
        *self = reloaded;
        changed
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{encode, EncodingKey, Header};

    pub(crate) fn token_for(user_id: &str, exp: Option<i64>) -> String {
        let claims = Claims {
            data: ClaimsData {
                id: user_id.to_string(),
                username: Some("ann".into()),
                email: None,
            },
            exp,
            iat: None,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"server-side-secret"),
        )
        .unwrap()
    }

    #[test]
    fn decodes_without_knowing_the_secret() {
        let claims = decode_unverified(&token_for("u1", None)).unwrap();
        assert_eq!(claims.data.id, "u1");
        assert_eq!(claims.data.username.as_deref(), Some("ann"));
    }

    #[test]
    fn rejects_garbage_and_empty_tokens() {
        assert!(matches!(
            decode_unverified("not-a-token"),
            Err(CredentialError::Undecodable(_))
        ));
        assert!(matches!(decode_unverified(""), Err(CredentialError::Missing)));
    }

    #[test]
    fn load_without_token_is_anonymous() {
        let ctx = AuthContext::load(&StaticToken(None), Utc::now());
        assert!(ctx.session().is_none());
    }

    #[test]
    fn expired_session_is_not_served() {
        let now = Utc::now();
        let exp = (now + Duration::minutes(5)).timestamp();
        let ctx = AuthContext::load(&StaticToken(Some(token_for("u1", Some(exp)))), now);

        assert!(ctx.session_at(now).is_some());
        assert!(ctx.session_at(now + Duration::minutes(10)).is_none());
    }

    #[test]
    fn already_expired_token_loads_as_anonymous() {
        let now = Utc::now();
        let exp = (now - Duration::minutes(1)).timestamp();
        let ctx = AuthContext::load(&StaticToken(Some(token_for("u1", Some(exp)))), now);
        assert!(ctx.session_at(now).is_none());
    }

    #[test]
    fn revalidate_picks_up_a_fresh_token() {
        let now = Utc::now();
        let mut ctx = AuthContext::anonymous();
        let source = StaticToken(Some(token_for("u2", None)));

        assert!(ctx.revalidate(&source, now));
        assert_eq!(ctx.session_at(now).map(Session::user_id), Some("u2"));
        assert!(!ctx.revalidate(&source, now));
    }
}
