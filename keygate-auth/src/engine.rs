//! The session engine: authentication, lockout, and token lifecycle.

use crate::claims::{Claims, SessionToken};
use crate::denylist::DenyList;
use crate::error::{AuthError, AuthResult};
use chrono::Duration as ChronoDuration;
use keygate_crypto::{verify_password, KeyError, Keyring, SignedEnvelope};
use keygate_store::{with_deadline, CredentialStore, LockRegistry};
use keygate_types::{
    Clock, LoginAttempts, PrincipalId, PrincipalKind, PrincipalRecord, PrincipalStatus, TokenId,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tunables for authentication and tokens.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Consecutive failures that trip the lockout.
    pub max_attempts: u32,
    /// How long a tripped lockout lasts.
    pub lockout_duration: Duration,
    /// Lifetime of issued tokens.
    pub token_ttl: Duration,
    /// A token may be refreshed once it is within this window of expiry.
    pub refresh_window: Duration,
    /// Deadline applied to each store call.
    pub store_deadline: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lockout_duration: Duration::from_secs(30 * 60),
            token_ttl: Duration::from_secs(24 * 60 * 60),
            refresh_window: Duration::from_secs(60 * 60),
            store_deadline: Duration::from_secs(5),
        }
    }
}

/// Issues and validates session tokens and enforces login lockout.
pub struct SessionEngine {
    credentials: Arc<dyn CredentialStore>,
    keyring: Arc<Keyring>,
    clock: Arc<dyn Clock>,
    locks: LockRegistry<PrincipalId>,
    deny_list: DenyList,
    config: AuthConfig,
}

impl SessionEngine {
    /// Creates an engine. The keyring must hold a private key to issue
    /// tokens.
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        keyring: Arc<Keyring>,
        clock: Arc<dyn Clock>,
        config: AuthConfig,
    ) -> Self {
        Self {
            credentials,
            keyring,
            clock,
            locks: LockRegistry::new(),
            deny_list: DenyList::new(),
            config,
        }
    }

    /// Authenticates a principal and issues a session token.
    ///
    /// The lockout window is consulted *before* any credential work: a
    /// locked principal gets `LockedOut` without a password comparison, so
    /// lockout cannot be used to probe credentials by timing. A mismatch
    /// bumps the failure counter; hitting the threshold sets the lockout
    /// window and resets the counter. Success clears the record.
    pub async fn authenticate(
        &self,
        kind: PrincipalKind,
        principal_id: &PrincipalId,
        password: &str,
    ) -> AuthResult<SessionToken> {
        let _guard = self.locks.acquire(principal_id).await;
        let now = self.clock.now();

        let mut attempts = with_deadline(
            self.config.store_deadline,
            self.credentials.get_login_attempts(principal_id),
        )
        .await?
        .unwrap_or_else(|| LoginAttempts::new(principal_id.clone()));

        if let Some(until) = attempts.locked_until {
            if now < until {
                warn!("authentication blocked for locked-out principal {principal_id}");
                return Err(AuthError::LockedOut { until });
            }
            // Window elapsed; the cycle returns to Normal.
            attempts.locked_until = None;
            debug!("lockout window elapsed for {principal_id}");
        }

        let principal = with_deadline(
            self.config.store_deadline,
            self.credentials.get_principal(kind, principal_id),
        )
        .await?;

        // Unknown principals get the same error as a bad password, and the
        // attempt record is left alone so arbitrary names cannot be locked
        // out remotely.
        let Some(principal) = principal else {
            return Err(AuthError::InvalidCredentials);
        };

        if principal.status == PrincipalStatus::Disabled {
            return Err(AuthError::Disabled);
        }

        let password_ok = verify_password(password, &principal.password_hash)
            .map_err(AuthError::Key)?;

        if !password_ok {
            attempts.failures += 1;
            if attempts.failures >= self.config.max_attempts {
                let until = now
                    + ChronoDuration::from_std(self.config.lockout_duration)
                        .unwrap_or(ChronoDuration::MAX);
                attempts.locked_until = Some(until);
                attempts.failures = 0;
                warn!(
                    "principal {principal_id} locked out until {until} after repeated failures"
                );
            }
            with_deadline(
                self.config.store_deadline,
                self.credentials.save_login_attempts(&attempts),
            )
            .await?;
            return Err(AuthError::InvalidCredentials);
        }

        // Success: clear any accumulated failures.
        if attempts.failures > 0 || attempts.locked_until.is_some() || attempts.version > 0 {
            attempts.failures = 0;
            attempts.locked_until = None;
            with_deadline(
                self.config.store_deadline,
                self.credentials.save_login_attempts(&attempts),
            )
            .await?;
        }

        let token = self.issue_token(&principal)?;
        info!("issued session token for {principal_id} ({kind:?})");
        Ok(token)
    }

    fn issue_token(&self, principal: &PrincipalRecord) -> AuthResult<SessionToken> {
        let now = self.clock.now();
        let ttl = ChronoDuration::from_std(self.config.token_ttl).unwrap_or(ChronoDuration::MAX);
        let kid = self
            .keyring
            .active_key_id()
            .map_err(AuthError::Key)?
            .clone();

        let claims = Claims {
            sub: principal.id.clone(),
            kind: principal.kind,
            role: principal.role.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: TokenId::new(),
            kid,
        };

        let payload = serde_json::to_vec(&claims)?;
        let (envelope, _) = SignedEnvelope::seal(&self.keyring, &payload).map_err(AuthError::Key)?;

        Ok(SessionToken {
            token: envelope.encode(),
            claims,
        })
    }

    /// Validates a presented token: signature, expiry, deny-list.
    ///
    /// The three failure modes stay distinct so callers can react
    /// differently — expired triggers a refresh flow, malformed does not,
    /// revoked means the session was ended.
    pub fn validate_token(&self, token: &str) -> AuthResult<Claims> {
        let envelope = SignedEnvelope::parse(token).map_err(|_| AuthError::TokenMalformed)?;
        let payload = envelope.payload().map_err(|_| AuthError::TokenMalformed)?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::TokenMalformed)?;

        if let Err(e) = envelope.verify(&self.keyring, &claims.kid) {
            return Err(match e {
                KeyError::SignatureInvalid | KeyError::UnknownKeyId(_) => {
                    warn!("token signature verification failed for {}: {e}", claims.sub);
                    AuthError::TokenSignatureInvalid
                }
                _ => AuthError::TokenMalformed,
            });
        }

        let now = self.clock.now().timestamp();
        if now > claims.exp {
            return Err(AuthError::TokenExpired);
        }
        if self.deny_list.contains(&claims.jti, now) {
            return Err(AuthError::TokenRevoked);
        }

        Ok(claims)
    }

    /// Exchanges a token nearing expiry for a fresh one.
    ///
    /// Only valid inside the refresh window before expiry. The old token
    /// is *not* invalidated — it remains usable until its original expiry
    /// (or an explicit revoke).
    pub async fn refresh_token(&self, token: &str) -> AuthResult<SessionToken> {
        let claims = self.validate_token(token)?;

        let now = self.clock.now().timestamp();
        let window = self.config.refresh_window.as_secs() as i64;
        if claims.exp - now > window {
            return Err(AuthError::NotRefreshable);
        }

        // Re-read the principal so a disable or role change since issuance
        // takes effect at refresh time.
        let principal = with_deadline(
            self.config.store_deadline,
            self.credentials.get_principal(claims.kind, &claims.sub),
        )
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

        if principal.status == PrincipalStatus::Disabled {
            return Err(AuthError::Disabled);
        }

        let fresh = self.issue_token(&principal)?;
        debug!("refreshed token for {} (old jti {})", claims.sub, claims.jti);
        Ok(fresh)
    }

    /// Revokes a token ahead of its expiry (logout). Idempotent.
    pub fn revoke_token(&self, token: &str) -> AuthResult<()> {
        match self.validate_token(token) {
            Ok(claims) => {
                let now = self.clock.now().timestamp();
                self.deny_list.insert(claims.jti, claims.exp, now);
                info!("token {} revoked for {}", claims.jti, claims.sub);
                Ok(())
            }
            Err(AuthError::TokenRevoked) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
