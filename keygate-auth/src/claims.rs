//! Session token claims.

use keygate_types::{KeyId, PrincipalId, PrincipalKind, TokenId};
use serde::{Deserialize, Serialize};

/// The signed claim set carried by a session token.
///
/// Stateless by design: the engine persists no issued tokens, only the
/// signing key and (for early invalidation) the deny-list of token ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated principal.
    pub sub: PrincipalId,
    /// Administrator or customer user.
    pub kind: PrincipalKind,
    /// Role claim copied from the principal record at issuance.
    pub role: String,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds.
    pub exp: i64,
    /// Unique token id; what the deny-list keys on.
    pub jti: TokenId,
    /// Key generation the token was signed under.
    pub kid: KeyId,
}

/// An issued session token: the wire string plus its decoded claims.
#[derive(Debug, Clone)]
pub struct SessionToken {
    /// The signed envelope string handed to the client.
    pub token: String,
    /// The claims it carries.
    pub claims: Claims,
}
