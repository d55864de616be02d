use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Platform account roles as issued by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Member,
    Escort,
    Agency,
    Club,
    Studio,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Member => "member",
            AccountRole::Escort => "escort",
            AccountRole::Agency => "agency",
            AccountRole::Club => "club",
            AccountRole::Studio => "studio",
            AccountRole::Admin => "admin",
        }
    }

    /// Escort-class participants are the only accounts that can be discovered,
    /// suggested or swiped on.
    pub fn is_escort_class(&self) -> bool {
        matches!(self, AccountRole::Escort)
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(AccountRole::Member),
            "escort" => Ok(AccountRole::Escort),
            "agency" => Ok(AccountRole::Agency),
            "club" => Ok(AccountRole::Club),
            "studio" => Ok(AccountRole::Studio),
            "admin" => Ok(AccountRole::Admin),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: AccountRole,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
}

impl Claims {
    pub fn new(user_id: Uuid, role: AccountRole, duration_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id,
            role,
            iat: now,
            exp: now + duration_secs,
            jti: Uuid::now_v7(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: AccountRole,
    pub token_id: Uuid,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
            token_id: claims.jti,
        }
    }
}
