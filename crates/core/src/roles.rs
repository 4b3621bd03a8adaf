//! Well-known role names and the explicit request actor.
//!
//! Role names must match the `role` claim issued by the identity service.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_TENANT: &str = "tenant";
pub const ROLE_LANDLORD: &str = "landlord";

/// A caller's role, parsed from the identity token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Tenant,
    Landlord,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Staff => ROLE_STAFF,
            Role::Tenant => ROLE_TENANT,
            Role::Landlord => ROLE_LANDLORD,
        }
    }
}

impl std::str::FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_STAFF => Ok(Role::Staff),
            ROLE_TENANT => Ok(Role::Tenant),
            ROLE_LANDLORD => Ok(Role::Landlord),
            other => Err(CoreError::Unauthorized(format!("Unknown role '{other}'"))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated caller of an engine operation.
///
/// Passed explicitly into every authorization check; there is no ambient
/// session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: DbId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admin or staff: the managing company's own people.
    pub fn is_operator(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Staff)
    }
}
