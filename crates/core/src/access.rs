//! Authorization rules for settlement-engine operations.
//!
//! Every check takes the [`Actor`] explicitly. Ownership facts (who the
//! requester of a ticket is, whether a tenant holds a lease) are looked up by
//! the caller and passed in, so these functions stay pure.

use crate::error::CoreError;
use crate::roles::{Actor, Role};
use crate::types::DbId;

/// Only administrators may perform `action`.
pub fn require_admin(actor: &Actor, action: &str) -> Result<(), CoreError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!("Admin role required to {action}")))
    }
}

/// Only administrators or staff may perform `action`.
pub fn require_operator(actor: &Actor, action: &str) -> Result<(), CoreError> {
    if actor.is_operator() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Admin or staff role required to {action}"
        )))
    }
}

/// Tenants may only report issues on a property they currently lease.
pub fn ensure_can_create_ticket(
    actor: &Actor,
    holds_active_lease: bool,
) -> Result<(), CoreError> {
    match actor.role {
        Role::Admin | Role::Staff => Ok(()),
        Role::Tenant if holds_active_lease => Ok(()),
        Role::Tenant => Err(CoreError::Forbidden(
            "Tenants may only report issues on a property they lease".into(),
        )),
        Role::Landlord => Err(CoreError::Forbidden(
            "Landlords cannot open maintenance tickets".into(),
        )),
    }
}

/// The ticket's requester confirms or disputes the repair; admins may act
/// on their behalf.
pub fn ensure_can_confirm(actor: &Actor, requester_id: DbId) -> Result<(), CoreError> {
    if actor.is_admin() || actor.user_id == requester_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the ticket requester can confirm the resolution".into(),
        ))
    }
}

/// Landlords may read their own settlement data; operators may read anyone's.
pub fn ensure_can_view_landlord(actor: &Actor, landlord_id: DbId) -> Result<(), CoreError> {
    if actor.is_operator() || (actor.role == Role::Landlord && actor.user_id == landlord_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Not allowed to view another landlord's settlement data".into(),
        ))
    }
}

/// Tenants may read their own lease financials; operators may read anyone's.
pub fn ensure_can_view_lease(actor: &Actor, tenant_id: DbId) -> Result<(), CoreError> {
    if actor.is_operator() || (actor.role == Role::Tenant && actor.user_id == tenant_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Not allowed to view another tenant's lease".into(),
        ))
    }
}

/// A ticket is visible to operators, its requester and its landlord.
pub fn ensure_can_view_ticket(
    actor: &Actor,
    requester_id: DbId,
    landlord_id: DbId,
) -> Result<(), CoreError> {
    let allowed = actor.is_operator()
        || (actor.role == Role::Tenant && actor.user_id == requester_id)
        || (actor.role == Role::Landlord && actor.user_id == landlord_id);
    if allowed {
        Ok(())
    } else {
        Err(CoreError::Forbidden("Not allowed to view this ticket".into()))
    }
}
