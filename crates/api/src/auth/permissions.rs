use crate::auth::Claims;
use crate::gql::common::types::Role;
use crate::state::AppState;
use async_graphql::{Context, Error, Result};
use infra::models::UserRow;
use uuid::Uuid;

/// Check if the authenticated user has the required role
pub async fn require_role(ctx: &Context<'_>, required_role: Role) -> Result<UserRow> {
    let claims = ctx
        .data::<Claims>()
        .map_err(|_| Error::new("You must be logged in to perform this action"))?;

    // Check role from JWT claims first (avoids DB query on mismatch)
    let claims_role = Role::from(claims.role.clone());
    if !has_required_role(claims_role, required_role) {
        return Err(Error::new(format!(
            "Access denied: {:?} privileges required. Your current role is {:?}",
            required_role, claims_role
        )));
    }

    let user_id = claims
        .user_id()
        .ok_or_else(|| Error::new("Invalid user ID in token"))?;

    let state = ctx.data::<AppState>()?;
    let user = infra::repos::users::get_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| Error::new("User not found"))?;

    if !user.is_active {
        return Err(Error::new("Access denied: account is disabled"));
    }

    // The stored role wins over a stale token.
    if !has_required_role(Role::from(user.role.clone()), required_role) {
        return Err(Error::new("Access denied: role has changed, please log in again"));
    }

    Ok(user)
}

/// Check if the authenticated user is a manager for a specific organization
pub async fn require_organization_manager(
    ctx: &Context<'_>,
    organization_id: Uuid,
) -> Result<UserRow> {
    let user = require_role(ctx, Role::Manager).await?;

    // Admin can manage any organization
    if Role::from(user.role.clone()) == Role::Admin {
        return Ok(user);
    }

    let state = ctx.data::<AppState>()?;
    let is_manager = infra::repos::organization_managers::is_organization_manager(
        &state.db,
        user.id,
        organization_id,
    )
    .await?;

    if !is_manager {
        return Err(Error::new(
            "Access denied: You are not authorized to manage this organization",
        ));
    }

    Ok(user)
}

pub async fn require_admin(ctx: &Context<'_>) -> Result<UserRow> {
    require_role(ctx, Role::Admin).await
}

fn has_required_role(user_role: Role, required_role: Role) -> bool {
    match required_role {
        Role::Admin => user_role == Role::Admin,
        Role::Manager => user_role == Role::Manager || user_role == Role::Admin, // Admin has manager permissions
        Role::Viewer => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ladder() {
        assert!(has_required_role(Role::Admin, Role::Admin));
        assert!(has_required_role(Role::Admin, Role::Manager));
        assert!(has_required_role(Role::Manager, Role::Manager));
        assert!(!has_required_role(Role::Manager, Role::Admin));
        assert!(!has_required_role(Role::Viewer, Role::Manager));
        assert!(has_required_role(Role::Viewer, Role::Viewer));
    }
}
