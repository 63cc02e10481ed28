/// Authorization policy
///
/// One pure decision rule, shared by every operation on every entity type:
/// an actor may touch a record when they are an admin or when they own it.
/// Projects carry their owner directly; tasks resolve theirs through the
/// owning project (or through the `owner_id` a cached projection carries).
///
/// Keeping the rule in one function, invoked uniformly by the access
/// service, is deliberate: per-endpoint copies of this check are where
/// permission bugs breed.
///
/// `is_active` is not consulted here. Inactive accounts authorize exactly
/// like active ones; the tests pin this behavior down.

use uuid::Uuid;

use crate::error::AccessError;
use crate::models::user::Actor;

/// True when `actor` may read or mutate a record owned by `owner_id`
pub fn allowed(actor: &Actor, owner_id: Uuid) -> bool {
    actor.role.is_admin() || actor.id == owner_id
}

/// [`allowed`] as a guard: `Err(Forbidden)` on deny
///
/// Deny is distinguishable from absence: a record the actor may not touch
/// yields `Forbidden`, never `NotFound`. List operations do not call this;
/// they silently filter instead.
pub fn require(actor: &Actor, owner_id: Uuid) -> Result<(), AccessError> {
    if allowed(actor, owner_id) {
        Ok(())
    } else {
        Err(AccessError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;

    fn actor(role: UserRole, is_active: bool) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role,
            is_active,
        }
    }

    #[test]
    fn test_admin_allowed_on_any_record() {
        let admin = actor(UserRole::Admin, true);
        assert!(allowed(&admin, Uuid::new_v4()));
        assert!(require(&admin, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_owner_allowed_on_own_record() {
        let user = actor(UserRole::User, true);
        assert!(allowed(&user, user.id));
        assert!(require(&user, user.id).is_ok());
    }

    #[test]
    fn test_non_owner_denied() {
        let user = actor(UserRole::User, true);
        assert!(!allowed(&user, Uuid::new_v4()));
        assert!(matches!(
            require(&user, Uuid::new_v4()),
            Err(AccessError::Forbidden)
        ));
    }

    // Known gap, kept on purpose: the policy ignores is_active entirely.
    #[test]
    fn test_inactive_actor_authorizes_like_active() {
        let inactive = actor(UserRole::User, false);
        assert!(allowed(&inactive, inactive.id));
        assert!(!allowed(&inactive, Uuid::new_v4()));

        let inactive_admin = actor(UserRole::Admin, false);
        assert!(allowed(&inactive_admin, Uuid::new_v4()));
    }
}
