use crate::model::{id::UserId, role::Role};

/// Owner-or-admin rule applied before every single-booking read, update and
/// delete.
pub fn can_act(actor_id: UserId, actor_role: Role, owner_id: UserId) -> bool {
    actor_role == Role::Admin || actor_id == owner_id
}

/// Spaces are administrator-managed; anyone may read them.
pub fn can_manage_spaces(actor_role: Role) -> bool {
    actor_role == Role::Admin
}
