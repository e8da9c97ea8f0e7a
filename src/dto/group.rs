use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dao::models::GroupEntity;

/// Payload used to register a group that must stay together.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateGroupRequest {
    /// Group name, unique within the session.
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    /// Member participant ids.
    #[validate(length(min = 1, message = "members must not be empty"))]
    pub members: Vec<Uuid>,
}

/// One registered group as returned to callers.
#[derive(Debug, Serialize, ToSchema)]
pub struct GroupView {
    /// Group name, unique within the session.
    pub name: String,
    /// Member participant ids in registration order.
    pub members: Vec<Uuid>,
}

impl From<GroupEntity> for GroupView {
    fn from(value: GroupEntity) -> Self {
        Self {
            name: value.name,
            members: value.members,
        }
    }
}
