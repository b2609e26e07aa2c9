use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::SpaceId,
    list::{PaginatedList, SpaceListQuery},
    space::{
        event::{CreateSpace, DeleteSpace, UpdateSpace},
        Space,
    },
};

#[async_trait]
pub trait SpaceRepository: Send + Sync {
    async fn create(&self, event: CreateSpace) -> AppResult<Space>;
    async fn find_all(&self, query: SpaceListQuery) -> AppResult<PaginatedList<Space>>;
    async fn find_by_id(&self, space_id: SpaceId) -> AppResult<Option<Space>>;
    async fn update(&self, event: UpdateSpace) -> AppResult<Space>;
    /// Deletes the space and every booking referencing it as one unit of
    /// work; dependent bookings go first.
    async fn delete(&self, event: DeleteSpace) -> AppResult<()>;
}
