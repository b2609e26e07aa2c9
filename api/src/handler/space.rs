use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;

use kernel::model::{access, id::SpaceId, list::SpaceListQuery, space::event::DeleteSpace};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::{
        space::{
            CreateSpaceRequest, PaginatedSpaceResponse, SpaceResponse, UpdateSpaceRequest,
            UpdateSpaceRequestWithId,
        },
        DataEnvelope,
    },
};

pub async fn register_space(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateSpaceRequest>,
) -> AppResult<(StatusCode, Json<DataEnvelope<SpaceResponse>>)> {
    if !access::can_manage_spaces(user.role()) {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    registry
        .space_repository()
        .create(req.into())
        .await
        .map(SpaceResponse::from)
        .map(|space| (StatusCode::CREATED, Json(DataEnvelope::new(space))))
}

pub async fn show_space_list(
    Query(params): Query<HashMap<String, String>>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaginatedSpaceResponse>> {
    let query = SpaceListQuery::from_params(&params)?;
    let select = query.select.clone();

    let list = registry.space_repository().find_all(query).await?;
    PaginatedSpaceResponse::build(list, select).map(Json)
}

pub async fn show_space(
    Path(space_id): Path<SpaceId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<DataEnvelope<SpaceResponse>>> {
    registry
        .space_repository()
        .find_by_id(space_id)
        .await
        .and_then(|space| match space {
            Some(space) => Ok(Json(DataEnvelope::new(space.into()))),
            None => Err(AppError::EntityNotFound(format!(
                "No co-working space with the id of {space_id}"
            ))),
        })
}

pub async fn update_space(
    user: AuthorizedUser,
    Path(space_id): Path<SpaceId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateSpaceRequest>,
) -> AppResult<Json<DataEnvelope<SpaceResponse>>> {
    if !access::can_manage_spaces(user.role()) {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    registry
        .space_repository()
        .update(UpdateSpaceRequestWithId::new(space_id, req).into())
        .await
        .map(SpaceResponse::from)
        .map(DataEnvelope::new)
        .map(Json)
}

pub async fn delete_space(
    user: AuthorizedUser,
    Path(space_id): Path<SpaceId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<DataEnvelope<serde_json::Value>>> {
    if !access::can_manage_spaces(user.role()) {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .space_repository()
        .delete(DeleteSpace { space_id })
        .await
        .map(|_| Json(DataEnvelope::new(serde_json::json!({}))))
}
