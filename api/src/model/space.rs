use std::collections::HashSet;

use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use serde::{Deserialize, Serialize};

use kernel::model::{
    id::SpaceId,
    list::{PageDescriptor, PaginatedList, SpaceAttr},
    space::{
        event::{CreateSpace, UpdateSpace},
        Space,
    },
};
use shared::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpaceRequest {
    #[garde(length(min = 1, max = 50))]
    pub name: String,
    #[garde(length(min = 1))]
    pub operating_hours: String,
    #[garde(length(min = 1))]
    pub address: String,
    #[garde(length(min = 1))]
    pub province: String,
    #[garde(length(min = 1, max = 5))]
    pub postalcode: String,
    #[garde(skip)]
    pub tel: Option<String>,
    #[garde(length(min = 1))]
    pub picture: String,
}

impl From<CreateSpaceRequest> for CreateSpace {
    fn from(value: CreateSpaceRequest) -> Self {
        let CreateSpaceRequest {
            name,
            operating_hours,
            address,
            province,
            postalcode,
            tel,
            picture,
        } = value;
        CreateSpace {
            name,
            operating_hours,
            address,
            province,
            postalcode,
            tel,
            picture,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpaceRequest {
    #[garde(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[garde(length(min = 1))]
    pub operating_hours: Option<String>,
    #[garde(length(min = 1))]
    pub address: Option<String>,
    #[garde(length(min = 1))]
    pub province: Option<String>,
    #[garde(length(min = 1, max = 5))]
    pub postalcode: Option<String>,
    #[garde(skip)]
    pub tel: Option<String>,
    #[garde(length(min = 1))]
    pub picture: Option<String>,
}

#[derive(new)]
pub struct UpdateSpaceRequestWithId(SpaceId, UpdateSpaceRequest);

impl From<UpdateSpaceRequestWithId> for UpdateSpace {
    fn from(value: UpdateSpaceRequestWithId) -> Self {
        let UpdateSpaceRequestWithId(
            space_id,
            UpdateSpaceRequest {
                name,
                operating_hours,
                address,
                province,
                postalcode,
                tel,
                picture,
            },
        ) = value;
        UpdateSpace {
            space_id,
            name,
            operating_hours,
            address,
            province,
            postalcode,
            tel,
            picture,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceResponse {
    pub id: SpaceId,
    pub name: String,
    pub operating_hours: String,
    pub address: String,
    pub province: String,
    pub postalcode: String,
    pub tel: Option<String>,
    pub picture: String,
    pub created_at: DateTime<Utc>,
}

impl From<Space> for SpaceResponse {
    fn from(value: Space) -> Self {
        let Space {
            id,
            name,
            operating_hours,
            address,
            province,
            postalcode,
            tel,
            picture,
            created_at,
        } = value;
        Self {
            id,
            name,
            operating_hours,
            address,
            province,
            postalcode,
            tel,
            picture,
            created_at,
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PageLink {
    pub page: i64,
    pub limit: i64,
}

impl From<PageDescriptor> for PageLink {
    fn from(value: PageDescriptor) -> Self {
        Self {
            page: value.page,
            limit: value.limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}

#[derive(Serialize)]
pub struct PaginatedSpaceResponse {
    pub success: bool,
    pub count: usize,
    pub pagination: Pagination,
    pub data: Vec<serde_json::Value>,
}

impl PaginatedSpaceResponse {
    /// Builds the list envelope, applying the requested attribute selection
    /// as a response projection. `id` is always retained.
    pub fn build(list: PaginatedList<Space>, select: Option<Vec<SpaceAttr>>) -> AppResult<Self> {
        let pagination = Pagination {
            next: list.next_page().map(PageLink::from),
            prev: list.prev_page().map(PageLink::from),
        };
        let keep: Option<HashSet<&str>> = select.as_ref().map(|attrs| {
            attrs
                .iter()
                .map(|a| a.wire_name())
                .chain(std::iter::once("id"))
                .collect()
        });

        let mut data = Vec::with_capacity(list.items.len());
        for space in list.items {
            let mut value = serde_json::to_value(SpaceResponse::from(space))
                .map_err(|e| AppError::ConversionEntityError(e.to_string()))?;
            if let (Some(keep), serde_json::Value::Object(map)) = (&keep, &mut value) {
                map.retain(|key, _| keep.contains(key.as_str()));
            }
            data.push(value);
        }

        Ok(Self {
            success: true,
            count: data.len(),
            pagination,
            data,
        })
    }
}
