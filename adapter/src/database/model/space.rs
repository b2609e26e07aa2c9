use chrono::{DateTime, Utc};
use kernel::model::{id::SpaceId, space::Space};

#[derive(sqlx::FromRow)]
pub struct SpaceRow {
    pub space_id: SpaceId,
    pub name: String,
    pub operating_hours: String,
    pub address: String,
    pub province: String,
    pub postalcode: String,
    pub tel: Option<String>,
    pub picture: String,
    pub created_at: DateTime<Utc>,
}

impl From<SpaceRow> for Space {
    fn from(value: SpaceRow) -> Self {
        let SpaceRow {
            space_id,
            name,
            operating_hours,
            address,
            province,
            postalcode,
            tel,
            picture,
            created_at,
        } = value;
        Space {
            id: space_id,
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
