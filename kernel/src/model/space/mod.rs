pub mod event;

use crate::model::id::SpaceId;
use chrono::{DateTime, Utc};

#[derive(Debug)]
pub struct Space {
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
