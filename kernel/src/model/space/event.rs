use crate::model::id::SpaceId;

pub struct CreateSpace {
    pub name: String,
    pub operating_hours: String,
    pub address: String,
    pub province: String,
    pub postalcode: String,
    pub tel: Option<String>,
    pub picture: String,
}

#[derive(Debug)]
pub struct UpdateSpace {
    pub space_id: SpaceId,
    pub name: Option<String>,
    pub operating_hours: Option<String>,
    pub address: Option<String>,
    pub province: Option<String>,
    pub postalcode: Option<String>,
    pub tel: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug)]
pub struct DeleteSpace {
    pub space_id: SpaceId,
}
