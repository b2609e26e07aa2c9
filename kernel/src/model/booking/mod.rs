pub mod event;

use crate::model::id::{BookingId, SpaceId, UserId};
use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone)]
pub struct Booking {
    pub id: BookingId,
    pub booking_date: NaiveDate,
    pub num_of_rooms: i32,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub space: BookingSpace,
}

/// Read-time projection of the booked space; resolved by a join, never
/// persisted on the booking record.
#[derive(Debug, Clone)]
pub struct BookingSpace {
    pub id: SpaceId,
    pub name: String,
    pub address: String,
    pub tel: Option<String>,
}
