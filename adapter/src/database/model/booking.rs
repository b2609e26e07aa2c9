use chrono::{DateTime, NaiveDate, Utc};
use kernel::model::{
    booking::{Booking, BookingSpace},
    id::{BookingId, SpaceId, UserId},
};

/// Booking joined with its space; used by every booking read.
#[derive(sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub booking_date: NaiveDate,
    pub num_of_rooms: i32,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub space_id: SpaceId,
    pub space_name: String,
    pub space_address: String,
    pub space_tel: Option<String>,
}

impl From<BookingRow> for Booking {
    fn from(value: BookingRow) -> Self {
        let BookingRow {
            booking_id,
            booking_date,
            num_of_rooms,
            user_id,
            created_at,
            space_id,
            space_name,
            space_address,
            space_tel,
        } = value;
        Booking {
            id: booking_id,
            booking_date,
            num_of_rooms,
            user_id,
            created_at,
            space: BookingSpace {
                id: space_id,
                name: space_name,
                address: space_address,
                tel: space_tel,
            },
        }
    }
}

/// The slice of a space a booking carries as its read-time projection.
#[derive(sqlx::FromRow)]
pub struct BookingSpaceRow {
    pub space_id: SpaceId,
    pub name: String,
    pub address: String,
    pub tel: Option<String>,
}

impl From<BookingSpaceRow> for BookingSpace {
    fn from(value: BookingSpaceRow) -> Self {
        let BookingSpaceRow {
            space_id,
            name,
            address,
            tel,
        } = value;
        BookingSpace {
            id: space_id,
            name,
            address,
            tel,
        }
    }
}
