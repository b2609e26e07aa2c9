use crate::model::id::{BookingId, SpaceId, UserId};
use chrono::NaiveDate;
use derive_new::new;

#[derive(Debug, new)]
pub struct CreateBooking {
    pub space_id: SpaceId,
    pub user_id: UserId,
    pub booking_date: NaiveDate,
    pub num_of_rooms: i32,
}

#[derive(Debug, new)]
pub struct UpdateBooking {
    pub booking_id: BookingId,
    pub booking_date: Option<NaiveDate>,
    pub num_of_rooms: Option<i32>,
}

#[derive(Debug, new)]
pub struct DeleteBooking {
    pub booking_id: BookingId,
}

/// Scope for booking list reads. `user_id` is set to the actor for
/// non-admin callers; `space_id` carries the optional coworkingspaceId
/// query scope.
#[derive(Debug, Default, new)]
pub struct BookingListFilter {
    pub user_id: Option<UserId>,
    pub space_id: Option<SpaceId>,
}
