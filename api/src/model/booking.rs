use chrono::{DateTime, NaiveDate, Utc};
use derive_new::new;
use garde::Validate;
use serde::{Deserialize, Serialize};

use kernel::model::{
    booking::{
        event::{CreateBooking, UpdateBooking},
        Booking, BookingSpace,
    },
    id::{BookingId, SpaceId, UserId},
};

/// Unknown body fields (a caller-supplied `user`, for one) are dropped on
/// deserialization; the stored booking is always bound to the authenticated
/// actor.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[garde(skip)]
    pub booking_date: NaiveDate,
    #[garde(range(min = 1, max = 3))]
    pub num_of_rooms: Option<i32>,
}

#[derive(new)]
pub struct CreateBookingRequestWithIds(SpaceId, UserId, CreateBookingRequest);

impl From<CreateBookingRequestWithIds> for CreateBooking {
    fn from(value: CreateBookingRequestWithIds) -> Self {
        let CreateBookingRequestWithIds(space_id, user_id, req) = value;
        CreateBooking {
            space_id,
            user_id,
            booking_date: req.booking_date,
            num_of_rooms: req.num_of_rooms.unwrap_or(1),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    #[garde(skip)]
    pub booking_date: Option<NaiveDate>,
    #[garde(range(min = 1, max = 3))]
    pub num_of_rooms: Option<i32>,
}

#[derive(new)]
pub struct UpdateBookingRequestWithId(BookingId, UpdateBookingRequest);

impl From<UpdateBookingRequestWithId> for UpdateBooking {
    fn from(value: UpdateBookingRequestWithId) -> Self {
        let UpdateBookingRequestWithId(booking_id, req) = value;
        UpdateBooking {
            booking_id,
            booking_date: req.booking_date,
            num_of_rooms: req.num_of_rooms,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    pub coworkingspace_id: Option<SpaceId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: BookingId,
    pub booking_date: NaiveDate,
    pub num_of_rooms: i32,
    pub user: UserId,
    pub created_at: DateTime<Utc>,
    pub coworkingspace: BookingSpaceResponse,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let Booking {
            id,
            booking_date,
            num_of_rooms,
            user_id,
            created_at,
            space,
        } = value;
        Self {
            id,
            booking_date,
            num_of_rooms,
            user: user_id,
            created_at,
            coworkingspace: space.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSpaceResponse {
    pub id: SpaceId,
    pub name: String,
    pub address: String,
    pub tel: Option<String>,
}

impl From<BookingSpace> for BookingSpaceResponse {
    fn from(value: BookingSpace) -> Self {
        let BookingSpace {
            id,
            name,
            address,
            tel,
        } = value;
        Self {
            id,
            name,
            address,
            tel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn create_request(num_of_rooms: Option<i32>) -> CreateBookingRequest {
        CreateBookingRequest {
            booking_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            num_of_rooms,
        }
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some(1), true)]
    #[case(Some(3), true)]
    #[case(Some(0), false)]
    #[case(Some(4), false)]
    #[case(Some(-1), false)]
    fn rooms_must_stay_within_one_to_three(#[case] rooms: Option<i32>, #[case] expected: bool) {
        assert_eq!(create_request(rooms).validate(&()).is_ok(), expected);
        let update = UpdateBookingRequest {
            booking_date: None,
            num_of_rooms: rooms,
        };
        assert_eq!(update.validate(&()).is_ok(), expected);
    }

    #[test]
    fn omitted_rooms_default_to_one() {
        let event: CreateBooking =
            CreateBookingRequestWithIds::new(SpaceId::new(), UserId::new(), create_request(None))
                .into();
        assert_eq!(event.num_of_rooms, 1);
    }

    #[test]
    fn booking_is_bound_to_the_actor() {
        let actor = UserId::new();
        let event: CreateBooking =
            CreateBookingRequestWithIds::new(SpaceId::new(), actor, create_request(Some(2)))
                .into();
        assert_eq!(event.user_id, actor);
        assert_eq!(event.num_of_rooms, 2);
    }

    #[test]
    fn caller_supplied_user_field_is_ignored() {
        let req: CreateBookingRequest = serde_json::from_str(
            r#"{"bookingDate": "2024-01-01", "user": "b7f2d9d2-5b5a-4a59-93f8-1f2a3c4d5e6f"}"#,
        )
        .unwrap();
        let actor = UserId::new();
        let event: CreateBooking =
            CreateBookingRequestWithIds::new(SpaceId::new(), actor, req).into();
        assert_eq!(event.user_id, actor);
    }
}
