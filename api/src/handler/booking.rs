use axum::{
    extract::{Path, Query, State},
    Json,
};
use garde::Validate;

use kernel::model::{
    access,
    booking::{
        event::{BookingListFilter, DeleteBooking},
        Booking,
    },
    id::{BookingId, SpaceId},
    user::User,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::{
        booking::{
            BookingListQuery, BookingResponse, CreateBookingRequest, CreateBookingRequestWithIds,
            UpdateBookingRequest, UpdateBookingRequestWithId,
        },
        DataEnvelope, ListEnvelope,
    },
};

pub async fn show_booking_list(
    user: AuthorizedUser,
    Query(query): Query<BookingListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ListEnvelope<BookingResponse>>> {
    let filter = BookingListFilter::new(
        (!user.is_admin()).then(|| user.id()),
        query.coworkingspace_id,
    );
    registry
        .booking_repository()
        .find_all(filter)
        .await
        .map(|bookings| {
            ListEnvelope::new(bookings.into_iter().map(BookingResponse::from).collect())
        })
        .map(Json)
}

pub async fn show_space_booking_list(
    user: AuthorizedUser,
    Path(space_id): Path<SpaceId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ListEnvelope<BookingResponse>>> {
    let filter = BookingListFilter::new((!user.is_admin()).then(|| user.id()), Some(space_id));
    registry
        .booking_repository()
        .find_all(filter)
        .await
        .map(|bookings| {
            ListEnvelope::new(bookings.into_iter().map(BookingResponse::from).collect())
        })
        .map(Json)
}

pub async fn show_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<DataEnvelope<BookingResponse>>> {
    let booking = fetch_authorized(&registry, booking_id, &user).await?;
    Ok(Json(DataEnvelope::new(booking.into())))
}

pub async fn register_booking(
    user: AuthorizedUser,
    Path(space_id): Path<SpaceId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateBookingRequest>,
) -> AppResult<Json<DataEnvelope<BookingResponse>>> {
    req.validate(&())?;

    let event = CreateBookingRequestWithIds::new(space_id, user.id(), req).into();
    let booking = registry.booking_repository().create(event).await?;

    dispatch_confirmation(&registry, user.user.clone(), booking.clone());

    Ok(Json(DataEnvelope::new(booking.into())))
}

pub async fn update_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateBookingRequest>,
) -> AppResult<Json<DataEnvelope<BookingResponse>>> {
    req.validate(&())?;
    fetch_authorized(&registry, booking_id, &user).await?;

    registry
        .booking_repository()
        .update(UpdateBookingRequestWithId::new(booking_id, req).into())
        .await
        .map(BookingResponse::from)
        .map(DataEnvelope::new)
        .map(Json)
}

pub async fn delete_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<DataEnvelope<serde_json::Value>>> {
    fetch_authorized(&registry, booking_id, &user).await?;

    registry
        .booking_repository()
        .delete(DeleteBooking::new(booking_id))
        .await
        .map(|_| Json(DataEnvelope::new(serde_json::json!({}))))
}

/// Loads the booking and applies the owner-or-admin rule before any
/// mutation or sensitive read.
async fn fetch_authorized(
    registry: &AppRegistry,
    booking_id: BookingId,
    user: &AuthorizedUser,
) -> AppResult<Booking> {
    let booking = registry
        .booking_repository()
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound(format!("No booking with the id of {booking_id}")))?;

    if !access::can_act(user.id(), user.role(), booking.user_id) {
        return Err(AppError::ForbiddenOperation);
    }
    Ok(booking)
}

/// Confirmation mail runs as its own unit of work after the booking is
/// committed; the response never waits on it and a failure only shows up in
/// the logs.
fn dispatch_confirmation(registry: &AppRegistry, user: User, booking: Booking) {
    let spaces = registry.space_repository();
    let notifier = registry.booking_notifier();
    tokio::spawn(async move {
        let space = match spaces.find_by_id(booking.space.id).await {
            Ok(Some(space)) => space,
            Ok(None) => {
                tracing::warn!(
                    space_id = %booking.space.id,
                    "space vanished before the confirmation mail was sent"
                );
                return;
            }
            Err(e) => {
                tracing::error!(
                    error = ?e,
                    booking_id = %booking.id,
                    "failed to resolve the space for the confirmation mail"
                );
                return;
            }
        };
        if let Err(e) = notifier
            .send_booking_confirmation(&user, &booking, &space)
            .await
        {
            tracing::error!(
                error = ?e,
                booking_id = %booking.id,
                "failed to send the booking confirmation"
            );
        }
    });
}
