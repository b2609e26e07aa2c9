use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{booking::Booking, space::Space, user::User};

/// Outbound booking-confirmation channel. Delivery is best effort: callers
/// dispatch it off the request path and only log failures.
#[async_trait]
pub trait BookingNotifier: Send + Sync {
    async fn send_booking_confirmation(
        &self,
        user: &User,
        booking: &Booking,
        space: &Space,
    ) -> AppResult<()>;
}
