use async_trait::async_trait;
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};

use kernel::model::{booking::Booking, space::Space, user::User};
use kernel::repository::notifier::BookingNotifier;
use shared::{
    config::MailConfig,
    error::{AppError, AppResult},
};

/// Sends booking confirmations over SMTP. Callers are expected to dispatch
/// this off the request path; a send failure never reaches the booking
/// response.
pub struct SmtpBookingNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpBookingNotifier {
    pub fn new(config: &MailConfig) -> AppResult<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| AppError::ExternalServiceError(e.to_string()))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();
        let from = config
            .from_address
            .parse()
            .map_err(|e: lettre::address::AddressError| {
                AppError::ExternalServiceError(e.to_string())
            })?;
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl BookingNotifier for SmtpBookingNotifier {
    async fn send_booking_confirmation(
        &self,
        user: &User,
        booking: &Booking,
        space: &Space,
    ) -> AppResult<()> {
        let to: Mailbox = user
            .email
            .parse()
            .map_err(|e: lettre::address::AddressError| {
                AppError::ExternalServiceError(e.to_string())
            })?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(confirmation_subject(booking))
            .body(confirmation_body(user, booking, space))
            .map_err(|e| AppError::ExternalServiceError(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::ExternalServiceError(e.to_string()))?;
        tracing::debug!(booking_id = %booking.id, "sent booking confirmation");
        Ok(())
    }
}

fn confirmation_subject(booking: &Booking) -> String {
    format!("Your Booking Confirmation - {}", booking.id)
}

fn confirmation_body(user: &User, booking: &Booking, space: &Space) -> String {
    format!(
        "Dear {name},\n\n\
         Thank you for reserving co-working space with us. We are pleased to \
         confirm your reservation for the following details:\n\
         \x20   Booking ID: {id}\n\
         \x20   Co-working space: {space_name}\n\
         \x20   Address: {address}, {province}, {tel}\n\
         \x20   Operating Hours: {hours}\n\
         \x20   Booking Date: {date}\n\
         \x20   Number of rooms: {rooms}\n\n\
         We kindly ask that you review the details above to ensure that \
         everything is accurate.\n\n\
         Sincerely,\n",
        name = user.name,
        id = booking.id,
        space_name = space.name,
        address = space.address,
        province = space.province,
        tel = space.tel.as_deref().unwrap_or("-"),
        hours = space.operating_hours,
        date = booking.booking_date.format("%d/%m/%Y"),
        rooms = booking.num_of_rooms,
    )
}

/// Test double recording every confirmation instead of sending it.
#[derive(Default)]
pub struct MockBookingNotifier {
    pub sent: std::sync::Mutex<Vec<(String, String)>>,
}

impl MockBookingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl BookingNotifier for MockBookingNotifier {
    async fn send_booking_confirmation(
        &self,
        user: &User,
        booking: &Booking,
        space: &Space,
    ) -> AppResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((user.email.clone(), confirmation_body(user, booking, space)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use kernel::model::{
        booking::BookingSpace,
        id::{BookingId, SpaceId, UserId},
        role::Role,
    };

    fn fixtures() -> (User, Booking, Space) {
        let space_id = SpaceId::new();
        let user = User {
            user_id: UserId::new(),
            name: "Somchai".into(),
            email: "somchai@example.com".into(),
            role: Role::User,
        };
        let booking = Booking {
            id: BookingId::new(),
            booking_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            num_of_rooms: 2,
            user_id: user.user_id,
            created_at: Utc::now(),
            space: BookingSpace {
                id: space_id,
                name: "Hub1".into(),
                address: "1 Main Rd".into(),
                tel: None,
            },
        };
        let space = Space {
            id: space_id,
            name: "Hub1".into(),
            operating_hours: "9:00-18:00".into(),
            address: "1 Main Rd".into(),
            province: "Bangkok".into(),
            postalcode: "10110".into(),
            tel: None,
            picture: "https://example.com/p.png".into(),
            created_at: Utc::now(),
        };
        (user, booking, space)
    }

    #[test]
    fn body_carries_the_booking_and_space_details() {
        let (user, booking, space) = fixtures();
        let body = confirmation_body(&user, &booking, &space);
        assert!(body.contains("Dear Somchai"));
        assert!(body.contains("Hub1"));
        assert!(body.contains("9:00-18:00"));
        assert!(body.contains("01/01/2024"));
        assert!(body.contains("Number of rooms: 2"));
        assert!(body.contains(&booking.id.to_string()));
    }

    #[tokio::test]
    async fn mock_records_instead_of_sending() {
        let (user, booking, space) = fixtures();
        let notifier = MockBookingNotifier::new();
        notifier
            .send_booking_confirmation(&user, &booking, &space)
            .await
            .unwrap();
        assert_eq!(notifier.sent_count(), 1);
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent[0].0, "somchai@example.com");
    }
}
