use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    booking::{
        event::{BookingListFilter, CreateBooking, DeleteBooking, UpdateBooking},
        Booking,
    },
    id::BookingId,
};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, event: CreateBooking) -> AppResult<Booking>;
    async fn find_all(&self, filter: BookingListFilter) -> AppResult<Vec<Booking>>;
    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>>;
    async fn update(&self, event: UpdateBooking) -> AppResult<Booking>;
    async fn delete(&self, event: DeleteBooking) -> AppResult<()>;
}
