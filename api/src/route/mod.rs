pub mod booking;
pub mod health;
pub mod space;
pub mod v1;
