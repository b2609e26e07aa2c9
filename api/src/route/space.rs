use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    booking::{register_booking, show_space_booking_list},
    space::{delete_space, register_space, show_space, show_space_list, update_space},
};

pub fn build_space_routers() -> Router<AppRegistry> {
    let spaces_routers = Router::new()
        .route("/", get(show_space_list))
        .route("/", post(register_space))
        .route("/:space_id", get(show_space))
        .route("/:space_id", put(update_space))
        .route("/:space_id", delete(delete_space))
        .route("/:space_id/bookings", get(show_space_booking_list))
        .route("/:space_id/bookings", post(register_booking));

    Router::new().nest("/coworkingspaces", spaces_routers)
}
