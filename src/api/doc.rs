//! OpenAPI document for the HTTP surface.

use utoipa::OpenApi;

use super::handlers::{booking, hotel, system};

/// API documentation.
#[derive(Debug, OpenApi)]
#[openapi(
    paths(
        hotel::list_hotels,
        hotel::get_hotel,
        hotel::book_room,
        booking::list_bookings,
        booking::cancel_booking,
        system::health_handler,
        system::metrics_handler,
    ),
    tags(
        (name = "Hotels", description = "Browse hotels and their rooms"),
        (name = "Bookings", description = "Create, list and cancel bookings"),
        (name = "System", description = "Health and metrics"),
    ),
    info(
        title = "Hotel Booking API",
        description = "Browse hotels, book rooms by date, and cancel bookings.",
        license(name = "MIT"),
    )
)]
pub struct ApiDoc;

/// Swagger UI serving [`ApiDoc`] at `/swagger-ui`.
#[cfg(feature = "swagger-ui")]
#[must_use]
pub fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
}
