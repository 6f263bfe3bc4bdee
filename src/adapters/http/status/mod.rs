//! Status HTTP endpoints.

mod handlers;
mod routes;

pub use handlers::{HealthResponse, SirensResponse, StatusAppState};
pub use routes::status_router;
