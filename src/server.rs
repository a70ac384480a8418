//! HTTP surface: the catalog and streaming endpoints.

mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
