//! Web server module
//!
//! Provides the HTML pages and the small JSON API for StackSearch.

mod handlers;
mod routes;
mod state;
mod templates;

pub use routes::create_router;
pub use state::AppState;
pub use templates::Templates;
