// Export route modules
pub mod chat;
pub mod models;

use crate::state::AppState;
use axum::Router;

// Function to configure all routes
pub fn configure(state: AppState) -> Router {
    Router::new()
        .merge(chat::routes(state))
        .merge(models::routes())
}
