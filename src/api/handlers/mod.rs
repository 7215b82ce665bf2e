//! HTTP request handlers.

pub mod auth_handler;
pub mod category_handler;
pub mod comment_handler;
pub mod health_handler;
pub mod post_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use category_handler::category_routes;
pub use comment_handler::comment_routes;
pub use health_handler::health;
pub use post_handler::post_routes;
pub use user_handler::user_routes;
