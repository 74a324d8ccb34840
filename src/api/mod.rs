pub mod auth;
pub mod client;
pub mod models;

pub use auth::AuthService;
pub use client::ApiClient;
