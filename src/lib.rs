//! Client side of the clinic's automated-messaging dashboard.
//!
//! Everything that talks to the backend or decides what the user may see lives
//! here; the GTK views in the binary only render it.

pub mod api;
pub mod app;
pub mod dashboard;
pub mod error;
pub mod forms;
pub mod session;
pub mod status;
pub mod storage;
pub mod utils;

pub use app::{AppConfig, AppContext};
pub use error::{ApiError, AuthError, ConfigError, StorageError, ValidationError};
pub use session::{Navigator, Route, Session, SessionGuard};
