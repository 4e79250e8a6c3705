//! Client for the smart parcel locker backend.
//!
//! [`http::HttpClient`] wraps the REST API and its response envelope, the
//! [`api`] modules map one function to one endpoint, and the [`store`] types
//! hold the state of each multi-step flow (kiosk deposit, courier deposit,
//! pickup, recipient, admin). [`session`] keeps the signed-in user between
//! runs and [`guard`] decides which sections a role may open.

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod models;
pub mod session;
pub mod store;
pub mod validation;

pub use error::{ApiError, ApiResult, ErrorCode, FlowError, FlowResult, ValidationError};
pub use http::HttpClient;
