//! Wire types shared by every endpoint
//!
//! Every response, success or failure, is wrapped in the same envelope:
//! `{success, message?, count?, data?}`.

pub mod envelope;
pub mod error;
pub mod json;

pub use envelope::Envelope;
pub use error::{ApiError, ApiErrorResponse};
pub use json::{Json, JsonOrForm};
