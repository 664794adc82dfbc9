//! Headless model of the sign-up page
//!
//! Two forms (inline and modal) share one set of browser-side rules. A valid
//! submission is appended to every participant list on the page and confirmed
//! in an overlay that dismisses itself after five seconds. The page works on
//! its own; attaching an [`HttpRegistrationSink`] also sends each sign-up to
//! the registration API.

mod controller;
mod form;
mod sink;

pub use controller::{
    ClickTarget, ListEntry, PageController, PageState, SubmitOutcome, OVERLAY_DISMISS_DELAY,
};
pub use form::{validate_form, FormField, FormKind, FormState, FormValues, Submission};
pub use sink::{HttpRegistrationSink, RegistrationSink, SinkError, SUBMIT_TIMEOUT};
