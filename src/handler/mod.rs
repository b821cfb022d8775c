//! Request handler module
//!
//! Route table plus the dispatcher that turns a request into a rendered page.

pub mod router;
pub mod routes;

pub use router::{dispatch, handle_request};
pub use routes::Route;
