//! HTTP protocol layer module
//!
//! Response builders and request body decoding, decoupled from the views.

pub mod form;
pub mod response;

// Re-export commonly used types
pub use form::FormData;
pub use response::{
    build_400_response, build_404_response, build_405_response, build_413_response,
    build_500_response, build_html_response, build_options_response, build_permanent_redirect,
};
