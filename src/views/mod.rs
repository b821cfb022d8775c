//! Page handlers
//!
//! Each view builds a fresh context and names the template that renders it.
//! Views never fail; rendering errors belong to the router.

mod components;
mod form;
mod index;
mod plugins;

pub use components::{components_example, Column, RowStatus, TableRow};
pub use form::form_example;
pub use index::{index, Notification, NotificationKind, User};
pub use plugins::{plugins_example, RouteTable};

use tera::Context;

pub const INDEX_TEMPLATE: &str = "index.html";
pub const FORM_TEMPLATE: &str = "form.html";
pub const FORM_SUCCESS_TEMPLATE: &str = "form_success.html";
pub const COMPONENTS_TEMPLATE: &str = "components.html";
pub const PLUGINS_TEMPLATE: &str = "plugins.html";

/// A view's output: the template to render and its context
#[derive(Debug, Clone)]
pub struct Page {
    pub template: &'static str,
    pub context: Context,
}

impl Page {
    pub const fn new(template: &'static str, context: Context) -> Self {
        Self { template, context }
    }
}
