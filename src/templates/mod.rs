//! Page templates
//!
//! The Tera templates ship inside the binary. A configured template directory
//! replaces the embedded set wholesale, and must provide every page the views
//! name.

use serde::Serialize;
use std::collections::HashMap;
use tera::{Tera, Value};

use crate::handler::routes::{nav_links, NavLink, Route};
use crate::views::{
    Page, COMPONENTS_TEMPLATE, FORM_SUCCESS_TEMPLATE, FORM_TEMPLATE, INDEX_TEMPLATE,
    PLUGINS_TEMPLATE,
};

const BASE_TEMPLATE: &str = "base.html";

const EMBEDDED: [(&str, &str); 6] = [
    (BASE_TEMPLATE, include_str!("../../templates/base.html")),
    (INDEX_TEMPLATE, include_str!("../../templates/index.html")),
    (FORM_TEMPLATE, include_str!("../../templates/form.html")),
    (
        FORM_SUCCESS_TEMPLATE,
        include_str!("../../templates/form_success.html"),
    ),
    (
        COMPONENTS_TEMPLATE,
        include_str!("../../templates/components.html"),
    ),
    (PLUGINS_TEMPLATE, include_str!("../../templates/plugins.html")),
];

/// Compile the template set
///
/// With no directory the embedded templates are used. Otherwise every
/// `*.html` file under `dir` is loaded. Both sets get the `url` function.
pub fn load(dir: Option<&str>) -> Result<Tera, tera::Error> {
    let mut tera = match dir {
        None => {
            let mut tera = Tera::default();
            // Added as one batch so `extends` resolves regardless of order
            tera.add_raw_templates(EMBEDDED)?;
            tera
        }
        Some(dir) => {
            let glob = format!("{}/**/*.html", dir.trim_end_matches('/'));
            Tera::new(&glob)?
        }
    };

    tera.register_function("url", url);

    let names: Vec<&str> = tera.get_template_names().collect();
    if let Some((missing, _)) = EMBEDDED.iter().find(|(name, _)| !names.contains(name)) {
        return Err(tera::Error::msg(format!(
            "template '{missing}' not found in {}",
            dir.unwrap_or("embedded templates")
        )));
    }
    Ok(tera)
}

/// `url(name="form")`: path of a named route
fn url(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let name = args
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| tera::Error::msg("url() takes a string `name` argument"))?;
    Route::reverse(name)
        .map(Value::from)
        .ok_or_else(|| tera::Error::msg(format!("url(): no route named '{name}'")))
}

/// Site-wide values every page receives under `site`
#[derive(Debug, Clone, Serialize)]
pub struct SiteContext<'a> {
    pub title: &'a str,
    pub rnx_script_url: &'a str,
    pub current_path: &'a str,
    pub nav: Vec<NavLink>,
}

impl<'a> SiteContext<'a> {
    pub fn new(title: &'a str, rnx_script_url: &'a str, current_path: &'a str) -> Self {
        Self {
            title,
            rnx_script_url,
            current_path,
            nav: nav_links(),
        }
    }
}

/// Render a view's page with the site values layered on top
pub fn render(tera: &Tera, page: &Page, site: &SiteContext<'_>) -> Result<String, tera::Error> {
    let mut context = page.context.clone();
    context.insert("site", site);
    tera.render(page.template, &context)
}
