use serde::ser::{Serialize, SerializeMap, Serializer};
use tera::Context;

use super::{Page, PLUGINS_TEMPLATE};

/// Client-side router table: path to display label, in declaration order
#[derive(Debug, Clone)]
pub struct RouteTable(Vec<(&'static str, &'static str)>);

impl Serialize for RouteTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (path, label) in &self.0 {
            map.serialize_entry(path, label)?;
        }
        map.end()
    }
}

/// Plugins page: routes for the rnxJS router plugin
pub fn plugins_example() -> Page {
    let routes = RouteTable(vec![
        ("/", "Home"),
        ("/users", "Users"),
        ("/settings", "Settings"),
        ("/about", "About"),
    ]);

    let mut context = Context::new();
    context.insert("routes", &routes);
    Page::new(PLUGINS_TEMPLATE, context)
}
