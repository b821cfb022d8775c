//! URL map
//!
//! Four literal paths, matched exactly. Each route also carries the name
//! templates use to link to it and the methods it accepts.

use hyper::Method;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Index,
    Form,
    Components,
    Plugins,
}

impl Route {
    /// All routes in navigation order
    pub const ALL: [Self; 4] = [Self::Index, Self::Form, Self::Components, Self::Plugins];

    /// Exact-match lookup of a request path
    pub fn resolve(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    /// Reverse lookup: route name to path
    pub fn reverse(name: &str) -> Option<&'static str> {
        Self::ALL
            .into_iter()
            .find(|route| route.name() == name)
            .map(Self::path)
    }

    pub const fn path(self) -> &'static str {
        match self {
            Self::Index => "/",
            Self::Form => "/form/",
            Self::Components => "/components/",
            Self::Plugins => "/plugins/",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Form => "form",
            Self::Components => "components",
            Self::Plugins => "plugins",
        }
    }

    /// Navigation label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Index => "Reactive State",
            Self::Form => "Forms",
            Self::Components => "Components",
            Self::Plugins => "Plugins",
        }
    }

    pub fn allows(self, method: &Method) -> bool {
        match *method {
            Method::GET | Method::HEAD | Method::OPTIONS => true,
            Method::POST => self == Self::Form,
            _ => false,
        }
    }

    /// Value of the `Allow` header for this route
    pub const fn allow_header(self) -> &'static str {
        match self {
            Self::Form => "GET, HEAD, POST, OPTIONS",
            _ => "GET, HEAD, OPTIONS",
        }
    }
}

/// Navigation entry exposed to templates
#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub name: &'static str,
    pub path: &'static str,
    pub label: &'static str,
}

pub fn nav_links() -> Vec<NavLink> {
    Route::ALL
        .into_iter()
        .map(|route| NavLink {
            name: route.name(),
            path: route.path(),
            label: route.label(),
        })
        .collect()
}
