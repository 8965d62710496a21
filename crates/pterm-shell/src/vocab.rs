#![forbid(unsafe_code)]

//! Known routes and command names.

use serde::{Deserialize, Serialize};

use crate::command::Builtin;

/// A navigable page of the host site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub path: String,
    #[serde(default)]
    pub label: String,
}

impl Route {
    #[must_use]
    pub fn new(path: &str, label: &str) -> Self {
        Self {
            path: normalize_path(path),
            label: label.to_owned(),
        }
    }
}

/// Route and command vocabularies used by `cd`, `ls`, and completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub routes: Vec<Route>,
    pub commands: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            routes: vec![
                Route::new("/", "Home"),
                Route::new("/about", "About"),
                Route::new("/projects", "Projects"),
                Route::new("/blog", "Blog"),
                Route::new("/contact", "Contact"),
            ],
            commands: Builtin::ALL.iter().map(|b| b.name().to_owned()).collect(),
        }
    }
}

impl Vocabulary {
    #[must_use]
    pub fn has_route(&self, path: &str) -> bool {
        self.routes.iter().any(|r| r.path == path)
    }

    pub fn route_paths(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.path.as_str())
    }

    /// Route paths starting with `prefix`, in declared order.
    #[must_use]
    pub fn routes_with_prefix(&self, prefix: &str) -> Vec<&str> {
        self.route_paths().filter(|p| p.starts_with(prefix)).collect()
    }

    /// Command names starting with `prefix`, in declared order.
    #[must_use]
    pub fn commands_with_prefix(&self, prefix: &str) -> Vec<&str> {
        self.commands
            .iter()
            .map(String::as_str)
            .filter(|c| c.starts_with(prefix))
            .collect()
    }
}

/// Leading slash enforced, trailing slash dropped (except for `/`).
#[must_use]
pub fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_paths() {
        assert_eq!(normalize_path("about"), "/about");
        assert_eq!(normalize_path("/about/"), "/about");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn prefixes_keep_declared_order() {
        let v = Vocabulary::default();
        assert_eq!(v.commands_with_prefix("su"), vec!["su", "sudo"]);
        assert_eq!(v.routes_with_prefix("/"), v.route_paths().collect::<Vec<_>>());
        assert_eq!(v.routes_with_prefix("/b"), vec!["/blog"]);
    }
}
