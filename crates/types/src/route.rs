use std::{fmt, str::FromStr};

use thiserror::Error;

/// Top-level screens the router can navigate to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Route {
    #[default]
    Home,
    Table,
}

impl Route {
    pub const ALL: [Route; 2] = [Route::Home, Route::Table];

    /// Route path without the leading separator (e.g. `table`).
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Table => "table",
        }
    }

    /// Absolute URL reported by the router for this route (e.g. `/table`).
    pub fn url(self) -> String {
        format!("/{}", self.path())
    }

    /// Resolves a path with or without a single leading `/`.
    pub fn from_path(path: &str) -> Result<Self, ParseRouteError> {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        Self::ALL
            .into_iter()
            .find(|route| route.path() == trimmed)
            .ok_or_else(|| ParseRouteError(path.to_string()))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = ParseRouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_path(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown route '{0}'; expected one of: home, table")]
pub struct ParseRouteError(pub String);
