//! Navigation addresses: `/characters?page=2`, `/launches`, ...
//!
//! The page number in the address is the single source of truth for what a
//! list screen shows.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Characters,
    Launches,
}

impl DatasetKind {
    pub fn path(&self) -> &'static str {
        match self {
            DatasetKind::Characters => "/characters",
            DatasetKind::Launches => "/launches",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DatasetKind::Characters => "Characters",
            DatasetKind::Launches => "Launches",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`, which lands on the characters list.
    Home,
    List { dataset: DatasetKind, page: u32 },
    NotFound(String),
}

impl Route {
    pub fn list(dataset: DatasetKind, page: u32) -> Self {
        Route::List {
            dataset,
            page: page.max(1),
        }
    }

    pub fn parse(address: &str) -> Self {
        let address = address.trim();
        let (path, query) = match address.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (address, None),
        };
        let path = path.trim_end_matches('/');

        match path {
            "" => Route::Home,
            "/characters" => Route::list(DatasetKind::Characters, parse_page(query)),
            "/launches" => Route::list(DatasetKind::Launches, parse_page(query)),
            other => Route::NotFound(other.to_string()),
        }
    }

    /// Follows the `/` redirect.
    pub fn canonical(self) -> Self {
        match self {
            Route::Home => Route::list(DatasetKind::Characters, 1),
            other => other,
        }
    }

    pub fn page(&self) -> Option<u32> {
        match self {
            Route::List { page, .. } => Some(*page),
            _ => None,
        }
    }

    pub fn with_page(&self, page: u32) -> Self {
        match self {
            Route::List { dataset, .. } => Route::list(*dataset, page),
            other => other.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::List { dataset, page: 1 } => write!(f, "{}", dataset.path()),
            Route::List { dataset, page } => write!(f, "{}?page={}", dataset.path(), page),
            Route::NotFound(path) => write!(f, "{}", path),
        }
    }
}

/// Reads `page` from a query string. Missing, non-numeric and zero values
/// all mean page 1.
pub fn parse_page(query: Option<&str>) -> u32 {
    let Some(query) = query else {
        return 1;
    };
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "page")
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}
