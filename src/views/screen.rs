use crate::session::SessionContext;

use super::route::{DatasetKind, Route};

/// Which view renders for an address, given the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Gate,
    List { dataset: DatasetKind, page: u32 },
    NotFound(String),
}

impl Screen {
    /// Identity presence is the only gate; it is checked on every resolve.
    pub fn resolve(route: &Route, session: &SessionContext) -> Self {
        if !session.is_present() {
            return Screen::Gate;
        }
        match route.clone().canonical() {
            Route::List { dataset, page } => Screen::List { dataset, page },
            Route::NotFound(path) => Screen::NotFound(path),
            Route::Home => Screen::List {
                dataset: DatasetKind::Characters,
                page: 1,
            },
        }
    }
}
