// CobbleLog - app/navigation.rs
//
// Navigation collaborator: the view only ever asks to "go to" a path.
// `Router` is the in-app implementation backing the GUI.

use crate::util::constants::EDIT_ROUTE_PREFIX;

/// Anything that can move the user to another view.
pub trait Navigator {
    fn go_to(&mut self, path: &str);
}

/// Path of the edit view for a record.
pub fn edit_path(id: &str) -> String {
    format!("{EDIT_ROUTE_PREFIX}{id}")
}

/// Views the application knows how to show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// The searchable log table.
    #[default]
    Index,
    /// Edit view for one record.
    Edit(String),
    /// A path no view handles.
    Unknown(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        match path {
            "" | "/" => Route::Index,
            _ => match path.strip_prefix(EDIT_ROUTE_PREFIX) {
                Some(id) if !id.is_empty() && !id.contains('/') => Route::Edit(id.to_string()),
                _ => Route::Unknown(path.to_string()),
            },
        }
    }
}

/// Current route plus a back stack.
#[derive(Debug, Default)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
}

impl Router {
    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Return to the previous route, or the index when there is none.
    pub fn back(&mut self) {
        self.current = self.history.pop().unwrap_or_default();
    }
}

impl Navigator for Router {
    fn go_to(&mut self, path: &str) {
        let next = Route::parse(path);
        if next == self.current {
            return;
        }
        tracing::debug!(path, route = ?next, "Navigating");
        let previous = std::mem::replace(&mut self.current, next);
        self.history.push(previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/"), Route::Index);
        assert_eq!(Route::parse("/edit/65f0"), Route::Edit("65f0".to_string()));
        assert_eq!(
            Route::parse("/edit/"),
            Route::Unknown("/edit/".to_string())
        );
        assert_eq!(
            Route::parse("/create"),
            Route::Unknown("/create".to_string())
        );
    }

    #[test]
    fn test_edit_path() {
        assert_eq!(edit_path("abc"), "/edit/abc");
        assert_eq!(Route::parse(&edit_path("abc")), Route::Edit("abc".to_string()));
    }

    #[test]
    fn test_go_to_and_back() {
        let mut router = Router::default();
        router.go_to("/edit/1");
        assert_eq!(router.current(), &Route::Edit("1".to_string()));
        router.go_to("/edit/1");
        router.back();
        assert_eq!(router.current(), &Route::Index);
        router.back();
        assert_eq!(router.current(), &Route::Index);
    }
}
