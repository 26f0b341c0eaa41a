// src/ui/header.rs
//! Shared page header: brand, navigation and an optional search bar.

use super::router::Route;
use super::text::ControlledText;
use crate::jobs::JobSearchParams;

pub const BRAND: &str = "Scoutling";
pub const SEARCH_LABEL: &str = "Find";
pub const BUSY_LABEL: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Keywords,
    Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Char(char),
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub keywords: String,
    pub location: String,
}

impl SearchQuery {
    pub fn to_params(&self, limit: u32) -> JobSearchParams {
        let non_blank = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        JobSearchParams {
            keywords: non_blank(&self.keywords),
            location: non_blank(&self.location),
            limit,
            ..JobSearchParams::default()
        }
    }
}

/// Keyword/location inputs plus the submit control
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchBar {
    keywords: ControlledText,
    location: ControlledText,
    loading: bool,
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(keywords: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            keywords: ControlledText::new(keywords),
            location: ControlledText::new(location),
            loading: false,
        }
    }

    pub fn keywords(&self) -> &str {
        self.keywords.value()
    }

    pub fn location(&self) -> &str {
        self.location.value()
    }

    pub fn query(&self) -> SearchQuery {
        SearchQuery {
            keywords: self.keywords().to_string(),
            location: self.location().to_string(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Owned by the caller; the bar only reflects it
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_disabled(&self) -> bool {
        self.loading
    }

    pub fn button_label(&self) -> &'static str {
        if self.loading {
            BUSY_LABEL
        } else {
            SEARCH_LABEL
        }
    }

    fn field_mut(&mut self, field: SearchField) -> &mut ControlledText {
        match field {
            SearchField::Keywords => &mut self.keywords,
            SearchField::Location => &mut self.location,
        }
    }

    pub fn input(&mut self, field: SearchField, value: &str) {
        self.field_mut(field).set(value);
    }

    /// Enter submits; printable keys and backspace edit the field
    pub fn key_down(&mut self, field: SearchField, key: Key) -> Option<SearchQuery> {
        match key {
            Key::Enter => self.submit(),
            Key::Backspace => {
                self.field_mut(field).backspace();
                None
            }
            Key::Char(c) => {
                let mut buf = [0u8; 4];
                self.field_mut(field).type_str(c.encode_utf8(&mut buf));
                None
            }
            Key::Other => None,
        }
    }

    pub fn click(&mut self) -> Option<SearchQuery> {
        self.submit()
    }

    fn submit(&self) -> Option<SearchQuery> {
        if self.is_disabled() {
            None
        } else {
            Some(self.query())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub route: Route,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderEvent {
    Input { field: SearchField, value: String },
    KeyDown { field: SearchField, key: Key },
    ClickSearch,
    ClickBrand,
    ClickNav(Route),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderAction {
    Navigate(Route),
    Search(SearchQuery),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    active: Route,
    search: Option<SearchBar>,
}

impl Header {
    pub fn new(active: Route) -> Self {
        Self {
            active,
            search: None,
        }
    }

    pub fn with_search(active: Route, search: SearchBar) -> Self {
        Self {
            active,
            search: Some(search),
        }
    }

    pub fn active(&self) -> Route {
        self.active
    }

    pub fn search(&self) -> Option<&SearchBar> {
        self.search.as_ref()
    }

    pub fn search_mut(&mut self) -> Option<&mut SearchBar> {
        self.search.as_mut()
    }

    pub fn nav_items(&self) -> Vec<NavItem> {
        Route::ALL
            .iter()
            .map(|&route| NavItem {
                label: route.nav_label(),
                route,
                active: route == self.active,
            })
            .collect()
    }

    /// Search events are ignored when the header has no search bar.
    pub fn handle(&mut self, event: HeaderEvent) -> Option<HeaderAction> {
        match event {
            HeaderEvent::ClickBrand => Some(HeaderAction::Navigate(Route::Dashboard)),
            HeaderEvent::ClickNav(route) => Some(HeaderAction::Navigate(route)),
            HeaderEvent::Input { field, value } => {
                self.search.as_mut()?.input(field, &value);
                None
            }
            HeaderEvent::KeyDown { field, key } => self
                .search
                .as_mut()?
                .key_down(field, key)
                .map(HeaderAction::Search),
            HeaderEvent::ClickSearch => self.search.as_mut()?.click().map(HeaderAction::Search),
        }
    }

    /// Same as [`Header::handle`], but hands submitted queries to `on_search`
    /// and returns only navigation requests.
    pub fn dispatch<F>(&mut self, event: HeaderEvent, mut on_search: F) -> Option<Route>
    where
        F: FnMut(&SearchQuery),
    {
        match self.handle(event)? {
            HeaderAction::Search(query) => {
                on_search(&query);
                None
            }
            HeaderAction::Navigate(route) => Some(route),
        }
    }
}
