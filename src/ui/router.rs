// src/ui/router.rs
use super::dashboard::DashboardPage;
use super::settings::SettingsPage;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Settings,
}

impl Route {
    pub const ALL: [Route; 2] = [Route::Dashboard, Route::Settings];

    /// Map a request path to a route; query strings and a trailing slash
    /// are ignored.
    pub fn resolve(path: &str) -> Option<Route> {
        let path = crate::utils::strip_query(path);
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Dashboard),
            "/settings" => Some(Route::Settings),
            _ => None,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Settings => "/settings",
        }
    }

    pub fn nav_label(&self) -> &'static str {
        match self {
            Route::Dashboard => "Find Jobs",
            Route::Settings => "My Profile & Agent",
        }
    }
}

#[derive(Debug)]
pub enum Page {
    Dashboard(DashboardPage),
    Settings(SettingsPage),
    NotFound(String),
}

impl Page {
    pub fn route(&self) -> Option<Route> {
        match self {
            Page::Dashboard(_) => Some(Route::Dashboard),
            Page::Settings(_) => Some(Route::Settings),
            Page::NotFound(_) => None,
        }
    }
}

/// Client-side router holding the single mounted page
#[derive(Debug)]
pub struct Shell {
    path: String,
    page: Page,
    mounts: u64,
    save_indicator: Duration,
}

impl Shell {
    /// Start mounted at `/`
    pub fn new(save_indicator: Duration) -> Self {
        Self {
            path: Route::Dashboard.path().to_string(),
            page: Page::Dashboard(DashboardPage::new()),
            mounts: 1,
            save_indicator,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn route(&self) -> Option<Route> {
        self.page.route()
    }

    /// How many times a page has been mounted
    pub fn mounts(&self) -> u64 {
        self.mounts
    }

    /// Navigate without a reload. Returns whether a new page was mounted;
    /// staying on the current route keeps its state.
    pub fn navigate(&mut self, path: &str) -> bool {
        let target = Route::resolve(path);
        if target.is_some() && target == self.route() {
            return false;
        }

        self.page = match target {
            Some(Route::Dashboard) => Page::Dashboard(DashboardPage::new()),
            Some(Route::Settings) => Page::Settings(SettingsPage::new(self.save_indicator)),
            None => Page::NotFound(path.to_string()),
        };
        self.path = path.to_string();
        self.mounts += 1;
        debug!("Mounted {:?} for {}", self.page.route(), path);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_paths() {
        assert_eq!(Route::resolve("/"), Some(Route::Dashboard));
        assert_eq!(Route::resolve(""), Some(Route::Dashboard));
        assert_eq!(Route::resolve("/settings"), Some(Route::Settings));
        assert_eq!(Route::resolve("/settings/"), Some(Route::Settings));
        assert_eq!(Route::resolve("/?keywords=rust"), Some(Route::Dashboard));
        assert_eq!(Route::resolve("/settingsx"), None);
        assert_eq!(Route::resolve("/jobs"), None);
    }

    #[test]
    fn test_each_navigation_mounts_once() {
        let mut shell = Shell::new(Duration::ZERO);
        assert_eq!(shell.mounts(), 1);

        assert!(shell.navigate("/settings"));
        assert_eq!(shell.route(), Some(Route::Settings));
        assert_eq!(shell.mounts(), 2);

        assert!(!shell.navigate("/settings"));
        assert_eq!(shell.mounts(), 2);

        assert!(shell.navigate("/"));
        assert_eq!(shell.route(), Some(Route::Dashboard));
        assert_eq!(shell.mounts(), 3);
    }

    #[test]
    fn test_settings_state_resets_after_leaving() {
        let mut shell = Shell::new(Duration::ZERO);
        shell.navigate("/settings");
        if let Page::Settings(settings) = shell.page_mut() {
            settings.resume_mut().type_str("my resume");
            settings.instructions_mut().type_str("remote only");
        }

        shell.navigate("/");
        shell.navigate("/settings");

        match shell.page() {
            Page::Settings(settings) => {
                assert_eq!(settings.resume().value(), "");
                assert_eq!(settings.instructions().value(), "");
            }
            other => panic!("expected settings page, got {:?}", other),
        }
    }

    #[test]
    fn test_dashboard_query_resets_after_leaving() {
        let mut shell = Shell::new(Duration::ZERO);
        if let Page::Dashboard(dashboard) = shell.page_mut() {
            dashboard
                .header_mut()
                .search_mut()
                .unwrap()
                .input(crate::ui::SearchField::Keywords, "Rust");
        }
        shell.navigate("/settings");
        shell.navigate("/");

        match shell.page() {
            Page::Dashboard(dashboard) => {
                assert_eq!(dashboard.header().search().unwrap().keywords(), "")
            }
            other => panic!("expected dashboard, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_path_mounts_not_found() {
        let mut shell = Shell::new(Duration::ZERO);
        assert!(shell.navigate("/nowhere"));
        assert!(matches!(shell.page(), Page::NotFound(path) if path == "/nowhere"));
        assert_eq!(shell.route(), None);
        assert_eq!(shell.path(), "/nowhere");
    }
}
