//! Light / dark / auto theme, persisted under `taskflow-theme` in durable
//! storage and applied as `data-theme` on the document element.

use std::fmt;
use std::str::FromStr;

use dioxus::prelude::*;

use crate::icons::{FaCircleHalfStroke, FaMoon, FaSun};
use crate::Icon;

pub const THEME_KEY: &str = "taskflow-theme";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
    /// Follow the operating system.
    #[default]
    Auto,
}

impl Theme {
    /// light → dark → auto → light
    pub fn next(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Auto,
            Theme::Auto => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
    }

    /// The concrete palette, given whether the system prefers dark.
    pub fn resolve(self, system_dark: bool) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto if system_dark => "dark",
            Theme::Auto => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "auto" => Ok(Theme::Auto),
            _ => Err(()),
        }
    }
}

pub type ThemeSignal = Signal<Theme>;

#[cfg(target_arch = "wasm32")]
fn durable() -> crate::session::BrowserStorage {
    crate::session::BrowserStorage(crate::session::Persistence::Durable)
}

/// Read the stored preference into `theme` and apply it.
pub fn load_theme_from_storage(theme: &mut ThemeSignal) {
    #[cfg(target_arch = "wasm32")]
    {
        use crate::session::SessionStorage;
        let stored = durable()
            .get(THEME_KEY)
            .and_then(|s| s.parse::<Theme>().ok())
            .unwrap_or_default();
        theme.set(stored);
    }
    apply_theme(*theme.peek());
}

pub fn save_theme(theme: Theme) {
    #[cfg(target_arch = "wasm32")]
    {
        use crate::session::SessionStorage;
        durable().set(THEME_KEY, theme.as_str());
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = theme;
}

pub fn apply_theme(theme: Theme) {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = web_sys::window() else {
            return;
        };
        let system_dark = window
            .match_media("(prefers-color-scheme: dark)")
            .ok()
            .flatten()
            .is_some_and(|query| query.matches());
        if let Some(root) = window.document().and_then(|d| d.document_element()) {
            let _ = root.set_attribute("data-theme", theme.resolve(system_dark));
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = theme;
}

/// Cycles the theme on click.
#[component]
pub fn ThemeToggle() -> Element {
    let mut theme = use_context::<ThemeSignal>();
    let current = theme();

    rsx! {
        button {
            class: "theme-toggle",
            title: "Theme: {current}",
            onclick: move |_| {
                let next = theme.peek().next();
                save_theme(next);
                apply_theme(next);
                theme.set(next);
            },
            match current {
                Theme::Light => rsx! { Icon { icon: FaSun, width: 16, height: 16 } },
                Theme::Dark => rsx! { Icon { icon: FaMoon, width: 16, height: 16 } },
                Theme::Auto => rsx! { Icon { icon: FaCircleHalfStroke, width: 16, height: 16 } },
            }
        }
    }
}
