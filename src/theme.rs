//! Light/dark theme resolution.
//!
//! The page signals its theme through `data-theme` / `data-mode` attributes
//! or class names on `<html>` and `<body>`. [`detect`] turns a snapshot of
//! those into a [`Theme`].

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn is_light(self) -> bool {
        self == Theme::Light
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Theme-relevant markup of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementHints {
    pub data_theme: Option<String>,
    pub data_mode: Option<String>,
    pub class_name: String,
}

/// Snapshot of the document root and body hints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeSignal {
    pub root: ElementHints,
    pub body: ElementHints,
}

/// Attributes whose mutation can change the resolved theme.
pub const OBSERVED_ATTRIBUTES: [&str; 3] = ["class", "data-theme", "data-mode"];

/// Resolve the active theme.
///
/// An explicit attribute wins over class names; within each source `light`
/// is matched before `dark`. Nothing recognisable means dark.
pub fn detect(signal: &ThemeSignal) -> Theme {
    let data_theme = first_present(&signal.root.data_theme, &signal.body.data_theme);
    let data_mode = first_present(&signal.root.data_mode, &signal.body.data_mode);
    let hint = if data_theme.is_empty() { data_mode } else { data_theme };

    if let Some(theme) = match_substring(&hint.to_lowercase()) {
        return theme;
    }

    let classes = format!("{} {}", signal.root.class_name, signal.body.class_name).to_lowercase();
    match_substring(&classes).unwrap_or_default()
}

fn first_present<'a>(root: &'a Option<String>, body: &'a Option<String>) -> &'a str {
    match (root.as_deref(), body.as_deref()) {
        (Some(value), _) if !value.is_empty() => value,
        (_, Some(value)) => value,
        _ => "",
    }
}

fn match_substring(text: &str) -> Option<Theme> {
    if text.contains("light") {
        Some(Theme::Light)
    } else if text.contains("dark") {
        Some(Theme::Dark)
    } else {
        None
    }
}
