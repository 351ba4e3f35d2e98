use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;
use shell_core::{
    router::DEFAULT_DATA_MANAGER_URL,
    screens::{DEFAULT_BUG_REPORT_LINK, DEFAULT_CONSULTING_LINK},
    OverlayConfig, RouterOptions, SupportLinks,
};

pub const DEFAULT_CONFIG_FILE: &str = "workbench.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub debounce_ms: u64,
    pub fade_ms: u64,
    pub fade_settle_ms: u64,
    pub bug_report_link: String,
    pub consulting_link: String,
    pub restore_initial_widgets: bool,
    pub data_manager_url: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            fade_ms: 400,
            fade_settle_ms: 500,
            bug_report_link: DEFAULT_BUG_REPORT_LINK.into(),
            consulting_link: DEFAULT_CONSULTING_LINK.into(),
            restore_initial_widgets: false,
            data_manager_url: DEFAULT_DATA_MANAGER_URL.into(),
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn overlay_config(&self) -> OverlayConfig {
        OverlayConfig {
            debounce: Duration::from_millis(self.debounce_ms),
            fade: Duration::from_millis(self.fade_ms),
            fade_settle: Duration::from_millis(self.fade_settle_ms),
            support_links: SupportLinks {
                bug_report: self.bug_report_link.clone(),
                consulting: self.consulting_link.clone(),
            },
        }
    }

    pub fn router_options(&self) -> RouterOptions {
        RouterOptions {
            restore_initial_widgets: self.restore_initial_widgets,
            data_manager_url: self.data_manager_url.clone(),
        }
    }
}

/// File settings (explicit path, else `workbench.toml` when present) with
/// `APP__*` environment overrides on top.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let file = match path {
        Some(path) => Some(path.to_path_buf()),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|path| path.exists()),
    };

    let mut settings = match file {
        Some(file) => read_settings_file(&file)?,
        None => Settings::default(),
    };
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("APP__DEBOUNCE_MS").and_then(|v| v.parse().ok()) {
        settings.debounce_ms = v;
    }
    if let Some(v) = lookup("APP__FADE_MS").and_then(|v| v.parse().ok()) {
        settings.fade_ms = v;
    }
    if let Some(v) = lookup("APP__FADE_SETTLE_MS").and_then(|v| v.parse().ok()) {
        settings.fade_settle_ms = v;
    }
    if let Some(v) = lookup("APP__BUG_REPORT_LINK") {
        settings.bug_report_link = v;
    }
    if let Some(v) = lookup("APP__CONSULTING_LINK") {
        settings.consulting_link = v;
    }
    if let Some(v) = lookup("APP__RESTORE_INITIAL_WIDGETS").and_then(|v| parse_flag(&v)) {
        settings.restore_initial_widgets = v;
    }
    if let Some(v) = lookup("APP__DATA_MANAGER_URL") {
        settings.data_manager_url = v;
    }
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
