use super::*;

use std::collections::HashMap;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_match_the_overlay_contract() {
    let config = Settings::default().overlay_config();
    assert_eq!(config, OverlayConfig::default());
    assert!(!Settings::default().router_options().restore_initial_widgets);
}

#[test]
fn partial_file_keeps_defaults_for_missing_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("workbench.toml");
    fs::write(
        &path,
        "debounce_ms = 50\nrestore_initial_widgets = true\nbug_report_link = \"mailto:team@example.org\"\n",
    )
    .expect("write config");

    let settings = read_settings_file(&path).expect("read settings");

    assert_eq!(settings.debounce_ms, 50);
    assert!(settings.restore_initial_widgets);
    assert_eq!(settings.bug_report_link, "mailto:team@example.org");
    assert_eq!(settings.fade_ms, 400);
    assert_eq!(settings.consulting_link, DEFAULT_CONSULTING_LINK);
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_settings(Some(dir.path().join("nope.toml").as_path())).expect_err("missing file");
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, "debounce_ms = \"soon\"").expect("write config");
    let err = read_settings_file(&path).expect_err("bad file");
    assert!(err.to_string().contains("failed to parse config file"));
}

#[test]
fn env_overrides_win_over_file_values() {
    let mut settings = Settings {
        debounce_ms: 50,
        ..Settings::default()
    };
    apply_env_overrides(
        &mut settings,
        env(&[
            ("APP__DEBOUNCE_MS", "120"),
            ("APP__RESTORE_INITIAL_WIDGETS", "yes"),
            ("APP__DATA_MANAGER_URL", "https://data.example.org/"),
        ]),
    );

    assert_eq!(settings.debounce_ms, 120);
    assert!(settings.restore_initial_widgets);
    assert_eq!(
        settings.router_options().data_manager_url,
        "https://data.example.org/"
    );
}

#[test]
fn unparsable_env_values_are_ignored() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env(&[("APP__FADE_MS", "slow"), ("APP__RESTORE_INITIAL_WIDGETS", "maybe")]),
    );
    assert_eq!(settings, Settings::default());
}
