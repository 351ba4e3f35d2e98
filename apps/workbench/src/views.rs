use shared::domain::OverlayKey;
use shell_core::{OverlayRegistry, ViewConstructor};

fn title(key: OverlayKey) -> &'static str {
    match key {
        OverlayKey::HamburgerMenu => "Menu",
        OverlayKey::LoginView => "Log in",
        OverlayKey::RegisterView => "Register",
        OverlayKey::ResetPasswordView => "Reset password",
        OverlayKey::AchievementLibrary => "Achievements",
        OverlayKey::ProjectSettings => "Toolchain settings",
        OverlayKey::StartingScreen => "Choose a toolchain to get started",
        OverlayKey::DatasetLibrary => "Datasets",
        OverlayKey::VisualizationLibrary => "Visualizations",
    }
}

fn placeholder_markup(key: OverlayKey) -> String {
    // Only a loaded toolchain makes the starting screen go away.
    let close = if key == OverlayKey::StartingScreen {
        ""
    } else {
        r#"<button id="closeOverlay">Close</button>"#
    };
    format!(
        r#"<section class="overlay-view" data-view="{name}">{close}<h2>{title}</h2></section>"#,
        name = key.name(),
        title = title(key),
    )
}

/// Registry with a placeholder view for every well-known overlay.
pub fn placeholder_registry() -> OverlayRegistry {
    OverlayKey::ALL
        .into_iter()
        .fold(OverlayRegistry::builder(), |builder, key| {
            builder.register(
                key,
                ViewConstructor::from_markup(key.name(), placeholder_markup(key)),
            )
        })
        .build()
}
