use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Data-manager folder that backs a toolchain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(pub String);

impl FolderId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("toolchain id must not be empty")]
pub struct EmptyToolchainId;

/// Identifier of a toolchain. Never empty: an empty id has no URL encoding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToolchainId(String);

impl ToolchainId {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyToolchainId> {
        let value = value.into();
        if value.is_empty() {
            return Err(EmptyToolchainId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolchainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ToolchainId {
    type Error = EmptyToolchainId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ToolchainId {
    type Error = EmptyToolchainId;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ToolchainId> for String {
    fn from(id: ToolchainId) -> Self {
        id.0
    }
}

/// Well-known overlay views that can be requested by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OverlayKey {
    HamburgerMenu,
    LoginView,
    RegisterView,
    ResetPasswordView,
    AchievementLibrary,
    ProjectSettings,
    StartingScreen,
    DatasetLibrary,
    VisualizationLibrary,
}

impl OverlayKey {
    pub const ALL: [OverlayKey; 9] = [
        OverlayKey::HamburgerMenu,
        OverlayKey::LoginView,
        OverlayKey::RegisterView,
        OverlayKey::ResetPasswordView,
        OverlayKey::AchievementLibrary,
        OverlayKey::ProjectSettings,
        OverlayKey::StartingScreen,
        OverlayKey::DatasetLibrary,
        OverlayKey::VisualizationLibrary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OverlayKey::HamburgerMenu => "HamburgerMenu",
            OverlayKey::LoginView => "LoginView",
            OverlayKey::RegisterView => "RegisterView",
            OverlayKey::ResetPasswordView => "ResetPasswordView",
            OverlayKey::AchievementLibrary => "AchievementLibrary",
            OverlayKey::ProjectSettings => "ProjectSettings",
            OverlayKey::StartingScreen => "StartingScreen",
            OverlayKey::DatasetLibrary => "DatasetLibrary",
            OverlayKey::VisualizationLibrary => "VisualizationLibrary",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

impl fmt::Display for OverlayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
