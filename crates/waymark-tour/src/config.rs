#![forbid(unsafe_code)]

//! Tour-level configuration.
//!
//! [`TourConfig`] holds every tunable of a tour as plain data so it can be
//! loaded from TOML or JSON at startup (with the `config` feature). Lifecycle
//! callbacks are not data and live in [`TourHooks`](crate::step::TourHooks).
//!
//! # Loading
//!
//! ```toml
//! animate = true
//! padding = 8.0
//! strict_click = "block-all"
//!
//! [panel]
//! alignment = "center"
//! show_buttons = ["next", "close"]
//! ```
//!
//! ```rust,ignore
//! let config = TourConfig::from_toml_file("tour.toml")?;
//! ```
//!
//! # Defaults
//!
//! `TourConfig::default()` animates over 400 ms with 10 px padding, a 5 px
//! corner radius, smooth scrolling, no click containment, keyboard control
//! and Escape-to-close enabled.

#[cfg(feature = "config")]
use std::path::Path;
use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use waymark_core::{Easing, PanelButton};

/// Which side of the anchor the panel sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Fixed scan order used when no preferred side fits.
    pub const PRIORITY: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    /// The opposite side.
    pub const fn mirror(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Whether the panel is stacked above/below the anchor.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// Cross-axis alignment of the panel against its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
}

/// Click containment while a tour is active.
///
/// Deserializes from `false`, `true` or `"block-all"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "config",
    serde(try_from = "StrictClickRepr", into = "StrictClickRepr")
)]
pub enum StrictClick {
    /// Page clicks pass through.
    #[default]
    Off,
    /// Only clicks inside the highlighted element reach the page.
    TargetOnly,
    /// No page clicks at all; only the engine's own UI is interactive.
    BlockAll,
}

#[cfg(feature = "config")]
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StrictClickRepr {
    Flag(bool),
    Mode(String),
}

#[cfg(feature = "config")]
impl TryFrom<StrictClickRepr> for StrictClick {
    type Error = String;

    fn try_from(repr: StrictClickRepr) -> Result<Self, Self::Error> {
        match repr {
            StrictClickRepr::Flag(false) => Ok(Self::Off),
            StrictClickRepr::Flag(true) => Ok(Self::TargetOnly),
            StrictClickRepr::Mode(mode) => match mode.as_str() {
                "block-all" => Ok(Self::BlockAll),
                "target-only" => Ok(Self::TargetOnly),
                "off" => Ok(Self::Off),
                other => Err(format!(
                    "unknown strict click mode {other:?} (expected true, false or \"block-all\")"
                )),
            },
        }
    }
}

#[cfg(feature = "config")]
impl From<StrictClick> for StrictClickRepr {
    fn from(mode: StrictClick) -> Self {
        match mode {
            StrictClick::Off => Self::Flag(false),
            StrictClick::TargetOnly => Self::Flag(true),
            StrictClick::BlockAll => Self::Mode("block-all".into()),
        }
    }
}

/// How a target is brought into view when it is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
    /// Never scroll.
    #[cfg_attr(feature = "config", serde(rename = "no-scroll"))]
    Disabled,
}

/// Which footer buttons the panel shows.
///
/// Deserializes from `false`, `true` or a list such as `["next", "close"]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "config",
    serde(try_from = "ButtonVisibilityRepr", into = "ButtonVisibilityRepr")
)]
pub enum ButtonVisibility {
    /// No footer at all.
    Hidden,
    #[default]
    All,
    /// Only the listed buttons.
    Only(Vec<PanelButton>),
}

impl ButtonVisibility {
    /// Whether `button` is permitted by this setting.
    pub fn permits(&self, button: PanelButton) -> bool {
        match self {
            Self::Hidden => false,
            Self::All => true,
            Self::Only(list) => list.contains(&button),
        }
    }
}

#[cfg(feature = "config")]
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ButtonVisibilityRepr {
    Flag(bool),
    List(Vec<PanelButton>),
}

#[cfg(feature = "config")]
impl TryFrom<ButtonVisibilityRepr> for ButtonVisibility {
    type Error = String;

    fn try_from(repr: ButtonVisibilityRepr) -> Result<Self, Self::Error> {
        Ok(match repr {
            ButtonVisibilityRepr::Flag(false) => Self::Hidden,
            ButtonVisibilityRepr::Flag(true) => Self::All,
            ButtonVisibilityRepr::List(list) => Self::Only(list),
        })
    }
}

#[cfg(feature = "config")]
impl From<ButtonVisibility> for ButtonVisibilityRepr {
    fn from(visibility: ButtonVisibility) -> Self {
        match visibility {
            ButtonVisibility::Hidden => Self::Flag(false),
            ButtonVisibility::All => Self::Flag(true),
            ButtonVisibility::Only(list) => Self::List(list),
        }
    }
}

/// Why a tour ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum ExitReason {
    /// Dismissed by the user (Escape, overlay, close button).
    Cancel,
    /// Walked past the last step.
    Finish,
}

impl ExitReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::Finish => "finish",
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Panel defaults applied to every step unless the step overrides them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PanelDefaults {
    /// Preferred side; `None` lets the solver pick.
    pub side: Option<Side>,
    pub alignment: Alignment,
    /// Gap between the padded cutout and the panel.
    pub offset: f64,
    pub next_text: String,
    pub previous_text: String,
    pub done_text: String,
    pub close_text: String,
    pub show_buttons: ButtonVisibility,
    pub disabled_buttons: Vec<PanelButton>,
}

impl Default for PanelDefaults {
    fn default() -> Self {
        Self {
            side: None,
            alignment: Alignment::Start,
            offset: 10.0,
            next_text: "Next \u{2192}".into(),
            previous_text: "\u{2190} Previous".into(),
            done_text: "Done".into(),
            close_text: "\u{00d7}".into(),
            show_buttons: ButtonVisibility::All,
            disabled_buttons: Vec::new(),
        }
    }
}

/// Top-level tour configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TourConfig {
    /// Animate highlight transitions.
    pub animate: bool,
    /// Transition window in milliseconds.
    pub transition_ms: u64,
    pub easing: Easing,
    /// Cutout padding around the target.
    pub padding: f64,
    /// Cutout corner radius.
    pub radius: f64,
    pub scroll: ScrollBehavior,
    pub strict_click: StrictClick,
    /// Escape and overlay clicks close the tour.
    pub allow_outside_click_close: bool,
    /// Arrow keys and Escape drive the tour.
    pub keyboard_control: bool,
    /// Overlay clicks advance instead of closing.
    pub overlay_click_advances: bool,
    pub panel: PanelDefaults,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            animate: true,
            transition_ms: 400,
            easing: Easing::EaseInOutQuad,
            padding: 10.0,
            radius: 5.0,
            scroll: ScrollBehavior::Smooth,
            strict_click: StrictClick::Off,
            allow_outside_click_close: true,
            keyboard_control: true,
            overlay_click_advances: false,
            panel: PanelDefaults::default(),
        }
    }
}

impl TourConfig {
    /// Effective transition window; zero when animation is off.
    pub fn transition(&self) -> Duration {
        if self.animate {
            Duration::from_millis(self.transition_ms)
        } else {
            Duration::ZERO
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    #[cfg(feature = "config")]
    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.padding.is_finite() && self.padding >= 0.0) {
            errors.push(format!("padding must be >= 0, got {}", self.padding));
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            errors.push(format!("radius must be >= 0, got {}", self.radius));
        }
        if !(self.panel.offset.is_finite() && self.panel.offset >= 0.0) {
            errors.push(format!(
                "panel.offset must be >= 0, got {}",
                self.panel.offset
            ));
        }
        if self.transition_ms > 10_000 {
            errors.push(format!(
                "transition_ms must be <= 10000, got {}",
                self.transition_ms
            ));
        }
        if let ButtonVisibility::Only(list) = &self.panel.show_buttons
            && list.is_empty()
        {
            errors.push("panel.show_buttons list is empty; use false to hide the footer".into());
        }

        errors
    }
}

/// A tour as a single document: configuration plus steps.
///
/// ```toml
/// padding = 6.0
///
/// [[steps]]
/// selector = "#search"
/// panel = { title = "Search", description = "Find anything." }
///
/// [[steps]]
/// selector = "#inbox"
/// panel = { title = "Inbox", side = "left" }
/// ```
#[cfg(feature = "config")]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TourManifest {
    #[serde(flatten)]
    pub config: TourConfig,
    #[serde(default)]
    pub steps: Vec<crate::step::StepDefinition>,
}

#[cfg(feature = "config")]
impl TourManifest {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let manifest: Self = toml::from_str(s)?;
        manifest.validated()
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let manifest: Self = serde_json::from_str(s)?;
        manifest.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Config errors plus per-step errors, prefixed with the step index.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.config.validate();
        for (index, step) in self.steps.iter().enumerate() {
            if let crate::step::Selector::Query(query) = &step.selector
                && query.trim().is_empty()
            {
                errors.push(format!("steps[{index}].selector is empty"));
            }
            if let Some(padding) = step.padding
                && !(padding.is_finite() && padding >= 0.0)
            {
                errors.push(format!("steps[{index}].padding must be >= 0, got {padding}"));
            }
            if let Some(radius) = step.radius
                && !(radius.is_finite() && radius >= 0.0)
            {
                errors.push(format!("steps[{index}].radius must be >= 0, got {radius}"));
            }
        }
        errors
    }
}

/// Errors that can occur when loading a tour configuration.
#[cfg(feature = "config")]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
