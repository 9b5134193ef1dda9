#![forbid(unsafe_code)]

//! Waymark public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for hosts. It
//! re-exports common types from the internal crates and offers a lightweight
//! prelude for day-to-day usage.
//!
//! ```rust,ignore
//! use waymark::prelude::*;
//!
//! let mut tour = waymark::load_tour(page, "onboarding.toml")?;
//! tour.start(0);
//! ```

use std::path::Path;

#[cfg(feature = "logging")]
pub mod logging;

// --- Core re-exports -------------------------------------------------------

pub use waymark_core::{
    CutoutGeometry, CutoutMask, Easing, ElementId, Event, Hit, KeyCode, KeyEvent, KeyEventKind,
    Modifiers, PanelButton, Point, PointerEvent, PointerKind, Rect, Size,
};

// --- Runtime re-exports ----------------------------------------------------

pub use waymark_runtime::{CancellationSource, CancellationToken, FrameScheduler, TaskQueue};

// --- Tour re-exports -------------------------------------------------------

pub use waymark_tour::{
    Alignment, ButtonVisibility, ConfigError, Environment, ExitReason, HookContext, Initiator,
    PanelContent, PanelMetrics, PanelPlacement, PanelView, Propagation, ResolveError, Resolved,
    ScrollBehavior, Selector, Side, StepDefinition, StepHooks, StrictClick, Tour, TourConfig,
    TourHooks, TourManifest,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Waymark hosts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A tour config or manifest failed to load or validate.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A selector could not be resolved against the environment.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// The manifest file extension is neither `.toml` nor `.json`.
    #[error("unsupported manifest format: {}", .0.display())]
    UnsupportedFormat(std::path::PathBuf),
    /// The global tracing subscriber could not be installed.
    #[error("logging init failed: {0}")]
    Logging(String),
}

/// Standard result type for Waymark APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Loading ---------------------------------------------------------------

/// Read a [`TourManifest`] from `path`, choosing TOML or JSON by extension.
pub fn load_manifest(path: impl AsRef<Path>) -> Result<TourManifest> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let manifest = match extension.as_deref() {
        Some("toml") => TourManifest::from_toml_file(path)?,
        Some("json") => {
            let content = std::fs::read_to_string(path).map_err(ConfigError::from)?;
            TourManifest::from_json_str(&content)?
        }
        _ => return Err(Error::UnsupportedFormat(path.to_path_buf())),
    };
    tracing::debug!(
        target: "waymark.tour",
        path = %path.display(),
        steps = manifest.steps.len(),
        "loaded tour manifest"
    );
    Ok(manifest)
}

/// Build a [`Tour`] over `env` from the manifest at `path`.
pub fn load_tour<E: Environment>(env: E, path: impl AsRef<Path>) -> Result<Tour<E>> {
    let manifest = load_manifest(path)?;
    Ok(Tour::from_manifest(env, manifest))
}

/// Indices of steps whose selector does not resolve in `env` right now.
///
/// Tours skip such steps at runtime; hosts can call this up front to catch
/// stale selectors.
pub fn unresolved_steps<E: Environment>(env: &E, steps: &[StepDefinition]) -> Vec<(usize, Error)> {
    steps
        .iter()
        .enumerate()
        .filter_map(|(index, step)| {
            waymark_tour::resolve_selector(env, &step.selector)
                .err()
                .map(|err| (index, Error::from(err)))
        })
        .collect()
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ElementId, Environment, Error, Event, ExitReason, HookContext, Initiator, PanelButton,
        PanelContent, Propagation, Rect, Result, Selector, Size, StepDefinition, Tour, TourConfig,
        TourHooks,
    };

    pub use crate::{core, runtime, tour};
}

pub use waymark_core as core;
pub use waymark_runtime as runtime;
pub use waymark_tour as tour;
