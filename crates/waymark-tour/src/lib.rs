#![forbid(unsafe_code)]

//! Guided-tour engine.
//!
//! # Role in Waymark
//! `waymark-tour` walks a user through an ordered list of steps. Each step
//! names a target element; the engine dims the page around it, shows an
//! information panel beside it, and keeps both glued to the element while
//! the page scrolls or reflows.
//!
//! # Primary responsibilities
//! - **Tour**: the navigation state machine with the prevent/continue
//!   protocol for asynchronous step preparation.
//! - **HighlightTracker**: eases the cutout between targets, then re-syncs
//!   it to live geometry every frame.
//! - **PositionRequest**: picks the side, alignment and tip of the panel.
//! - **PanelPresenter**: footer state and placement of the panel.
//!
//! The host supplies an [`Environment`] and calls [`Tour::tick`] once per
//! animation frame and [`Tour::handle_event`] for input.
//!
//! ```rust,ignore
//! let mut tour = Tour::new(page, TourConfig::default()).with_steps(vec![
//!     StepDefinition::new("#search").with_panel(PanelContent::new("Search")),
//!     StepDefinition::new("#inbox").with_panel(PanelContent::new("Inbox")),
//! ]);
//! tour.start(0);
//! loop {
//!     tour.tick(web_time::Instant::now());
//! }
//! ```

pub mod config;
pub mod env;
pub mod movement;
pub mod panel;
pub mod position;
pub mod step;
pub mod target;
pub mod tour;
pub mod tracker;

pub use config::{
    Alignment, ButtonVisibility, ExitReason, PanelDefaults, ScrollBehavior, Side, StrictClick,
    TourConfig,
};
#[cfg(feature = "config")]
pub use config::{ConfigError, TourManifest};
pub use env::{Environment, PanelMetrics, ResolveError, Resolved, resolve_selector};
pub use movement::{Movement, MovementId, MovementKind, MovementPayload};
pub use panel::{ButtonState, FooterState, PanelIndices, PanelOptions, PanelPresenter, PanelView};
pub use position::{PanelPlacement, PositionRequest, Tip};
pub use step::{
    ExitHook, Hook, HookContext, Initiator, PanelContent, Selector, StepDefinition, StepHooks,
    TourHooks,
};
pub use target::{Target, TargetOptions, TargetOrigin};
pub use tour::{Propagation, Tour};
pub use tracker::HighlightTracker;
