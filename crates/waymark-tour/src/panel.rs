#![forbid(unsafe_code)]

//! Information panel presentation.
//!
//! A [`PanelPresenter`] is built per activation for steps that carry a panel
//! title. It derives what the footer shows from the step's position in the
//! tour, hands a [`PanelView`] to the host for rendering, and re-solves the
//! panel position every time the tracker pushes new geometry.

use waymark_core::{PanelButton, Rect};

use crate::config::{Alignment, ButtonVisibility, PanelDefaults, Side};
use crate::env::Environment;
use crate::position::{PanelPlacement, PositionRequest};
use crate::step::PanelContent;

/// Panel settings after merging step overrides into tour defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelOptions {
    pub title: String,
    pub description: Option<String>,
    pub side: Option<Side>,
    pub alignment: Alignment,
    pub offset: f64,
    pub next_text: String,
    pub previous_text: String,
    pub done_text: String,
    pub close_text: String,
    pub show_buttons: ButtonVisibility,
    pub disabled_buttons: Vec<PanelButton>,
}

impl PanelOptions {
    /// Merge `content` over `defaults`. `None` when the step has no title.
    pub fn merge(defaults: &PanelDefaults, content: &PanelContent) -> Option<Self> {
        let title = content.title.clone()?;
        Some(Self {
            title,
            description: content.description.clone(),
            side: content.side.or(defaults.side),
            alignment: content.alignment.unwrap_or(defaults.alignment),
            offset: defaults.offset,
            next_text: pick(&content.next_text, &defaults.next_text),
            previous_text: pick(&content.previous_text, &defaults.previous_text),
            done_text: pick(&content.done_text, &defaults.done_text),
            close_text: pick(&content.close_text, &defaults.close_text),
            show_buttons: content
                .show_buttons
                .clone()
                .unwrap_or_else(|| defaults.show_buttons.clone()),
            disabled_buttons: content
                .disabled_buttons
                .clone()
                .unwrap_or_else(|| defaults.disabled_buttons.clone()),
        })
    }
}

fn pick(over: &Option<String>, default: &str) -> String {
    over.clone().unwrap_or_else(|| default.to_owned())
}

/// Position of the presented step within its tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelIndices {
    pub total_count: usize,
    pub current_index: usize,
    pub is_first: bool,
    pub is_last: bool,
}

impl PanelIndices {
    pub fn new(current_index: usize, total_count: usize) -> Self {
        Self {
            total_count,
            current_index,
            is_first: current_index == 0,
            is_last: total_count <= 1 || current_index + 1 == total_count,
        }
    }
}

/// Render state of one footer button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonState {
    pub visible: bool,
    pub disabled: bool,
    pub label: String,
}

impl ButtonState {
    fn shown(label: &str) -> Self {
        Self {
            visible: true,
            disabled: false,
            label: label.to_owned(),
        }
    }
}

/// Render state of the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterState {
    pub visible: bool,
    pub previous: ButtonState,
    pub next: ButtonState,
    pub close: ButtonState,
    /// Close is the only way out (single-step tour).
    pub close_only: bool,
    /// `"current/total"` counter.
    pub progress: Option<String>,
}

impl FooterState {
    pub fn button(&self, button: PanelButton) -> &ButtonState {
        match button {
            PanelButton::Previous => &self.previous,
            PanelButton::Next => &self.next,
            PanelButton::Close => &self.close,
        }
    }

    fn button_mut(&mut self, button: PanelButton) -> &mut ButtonState {
        match button {
            PanelButton::Previous => &mut self.previous,
            PanelButton::Next => &mut self.next,
            PanelButton::Close => &mut self.close,
        }
    }
}

/// Compute the footer for a step at `indices`.
pub fn footer_state(options: &PanelOptions, indices: PanelIndices) -> FooterState {
    let mut footer = FooterState {
        visible: true,
        previous: ButtonState::shown(&options.previous_text),
        next: ButtonState::shown(&options.next_text),
        close: ButtonState::shown(&options.close_text),
        close_only: false,
        progress: None,
    };

    if options.show_buttons == ButtonVisibility::Hidden {
        footer.visible = false;
        for button in PanelButton::ALL {
            footer.button_mut(button).visible = false;
        }
        return footer;
    }

    if indices.total_count <= 1 {
        footer.previous.visible = false;
        footer.next.visible = false;
        footer.close_only = true;
    } else {
        footer.previous.disabled = indices.is_first;
        if indices.is_last || indices.current_index + 1 == indices.total_count {
            footer.next.label.clone_from(&options.done_text);
        } else {
            footer.progress = Some(format!(
                "{}/{}",
                indices.current_index + 1,
                indices.total_count
            ));
        }
    }

    if let ButtonVisibility::Only(_) = &options.show_buttons {
        for button in PanelButton::ALL {
            if !options.show_buttons.permits(button) {
                footer.button_mut(button).visible = false;
            }
        }
    }
    for &button in &options.disabled_buttons {
        footer.button_mut(button).disabled = true;
    }

    footer
}

/// What the host renders.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub title: String,
    pub description: Option<String>,
    pub footer: FooterState,
}

/// A rendered panel bound to one activation.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelPresenter {
    options: PanelOptions,
    indices: PanelIndices,
    footer: FooterState,
    placement: Option<PanelPlacement>,
}

impl PanelPresenter {
    pub fn new(options: PanelOptions, indices: PanelIndices) -> Self {
        let footer = footer_state(&options, indices);
        Self {
            options,
            indices,
            footer,
            placement: None,
        }
    }

    pub fn options(&self) -> &PanelOptions {
        &self.options
    }

    pub fn indices(&self) -> PanelIndices {
        self.indices
    }

    pub fn footer(&self) -> &FooterState {
        &self.footer
    }

    /// Last solved placement.
    pub fn placement(&self) -> Option<&PanelPlacement> {
        self.placement.as_ref()
    }

    pub fn view(&self) -> PanelView {
        PanelView {
            title: self.options.title.clone(),
            description: self.options.description.clone(),
            footer: self.footer.clone(),
        }
    }

    /// Render the panel and focus its primary button.
    pub fn show<E: Environment + ?Sized>(&self, env: &mut E) {
        env.render_panel(&self.view());
        let focus = [PanelButton::Next, PanelButton::Close]
            .into_iter()
            .find(|&button| {
                let state = self.footer.button(button);
                self.footer.visible && state.visible && !state.disabled
            });
        if let Some(button) = focus {
            env.focus_button(button);
        }
    }

    pub fn hide<E: Environment + ?Sized>(&self, env: &mut E) {
        env.hide_panel();
    }

    /// Re-solve the position against `anchor` without re-rendering.
    pub fn refresh<E: Environment + ?Sized>(&mut self, env: &mut E, anchor: Rect, padding: f64) {
        let metrics = env.measure_panel();
        let request = PositionRequest {
            anchor,
            panel: metrics.size,
            tip: metrics.tip,
            alignment: self.options.alignment,
            preferred_side: self.options.side,
            padding,
            offset: self.options.offset,
            viewport: env.viewport(),
        };
        let placement = request.solve();
        if self.placement.as_ref() != Some(&placement) {
            tracing::trace!(
                target: "waymark.panel",
                side = ?placement.side,
                step = self.indices.current_index,
                "panel placement changed"
            );
        }
        env.place_panel(&placement);
        self.placement = Some(placement);
    }

    /// Whether keyboard navigation may trigger `button`.
    pub fn allows(&self, button: PanelButton) -> bool {
        if self.options.disabled_buttons.contains(&button) {
            return false;
        }
        match &self.options.show_buttons {
            ButtonVisibility::Only(list) => list.contains(&button),
            ButtonVisibility::All | ButtonVisibility::Hidden => true,
        }
    }
}
