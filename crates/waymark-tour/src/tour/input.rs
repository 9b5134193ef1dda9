//! Keyboard and pointer capture while a tour is active.

use waymark_core::{Event, Hit, KeyCode, KeyEvent, PanelButton, PointerEvent, PointerKind};

use super::Tour;
use crate::config::{ExitReason, StrictClick};
use crate::env::Environment;
use crate::target::Target;

/// Whether the host should let an event reach the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Not handled by the tour; deliver normally.
    Continue,
    /// Consumed or suppressed by the tour.
    Stop,
}

impl Propagation {
    pub const fn is_stopped(self) -> bool {
        matches!(self, Self::Stop)
    }
}

impl<E: Environment> Tour<E> {
    /// Feed one input event to the tour.
    ///
    /// Idle tours never consume input.
    pub fn handle_event(&mut self, event: &Event) -> Propagation {
        if !self.is_active() {
            return Propagation::Continue;
        }
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Pointer(pointer) => self.handle_pointer(pointer),
            Event::Resize { .. } => {
                self.tracker.refresh();
                Propagation::Continue
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Propagation {
        if key.is_release() || !self.config.keyboard_control {
            return Propagation::Continue;
        }
        match key.code {
            KeyCode::Escape if self.config.allow_outside_click_close => {
                self.reset(false, ExitReason::Cancel);
                Propagation::Stop
            }
            KeyCode::Right | KeyCode::Down if self.keyboard_allows(PanelButton::Next) => {
                self.next();
                Propagation::Stop
            }
            KeyCode::Left | KeyCode::Up if self.keyboard_allows(PanelButton::Previous) => {
                self.previous();
                Propagation::Stop
            }
            _ => Propagation::Continue,
        }
    }

    fn keyboard_allows(&self, button: PanelButton) -> bool {
        self.active_panel()
            .is_none_or(|panel| panel.allows(button))
    }

    fn handle_pointer(&mut self, pointer: &PointerEvent) -> Propagation {
        let click = pointer.kind == PointerKind::Click;
        match pointer.hit {
            Hit::PanelButton(button) => {
                if click {
                    self.press(button);
                }
                Propagation::Stop
            }
            Hit::Panel => Propagation::Continue,
            Hit::Overlay => {
                if click {
                    if self.config.overlay_click_advances {
                        self.next();
                    } else if self.config.allow_outside_click_close {
                        self.reset(false, ExitReason::Cancel);
                    }
                }
                Propagation::Stop
            }
            Hit::Element(element) => {
                let Some(current) = self.tracker.current() else {
                    return Propagation::Continue;
                };
                match current.options().strict_click {
                    StrictClick::Off => Propagation::Continue,
                    StrictClick::BlockAll => Propagation::Stop,
                    StrictClick::TargetOnly if self.env.contains(current.element(), element) => {
                        Propagation::Continue
                    }
                    StrictClick::TargetOnly => Propagation::Stop,
                }
            }
        }
    }

    fn press(&mut self, button: PanelButton) {
        let enabled = self
            .tracker
            .current()
            .and_then(Target::panel)
            .is_none_or(|panel| {
                let footer = panel.footer();
                let state = footer.button(button);
                footer.visible && state.visible && !state.disabled
            });
        if !enabled {
            tracing::debug!(target: "waymark.tour", ?button, "ignoring disabled panel button");
            return;
        }
        match button {
            PanelButton::Next => self.next(),
            PanelButton::Previous => self.previous(),
            PanelButton::Close => self.reset(false, ExitReason::Cancel),
        }
    }
}
