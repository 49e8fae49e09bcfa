//! Pointer gestures mapped onto edit operations
//!
//! Each handler checks the exclusive modes first (drag, add mode) and then
//! dispatches on what is under the cursor. Failures are reported through the
//! notifier; the handlers themselves never fail.

use super::{DrawState, TrailEditor};
use crate::notify::Notifier;
use crate::scene::{Owner, Renderer, ScreenPos};

/// How many stacked primitives a pick looks through
const PICK_DEPTH: usize = 4;

impl<R: Renderer, N: Notifier> TrailEditor<R, N> {
    /// Topmost trail primitive under `screen`, looking past anything the
    /// editor does not own
    pub(super) fn picked(&self, screen: ScreenPos) -> Option<Owner> {
        self.renderer
            .drill_pick(screen, PICK_DEPTH)
            .into_iter()
            .filter_map(|h| self.index.owner(h))
            .find(|owner| *owner != Owner::Transient)
    }

    /// Left click
    pub fn click(&mut self, screen: ScreenPos) {
        tracing::debug!("click at {screen}");
        if self.drag.is_some() {
            return;
        }
        if self.add_mode.is_some() {
            if let Err(e) = self.commit_insert(screen) {
                self.report(&e);
            }
            return;
        }

        let result = match self.draw {
            DrawState::Drawing(_) => self.continue_measure(screen).map(|_| ()),
            DrawState::Idle | DrawState::Complete => match self.picked(screen) {
                Some(Owner::Vertex { trail, vertex }) => {
                    let extremal = self.store.get(trail).is_some_and(|g| g.is_extremal(vertex));
                    if extremal {
                        self.resume_measure(trail, vertex)
                    } else {
                        self.select_trail(trail)
                    }
                }
                Some(Owner::Segment { trail, .. } | Owner::SegmentLabel { trail, .. } | Owner::Total { trail }) => {
                    self.select_trail(trail)
                }
                Some(Owner::Transient) | None => self.start_measure(screen).map(|_| ()),
            },
        };
        if let Err(e) = result {
            self.report(&e);
        }
    }

    /// Double click: finish the trail being drawn, or arm add mode on a
    /// segment
    pub fn double_click(&mut self, screen: ScreenPos) {
        tracing::debug!("double click at {screen}");
        if self.drag.is_some() {
            return;
        }
        let result = if self.active_edit().is_some() {
            self.finish_measure(Some(screen)).map(|_| ())
        } else {
            match self.picked(screen) {
                Some(Owner::Segment { trail, key }) => self.arm_insert(trail, key),
                _ => Ok(()),
            }
        };
        if let Err(e) = result {
            self.report(&e);
        }
    }

    /// Right click: leave add mode, or finish the trail being drawn
    pub fn right_click(&mut self, screen: ScreenPos) {
        tracing::debug!("right click at {screen}");
        if self.add_mode.is_some() {
            self.exit_add_mode();
            return;
        }
        if self.active_edit().is_some() {
            if let Err(e) = self.finish_measure(Some(screen)) {
                self.report(&e);
            }
        }
    }

    /// Middle click: delete the vertex under the cursor
    pub fn middle_click(&mut self, screen: ScreenPos) {
        tracing::debug!("middle click at {screen}");
        if let Some(Owner::Vertex { trail, vertex }) = self.picked(screen) {
            if let Err(e) = self.remove_vertex(trail, vertex) {
                self.report(&e);
            }
        }
    }

    /// Pointer motion: drag, rubber band and hover
    pub fn pointer_move(&mut self, screen: ScreenPos) {
        if self.drag.is_some() {
            self.drag_move(screen);
            return;
        }
        if self.active_edit().is_some() {
            if let Some(world) = self.renderer.screen_to_world(screen) {
                self.pointer = Some(world);
                self.update_preview();
            }
        } else {
            self.pointer = self.renderer.screen_to_world(screen);
        }
        self.update_hover(screen);
    }
}
