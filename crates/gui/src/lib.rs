// Library crate: the trail-editing core plus everything tests and scripts need.
// The egui viewer (app, viewport painting) lives in the binary crate.

pub mod command;
pub mod editor;
pub mod error;
pub mod export;
pub mod fixtures;
pub mod harness;
pub mod notify;
pub mod scene;
pub mod state;
pub mod transport;
pub mod validation;

pub use editor::{ActiveEdit, ArmedSegment, DrawState, TrailEditor};
pub use error::{EditError, PersistenceError};
