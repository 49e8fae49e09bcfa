pub mod selection;
pub mod settings;
pub mod submission;
pub mod trails;

pub use selection::{LineState, SelectionState};
pub use settings::{DrawingSettings, EditorSettings, Palette, SubmissionSettings};
pub use submission::{
    SubmissionController, SubmissionOutcome, SubmissionReply, SubmissionTicket, SubmitRejection,
};
pub use trails::{End, TrailGroup, TrailId, TrailSnapshot, TrailStore, Vertex, VertexId};
