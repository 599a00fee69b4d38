//! Annotation session state machine and the data it walks over

mod clock;
mod config;
mod error;
mod session;
mod taxonomy;
mod types;

pub use clock::StepClock;
pub use config::Config;
pub use error::SessionError;
pub use session::Session;
pub use taxonomy::{CategoryTable, Taxonomy};
pub use types::{
    AgeBracket, ConfirmedRecord, DialogueItem, Mode, PendingSelection, Step, Transcript,
    TriageLevel, Turn,
};
