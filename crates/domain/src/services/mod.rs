//! Domain services for the report assistant.
//!
//! Services contain business logic and the ports to external systems.

pub mod generation;
pub mod notification;
pub mod prompts;

pub use generation::{DraftGenerator, GenerationCall, GenerationError, MockDraftGenerator};
pub use notification::{DeliveryOutcome, FinalizedReport, MockReportNotifier, ReportNotifier};
pub use prompts::{audio_correction_instructions, initial_draft_instructions};
