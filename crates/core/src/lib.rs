//! # Carepoint Core
//!
//! Core logic for the Carepoint patient portal.
//!
//! This crate contains pure data operations:
//! - Prescription records and their YAML/JSON wire format
//! - Rendering a record into a printable HTML document and a plain-text summary
//! - The generate flow (`idle → generating → generated`) and share/clipboard fallback
//! - Chat widget transcripts with canned replies
//! - Appointment fixtures split into upcoming and past
//!
//! **No API concerns**: HTTP servers and command-line handling belong in `api-rest`,
//! `carepoint-cli` and the `carepoint-run` binary.

pub mod appointments;
pub mod chat;
pub mod config;
pub mod constants;
pub mod error;
pub mod generator;
pub mod record;
pub mod renderer;
pub mod share;

pub use appointments::{Appointment, AppointmentBook, AppointmentStatus};
pub use carepoint_types::{NonEmptyText, TextError};
pub use chat::{ChatMessage, ChatSession, PendingReply, Sender};
pub use config::{CoreConfig, Letterhead};
pub use constants::DEFAULT_REST_ADDR;
pub use error::{CoreError, CoreResult};
pub use generator::{GenerationState, PrescriptionGenerator};
pub use record::{ClinicalRecord, Medication, PatientDetails, Prescriber, RecordFormat};
pub use renderer::{summarize, DocumentRenderer, RenderedDocument};
pub use share::{share_record, Clipboard, FileClipboard, ShareOutcome, ShareRequest, ShareSurface};
