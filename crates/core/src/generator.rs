//! Prescription generation session.
//!
//! Wraps a record and a renderer in the three-state flag the portal shows to the user:
//!
//! ```text
//! idle --begin--> generating --complete--> generated
//! ```
//!
//! There is one forward path and no cancel or retry. The wait in `generating` is a fixed
//! delay that exists only for the user's benefit; [`PrescriptionGenerator::run`] drives it with
//! a single timer.

use crate::record::ClinicalRecord;
use crate::renderer::{DocumentRenderer, RenderedDocument};
use crate::{CoreError, CoreResult};
use serde::Serialize;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationState {
    Idle,
    Generating,
    Generated,
}

impl GenerationState {
    pub fn as_str(self) -> &'static str {
        match self {
            GenerationState::Idle => "idle",
            GenerationState::Generating => "generating",
            GenerationState::Generated => "generated",
        }
    }
}

impl std::fmt::Display for GenerationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One prescription moving through the generate flow.
#[derive(Debug)]
pub struct PrescriptionGenerator {
    record: ClinicalRecord,
    renderer: DocumentRenderer,
    state: GenerationState,
    document: Option<RenderedDocument>,
}

impl PrescriptionGenerator {
    pub fn new(record: ClinicalRecord, renderer: DocumentRenderer) -> Self {
        Self {
            record,
            renderer,
            state: GenerationState::Idle,
            document: None,
        }
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn record(&self) -> &ClinicalRecord {
        &self.record
    }

    /// The rendered document, available once generation has completed.
    pub fn document(&self) -> Option<&RenderedDocument> {
        self.document.as_ref()
    }

    /// Move from `idle` to `generating`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] unless the session is idle.
    pub fn begin(&mut self) -> CoreResult<()> {
        if self.state != GenerationState::Idle {
            return Err(CoreError::InvalidTransition {
                state: self.state.as_str(),
                action: "begin generation",
            });
        }
        self.state = GenerationState::Generating;
        tracing::info!(record_id = %self.record.record_id, "prescription generation started");
        Ok(())
    }

    /// Move from `generating` to `generated`, rendering the document.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] unless generation is in progress.
    pub fn complete(&mut self) -> CoreResult<&RenderedDocument> {
        if self.state != GenerationState::Generating {
            return Err(CoreError::InvalidTransition {
                state: self.state.as_str(),
                action: "complete generation",
            });
        }
        let document = self.renderer.generate(&self.record);
        self.state = GenerationState::Generated;
        tracing::info!(record_id = %self.record.record_id, "prescription generated");
        let document: &RenderedDocument = self.document.insert(document);
        Ok(document)
    }

    /// Run the whole flow: begin, wait `delay`, complete, then call `on_generated` once.
    pub async fn run<F>(&mut self, delay: Duration, on_generated: F) -> CoreResult<&RenderedDocument>
    where
        F: FnOnce(&RenderedDocument),
    {
        self.begin()?;
        tokio::time::sleep(delay).await;
        let document = self.complete()?;
        on_generated(document);
        Ok(document)
    }

    /// Confirmation text shown once generated, `None` before that.
    pub fn confirmation(&self) -> Option<String> {
        match self.state {
            GenerationState::Generated => Some(format!(
                "Prescription Generated Successfully!\nPrescription ID: {}",
                self.record.record_id
            )),
            _ => None,
        }
    }
}
