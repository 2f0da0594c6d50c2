//! Patient appointment listings.
//!
//! Appointments are caller-supplied fixture data: nothing here books, moves or checks for
//! clashes. The book only splits a list into what the patient should see as upcoming and as
//! past, relative to a given day.

use crate::record::deserialize_with_path;
use crate::{CoreError, CoreResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Demo appointments shown on the patient dashboard.
const DEMO_FIXTURE: &str = include_str!("../fixtures/appointments.yaml");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Confirmed,
    Pending,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Completed and cancelled appointments never show as upcoming.
    pub fn is_closed(self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Appointment {
    pub id: u32,
    pub doctor: String,
    pub specialty: String,
    pub date: NaiveDate,
    /// Display time, e.g. "2:30 PM".
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Visit type, e.g. "Follow-up".
    #[serde(rename = "type")]
    pub kind: String,
    pub status: AppointmentStatus,
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Appointment {
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.date >= today && !self.status.is_closed()
    }
}

/// Wire representation of an appointments fixture file.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AppointmentFixture {
    appointments: Vec<Appointment>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppointmentBook {
    appointments: Vec<Appointment>,
}

impl AppointmentBook {
    pub fn new(appointments: Vec<Appointment>) -> Self {
        Self { appointments }
    }

    /// The bundled demo fixture.
    pub fn demo() -> Self {
        Self::from_yaml_str(DEMO_FIXTURE).expect("bundled appointment fixture is valid")
    }

    /// Parse a fixture of the form `appointments: [...]`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SchemaMismatch`] with the failing field path, or
    /// [`CoreError::InvalidInput`] if two appointments share an ID.
    pub fn from_yaml_str(yaml_text: &str) -> CoreResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        let fixture: AppointmentFixture =
            deserialize_with_path("appointments fixture", deserializer)?;

        let mut ids: Vec<u32> = fixture.appointments.iter().map(|a| a.id).collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(CoreError::InvalidInput(format!(
                "duplicate appointment id {}",
                pair[0]
            )));
        }

        Ok(Self::new(fixture.appointments))
    }

    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CoreError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let book = Self::from_yaml_str(&text)?;
        tracing::debug!(
            count = book.appointments.len(),
            "loaded appointments from {}",
            path.display()
        );
        Ok(book)
    }

    pub fn all(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Open appointments on or after `today`, soonest first.
    pub fn upcoming(&self, today: NaiveDate) -> Vec<&Appointment> {
        let mut upcoming: Vec<&Appointment> = self
            .appointments
            .iter()
            .filter(|a| a.is_upcoming(today))
            .collect();
        upcoming.sort_by_key(|a| (a.date, a.id));
        upcoming
    }

    /// Everything that is not upcoming, most recent first.
    pub fn past(&self, today: NaiveDate) -> Vec<&Appointment> {
        let mut past: Vec<&Appointment> = self
            .appointments
            .iter()
            .filter(|a| !a.is_upcoming(today))
            .collect();
        past.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
        past
    }
}
