//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services. Request
//! handlers and renderers never read process-wide environment variables themselves, which keeps
//! behaviour consistent across threads and test harnesses.

use crate::constants::{
    DEFAULT_CHAT_REPLY_DELAY_MS, DEFAULT_CLINIC_ADDRESS, DEFAULT_CLINIC_EMAIL,
    DEFAULT_CLINIC_NAME, DEFAULT_CLINIC_PHONE, DEFAULT_GENERATION_DELAY_MS,
    ENV_APPOINTMENTS_FILE, ENV_CHAT_REPLY_DELAY_MS, ENV_CLINIC_ADDRESS, ENV_CLINIC_EMAIL,
    ENV_CLINIC_NAME, ENV_CLINIC_PHONE, ENV_GENERATION_DELAY_MS,
};
use crate::{CoreError, CoreResult, NonEmptyText};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Clinic details printed at the top of every rendered document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Letterhead {
    pub clinic_name: NonEmptyText,
    pub address: NonEmptyText,
    pub phone: NonEmptyText,
    pub email: NonEmptyText,
}

impl Default for Letterhead {
    fn default() -> Self {
        Self {
            clinic_name: NonEmptyText::new(DEFAULT_CLINIC_NAME)
                .expect("default clinic name is non-empty"),
            address: NonEmptyText::new(DEFAULT_CLINIC_ADDRESS)
                .expect("default clinic address is non-empty"),
            phone: NonEmptyText::new(DEFAULT_CLINIC_PHONE)
                .expect("default clinic phone is non-empty"),
            email: NonEmptyText::new(DEFAULT_CLINIC_EMAIL)
                .expect("default clinic email is non-empty"),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    letterhead: Letterhead,
    generation_delay: Duration,
    chat_reply_delay: Duration,
    appointments_file: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            letterhead: Letterhead::default(),
            generation_delay: Duration::from_millis(DEFAULT_GENERATION_DELAY_MS),
            chat_reply_delay: Duration::from_millis(DEFAULT_CHAT_REPLY_DELAY_MS),
            appointments_file: None,
        }
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        letterhead: Letterhead,
        generation_delay: Duration,
        chat_reply_delay: Duration,
        appointments_file: Option<PathBuf>,
    ) -> Self {
        Self {
            letterhead,
            generation_delay,
            chat_reply_delay,
            appointments_file,
        }
    }

    /// Build configuration from a key lookup, typically `|k| std::env::var(k).ok()`.
    ///
    /// Missing or blank values fall back to the defaults in [`crate::constants`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if a delay value is present but is not a whole number
    /// of milliseconds.
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let letterhead = letterhead_from_env_values(
            lookup(ENV_CLINIC_NAME),
            lookup(ENV_CLINIC_ADDRESS),
            lookup(ENV_CLINIC_PHONE),
            lookup(ENV_CLINIC_EMAIL),
        )?;
        let generation_delay = delay_from_env_value(
            ENV_GENERATION_DELAY_MS,
            lookup(ENV_GENERATION_DELAY_MS),
            DEFAULT_GENERATION_DELAY_MS,
        )?;
        let chat_reply_delay = delay_from_env_value(
            ENV_CHAT_REPLY_DELAY_MS,
            lookup(ENV_CHAT_REPLY_DELAY_MS),
            DEFAULT_CHAT_REPLY_DELAY_MS,
        )?;
        let appointments_file = non_blank(lookup(ENV_APPOINTMENTS_FILE)).map(PathBuf::from);

        Ok(Self::new(
            letterhead,
            generation_delay,
            chat_reply_delay,
            appointments_file,
        ))
    }

    pub fn letterhead(&self) -> &Letterhead {
        &self.letterhead
    }

    pub fn generation_delay(&self) -> Duration {
        self.generation_delay
    }

    pub fn chat_reply_delay(&self) -> Duration {
        self.chat_reply_delay
    }

    pub fn appointments_file(&self) -> Option<&Path> {
        self.appointments_file.as_deref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Build a [`Letterhead`] from optional raw values, substituting defaults for missing ones.
pub fn letterhead_from_env_values(
    clinic_name: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    email: Option<String>,
) -> CoreResult<Letterhead> {
    let defaults = Letterhead::default();
    let pick = |value: Option<String>, fallback: NonEmptyText| -> CoreResult<NonEmptyText> {
        match non_blank(value) {
            Some(v) => Ok(NonEmptyText::new(v)?),
            None => Ok(fallback),
        }
    };

    Ok(Letterhead {
        clinic_name: pick(clinic_name, defaults.clinic_name)?,
        address: pick(address, defaults.address)?,
        phone: pick(phone, defaults.phone)?,
        email: pick(email, defaults.email)?,
    })
}

/// Parse a millisecond delay from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns `default_ms`.
pub fn delay_from_env_value(
    key: &str,
    value: Option<String>,
    default_ms: u64,
) -> CoreResult<Duration> {
    match non_blank(value) {
        None => Ok(Duration::from_millis(default_ms)),
        Some(raw) => raw.parse::<u64>().map(Duration::from_millis).map_err(|_| {
            CoreError::InvalidInput(format!(
                "{key} must be a whole number of milliseconds, got {raw:?}"
            ))
        }),
    }
}
