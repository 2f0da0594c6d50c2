//! Constants used throughout the Carepoint core crate.
//!
//! Letterhead defaults, timing defaults and the environment variable names read by the binaries
//! at startup all live here so the CLI and the REST server agree on them.

/// Default clinic name printed in the document letterhead.
pub const DEFAULT_CLINIC_NAME: &str = "HealthCare+ Medical Center";

/// Default clinic postal address printed under the clinic name.
pub const DEFAULT_CLINIC_ADDRESS: &str = "123 Medical Avenue, New Delhi, India";

/// Default clinic phone number.
pub const DEFAULT_CLINIC_PHONE: &str = "+91 11 2345 6789";

/// Default clinic contact email.
pub const DEFAULT_CLINIC_EMAIL: &str = "info@healthcareplus.com";

/// Simulated wait between "generate" and "generated", in milliseconds.
pub const DEFAULT_GENERATION_DELAY_MS: u64 = 2_000;

/// Simulated wait before the canned chat reply arrives, in milliseconds.
pub const DEFAULT_CHAT_REPLY_DELAY_MS: u64 = 1_000;

/// Default bind address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

pub const ENV_REST_ADDR: &str = "CAREPOINT_REST_ADDR";
pub const ENV_CLINIC_NAME: &str = "CAREPOINT_CLINIC_NAME";
pub const ENV_CLINIC_ADDRESS: &str = "CAREPOINT_CLINIC_ADDRESS";
pub const ENV_CLINIC_PHONE: &str = "CAREPOINT_CLINIC_PHONE";
pub const ENV_CLINIC_EMAIL: &str = "CAREPOINT_CLINIC_EMAIL";
pub const ENV_GENERATION_DELAY_MS: &str = "CAREPOINT_GENERATION_DELAY_MS";
pub const ENV_CHAT_REPLY_DELAY_MS: &str = "CAREPOINT_CHAT_REPLY_DELAY_MS";
pub const ENV_APPOINTMENTS_FILE: &str = "CAREPOINT_APPOINTMENTS_FILE";

/// Opening message shown when a chat session starts.
pub const CHAT_GREETING: &str = "Hello! I'm your AI health assistant. How can I help you today?";

/// Reply sent for every user chat message until a real assistant is wired in.
pub const CHAT_CANNED_REPLY: &str = "Thank you for your message. This is where the AI chatbot functionality will be integrated. I can help you with appointment scheduling, health FAQs, and general medical information.";
