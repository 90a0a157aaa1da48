//! # Cadence Core Library
//!
//! The recurrence engine behind practice plans: it turns "repeat every N
//! weeks on Mon/Wed, until March" into a canonical rule, a storable rule
//! string, and a bounded list of concrete sessions.
//!
//! ## Features
//!
//! - **Normalization**: Folds rule strings, legacy metadata blobs and user
//!   input into one canonical [`models::NormalizedRecurrence`]
//! - **Rule Strings**: Compact, round-trip stable `FREQ=...;INTERVAL=...` form
//! - **Bounded Generation**: DAILY / WEEKLY / MONTHLY expansion with hard
//!   limits on length and look-ahead
//! - **Deterministic**: No clock reads, no I/O, no shared state
//!
//! ## Core Modules
//!
//! - [`models`]: Rule, bounds and occurrence types
//! - [`normalize`]: Input shapes and the normalizer
//! - [`codec`]: Rule string encoding and decoding
//! - [`recurrence`]: Occurrence generation and series queries
//! - [`describe`]: Human-readable rule summaries
//! - [`error`]: Error types for the strict parsing paths
//!
//! ## Example Usage
//!
//! ```rust
//! use cadence_core::{
//!     codec::{decode_rule, encode_rule},
//!     models::{GenerationBounds, Occurrence},
//!     recurrence::generate_occurrences,
//! };
//! use chrono::NaiveDate;
//!
//! let rule = decode_rule("FREQ=WEEKLY;INTERVAL=2;BYDAY=MO;COUNT=3").unwrap();
//! assert_eq!(encode_rule(&rule), "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO;COUNT=3");
//!
//! let start = Occurrence::AllDay(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
//! let sessions = generate_occurrences(start, &rule, &GenerationBounds::default());
//! assert_eq!(sessions.len(), 3);
//! assert_eq!(sessions[1].date(), NaiveDate::from_ymd_opt(2025, 1, 20).unwrap());
//! ```

pub mod codec;
pub mod describe;
pub mod error;
pub mod models;
pub mod normalize;
pub mod recurrence;

pub use codec::{decode_rule, encode_rule};
pub use normalize::{normalize_recurrence, normalize_value, RecurrenceInput};
pub use recurrence::{generate_occurrences, next_occurrence_after, occurrences_between, Series};
