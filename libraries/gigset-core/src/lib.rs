//! gigset Core
//!
//! Platform-agnostic form logic for the setlist playlist function: payload
//! building, request envelopes, response decoding and the result view model.
//!
//! # Architecture
//!
//! - **Payload**: `FormValues` → `RequestPayload`
//! - **Envelope**: local emulator event vs direct HTTP body, `Authorization` header
//! - **Response**: tagged `Body` (JSON or text), gateway double-decoding
//! - **Summary**: playlist link slot and setlist cards
//! - **Session**: explicit state plus a reducer that returns effects instead of doing IO
//!
//! # Example
//!
//! ```rust
//! use gigset_core::session::{reduce, Effect, Event, Session};
//! use gigset_core::FormValues;
//!
//! let mut session = Session::new("https://fn.example.com/");
//! let form = FormValues {
//!     band_names: "Opeth\nGojira".to_string(),
//!     ..FormValues::default()
//! };
//! reduce(&mut session, Event::EditForm(form));
//!
//! let effects = reduce(&mut session, Event::Submit);
//! assert!(matches!(effects.as_slice(), [Effect::Send(_)]));
//! ```

#![forbid(unsafe_code)]

pub mod envelope;
pub mod error;
pub mod location;
pub mod payload;
pub mod response;
pub mod session;
pub mod summary;

// Re-export commonly used types
pub use envelope::{
    authorization_header, build_request, InvocationMode, PreparedRequest, LOCAL_INVOKE_PATH,
    LOCAL_INVOKE_URL,
};
pub use error::{GigsetError, Result};
pub use location::{capture_token, is_loopback_host, CapturedToken};
pub use payload::{build_payload, parse_bands, parse_number, FormNumber, FormValues, RequestPayload};
pub use response::{Body, ResponseEnvelope};
pub use session::{reduce, Effect, Event, Session, Status, StatusTone, SummaryPane};
pub use summary::{summarize, LinkSlot, PlaylistLink, SetlistCard, SetlistKind, SongRow};
