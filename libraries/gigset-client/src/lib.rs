//! gigset Client
//!
//! HTTP client and token cache for the setlist playlist function.
//!
//! # Features
//!
//! - **Transport**: one POST per submission, double-encoded responses decoded
//! - **Token cache**: last bearer token kept in the local data directory
//! - **Controller**: runs a form session, carrying out the reducer's effects
//!
//! # Example
//!
//! ```ignore
//! use gigset_client::{Controller, FileTokenStore, SetlistClient};
//! use gigset_core::{Event, FormValues, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FileTokenStore::default_location()?;
//!     let client = SetlistClient::new()?;
//!     let mut controller = Controller::new(Session::new("https://fn.example.com/"), client, store);
//!
//!     controller.boot(None).await;
//!     controller
//!         .dispatch(Event::EditForm(FormValues {
//!             band_names: "Opeth, Gojira".into(),
//!             ..FormValues::default()
//!         }))
//!         .await;
//!     controller.dispatch(Event::Submit).await;
//!
//!     println!("{}", controller.session().status.text);
//!     Ok(())
//! }
//! ```

mod client;
mod controller;
mod error;
mod token_store;

pub use client::{Invoke, SetlistClient};
pub use controller::Controller;
pub use error::{ClientError, Result};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
