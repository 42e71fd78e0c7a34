//! Drives a form session: feeds events to the reducer and carries out its effects.

use crate::client::Invoke;
use crate::token_store::TokenStore;
use gigset_core::session::{reduce, Effect, Event, Session};
use std::collections::VecDeque;
use tracing::{info, warn};
use url::Url;

pub struct Controller<I, S> {
    session: Session,
    invoker: I,
    store: S,
}

impl<I: Invoke, S: TokenStore> Controller<I, S> {
    pub fn new(session: Session, invoker: I, store: S) -> Self {
        Self {
            session,
            invoker,
            store,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// Start the session from the link it was opened with and the cached token.
    pub async fn boot(&mut self, location: Option<Url>) {
        let stored_token = self.store.load().unwrap_or_else(|e| {
            warn!(error = %e, "Could not read cached token");
            None
        });
        self.dispatch(Event::Load {
            location,
            stored_token,
        })
        .await;
    }

    /// Apply an event and everything it leads to.
    ///
    /// A `Send` effect performs the round trip here and feeds the outcome back
    /// as `ResponseReceived` or `RequestFailed`; transport errors never escape.
    pub async fn dispatch(&mut self, event: Event) {
        let mut pending = VecDeque::from([event]);

        while let Some(event) = pending.pop_front() {
            for effect in reduce(&mut self.session, event) {
                match effect {
                    Effect::PersistToken(token) => {
                        if let Err(e) = self.store.save(&token) {
                            warn!(error = %e, "Could not persist token");
                        }
                    }
                    Effect::ReplaceLocation(url) => {
                        info!(location = %url, "Token removed from link");
                    }
                    Effect::Send(request) => {
                        let outcome = match self.invoker.invoke(&request).await {
                            Ok(envelope) => Event::ResponseReceived(envelope),
                            Err(e) => {
                                warn!(error = %e, url = %request.url, "Request failed");
                                Event::RequestFailed(e.to_string())
                            }
                        };
                        pending.push_back(outcome);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClientError, Result};
    use crate::token_store::{MemoryTokenStore, MockTokenStore};
    use async_trait::async_trait;
    use gigset_core::{FormValues, LinkSlot, PreparedRequest, ResponseEnvelope, SummaryPane};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CannedInvoker {
        reply: Option<(u16, &'static str)>,
        calls: AtomicUsize,
    }

    impl CannedInvoker {
        fn replying(status: u16, body: &'static str) -> Self {
            Self {
                reply: Some((status, body)),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Invoke for CannedInvoker {
        async fn invoke(&self, _request: &PreparedRequest) -> Result<ResponseEnvelope> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Some((status, body)) => Ok(ResponseEnvelope::from_text(status, body)),
                None => Err(ClientError::Unreachable("connection refused".to_string())),
            }
        }
    }

    fn bands_form() -> FormValues {
        FormValues {
            band_names: "Opeth".to_string(),
            ..FormValues::default()
        }
    }

    #[tokio::test]
    async fn test_boot_persists_captured_token() {
        let mut store = MockTokenStore::new();
        store.expect_load().times(1).returning(|| Ok(None));
        store
            .expect_save()
            .withf(|token| token == "secret")
            .times(1)
            .returning(|_| Ok(()));

        let mut controller = Controller::new(
            Session::new("https://fn.example.com/"),
            CannedInvoker::failing(),
            store,
        );
        let link = Url::parse("https://app.example.com/?bearer=secret").unwrap();
        controller.boot(Some(link)).await;

        assert_eq!(controller.session().token, "secret");
        assert_eq!(
            controller.session().location.as_ref().map(Url::as_str),
            Some("https://app.example.com/")
        );
    }

    #[tokio::test]
    async fn test_boot_survives_unreadable_store() {
        let mut store = MockTokenStore::new();
        store
            .expect_load()
            .returning(|| {
                Err(ClientError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "denied",
                )))
            });
        store.expect_save().never();

        let mut controller = Controller::new(
            Session::new("https://fn.example.com/"),
            CannedInvoker::failing(),
            store,
        );
        controller.boot(None).await;
        assert!(!controller.session().token_present());
    }

    #[tokio::test]
    async fn test_token_edit_is_persisted() {
        let mut controller = Controller::new(
            Session::new("https://fn.example.com/"),
            CannedInvoker::failing(),
            MemoryTokenStore::default(),
        );
        controller
            .dispatch(Event::EditToken(" typed ".to_string()))
            .await;
        assert_eq!(controller.store().load().unwrap().as_deref(), Some("typed"));
    }

    #[tokio::test]
    async fn test_submit_round_trip() {
        let mut controller = Controller::new(
            Session::new("https://fn.example.com/"),
            CannedInvoker::replying(
                200,
                r#"{"body":"{\"created_playlist\":true,\"playlist\":{\"url\":\"https://x\"},\"setlists\":[]}"}"#,
            ),
            MemoryTokenStore::default(),
        );
        controller.dispatch(Event::EditForm(bands_form())).await;
        controller.dispatch(Event::Submit).await;

        let session = controller.session();
        assert!(!session.in_flight);
        assert_eq!(session.link_slot, LinkSlot::Open("https://x".to_string()));
        assert_eq!(
            session.summary,
            SummaryPane::Placeholder("No results yet.".to_string())
        );
        assert_eq!(controller.invoker.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_status() {
        let mut controller = Controller::new(
            Session::new("https://fn.example.com/"),
            CannedInvoker::failing(),
            MemoryTokenStore::default(),
        );
        controller.dispatch(Event::EditForm(bands_form())).await;
        controller.dispatch(Event::Submit).await;

        let session = controller.session();
        assert_eq!(session.status.text, "Network error");
        assert!(session.response_preview.starts_with("Request failed: "));
        assert!(!session.in_flight);
    }

    #[tokio::test]
    async fn test_invalid_submit_sends_nothing() {
        let mut controller = Controller::new(
            Session::new("https://fn.example.com/"),
            CannedInvoker::replying(200, "{}"),
            MemoryTokenStore::default(),
        );
        controller.dispatch(Event::Submit).await;

        assert_eq!(
            controller.session().status.text,
            "At least one band is required."
        );
        assert_eq!(controller.invoker.calls.load(Ordering::SeqCst), 0);
    }
}
