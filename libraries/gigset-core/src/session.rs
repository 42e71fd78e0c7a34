//! Form session state and its reducer.
//!
//! Every user action is an [`Event`]. [`reduce`] updates the [`Session`] and
//! returns the [`Effect`]s the caller has to carry out (persisting the token,
//! replacing the visible location, sending the request). Nothing in here does IO.

use crate::envelope::{authorization_header, build_request, PreparedRequest, LOCAL_INVOKE_URL};
use crate::error::GigsetError;
use crate::location::{capture_token, is_loopback_host};
use crate::payload::{build_payload, playlist_hint, submit_label, FormValues, RequestPayload};
use crate::response::ResponseEnvelope;
use crate::summary::{summarize, LinkSlot, PlaylistLink, SetlistCard};
use tracing::debug;
use url::Url;

pub const NO_RESULTS_PLACEHOLDER: &str = "No results yet.";
pub const WORKING_PLACEHOLDER: &str = "Working...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub tone: StatusTone,
}

impl Status {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: StatusTone::Ok,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: StatusTone::Error,
        }
    }
}

/// Content of the setlist summary pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryPane {
    Placeholder(String),
    Cards(Vec<SetlistCard>),
    Cleared,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Page start: the link it was opened with and the token from storage.
    Load {
        location: Option<Url>,
        stored_token: Option<String>,
    },
    EditForm(FormValues),
    EditToken(String),
    EditEndpoint(String),
    SetLocalMode(bool),
    FillExample,
    Submit,
    ResponseReceived(ResponseEnvelope),
    RequestFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    PersistToken(String),
    /// Replace (not push) the visible location.
    ReplaceLocation(Url),
    Send(PreparedRequest),
}

/// Everything the form shows or remembers between events.
#[derive(Debug, Clone)]
pub struct Session {
    pub form: FormValues,
    pub token: String,
    pub endpoint: String,
    pub local_mode: bool,
    /// Endpoint to restore when local mode is switched off.
    saved_endpoint: String,
    pub location: Option<Url>,
    pub status: Status,
    pub response_preview: String,
    pub link_slot: LinkSlot,
    pub summary: SummaryPane,
    pub in_flight: bool,
}

impl Session {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            form: FormValues::default(),
            token: String::new(),
            saved_endpoint: endpoint.clone(),
            endpoint,
            local_mode: false,
            location: None,
            status: Status::ok("Ready"),
            response_preview: String::new(),
            link_slot: LinkSlot::Empty,
            summary: SummaryPane::Placeholder(NO_RESULTS_PLACEHOLDER.to_string()),
            in_flight: false,
        }
    }

    pub fn token_present(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// The playlist field only accepts input when a token is present.
    pub fn playlist_enabled(&self) -> bool {
        self.token_present()
    }

    pub fn playlist_required(&self) -> bool {
        self.token_present() && self.form.wants_playlist_creation()
    }

    pub fn playlist_hint(&self) -> &'static str {
        playlist_hint(self.token_present(), self.form.wants_playlist_creation())
    }

    pub fn submit_label(&self) -> &'static str {
        if self.in_flight {
            WORKING_PLACEHOLDER
        } else {
            submit_label(&self.form)
        }
    }

    pub fn payload(&self) -> RequestPayload {
        build_payload(&self.form, self.token_present())
    }

    pub fn payload_preview(&self) -> String {
        self.payload()
            .to_json_pretty()
            .unwrap_or_else(|e| e.to_string())
    }

    fn set_local_mode(&mut self, on: bool) {
        if on == self.local_mode {
            return;
        }
        self.local_mode = on;
        if on {
            self.saved_endpoint = self.endpoint.clone();
            self.endpoint = LOCAL_INVOKE_URL.to_string();
            self.status = Status::ok("Local mode enabled (endpoint overridden and request wrapped)");
        } else {
            if !self.saved_endpoint.is_empty() {
                self.endpoint = self.saved_endpoint.clone();
            }
            self.status = Status::ok("Local mode off");
        }
    }

    fn validate_submit(&self, payload: &RequestPayload) -> Result<(), GigsetError> {
        if payload.band_names.is_empty() {
            return Err(GigsetError::NoBands);
        }
        if self.endpoint.trim().is_empty() {
            return Err(GigsetError::NoEndpoint);
        }
        if self.form.wants_playlist_creation() && !self.token_present() {
            return Err(GigsetError::TokenRequired);
        }
        Ok(())
    }

    fn submit(&mut self) -> Vec<Effect> {
        if self.in_flight {
            return Vec::new();
        }

        let payload = self.payload();
        if let Err(e) = self.validate_submit(&payload) {
            self.status = Status::error(e.to_string());
            return Vec::new();
        }

        let auth = authorization_header(&self.token);
        let request = match build_request(
            self.endpoint.trim(),
            &payload,
            auth.as_deref(),
            self.local_mode,
        ) {
            Ok(request) => request,
            Err(e) => {
                self.status = Status::error(e.to_string());
                return Vec::new();
            }
        };

        debug!(
            url = %request.url,
            mode = ?request.mode,
            bands = payload.band_names.len(),
            create_playlist = payload.create_playlist,
            "Submitting request"
        );

        self.status = Status::ok("Sending request...");
        self.response_preview = "Waiting for response...".to_string();
        self.summary = SummaryPane::Placeholder(WORKING_PLACEHOLDER.to_string());
        self.in_flight = true;

        vec![Effect::Send(request)]
    }
}

/// Apply one event to the session.
pub fn reduce(session: &mut Session, event: Event) -> Vec<Effect> {
    match event {
        Event::Load {
            location,
            stored_token,
        } => {
            let mut effects = Vec::new();
            let captured = location.as_ref().and_then(capture_token);

            if let Some(captured) = captured {
                session.token = captured.token.clone();
                session.location = Some(captured.cleaned.clone());
                session.status = Status::ok("Token captured from link and hidden from URL");
                effects.push(Effect::PersistToken(captured.token));
                effects.push(Effect::ReplaceLocation(captured.cleaned));
            } else {
                session.location = location;
                if let Some(stored) = stored_token.filter(|t| !t.is_empty()) {
                    session.token = stored;
                }
            }

            if session.location.as_ref().is_some_and(is_loopback_host) && !session.local_mode {
                debug!("Served from a loopback host, enabling local mode");
                session.set_local_mode(true);
            }
            effects
        }
        Event::EditForm(form) => {
            session.form = form;
            Vec::new()
        }
        Event::EditToken(value) => {
            let trimmed = value.trim().to_string();
            session.token = value;
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![Effect::PersistToken(trimmed)]
            }
        }
        Event::EditEndpoint(endpoint) => {
            session.endpoint = endpoint;
            Vec::new()
        }
        Event::SetLocalMode(on) => {
            session.set_local_mode(on);
            Vec::new()
        }
        Event::FillExample => {
            session.form = session.form.clone().example();
            session.status = Status::ok("Example payload loaded");
            Vec::new()
        }
        Event::Submit => session.submit(),
        Event::ResponseReceived(envelope) => {
            session.response_preview = envelope.to_pretty_json();
            session.link_slot = LinkSlot::from(PlaylistLink::extract(&envelope));

            let cards = summarize(&envelope);
            session.summary = if cards.is_empty() {
                SummaryPane::Placeholder(NO_RESULTS_PLACEHOLDER.to_string())
            } else {
                SummaryPane::Cards(cards)
            };

            session.status = if envelope.ok {
                Status::ok("Lambda responded successfully")
            } else {
                Status::error("Lambda returned an error")
            };
            session.in_flight = false;
            Vec::new()
        }
        Event::RequestFailed(message) => {
            session.response_preview = format!("Request failed: {}", message);
            session.link_slot = LinkSlot::PreviewNotice;
            session.summary = SummaryPane::Cleared;
            session.status = Status::error("Network error");
            session.in_flight = false;
            Vec::new()
        }
    }
}
