//! View model of a function response: the playlist link slot and one card per setlist.

use crate::response::{is_truthy, Body, ResponseEnvelope};
use serde::Serialize;
use serde_json::Value;

/// Playlist URL and creation flag found in a response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaylistLink {
    pub url: Option<String>,
    pub created: bool,
}

impl PlaylistLink {
    /// Look in the inner body first, then the outer one.
    ///
    /// The URL is the first truthy `playlist.url`; the flag is the truthiness of
    /// the first `created_playlist` that is present and not null.
    pub fn extract(envelope: &ResponseEnvelope) -> Self {
        let url = [&envelope.inner, &envelope.body]
            .into_iter()
            .filter_map(|body| body.pointer(&["playlist", "url"]))
            .find(|value| is_truthy(value))
            .map(value_text);

        let created = [&envelope.inner, &envelope.body]
            .into_iter()
            .filter_map(|body| body.pointer(&["created_playlist"]))
            .find(|value| !value.is_null())
            .is_some_and(is_truthy);

        Self { url, created }
    }
}

/// What goes in the link slot above the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum LinkSlot {
    /// A created playlist with a URL to open.
    Open(String),
    /// Nothing was created; the per-song links are the result.
    PreviewNotice,
    Empty,
}

impl From<PlaylistLink> for LinkSlot {
    fn from(link: PlaylistLink) -> Self {
        match (link.created, link.url) {
            (true, Some(url)) => LinkSlot::Open(url),
            (false, _) => LinkSlot::PreviewNotice,
            (true, None) => LinkSlot::Empty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SetlistKind {
    /// Copied from a recent concert.
    Fresh,
    /// Inferred from song statistics.
    Estimated,
}

impl SetlistKind {
    fn from_label(label: &str) -> Self {
        if label == "fresh" {
            SetlistKind::Fresh
        } else {
            SetlistKind::Estimated
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SetlistKind::Fresh => "fresh",
            SetlistKind::Estimated => "estimated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongRow {
    pub name: String,
    pub spotify_url: Option<String>,
}

/// One band's setlist as shown in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetlistCard {
    pub band: String,
    /// Label exactly as the function returned it.
    pub setlist_type: String,
    pub kind: SetlistKind,
    pub setlist_date: Option<String>,
    /// Age as the function sent it; present whenever the field is not null.
    pub last_setlist_age_days: Option<String>,
    pub songs: Vec<SongRow>,
    pub missing_songs: Vec<String>,
}

impl SetlistCard {
    fn from_value(entry: &Value) -> Self {
        let setlist_type = entry.get("setlist_type").map(value_text).unwrap_or_default();

        let songs = array_field(entry, "songs")
            .iter()
            .map(|song| SongRow {
                name: song.get("name").map(value_text).unwrap_or_default(),
                spotify_url: song
                    .get("spotify_url")
                    .filter(|url| is_truthy(url))
                    .map(value_text),
            })
            .collect();

        Self {
            band: entry.get("band").map(value_text).unwrap_or_default(),
            kind: SetlistKind::from_label(&setlist_type),
            setlist_type,
            setlist_date: entry
                .get("setlist_date")
                .filter(|date| is_truthy(date))
                .map(value_text),
            last_setlist_age_days: entry
                .get("last_setlist_age_days")
                .filter(|age| !age.is_null())
                .map(value_text),
            songs,
            missing_songs: array_field(entry, "missing_songs")
                .iter()
                .map(value_text)
                .collect(),
        }
    }

    /// Summary chips: date, age (zero included), missing count.
    pub fn chips(&self) -> Vec<String> {
        let mut chips = Vec::new();
        if let Some(date) = &self.setlist_date {
            chips.push(format!("Date {}", date));
        }
        if let Some(age) = &self.last_setlist_age_days {
            chips.push(format!("{} days old", age));
        }
        if !self.missing_songs.is_empty() {
            chips.push(format!("{} missing", self.missing_songs.len()));
        }
        chips
    }
}

/// Build the setlist cards of a response.
///
/// Reads the inner body when it is truthy, else the outer one. An empty
/// result means the caller should show its "no results" placeholder.
pub fn summarize(envelope: &ResponseEnvelope) -> Vec<SetlistCard> {
    let source: &Body = if envelope.inner.is_truthy() {
        &envelope.inner
    } else {
        &envelope.body
    };

    match source.pointer(&["setlists"]) {
        Some(Value::Array(entries)) => entries.iter().map(SetlistCard::from_value).collect(),
        _ => Vec::new(),
    }
}

fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
