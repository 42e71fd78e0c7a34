//! Form values and the request payload built from them.

use serde::{Deserialize, Serialize, Serializer};

/// Fallback for `copy_last_setlist_threshold`.
pub const DEFAULT_COPY_LAST_SETLIST_THRESHOLD: f64 = 15.0;
/// Fallback for `max_setlist_length`.
pub const DEFAULT_MAX_SETLIST_LENGTH: f64 = 12.0;
/// Fallback for `rate_limit` (requests per second against the setlist source).
pub const DEFAULT_RATE_LIMIT: f64 = 1.0;

/// Raw contents of the request form, exactly as typed.
///
/// Numeric fields stay strings here; they are coerced when the payload is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub band_names: String,
    pub playlist_name: String,
    pub copy_last_setlist_threshold: String,
    pub max_setlist_length: String,
    pub rate_limit: String,
    pub no_cache: bool,
    pub force_smart_setlist: bool,
    pub use_fuzzy_search: bool,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            band_names: String::new(),
            playlist_name: String::new(),
            copy_last_setlist_threshold: "15".to_string(),
            max_setlist_length: "12".to_string(),
            rate_limit: "1".to_string(),
            no_cache: false,
            force_smart_setlist: false,
            use_fuzzy_search: false,
        }
    }
}

impl FormValues {
    /// Apply the "fill example" preset on top of the current values.
    ///
    /// `force_smart_setlist` and `use_fuzzy_search` keep whatever they were.
    pub fn example(mut self) -> Self {
        self.band_names = "Band A\nBand B\nArtist C".to_string();
        self.playlist_name = "Rehearsal Mix".to_string();
        self.copy_last_setlist_threshold = "10".to_string();
        self.max_setlist_length = "12".to_string();
        self.rate_limit = "0.5".to_string();
        self.no_cache = true;
        self
    }

    /// Whether a playlist name has been typed (ignoring whitespace).
    pub fn wants_playlist_creation(&self) -> bool {
        !self.playlist_name.trim().is_empty()
    }
}

/// A numeric payload field.
///
/// Integral values go on the wire as JSON integers, everything else as floats,
/// so `15` stays `15` rather than `15.0`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct FormNumber(pub f64);

impl FormNumber {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Serialize for FormNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
        if self.0.fract() == 0.0 && self.0.abs() < MAX_EXACT {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

/// The JSON body sent to the playlist function.
///
/// Built once per submission and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPayload {
    pub band_names: Vec<String>,
    pub playlist_name: Option<String>,
    pub copy_last_setlist_threshold: FormNumber,
    pub max_setlist_length: FormNumber,
    pub no_cache: bool,
    pub rate_limit: FormNumber,
    pub create_playlist: bool,
    pub force_smart_setlist: bool,
    pub use_fuzzy_search: bool,
}

impl RequestPayload {
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Split the band field on newlines or commas, trimming and dropping blanks.
pub fn parse_bands(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == '\n' || c == ',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Coerce a numeric field, falling back to `default` when the text is empty,
/// unparsable, non-finite or zero.
///
/// Only decimal notation is accepted: radix literals such as `0x10` or `0b11`
/// count as unparsable and take the default.
pub fn parse_number(value: &str, default: f64) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n != 0.0 => n,
        _ => default,
    }
}

/// Build the payload for the current form.
///
/// Without a token the playlist field is disabled, so it never contributes a
/// name and `create_playlist` stays false.
pub fn build_payload(form: &FormValues, token_present: bool) -> RequestPayload {
    let playlist_name = if token_present {
        Some(form.playlist_name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    } else {
        None
    };
    let create_playlist = playlist_name.is_some();

    RequestPayload {
        band_names: parse_bands(&form.band_names),
        playlist_name,
        copy_last_setlist_threshold: FormNumber(parse_number(
            &form.copy_last_setlist_threshold,
            DEFAULT_COPY_LAST_SETLIST_THRESHOLD,
        )),
        max_setlist_length: FormNumber(parse_number(
            &form.max_setlist_length,
            DEFAULT_MAX_SETLIST_LENGTH,
        )),
        no_cache: form.no_cache,
        rate_limit: FormNumber(parse_number(&form.rate_limit, DEFAULT_RATE_LIMIT)),
        create_playlist,
        force_smart_setlist: form.force_smart_setlist,
        use_fuzzy_search: form.use_fuzzy_search,
    }
}

/// Label of the submit control for the current form.
pub fn submit_label(form: &FormValues) -> &'static str {
    if form.wants_playlist_creation() {
        "Create Spotify Playlist"
    } else {
        "Preview setlists + links"
    }
}

/// Hint shown under the playlist field.
pub fn playlist_hint(token_present: bool, wants_creation: bool) -> &'static str {
    match (token_present, wants_creation) {
        (false, _) => "Add a bearer token to enable playlist creation",
        (true, true) => "Playlist will be created",
        (true, false) => "Leave empty to preview only",
    }
}
