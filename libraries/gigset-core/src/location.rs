//! Share links: token capture and host checks.

use url::Url;

/// Query parameters that may carry a bearer token, in lookup order.
pub const TOKEN_PARAMS: [&str; 2] = ["token", "bearer"];

/// A token taken from a link, plus the link with the secret removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedToken {
    pub token: String,
    pub cleaned: Url,
}

/// Take the token out of a share link.
///
/// `token` wins over `bearer`; empty values don't count. Both parameters are
/// stripped from the cleaned link, other parameters and the fragment are kept.
pub fn capture_token(location: &Url) -> Option<CapturedToken> {
    let token = TOKEN_PARAMS.iter().find_map(|param| {
        location
            .query_pairs()
            .find(|(key, value)| key == param && !value.is_empty())
            .map(|(_, value)| value.into_owned())
    })?;

    Some(CapturedToken {
        token,
        cleaned: strip_token_params(location),
    })
}

/// Copy of `location` without the token parameters.
pub fn strip_token_params(location: &Url) -> Url {
    let kept: Vec<(String, String)> = location
        .query_pairs()
        .filter(|(key, _)| !TOKEN_PARAMS.iter().any(|param| key == param))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut cleaned = location.clone();
    if kept.is_empty() {
        cleaned.set_query(None);
    } else {
        cleaned.query_pairs_mut().clear().extend_pairs(kept);
    }
    cleaned
}

/// Whether the link points at this machine.
pub fn is_loopback_host(location: &Url) -> bool {
    matches!(location.host_str(), Some("localhost" | "127.0.0.1"))
}
