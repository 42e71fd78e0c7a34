//! Plain-text rendering of a form session.

use gigset_core::{
    LinkSlot, PreparedRequest, Session, SetlistCard, SetlistKind, StatusTone, SummaryPane,
};

/// Render the status line, link slot and summary pane.
///
/// With `raw` the pretty-printed response is appended as well.
pub fn render_session(session: &Session, raw: bool) -> String {
    let marker = match session.status.tone {
        StatusTone::Ok => "ok",
        StatusTone::Error => "error",
    };
    let mut out = format!("[{}] {}\n", marker, session.status.text);

    match &session.link_slot {
        LinkSlot::Open(url) => out.push_str(&format!("Open playlist ↗ {}\n", url)),
        LinkSlot::PreviewNotice => {
            out.push_str("Preview mode  No playlist created (follow links below)\n");
        }
        LinkSlot::Empty => {}
    }

    match &session.summary {
        SummaryPane::Placeholder(text) => out.push_str(&format!("{}\n", text)),
        SummaryPane::Cards(cards) => {
            for card in cards {
                out.push('\n');
                out.push_str(&render_card(card));
            }
        }
        SummaryPane::Cleared => {}
    }

    if raw && !session.response_preview.is_empty() {
        out.push_str(&format!("\n{}\n", session.response_preview));
    }

    out
}

/// One card: a fresh/estimated marker, the band and its setlist label, songs, chips.
fn render_card(card: &SetlistCard) -> String {
    let marker = match card.kind {
        SetlistKind::Fresh => '●',
        SetlistKind::Estimated => '○',
    };
    let mut out = format!("{} {} [{}]\n", marker, card.band, card.setlist_type);

    for song in &card.songs {
        let line = match &song.spotify_url {
            Some(url) => format!("  {}  Spotify ↗ {}\n", song.name, url),
            None => format!("  {}  Not found\n", song.name),
        };
        out.push_str(&line);
    }

    let chips = card.chips();
    if !chips.is_empty() {
        out.push_str(&format!("  {}\n", chips.join(" · ")));
    }
    out
}

/// Describe a request without sending it. Credentials are masked.
pub fn render_request_preview(request: &PreparedRequest) -> String {
    let mut out = format!("POST {} ({:?})\n", request.url, request.mode);
    for (name, value) in request.redacted_headers() {
        out.push_str(&format!("{}: {}\n", name, value));
    }

    let body = serde_json::from_str::<serde_json::Value>(&request.body)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| request.body.clone());
    out.push_str(&format!("\n{}\n", body));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gigset_core::{
        build_payload, build_request, reduce, Event, FormValues, ResponseEnvelope, SongRow,
    };

    fn card() -> SetlistCard {
        SetlistCard {
            band: "Opeth".to_string(),
            setlist_type: "fresh".to_string(),
            kind: SetlistKind::Fresh,
            setlist_date: Some("01-06-2024".to_string()),
            last_setlist_age_days: Some("0".to_string()),
            songs: vec![
                SongRow {
                    name: "Ghost of Perdition".to_string(),
                    spotify_url: Some("https://open.spotify.com/track/1".to_string()),
                },
                SongRow {
                    name: "Demon of the Fall".to_string(),
                    spotify_url: None,
                },
            ],
            missing_songs: vec!["Demon of the Fall".to_string()],
        }
    }

    #[test]
    fn test_render_cards() {
        let mut session = Session::new("https://fn.example.com/");
        session.link_slot = LinkSlot::Open("https://open.spotify.com/playlist/p".to_string());
        session.summary = SummaryPane::Cards(vec![card()]);

        let text = render_session(&session, false);
        assert!(text.starts_with("[ok] Ready\n"));
        assert!(text.contains("Open playlist ↗ https://open.spotify.com/playlist/p"));
        assert!(text.contains("● Opeth [fresh]\n"));
        assert!(text.contains("Ghost of Perdition  Spotify ↗ https://open.spotify.com/track/1"));
        assert!(text.contains("Demon of the Fall  Not found"));
        assert!(text.contains("Date 01-06-2024 · 0 days old · 1 missing"));
    }

    #[test]
    fn test_card_label_is_the_setlist_type() {
        let mut session = Session::new("https://fn.example.com/");
        reduce(
            &mut session,
            Event::ResponseReceived(ResponseEnvelope::from_text(
                200,
                r#"{"setlists":[{"band":"Tool","setlist_type":"smart","songs":[]}]}"#,
            )),
        );

        let text = render_session(&session, false);
        assert!(text.contains("○ Tool [smart]\n"));
        assert!(!text.contains("[estimated]"));
    }

    #[test]
    fn test_render_error_response() {
        let mut session = Session::new("https://fn.example.com/");
        reduce(
            &mut session,
            Event::ResponseReceived(ResponseEnvelope::from_text(500, r#"{"error":"boom"}"#)),
        );

        let text = render_session(&session, true);
        assert!(text.starts_with("[error] Lambda returned an error\n"));
        assert!(text.contains("Preview mode"));
        assert!(text.contains("No results yet."));
        assert!(text.contains("\"status\": 500"));
        assert!(!render_session(&session, false).contains("\"status\""));
    }

    #[test]
    fn test_request_preview_masks_token() {
        let form = FormValues {
            band_names: "Opeth".to_string(),
            ..FormValues::default()
        };
        let payload = build_payload(&form, true);
        let request =
            build_request("https://fn.example.com/", &payload, Some("Bearer secret"), false)
                .unwrap();

        let text = render_request_preview(&request);
        assert!(text.starts_with("POST https://fn.example.com/ (Direct)"));
        assert!(text.contains("Authorization: Bearer ***"));
        assert!(!text.contains("secret"));
        assert!(text.contains("\"band_names\""));
    }
}
