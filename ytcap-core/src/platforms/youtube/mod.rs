use std::sync::LazyLock;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::USER_AGENT;
use serde::Deserialize;

use crate::models::captions::CaptionSegment;
use crate::platforms::traits::{CaptionProvider, MetadataProvider};

const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

// Without a browser UA the watch page serves a consent shell with no player
// response in it.
const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

static PLAYER_RESPONSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"var ytInitialPlayerResponse\s*=\s*(\{.+?\});").unwrap());

/// Title lookup through the public oEmbed endpoint. No API key required.
pub struct YouTubeOembed {
    client: reqwest::Client,
    base_url: String,
}

impl YouTubeOembed {
    pub fn new() -> Self {
        Self::with_base_url(YOUTUBE_BASE_URL)
    }

    /// Base URL override, used to point the provider at a local test server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for YouTubeOembed {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct OembedResponse {
    title: String,
}

#[async_trait]
impl MetadataProvider for YouTubeOembed {
    async fn fetch_title(&self, url: &str) -> anyhow::Result<String> {
        let endpoint = format!("{}/oembed", self.base_url);
        let response = self
            .client
            .get(&endpoint)
            .query(&[("url", url), ("format", "json")])
            .send()
            .await
            .context("oembed request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                400 | 404 => anyhow!("video does not exist or is unavailable"),
                401 | 403 => anyhow!("video is private"),
                code => anyhow!("metadata service returned HTTP {code}"),
            });
        }

        let body: OembedResponse = response.json().await.context("parsing oembed response")?;
        Ok(body.title)
    }
}

/// Caption lookup via the watch page player response, the same route a
/// browser takes: find the caption track list in `ytInitialPlayerResponse`,
/// then pull the chosen track as json3.
pub struct YouTubeCaptions {
    client: reqwest::Client,
    base_url: String,
}

impl YouTubeCaptions {
    pub fn new() -> Self {
        Self::with_base_url(YOUTUBE_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for YouTubeCaptions {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct PlayerResponse {
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct Captions {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    renderer: TracklistRenderer,
}

#[derive(Debug, Default, Deserialize)]
struct TracklistRenderer {
    #[serde(default, rename = "captionTracks")]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    #[serde(default)]
    events: Vec<TranscriptEvent>,
}

#[derive(Debug, Deserialize)]
struct TranscriptEvent {
    segs: Option<Vec<TranscriptSeg>>,
}

#[derive(Debug, Deserialize)]
struct TranscriptSeg {
    utf8: String,
}

fn extract_player_response(html: &str) -> anyhow::Result<PlayerResponse> {
    let captures = PLAYER_RESPONSE_RE
        .captures(html)
        .ok_or_else(|| anyhow!("no player response in watch page"))?;
    serde_json::from_str(&captures[1]).context("parsing player response")
}

fn pick_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.language_code.starts_with("en"))
        .or_else(|| tracks.first())
}

fn events_to_segments(events: Vec<TranscriptEvent>) -> Vec<CaptionSegment> {
    let mut segments = Vec::new();
    for event in events {
        let Some(segs) = event.segs else { continue };
        let text: String = segs.into_iter().map(|s| s.utf8).collect();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        segments.push(CaptionSegment::new(text));
    }
    segments
}

#[async_trait]
impl CaptionProvider for YouTubeCaptions {
    async fn fetch_captions(&self, video_id: &str) -> anyhow::Result<Vec<CaptionSegment>> {
        let watch_url = format!("{}/watch?v={video_id}", self.base_url);
        let html = self
            .client
            .get(&watch_url)
            .header(USER_AGENT, DESKTOP_UA)
            .send()
            .await
            .context("watch page request failed")?
            .error_for_status()
            .context("watch page request failed")?
            .text()
            .await
            .context("reading watch page")?;

        let player = extract_player_response(&html)?;
        let tracks = player
            .captions
            .map(|c| c.renderer.caption_tracks)
            .unwrap_or_default();
        let track = pick_track(&tracks)
            .ok_or_else(|| anyhow!("captions are disabled or unavailable for this video"))?;

        let transcript_url = format!("{}&fmt=json3", track.base_url);
        let transcript: TranscriptResponse = self
            .client
            .get(&transcript_url)
            .header(USER_AGENT, DESKTOP_UA)
            .send()
            .await
            .context("transcript request failed")?
            .error_for_status()
            .context("transcript request failed")?
            .json()
            .await
            .context("parsing transcript")?;

        Ok(events_to_segments(transcript.events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn watch_page(player_response: &str) -> String {
        format!(
            "<!DOCTYPE html><html><head><script>var ytInitialPlayerResponse = {player_response};</script></head><body></body></html>"
        )
    }

    #[test]
    fn player_response_is_extracted_from_surrounding_markup() {
        let html = watch_page(r#"{"captions": null}"#);
        let player = extract_player_response(&html).unwrap();
        assert!(player.captions.is_none());
    }

    #[test]
    fn missing_player_response_is_an_error() {
        assert!(extract_player_response("<html>consent wall</html>").is_err());
    }

    #[test]
    fn english_track_is_preferred_over_earlier_tracks() {
        let tracks = vec![
            CaptionTrack {
                base_url: "https://x/t1?lang=de".into(),
                language_code: "de".into(),
            },
            CaptionTrack {
                base_url: "https://x/t2?lang=en-US".into(),
                language_code: "en-US".into(),
            },
        ];
        assert_eq!(pick_track(&tracks).unwrap().language_code, "en-US");
    }

    #[test]
    fn first_track_is_the_fallback() {
        let tracks = vec![
            CaptionTrack {
                base_url: "https://x/t1?lang=de".into(),
                language_code: "de".into(),
            },
            CaptionTrack {
                base_url: "https://x/t2?lang=fr".into(),
                language_code: "fr".into(),
            },
        ];
        assert_eq!(pick_track(&tracks).unwrap().language_code, "de");
        assert!(pick_track(&[]).is_none());
    }

    #[test]
    fn events_without_segs_and_blank_cues_are_dropped() {
        let transcript: TranscriptResponse = serde_json::from_str(
            r#"{"events": [
                {"tStartMs": 0},
                {"tStartMs": 10, "segs": [{"utf8": "\n"}]},
                {"tStartMs": 20, "segs": [{"utf8": "hello "}, {"utf8": "world"}]}
            ]}"#,
        )
        .unwrap();
        let segments = events_to_segments(transcript.events);
        assert_eq!(segments, vec![CaptionSegment::new("hello world")]);
    }

    #[tokio::test]
    async fn oembed_returns_the_title() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oembed"))
            .and(query_param("format", "json"))
            .and(query_param("url", "https://youtu.be/abc123"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"title": "A Real Title", "author_name": "someone"})),
            )
            .mount(&server)
            .await;

        let provider = YouTubeOembed::with_base_url(server.uri());
        let title = provider.fetch_title("https://youtu.be/abc123").await.unwrap();
        assert_eq!(title, "A Real Title");
    }

    #[tokio::test]
    async fn oembed_not_found_maps_to_a_descriptive_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oembed"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let provider = YouTubeOembed::with_base_url(server.uri());
        let err = provider
            .fetch_title("https://youtu.be/gone")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[tokio::test]
    async fn captions_flow_from_watch_page_to_transcript() {
        let server = MockServer::start().await;
        let player = format!(
            r#"{{"captions": {{"playerCaptionsTracklistRenderer": {{"captionTracks": [
                {{"baseUrl": "{0}/api/timedtext?v=abc123&lang=en", "languageCode": "en"}}
            ]}}}}}}"#,
            server.uri()
        );
        Mock::given(method("GET"))
            .and(path("/watch"))
            .and(query_param("v", "abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_string(watch_page(&player)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/timedtext"))
            .and(query_param("fmt", "json3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "events": [
                    {"tStartMs": 0, "segs": [{"utf8": "first cue"}]},
                    {"tStartMs": 1000, "segs": [{"utf8": "second cue"}]}
                ]
            })))
            .mount(&server)
            .await;

        let provider = YouTubeCaptions::with_base_url(server.uri());
        let segments = provider.fetch_captions("abc123").await.unwrap();
        assert_eq!(
            segments,
            vec![
                CaptionSegment::new("first cue"),
                CaptionSegment::new("second cue"),
            ]
        );
    }

    #[tokio::test]
    async fn captionless_video_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/watch"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(watch_page(r#"{"captions": null}"#)),
            )
            .mount(&server)
            .await;

        let provider = YouTubeCaptions::with_base_url(server.uri());
        let err = provider.fetch_captions("abc123").await.unwrap_err();
        assert!(err.to_string().contains("disabled or unavailable"));
    }
}
