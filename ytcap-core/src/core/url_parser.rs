use url::Url;

/// Extracts the video id from the URL shapes YouTube hands out: short links,
/// watch pages, embeds, and the legacy `/v/` path. Returns `None` for
/// anything else, including unparseable input.
pub fn extract_video_id(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let segments: Vec<&str> = parsed
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    if host == "youtu.be" {
        return segments.first().map(|s| s.to_string());
    }

    if host == "youtube.com" || host == "www.youtube.com" {
        if parsed.path() == "/watch" {
            return parsed
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.to_string())
                .filter(|v| !v.is_empty());
        }
        if segments.first() == Some(&"embed") || segments.first() == Some(&"v") {
            return segments.get(1).map(|s| s.to_string());
        }
    }

    None
}
