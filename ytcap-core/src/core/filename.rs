fn clean(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.'))
        .collect()
}

/// Builds the on-disk filename for a caption blob: `"{title} - {id}"`
/// filtered to a filesystem-safe charset, trailing whitespace stripped,
/// `.txt` appended. A title that filtering reduces to nothing falls back to
/// the id alone as the stem so the name never degenerates to a bare `.txt`.
pub fn caption_filename(title: &str, video_id: &str) -> String {
    let mut name = if clean(title).trim().is_empty() {
        clean(video_id)
    } else {
        clean(&format!("{title} - {video_id}"))
    };
    name.truncate(name.trim_end().len());

    if !name.to_lowercase().ends_with(".txt") {
        name.push_str(".txt");
    }
    name
}
