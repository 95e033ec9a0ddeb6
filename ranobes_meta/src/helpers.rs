use scraper::ElementRef;

const SECONDS_PER_HOUR: u64 = 3600;

/// All text below `el` with every fragment trimmed, concatenated.
pub fn stripped_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).collect()
}

/// All non-blank text fragments below `el`, trimmed, one per line.
pub fn text_lines(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// First non-blank text node directly under `el`, trimmed.
pub fn first_text_node(el: ElementRef<'_>) -> Option<String> {
    el.children()
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .find(|text| !text.is_empty())
        .map(str::to_owned)
}

pub fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

/// `"'cover.jpg'"` -> `cover.jpg`
pub fn strip_quotes(token: &str) -> &str {
    token.trim().trim_matches(|c| c == '\'' || c == '"').trim()
}

pub fn hours_to_seconds(hours: &str) -> Option<u64> {
    hours.parse::<u64>().ok()?.checked_mul(SECONDS_PER_HOUR)
}
