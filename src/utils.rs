use url::Url;

/// Create a normalized version of the URL (e.g., removing fragments)
pub fn normalize_url(url: &Url) -> Url {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    normalized
}

/// True when both URLs point at the same page, ignoring fragments
pub fn same_page(a: &Url, b: &Url) -> bool {
    normalize_url(a) == normalize_url(b)
}

/// Convert a snapshot label to a sanitized filename
pub fn sanitize_filename(label: &str) -> String {
    let name: String = label
        .replace("http://", "")
        .replace("https://", "")
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '?' | '&' | '=' | '#' | '%' | '*' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect();

    // Limit filename length
    name.chars().take(100).collect()
}
