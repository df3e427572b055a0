//! Relative → absolute URL normalization against the meeting site origin.

/// Whether `value` already carries an http(s) scheme.
pub fn is_absolute(value: &str) -> bool {
    let lower = value.get(..8).unwrap_or(value).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Make `value` absolute against `base`.
///
/// Empty values stay empty and absolute values are returned unchanged.
/// Relative values are joined with exactly one `/` between origin and path,
/// regardless of slashes on either side.
pub fn absolutize(base: &str, value: &str) -> String {
    if value.is_empty() || is_absolute(value) {
        return value.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        value.trim_start_matches('/')
    )
}

/// First non-empty candidate, made absolute.
pub fn prefer_absolute(base: &str, scraped: &str, api: &str) -> String {
    let chosen = if scraped.is_empty() { api } else { scraped };
    absolutize(base, chosen)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://phoenix.legistar.com";

    #[test]
    fn absolute_values_pass_through() {
        let url = "https://phoenix.legistar.com/View.ashx?M=A&ID=1";
        assert_eq!(absolutize(BASE, url), url);
        assert_eq!(absolutize(BASE, "HTTP://example.org/x"), "HTTP://example.org/x");
    }

    #[test]
    fn relative_values_get_one_separator() {
        let want = "https://phoenix.legistar.com/View.ashx?M=A";
        assert_eq!(absolutize(BASE, "View.ashx?M=A"), want);
        assert_eq!(absolutize(BASE, "/View.ashx?M=A"), want);
        assert_eq!(absolutize(BASE, "//View.ashx?M=A"), want);
        assert_eq!(absolutize("https://phoenix.legistar.com/", "/View.ashx?M=A"), want);
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(absolutize(BASE, ""), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = absolutize(BASE, "/LegislationDetail.aspx?ID=9");
        assert_eq!(absolutize(BASE, &once), once);
    }

    #[test]
    fn scraped_value_preferred_over_api() {
        assert_eq!(
            prefer_absolute(BASE, "/View.ashx?M=M", "https://legistar/minutes.pdf"),
            "https://phoenix.legistar.com/View.ashx?M=M"
        );
        assert_eq!(
            prefer_absolute(BASE, "", "https://legistar/minutes.pdf"),
            "https://legistar/minutes.pdf"
        );
        assert_eq!(prefer_absolute(BASE, "", ""), "");
    }
}
