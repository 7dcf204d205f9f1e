use chrono::{DateTime, Utc};

/// Used when the API base URL is blank.
const DEFAULT_ORIGIN: &str = "http://localhost:8080";

/// Absolute URL for an uploaded media file.
///
/// Absolute URLs are returned unchanged. Bare file names are served from
/// `<origin>/uploads/`, where the origin is the API base URL without its
/// trailing `/api/v1`.
pub fn resolve_media_url(api_base: &str, url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    if url.starts_with("http") {
        return Some(url.to_string());
    }

    let base = api_base.trim().trim_end_matches('/');
    let origin = base
        .strip_suffix("/api/v1")
        .unwrap_or(base)
        .trim_end_matches('/');
    let origin = if origin.is_empty() { DEFAULT_ORIGIN } else { origin };
    Some(format!("{}/uploads/{}", origin, url.trim_start_matches('/')))
}

/// Whole rupiah with `.` thousands separators: `Rp 1.500.000`.
pub fn format_rupiah(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

/// Truncate to `max_len` characters, adding an ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// e.g. `01 Apr 2026 19:30`
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%d %b %Y %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_resolve_media_url() {
        let base = "https://api.madr.id/api/v1/";
        assert_eq!(
            resolve_media_url(base, "https://cdn.example.org/a.png").as_deref(),
            Some("https://cdn.example.org/a.png")
        );
        assert_eq!(
            resolve_media_url(base, "a1b2.png").as_deref(),
            Some("https://api.madr.id/uploads/a1b2.png")
        );
        assert_eq!(
            resolve_media_url("", "a1b2.png").as_deref(),
            Some("http://localhost:8080/uploads/a1b2.png")
        );
        assert_eq!(
            resolve_media_url("http://localhost:9000", "x.jpg").as_deref(),
            Some("http://localhost:9000/uploads/x.jpg")
        );
        assert_eq!(resolve_media_url(base, "  "), None);
    }

    #[test]
    fn test_format_rupiah() {
        assert_eq!(format_rupiah(0.0), "Rp 0");
        assert_eq!(format_rupiah(950.0), "Rp 950");
        assert_eq!(format_rupiah(1000.0), "Rp 1.000");
        assert_eq!(format_rupiah(1_500_000.0), "Rp 1.500.000");
        assert_eq!(format_rupiah(123_456.6), "Rp 123.457");
        assert_eq!(format_rupiah(-25_000.0), "-Rp 25.000");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Kajian", 10), "Kajian");
        assert_eq!(truncate("Kajian Subuh Ahad", 10), "Kajian ...");
        assert_eq!(truncate("Hi", 2), "Hi");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2026, 4, 1, 19, 30, 0).unwrap();
        assert_eq!(format_date(&date), "01 Apr 2026 19:30");
    }
}
