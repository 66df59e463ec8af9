//! HTML rendering for the service's pages
//!
//! Pages are built with plain string builders. Every piece of interpolated
//! user or upstream text goes through [`escape`] first.

use axum::http::StatusCode;

use crate::models::PlaceReport;

/// Escape text for interpolation into HTML body or attribute positions
#[must_use]
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Landing page with the address lookup form
#[must_use]
pub fn index_page() -> String {
    r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Placecard</title>
</head>
<body>
  <h1>Placecard</h1>
  <p>Enter a street address to see its weather, nearby photos, and map imagery.</p>
  <form onsubmit="location.href = '/describe/' + encodeURIComponent(this.address.value); return false;">
    <input name="address" size="40" placeholder="1600 Amphitheatre Parkway">
    <button type="submit">Describe</button>
  </form>
</body>
</html>
"#
    .to_string()
}

/// Result page for one described address
#[must_use]
pub fn place_page(report: &PlaceReport) -> String {
    let title = escape(&report.address);
    let photos = serde_json::to_string_pretty(&report.photos)
        .unwrap_or_else(|_| "{}".to_string());

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title}</title>
</head>
<body>
  <h1>{title}</h1>
  <p>Latitude: {lat} &middot; Longitude: {lon}</p>
  <p>{weather}</p>
  <img src="{map}" alt="Static map" width="600" height="300">
  <img src="{street}" alt="Street view" width="400" height="400">
  <h2>Nearby photos</h2>
  <pre>{photos}</pre>
  <p><a href="/">Look up another address</a></p>
</body>
</html>
"#,
        title = title,
        lat = report.coordinate.latitude,
        lon = report.coordinate.longitude,
        weather = escape(&report.weather),
        map = escape(&report.static_map_url),
        street = escape(&report.street_view_url),
        photos = escape(&photos),
    )
}

/// Error page shown for any failed request
#[must_use]
pub fn error_page(status: StatusCode, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{status}</title>
</head>
<body>
  <h1>{status}</h1>
  <p>{message}</p>
  <p><a href="/">Back to lookup</a></p>
</body>
</html>
"#,
        status = status,
        message = escape(message),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;
    use rstest::rstest;

    #[rstest]
    #[case("plain text", "plain text")]
    #[case("<script>", "&lt;script&gt;")]
    #[case("fish & chips", "fish &amp; chips")]
    #[case(r#"say "hi""#, "say &quot;hi&quot;")]
    fn test_escape(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape(input), expected);
    }

    #[test]
    fn test_index_page_links_describe_route() {
        let page = index_page();
        assert!(page.contains("/describe/"));
        assert!(page.contains("<form"));
    }

    #[test]
    fn test_place_page_renders_report() {
        let report = PlaceReport {
            address: "Main Street".to_string(),
            coordinate: Coordinate::new(37.4224, -122.0856),
            weather: "Temperature: 21.5 Celsius. Forecast: Clear".to_string(),
            photos: serde_json::json!({"data": [{"id": "1"}]}),
            static_map_url: "/static/k/map.jpg?v=1".to_string(),
            street_view_url: "/static/k/street.jpg?v=1".to_string(),
        };

        let page = place_page(&report);
        assert!(page.contains("<h1>Main Street</h1>"));
        assert!(page.contains("Latitude: 37.4224"));
        assert!(page.contains("Longitude: -122.0856"));
        assert!(page.contains("Temperature: 21.5 Celsius. Forecast: Clear"));
        assert!(page.contains(r#"src="/static/k/map.jpg?v=1""#));
        assert!(page.contains(r#"src="/static/k/street.jpg?v=1""#));
        assert!(page.contains("Nearby photos"));
    }

    #[test]
    fn test_place_page_escapes_address() {
        let report = PlaceReport {
            address: "<b>bold</b> lane".to_string(),
            coordinate: Coordinate::new(0.0, 0.0),
            weather: String::new(),
            photos: serde_json::Value::Null,
            static_map_url: String::new(),
            street_view_url: String::new(),
        };

        let page = place_page(&report);
        assert!(!page.contains("<b>bold</b>"));
        assert!(page.contains("&lt;b&gt;bold&lt;/b&gt; lane"));
    }

    #[test]
    fn test_error_page_shows_status_and_message() {
        let page = error_page(StatusCode::NOT_FOUND, "No results for 'atlantis'.");
        assert!(page.contains("404 Not Found"));
        assert!(page.contains("No results for &#39;atlantis&#39;."));
    }
}
