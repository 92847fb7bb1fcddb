//! HTTP span helpers.

use uuid::Uuid;

#[derive(Debug, Clone)]
pub(super) struct RequestSpanName {
    pub(super) otel_path: String,
    pub(super) otel_span_name: String,
}

pub(super) fn request_span_name(method: &str, path: &str) -> RequestSpanName {
    let otel_path = normalise_path_for_span_name(path);
    let otel_span_name = format!("{method} {otel_path}");

    RequestSpanName {
        otel_path,
        otel_span_name,
    }
}

/// Collapses identifiers so every product, order or cart line shares one route label.
fn normalise_path_for_span_name(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    let mut normalised = String::new();

    for (index, segment) in segments.iter().enumerate() {
        normalised.push('/');

        let previous = index.checked_sub(1).and_then(|at| segments.get(at));

        if Uuid::parse_str(segment).is_ok() {
            normalised.push_str("{uuid}");
        } else if previous == Some(&"products") && !segment.is_empty() {
            normalised.push_str("{slug}");
        } else {
            normalised.push_str(segment);
        }
    }

    normalised
}
