//! Query string helpers.

use std::str::FromStr;

use salvo::prelude::StatusError;

/// Parses an optional query value. Blank counts as absent; anything else that fails to parse is a 400.
pub(crate) fn parse_optional_query<T: FromStr>(
    name: &str,
    raw: Option<String>,
) -> Result<Option<T>, StatusError> {
    raw.filter(|value| !value.trim().is_empty())
        .map(|value| {
            value.trim().parse::<T>().map_err(|_ignored| {
                StatusError::bad_request().brief(format!("Invalid {name}: {value}"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn absent_and_blank_values_are_none() {
        assert!(matches!(parse_optional_query::<u32>("limit", None), Ok(None)));
        assert!(matches!(
            parse_optional_query::<u32>("limit", Some("  ".to_string())),
            Ok(None)
        ));
    }

    #[test]
    fn numbers_parse() {
        assert!(matches!(
            parse_optional_query::<u32>("page", Some("3".to_string())),
            Ok(Some(3))
        ));
    }

    #[test]
    fn garbage_is_a_bad_request() {
        let error = parse_optional_query::<u32>("limit", Some("lots".to_string()));

        assert!(
            matches!(&error, Err(status) if status.code == StatusCode::BAD_REQUEST),
            "expected 400, got {error:?}"
        );
    }

    #[test]
    fn negative_numbers_are_a_bad_request() {
        assert!(parse_optional_query::<u32>("page", Some("-1".to_string())).is_err());
    }
}
