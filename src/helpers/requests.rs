use actix_web::HttpRequest;
use serde::{Deserialize, Deserializer};
use validator::ValidationErrors;

use crate::errors::ApiError;

/// Best-effort caller IP from proxy headers, "unknown" when none present.
pub fn client_ip(req: &HttpRequest) -> String {
    for header in ["x-forwarded-for", "x-real-ip"] {
        if let Some(value) = req.headers().get(header).and_then(|v| v.to_str().ok()) {
            if !value.is_empty() {
                return value.to_string();
            }
        }
    }

    String::from("unknown")
}

/// For PATCH bodies: an absent field deserializes to `None` (keep the stored
/// value), an explicit `null` to `Some(None)` (clear it). Use together with
/// `#[serde(default)]`.
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Surfaces the first human-readable message out of a validator failure.
pub fn validation_error(errors: &ValidationErrors) -> ApiError {
    let message = errors
        .field_errors()
        .values()
        .flat_map(|field_errors| field_errors.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| String::from("Invalid input"));

    ApiError::InvalidInput(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use validator::Validate;

    #[test]
    fn client_ip_prefers_forwarded_for() {
        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", "203.0.113.9"))
            .insert_header(("x-real-ip", "198.51.100.2"))
            .to_http_request();
        assert_eq!(client_ip(&req), "203.0.113.9");
    }

    #[test]
    fn client_ip_falls_back_to_real_ip() {
        let req = TestRequest::default()
            .insert_header(("x-real-ip", "198.51.100.2"))
            .to_http_request();
        assert_eq!(client_ip(&req), "198.51.100.2");
    }

    #[test]
    fn client_ip_defaults_to_unknown() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(client_ip(&req), "unknown");
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        description: Option<Option<String>>,
    }

    #[test]
    fn absent_null_and_value_are_distinguished() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.description, None);

        let null: Patch = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(null.description, Some(None));

        let set: Patch = serde_json::from_str(r#"{"description": "hi"}"#).unwrap();
        assert_eq!(set.description, Some(Some(String::from("hi"))));
    }

    #[derive(Validate)]
    struct Body {
        #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
        password: String,
    }

    #[test]
    fn validation_error_uses_the_field_message() {
        let body = Body {
            password: String::from("abc"),
        };
        let errors = body.validate().unwrap_err();
        let err = validation_error(&errors);
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
    }
}
