use serde::Serialize;

/// Uniform response body: `{ success, data?, error?, message? }`.
/// Absent fields are omitted from the JSON entirely.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn data_with_message(data: T, message: &str) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
            message: Some(message.to_string()),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: &str) -> Self {
        ApiResponse {
            success: true,
            data: None,
            error: None,
            message: Some(message.to_string()),
        }
    }

    pub fn error(error: &str) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error.to_string()),
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_envelope_omits_error_fields() {
        let body = serde_json::to_value(ApiResponse::data(vec![1, 2, 3])).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], serde_json::json!([1, 2, 3]));
        assert!(body.get("error").is_none());
        assert!(body.get("message").is_none());
    }

    #[test]
    fn error_envelope_carries_only_the_error() {
        let body = serde_json::to_value(ApiResponse::error("Not found")).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Not found");
        assert!(body.get("data").is_none());
    }

    #[test]
    fn message_envelope() {
        let body = serde_json::to_value(ApiResponse::message("Twinkle API is running")).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Twinkle API is running");
    }
}
