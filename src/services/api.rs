//! API request and response types for the web facade.

use serde::{Deserialize, Serialize};

/// API response wrapper for consistent JSON structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data (present when success=true).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present when success=false).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Outcome of a remote dispense or calibrate request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// `"completed"` or `"ignored"`.
    pub result: String,
    /// Name of the action that ran, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Final motor position, for commands that report one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

impl CommandResponse {
    /// A completed action.
    pub fn completed(action: impl Into<String>) -> Self {
        Self {
            result: "completed".into(),
            action: Some(action.into()),
            position: None,
        }
    }

    /// A trigger with no bound action.
    pub fn ignored() -> Self {
        Self {
            result: "ignored".into(),
            action: None,
            position: None,
        }
    }

    /// Attach a final motor position.
    pub fn with_position(mut self, position: i32) -> Self {
        self.position = Some(position);
        self
    }
}

/// Pass-through motor position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionResponse {
    /// Motor port letter.
    pub port: String,
    /// Encoder position in degrees.
    pub position: i32,
}

/// Pass-through positional move request.
///
/// `direction` is accepted for wire compatibility with older clients
/// (`"shortest"`/`"s"`, `"clockwise"`/`"c"`, `"anticlockwise"`/`"a"`)
/// but the move itself targets the encoder position directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Target speed (-100 to 100).
    pub speed: i32,
    /// Target position in degrees.
    pub position: i32,
    /// Requested travel way.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_response_ok_shape() {
        let resp = ApiResponse::ok(CommandResponse::completed("dispense-tower"));
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("dispense-tower"));
        assert!(!json.contains("error"));
    }

    #[test]
    fn api_response_err_shape() {
        let resp: ApiResponse<CommandResponse> = ApiResponse::err("motor on port A is busy");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("busy"));
        assert!(!json.contains("data"));
    }

    #[test]
    fn command_response_position_is_optional() {
        let without = serde_json::to_string(&CommandResponse::completed("x")).unwrap();
        assert!(!without.contains("position"));

        let with = serde_json::to_string(&CommandResponse::completed("x").with_position(-180)).unwrap();
        assert!(with.contains("-180"));
    }

    #[test]
    fn move_request_parses_without_direction() {
        let req: MoveRequest = serde_json::from_str(r#"{"speed":30,"position":120}"#).unwrap();
        assert_eq!(req.speed, 30);
        assert_eq!(req.position, 120);
        assert!(req.direction.is_none());
    }
}
