// Output formatting for the fixtures binary

use std::io::IsTerminal;

// Colors for terminal output (when supported)
pub const RED: &str = "\x1b[0;31m";
pub const GREEN: &str = "\x1b[0;32m";
pub const YELLOW: &str = "\x1b[1;33m";
pub const BOLD: &str = "\x1b[1m";
pub const NC: &str = "\x1b[0m"; // No Color

/// Check if stdout is a terminal (for color output)
#[inline]
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Print info message
pub fn info(msg: &str) {
    let color = if is_terminal() { GREEN } else { "" };
    let reset = if is_terminal() { NC } else { "" };
    println!("{}[INFO]{} {}", color, reset, msg);
}

/// Print warning message
pub fn warn(msg: &str) {
    let color = if is_terminal() { YELLOW } else { "" };
    let reset = if is_terminal() { NC } else { "" };
    eprintln!("{}[WARN]{} {}", color, reset, msg);
}

/// Print error message
pub fn error(msg: &str) {
    let color = if is_terminal() { RED } else { "" };
    let reset = if is_terminal() { NC } else { "" };
    eprintln!("{}[ERROR]{} {}", color, reset, msg);
}

/// Print section header
pub fn header(msg: &str) {
    let bold = if is_terminal() { BOLD } else { "" };
    let reset = if is_terminal() { NC } else { "" };
    println!("{}===>{} {}", bold, reset, msg);
    println!();
}

/// Exit codes
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_FILE_NOT_FOUND: i32 = 4;
/// The fixture ran and raised a fault
pub const EXIT_VALIDATION: i32 = 5;
pub const EXIT_NOT_FOUND: i32 = 6;

// ============================================================================
// Error Codes and Remediation
// ============================================================================

/// Error codes for JSON error responses
pub const E_FIXTURE_NOT_FOUND: &str = "E002";
pub const E_NODE_NOT_FOUND: &str = "E003";
pub const E_DIVERGENT: &str = "E005";
pub const E_INVALID_INPUT: &str = "E006";
pub const E_FILE_NOT_FOUND: &str = "E008";

/// Common remediation messages
pub const R_HINT_LIST_FIXTURES: &str =
    "Run 'fixtures list' to see available fixtures and their parameters";
pub const R_HINT_ALLOW_DIVERGENCE: &str =
    "Pass --allow-divergence to run it anyway; the process will exhaust its stack";
pub const R_HINT_GRAPH: &str =
    "Pass --graph FILE with {\"nodes\":[{\"x\":..,\"y\":..,\"link\":..}]}";

/// JSON output wrapper
#[derive(Debug, Clone, serde::Serialize)]
pub struct JsonResponse<T> {
    pub schema_version: String,
    pub execution_id: String,
    pub tool: String,
    pub timestamp: String,
    pub data: T,
}

impl<T: serde::Serialize> JsonResponse<T> {
    pub fn new(data: T) -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let timestamp = chrono::Utc::now().to_rfc3339();
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let exec_id = format!("{:x}-{}", secs, std::process::id());

        JsonResponse {
            schema_version: "1.0.0".to_string(),
            execution_id: exec_id,
            tool: "fixtures".to_string(),
            timestamp,
            data,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Error response format for JSON mode
#[derive(Debug, Clone, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl JsonError {
    pub fn new(category: &str, message: &str, code: &str) -> Self {
        JsonError {
            error: category.to_string(),
            message: message.to_string(),
            code: code.to_string(),
            remediation: None,
        }
    }

    pub fn with_remediation(mut self, remediation: &str) -> Self {
        self.remediation = Some(remediation.to_string());
        self
    }

    pub fn fixture_not_found(name: &str) -> Self {
        Self::new(
            "FixtureNotFound",
            &format!("Fixture '{}' not found", name),
            E_FIXTURE_NOT_FOUND,
        )
        .with_remediation(R_HINT_LIST_FIXTURES)
    }

    pub fn file_not_found(path: &str) -> Self {
        Self::new(
            "FileNotFound",
            &format!("File not found: {}", path),
            E_FILE_NOT_FOUND,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_response() {
        let data = vec!["item1", "item2"];
        let response = JsonResponse::new(data);
        let json = response.to_json();
        assert!(json.contains("\"tool\":\"fixtures\""));
        assert!(json.contains("\"data\":[\"item1\",\"item2\"]"));
    }

    #[test]
    fn test_json_error_remediation_is_optional() {
        let plain = serde_json::to_string(&JsonError::file_not_found("g.json")).unwrap();
        assert!(!plain.contains("remediation"));

        let hinted = serde_json::to_string(&JsonError::fixture_not_found("nope")).unwrap();
        assert!(hinted.contains("\"code\":\"E002\""));
        assert!(hinted.contains("fixtures list"));
    }
}
