//! Operation descriptions.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Method;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ClientError;

/// Everything outside the RFC 3986 unreserved set is encoded, including `/` and `@`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// One logical request, independent of which candidate serves it.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationSpec {
    /// Stable name, matched against a service's retry-eligible operations.
    pub name: String,
    pub method: Method,
    /// Path relative to the candidate prefix, already rendered.
    pub path: String,
    pub body: Option<Value>,
    pub retry_eligible: bool,
    /// Sent as `x-request-id` on every attempt of this call.
    pub request_id: String,
}

impl OperationSpec {
    pub fn new(name: impl Into<String>, method: Method, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            body: None,
            retry_eligible: false,
            request_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn get(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, Method::GET, path)
    }

    pub fn post(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, Method::POST, path)
    }

    pub fn put(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, Method::PUT, path)
    }

    pub fn delete(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, Method::DELETE, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn retry_eligible(mut self, eligible: bool) -> Self {
        self.retry_eligible = eligible;
        self
    }
}

/// Substitute `{}` placeholders in order, percent-encoding each argument.
pub fn render_path(template: &str, args: &[&str]) -> Result<String, ClientError> {
    let placeholders = template.matches("{}").count();
    if placeholders != args.len() {
        return Err(ClientError::InvalidOperation(format!(
            "template '{}' expects {} argument(s), got {}",
            template,
            placeholders,
            args.len()
        )));
    }

    let mut rendered = String::with_capacity(template.len() + args.iter().map(|a| a.len()).sum::<usize>());
    let mut pieces = template.split("{}");
    if let Some(first) = pieces.next() {
        rendered.push_str(first);
    }
    for (piece, arg) in pieces.zip(args) {
        if arg.is_empty() {
            return Err(ClientError::InvalidOperation(format!(
                "empty path argument for '{}'",
                template
            )));
        }
        if is_dot_segment(arg) {
            return Err(ClientError::InvalidOperation(format!(
                "path argument '{}' for '{}' is a dot-segment",
                arg, template
            )));
        }
        rendered.extend(utf8_percent_encode(arg, PATH_SEGMENT));
        rendered.push_str(piece);
    }
    Ok(rendered)
}

/// URL parsers collapse `.` and `..` segments (also as `%2e`), so they cannot
/// name a resource.
fn is_dot_segment(arg: &str) -> bool {
    let decoded = percent_decode_str(arg).decode_utf8_lossy();
    decoded == "." || decoded == ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain_and_encoded() {
        assert_eq!(render_path("", &[]).unwrap(), "");
        assert_eq!(render_path("/{}", &["42"]).unwrap(), "/42");
        assert_eq!(render_path("/find/{}", &["978-3-16"]).unwrap(), "/find/978-3-16");
        assert_eq!(
            render_path("/by-email/{}", &["jane doe+x@example.com"]).unwrap(),
            "/by-email/jane%20doe%2Bx%40example.com"
        );
        assert_eq!(render_path("/{}", &["a/b?c"]).unwrap(), "/a%2Fb%3Fc");
    }

    #[test]
    fn test_render_argument_mismatch() {
        assert!(matches!(render_path("/{}", &[]), Err(ClientError::InvalidOperation(_))));
        assert!(matches!(render_path("", &["x"]), Err(ClientError::InvalidOperation(_))));
        assert!(matches!(render_path("/{}", &[""]), Err(ClientError::InvalidOperation(_))));
        assert!(matches!(render_path("/{}", &["."]), Err(ClientError::InvalidOperation(_))));
        assert!(matches!(render_path("/{}", &[".."]), Err(ClientError::InvalidOperation(_))));
        assert!(matches!(render_path("/find/{}", &["%2E%2e"]), Err(ClientError::InvalidOperation(_))));
        assert_eq!(render_path("/{}", &["..."]).unwrap(), "/...");
        assert_eq!(render_path("/{}", &["v1.2"]).unwrap(), "/v1.2");
    }

    #[test]
    fn test_each_operation_gets_own_request_id() {
        let a = OperationSpec::get("get_all", "");
        let b = OperationSpec::get("get_all", "");
        assert_ne!(a.request_id, b.request_id);
        assert!(!a.retry_eligible);
        assert_eq!(OperationSpec::put("update", "/1").method, Method::PUT);
    }
}
