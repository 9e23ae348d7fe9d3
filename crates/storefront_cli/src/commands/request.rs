//! Single request command
//!
//! Usage: storefront request <METHOD> <PATH> [--body JSON]
//!
//! The response body goes to stdout and the status line to stderr. Exit
//! status is 0 for 2xx responses and 1 otherwise.

use clap::Args;
use log::warn;
use serde_json::{json, Value};
use storefront_api::response::STATUS_BAD_REQUEST;
use storefront_api::{handle_request, ApiConfig, ApiRequest, ApiResponse, Method};
use storefront_core::validation::SCHEMA_KEY;

#[derive(Debug, Args)]
pub struct RequestArgs {
    /// GET, POST, PUT or DELETE (case-insensitive)
    pub method: Method,

    /// Request path, e.g. /users/1
    pub path: String,

    /// JSON request body
    #[arg(long)]
    pub body: Option<String>,
}

/// Runs the request and prints the response. Returns whether it succeeded.
pub fn execute(config: &ApiConfig, args: RequestArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let response = match parse_body(args.body.as_deref()) {
        Ok(body) => {
            let mut request = ApiRequest::new(args.method, args.path);
            request.body = body;
            handle_request(config, &request)
        }
        Err(err) => {
            warn!("event=cli_request module=cli status=rejected reason=invalid_json");
            ApiResponse {
                status: STATUS_BAD_REQUEST,
                body: json!({ "errors": { SCHEMA_KEY: [format!("Invalid JSON body: {err}")] } }),
            }
        }
    };

    eprintln!("status={}", response.status);
    println!("{}", serde_json::to_string_pretty(&response.body)?);
    Ok(response.is_success())
}

fn parse_body(raw: Option<&str>) -> Result<Option<Value>, serde_json::Error> {
    match raw {
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => serde_json::from_str(text).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_body;
    use serde_json::json;

    #[test]
    fn missing_or_blank_body_is_none() {
        assert_eq!(parse_body(None).unwrap(), None);
        assert_eq!(parse_body(Some("  ")).unwrap(), None);
    }

    #[test]
    fn json_body_is_parsed() {
        assert_eq!(
            parse_body(Some(r#"{"name":"Ann"}"#)).unwrap(),
            Some(json!({ "name": "Ann" }))
        );
        assert!(parse_body(Some("{name:")).is_err());
    }
}
