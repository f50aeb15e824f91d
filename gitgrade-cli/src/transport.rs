//! Blocking HTTP transport backed by reqwest.

use std::time::Duration;

use gitgrade_core::Transport;
use log::debug;
use reqwest::blocking::Client;
use serde_json::Value;

use crate::CliResult;

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "gitgrade-cli";
/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fetches upstream documents over HTTP.
///
/// Every failure is reported as absence, so the engine's defaults apply.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport with a user agent and a per-request timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> CliResult<Self> {
        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    fn fetch_body(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send() {
            Ok(response) => response,
            Err(err) => {
                debug!("request to {url} failed: {err}");
                return None;
            }
        };
        let status = response.status();
        if !status.is_success() {
            debug!("request to {url} returned {status}");
            return None;
        }
        match response.text() {
            Ok(body) => Some(body),
            Err(err) => {
                debug!("reading body of {url} failed: {err}");
                None
            }
        }
    }
}

impl Transport for HttpTransport {
    fn fetch_json(&self, url: &str) -> Option<Value> {
        let body = self.fetch_body(url)?;
        if body.trim().is_empty() {
            return None;
        }
        serde_json::from_str(&body)
            .map_err(|err| debug!("malformed json from {url}: {err}"))
            .ok()
    }

    fn fetch_text(&self, url: &str) -> String {
        self.fetch_body(url).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;

    fn transport() -> HttpTransport {
        HttpTransport::new("gitgrade-tests", Duration::from_secs(5)).expect("transport")
    }

    #[test]
    fn fetch_json_parses_successful_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/alice/proj")
                .header("user-agent", "gitgrade-tests");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"default_branch":"dev"}"#);
        });

        let value = transport().fetch_json(&server.url("/repos/alice/proj"));

        mock.assert();
        assert_eq!(value, Some(json!({"default_branch": "dev"})));
    }

    #[test]
    fn fetch_json_is_absent_on_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/users/ghost/repos");
            then.status(403).body(r#"{"message":"API rate limit exceeded"}"#);
        });

        assert_eq!(
            transport().fetch_json(&server.url("/users/ghost/repos")),
            None
        );
    }

    #[test]
    fn fetch_json_is_absent_for_blank_or_malformed_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/blank");
            then.status(200).body("  \n");
        });
        server.mock(|when, then| {
            when.method(GET).path("/broken");
            then.status(200).body("{not json");
        });

        let transport = transport();
        assert_eq!(transport.fetch_json(&server.url("/blank")), None);
        assert_eq!(transport.fetch_json(&server.url("/broken")), None);
    }

    #[test]
    fn fetch_text_returns_body_or_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/alice/proj/main/app.py");
            then.status(200).body("def main():\n    pass\n");
        });
        server.mock(|when, then| {
            when.method(GET).path("/alice/proj/main/missing.py");
            then.status(404);
        });

        let transport = transport();
        assert_eq!(
            transport.fetch_text(&server.url("/alice/proj/main/app.py")),
            "def main():\n    pass\n"
        );
        assert_eq!(
            transport.fetch_text(&server.url("/alice/proj/main/missing.py")),
            ""
        );
    }

    #[test]
    fn unreachable_host_is_absent() {
        let transport = HttpTransport::new("gitgrade-tests", Duration::from_millis(200))
            .expect("transport");
        assert_eq!(transport.fetch_json("http://127.0.0.1:9/nothing"), None);
        assert_eq!(transport.fetch_text("http://127.0.0.1:9/nothing"), "");
    }
}
