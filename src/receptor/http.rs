use std::time::Duration;

use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use ureq::{Agent, AgentBuilder, Request, Response};

use super::models::ErrorBody;
use super::{
    ActualLrp, DesiredLrp, DesiredLrpCreateRequest, DesiredLrpUpdateRequest, ReceptorClient,
    ReceptorError, ReceptorResult,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `ReceptorClient` speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpReceptorClient {
    base_url: String,
    agent: Agent,
}

impl HttpReceptorClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build();
        Self::with_agent(base_url, agent)
    }

    pub fn with_agent(base_url: impl Into<String>, agent: Agent) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, agent }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn desired_lrp_path(process_guid: &str) -> String {
        format!("/v1/desired_lrps/{}", urlencoding::encode(process_guid))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> ReceptorResult<T> {
        let url = self.url(path);
        debug!("receptor GET {url}");
        let response = send(&url, self.agent.get(&url), None)?;
        decode(&url, response)
    }

    fn send_json<B: Serialize>(&self, method: &str, path: &str, body: &B) -> ReceptorResult<()> {
        let url = self.url(path);
        debug!("receptor {method} {url}");
        let payload = serde_json::to_string(body).map_err(|err| ReceptorError::Decode {
            url: url.clone(),
            message: format!("failed to encode request body: {err}"),
        })?;
        let request = self
            .agent
            .request(method, &url)
            .set("Content-Type", "application/json");
        send(&url, request, Some(&payload))?;
        Ok(())
    }
}

impl ReceptorClient for HttpReceptorClient {
    fn desired_lrps(&self) -> ReceptorResult<Vec<DesiredLrp>> {
        self.get_json("/v1/desired_lrps")
    }

    fn create_desired_lrp(&self, request: DesiredLrpCreateRequest) -> ReceptorResult<()> {
        self.send_json("POST", "/v1/desired_lrps", &request)
    }

    fn update_desired_lrp(
        &self,
        process_guid: &str,
        update: DesiredLrpUpdateRequest,
    ) -> ReceptorResult<()> {
        self.send_json("PUT", &Self::desired_lrp_path(process_guid), &update)
    }

    fn delete_desired_lrp(&self, process_guid: &str) -> ReceptorResult<()> {
        let url = self.url(&Self::desired_lrp_path(process_guid));
        debug!("receptor DELETE {url}");
        send(&url, self.agent.delete(&url), None)?;
        Ok(())
    }

    fn actual_lrps_by_process_guid(&self, process_guid: &str) -> ReceptorResult<Vec<ActualLrp>> {
        self.get_json(&format!(
            "{}/actual_lrps",
            Self::desired_lrp_path(process_guid)
        ))
    }
}

fn send(url: &str, request: Request, body: Option<&str>) -> ReceptorResult<Response> {
    let result = match body {
        Some(payload) => request.send_string(payload),
        None => request.call(),
    };

    match result {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(status, response)) => Err(api_error(status, response)),
        Err(ureq::Error::Transport(transport)) => Err(ReceptorError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        }),
    }
}

fn decode<T: DeserializeOwned>(url: &str, response: Response) -> ReceptorResult<T> {
    serde_json::from_reader(response.into_reader()).map_err(|err| ReceptorError::Decode {
        url: url.to_string(),
        message: err.to_string(),
    })
}

fn api_error(status: u16, response: Response) -> ReceptorError {
    let body = response.into_string().unwrap_or_default();
    api_error_from_body(status, &body)
}

fn api_error_from_body(status: u16, body: &str) -> ReceptorError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.message.is_empty() => ReceptorError::Api {
            status,
            name: parsed.name,
            message: parsed.message,
        },
        _ => ReceptorError::Api {
            status,
            name: "UnknownError".to_string(),
            message: format!("receptor responded with status {status}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slashes_from_base_url() {
        let client = HttpReceptorClient::new("http://receptor.example.com//");
        assert_eq!(client.base_url(), "http://receptor.example.com");
        assert_eq!(
            client.url("/v1/desired_lrps"),
            "http://receptor.example.com/v1/desired_lrps"
        );
    }

    #[test]
    fn process_guids_are_escaped_in_paths() {
        assert_eq!(
            HttpReceptorClient::desired_lrp_path("cool-web-app_2"),
            "/v1/desired_lrps/cool-web-app_2"
        );
        assert_eq!(
            HttpReceptorClient::desired_lrp_path("a b/../c?x"),
            "/v1/desired_lrps/a%20b%2F..%2Fc%3Fx"
        );
    }

    #[test]
    fn api_errors_carry_receptor_message() {
        let err = api_error_from_body(
            409,
            r#"{"name":"DesiredLRPAlreadyExists","message":"desired lrp already exists"}"#,
        );
        assert_eq!(
            err,
            ReceptorError::Api {
                status: 409,
                name: "DesiredLRPAlreadyExists".to_string(),
                message: "desired lrp already exists".to_string(),
            }
        );
        assert_eq!(err.to_string(), "desired lrp already exists");
    }

    #[test]
    fn api_errors_fall_back_when_body_is_not_json() {
        let err = api_error_from_body(502, "<html>bad gateway</html>");
        assert_eq!(err.to_string(), "receptor responded with status 502");
    }

    #[test]
    fn unreachable_receptor_reports_transport_error() {
        let client = HttpReceptorClient::new("http://127.0.0.1:1");
        let err = client.desired_lrps().unwrap_err();
        assert!(
            matches!(
                err,
                ReceptorError::Transport { ref url, .. }
                    if url == "http://127.0.0.1:1/v1/desired_lrps"
            ),
            "unexpected error: {err:?}"
        );
    }
}
