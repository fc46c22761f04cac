use async_trait::async_trait;
use reqwest::{
    Client, StatusCode, Url,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::ticket::{SearchResult, TicketIdentifier, TicketSet};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

const SEARCH_PATH: &str = "/rest/api/2/search/";

pub struct JiraClient {
    http: Client,
    host: String,
    token: String,
}

impl JiraClient {
    pub fn new(host: String, token: String) -> Self {
        Self {
            http: Client::new(),
            host,
            token,
        }
    }

    pub fn search_url(host: &str, jql: &str) -> AppResult<Url> {
        let endpoint = format!("{}{SEARCH_PATH}", host.trim_end_matches('/'));
        Url::parse_with_params(&endpoint, &[("jql", jql), ("fields", "summary")]).map_err(|err| {
            AppError::Configuration(format!("invalid tracker host '{host}': {err}"))
        })
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    fn request_url(&self, jql: &str) -> AppResult<String> {
        Self::search_url(&self.host, jql).map(String::from)
    }

    async fn search_tickets(&self, jql: &str) -> AppResult<SearchResult> {
        let url = Self::search_url(&self.host, jql)?;
        info!(%url, "calling issue tracker");

        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.bearer())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|err| AppError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| AppError::Transport(err.to_string()))?;
        debug!(%status, bytes = body.len(), "issue tracker responded");

        parse_search_response(status, &body)
    }
}

#[derive(Deserialize)]
struct JiraSearchResponse {
    total: Option<u64>,
    issues: Vec<JiraIssue>,
}

#[derive(Deserialize)]
struct JiraIssue {
    key: String,
}

/// Turns a search response into tickets, or into the tracker's error.
pub fn parse_search_response(status: StatusCode, body: &str) -> AppResult<SearchResult> {
    if !status.is_success() {
        return Err(AppError::Api {
            status: status.as_u16(),
            message: error_message(body),
        });
    }

    let payload: JiraSearchResponse =
        serde_json::from_str(body).map_err(|err| AppError::Parse(err.to_string()))?;

    let tickets: TicketSet = payload
        .issues
        .iter()
        .map(|issue| TicketIdentifier::new(&issue.key))
        .collect();

    Ok(SearchResult {
        reported_total: payload.total,
        tickets,
    })
}

fn error_message(body: &str) -> String {
    let Ok(payload) = serde_json::from_str::<Value>(body) else {
        return String::new();
    };

    if let Some(messages) = payload.get("errorMessages").and_then(Value::as_array) {
        return messages
            .iter()
            .map(|message| match message {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; ");
    }

    payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    #[test]
    fn encodes_query_into_search_url() {
        let url = JiraClient::search_url(
            "https://jira.example.com/",
            "project = AB AND status in (Done)",
        )
        .expect("url");

        assert_eq!(url.path(), "/rest/api/2/search/");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("jql".to_string(), "project = AB AND status in (Done)".to_string()),
                ("fields".to_string(), "summary".to_string()),
            ]
        );
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn exposes_request_url_for_progress_output() {
        let client = JiraClient::new("https://jira.example.com".to_string(), "t".to_string());
        let url = client.request_url("project = AB").expect("url");
        assert_eq!(
            url,
            "https://jira.example.com/rest/api/2/search/?jql=project+%3D+AB&fields=summary"
        );
    }

    #[test]
    fn rejects_unparseable_host() {
        let err = JiraClient::search_url("", "project = AB").unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn collects_every_issue_regardless_of_total() {
        let body = r#"{"total":50,"issues":[
            {"key":"AB-1"},
            {"key":"ab-2","fields":{"summary":"x"}}
        ]}"#;
        let result = parse_search_response(StatusCode::OK, body).expect("result");

        assert_eq!(result.reported_total, Some(50));
        assert_eq!(result.tickets.len(), 2);
        assert!(result.tickets.contains(&TicketIdentifier::new("AB-2")));
    }

    #[test]
    fn joins_error_messages() {
        let body = r#"{"errorMessages":["Unauthorized","Try again"]}"#;
        let err = parse_search_response(StatusCode::UNAUTHORIZED, body).unwrap_err();
        match err {
            AppError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Unauthorized; Try again");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn falls_back_to_message_then_empty() {
        let err = parse_search_response(StatusCode::BAD_REQUEST, r#"{"message":"bad jql"}"#)
            .unwrap_err();
        assert!(matches!(err, AppError::Api { status: 400, ref message } if message == "bad jql"));

        let err = parse_search_response(StatusCode::BAD_GATEWAY, "<html>").unwrap_err();
        assert!(matches!(err, AppError::Api { status: 502, ref message } if message.is_empty()));
    }

    #[test]
    fn reports_malformed_json() {
        let err = parse_search_response(StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));

        let err = parse_search_response(StatusCode::OK, r#"{"total":1}"#).unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let host = format!("http://{}", listener.local_addr().expect("addr"));
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let read = socket.read(&mut buf).await.expect("read");
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..read]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_string()
        });
        (host, handle)
    }

    #[tokio::test]
    async fn sends_bearer_token_and_parses_tickets() {
        let (host, server) =
            serve_once("200 OK", r#"{"total":1,"issues":[{"key":"AB-77"}]}"#).await;
        let client = JiraClient::new(host, "secret".to_string());

        let result = client.search_tickets("project = AB").await.expect("search");
        let request = server.await.expect("server").to_ascii_lowercase();

        assert!(request.starts_with("get /rest/api/2/search/?jql=project"));
        assert!(request.contains("fields=summary"));
        assert!(request.contains("authorization: bearer secret"));
        assert!(request.contains("accept: application/json"));
        assert_eq!(result.tickets.len(), 1);
    }

    #[tokio::test]
    async fn surfaces_unauthorized_response() {
        let (host, server) =
            serve_once("401 Unauthorized", r#"{"errorMessages":["Unauthorized"]}"#).await;
        let client = JiraClient::new(host, "wrong".to_string());

        let err = client.search_tickets("project = AB").await.unwrap_err();
        server.await.expect("server");

        let text = err.to_string();
        assert!(text.contains("401"));
        assert!(text.contains("Unauthorized"));
    }

    #[tokio::test]
    async fn reports_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let host = format!("http://{}", listener.local_addr().expect("addr"));
        drop(listener);

        let client = JiraClient::new(host, "token".to_string());
        let err = client.search_tickets("project = AB").await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }
}
