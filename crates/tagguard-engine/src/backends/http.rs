//! Blocking HTTP client for the tagging gateway.

use std::time::{Duration, Instant};

use serde::{de::DeserializeOwned, Serialize};
use tagguard_core::errors::{BackendError, SetupError};
use tagguard_core::models::TagPayload;
use tagguard_core::{ResourceDescriptor, ResourcePage, ResourceType, TagSet, TaggingBackend};

use super::wire::{
    GatewayRequest, GatewayResponse, ListResourcesRequest, PutTagsRequest, PutTagsResponse,
    ResourceRef, GET_TAGS_PATH, LIST_RESOURCES_PATH, PUT_TAGS_PATH,
};

/// Talks to the gateway over HTTPS with a bearer token.
///
/// Each method issues exactly one request; retries belong to the caller.
/// HTTP statuses map onto [`BackendError`] so throttling and transient
/// server errors stay retryable and everything else does not.
#[derive(Debug)]
pub struct HttpBackend {
    client: reqwest::blocking::Client,
    base_url: String,
    token: String,
    timeout: Duration,
    page_size: usize,
}

impl HttpBackend {
    pub fn new(
        base_url: &str,
        token: String,
        timeout: Duration,
        page_size: usize,
    ) -> Result<Self, SetupError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|e| SetupError::Backend {
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            timeout,
            page_size,
        })
    }

    fn post<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        payload: Req,
    ) -> Result<Resp, BackendError> {
        let request = GatewayRequest::new(payload);
        let url = format!("{}{}", self.base_url, path);
        let started = Instant::now();

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout {
                        elapsed_ms: started.elapsed().as_millis() as u64,
                    }
                } else {
                    BackendError::Transient {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = resp.status();
        tracing::trace!(
            url = %url,
            request_id = %request.request_id,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "gateway call"
        );
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(status_error(status, body, self.timeout));
        }

        let envelope: GatewayResponse<Resp> = resp.json().map_err(|e| BackendError::Protocol {
            reason: format!("deserialization failed: {e}"),
        })?;
        if !envelope.success {
            return Err(envelope
                .error
                .map(|e| e.into_backend_error())
                .unwrap_or_else(|| BackendError::Protocol {
                    reason: "unsuccessful response without error body".to_string(),
                }));
        }
        envelope.data.ok_or_else(|| BackendError::Protocol {
            reason: "successful response without data".to_string(),
        })
    }
}

fn status_error(status: reqwest::StatusCode, body: String, timeout: Duration) -> BackendError {
    if status == reqwest::StatusCode::BAD_REQUEST {
        if let Ok(GatewayResponse::<serde_json::Value> {
            error: Some(error), ..
        }) = serde_json::from_str(&body)
        {
            return error.into_backend_error();
        }
    }
    let reason = format!("HTTP {status}: {body}");
    match status.as_u16() {
        401 | 403 => BackendError::AccessDenied { reason },
        404 => BackendError::NotFound { resource: body },
        408 | 504 => BackendError::Timeout {
            elapsed_ms: timeout.as_millis() as u64,
        },
        429 => BackendError::Throttled { reason },
        500..=599 => BackendError::Transient { reason },
        _ => BackendError::Protocol { reason },
    }
}

fn resource_ref(resource: &ResourceDescriptor) -> ResourceRef {
    ResourceRef {
        resource_type: resource.resource_type,
        resource_id: resource.resource_id.clone(),
        resource_arn: resource.resource_arn.clone(),
    }
}

impl TaggingBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    fn list_resources(
        &self,
        resource_type: ResourceType,
        region: &str,
        next_token: Option<&str>,
    ) -> Result<ResourcePage, BackendError> {
        self.post(
            LIST_RESOURCES_PATH,
            ListResourcesRequest {
                resource_type,
                region: region.to_string(),
                next_token: next_token.map(str::to_string),
                page_size: self.page_size,
            },
        )
    }

    fn get_tags(&self, resource: &ResourceDescriptor) -> Result<TagPayload, BackendError> {
        self.post(GET_TAGS_PATH, resource_ref(resource))
    }

    fn tag_resource(&self, resource: &ResourceDescriptor, tags: &TagSet) -> Result<(), BackendError> {
        let payload = TagPayload::from_tag_set(
            resource.resource_type.tag_shape(),
            &resource.resource_arn,
            tags,
        );
        let _: PutTagsResponse = self.post(
            PUT_TAGS_PATH,
            PutTagsRequest {
                resource: resource_ref(resource),
                tags: payload,
            },
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_retryable_classes() {
        let t = Duration::from_secs(30);
        assert!(status_error(reqwest::StatusCode::TOO_MANY_REQUESTS, String::new(), t).is_retryable());
        assert!(status_error(reqwest::StatusCode::BAD_GATEWAY, String::new(), t).is_retryable());
        assert!(status_error(reqwest::StatusCode::GATEWAY_TIMEOUT, String::new(), t).is_retryable());
        assert!(!status_error(reqwest::StatusCode::FORBIDDEN, String::new(), t).is_retryable());
        assert!(!status_error(reqwest::StatusCode::NOT_FOUND, String::new(), t).is_retryable());
    }

    #[test]
    fn bad_request_uses_envelope_error_code() {
        let body = r#"{"version":"1.0","request_id":"r","success":false,
            "error":{"code":"LIMIT_EXCEEDED","message":"cap","attempted":51,"limit":50}}"#;
        let err = status_error(
            reqwest::StatusCode::BAD_REQUEST,
            body.to_string(),
            Duration::from_secs(30),
        );
        assert_eq!(err, BackendError::TagLimitExceeded { attempted: 51, limit: 50 });
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let backend = HttpBackend::new(
            "https://gateway.example.com/",
            "token".to_string(),
            Duration::from_secs(5),
            100,
        )
        .unwrap();
        assert_eq!(backend.base_url, "https://gateway.example.com");
        assert_eq!(backend.name(), "http");
    }

    // ─── Round trips against a local gateway ───

    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    /// Serves one canned response and hands back the raw request,
    /// lowercased.
    fn one_shot_gateway(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).unwrap();
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw).to_lowercase();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if raw.len() >= end + 4 + length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&raw).to_lowercase()
        });
        (base_url, server)
    }

    fn backend(base_url: &str) -> HttpBackend {
        HttpBackend::new(base_url, "secret".to_string(), Duration::from_secs(5), 25).unwrap()
    }

    fn web() -> ResourceDescriptor {
        ResourceDescriptor::new(ResourceType::Cluster, "web", "arn:web")
    }

    #[test]
    fn list_resources_decodes_envelope_data() {
        let (url, server) = one_shot_gateway(
            200,
            r#"{"version":"1.0","request_id":"r1","success":true,
                "data":{"resources":[{"resource_type":"cluster","resource_id":"web","resource_arn":"arn:web"}],
                "next_token":"2"}}"#,
        );
        let page = backend(&url)
            .list_resources(ResourceType::Cluster, "us-east-1", None)
            .unwrap();
        assert_eq!(page.resources, vec![web()]);
        assert_eq!(page.next_token.as_deref(), Some("2"));

        let request = server.join().unwrap();
        assert!(request.starts_with("post /v1/resources/list "));
        assert!(request.contains("authorization: bearer secret"));
        assert!(request.contains(r#""page_size":25"#));
        assert!(request.contains(r#""version":"1.0""#));
    }

    #[test]
    fn get_tags_returns_payload() {
        let (url, server) = one_shot_gateway(
            200,
            r#"{"version":"1.0","request_id":"r2","success":true,
                "data":{"shape":"map","tags":{"Owner":"platform-team"}}}"#,
        );
        let payload = backend(&url).get_tags(&web()).unwrap();
        assert!(matches!(payload, TagPayload::Map(_)));
        assert_eq!(payload.into_tag_set("arn:web").get("Owner"), Some("platform-team"));
        assert!(server.join().unwrap().starts_with("post /v1/tags/get "));
    }

    #[test]
    fn tag_resource_sends_native_shape() {
        let (url, server) = one_shot_gateway(
            200,
            r#"{"version":"1.0","request_id":"r3","success":true,"data":{"applied":1}}"#,
        );
        let tags: TagSet = [("Owner", "x")].into_iter().collect();
        backend(&url).tag_resource(&web(), &tags).unwrap();
        let request = server.join().unwrap();
        assert!(request.starts_with("post /v1/tags/put "));
        assert!(request.contains(r#""shape":"lower_pairs""#));
    }

    #[test]
    fn unsuccessful_envelope_maps_error_code() {
        let (url, server) = one_shot_gateway(
            200,
            r#"{"version":"1.0","request_id":"r4","success":false,
                "error":{"code":"THROTTLED","message":"slow down"}}"#,
        );
        let err = backend(&url).get_tags(&web()).unwrap_err();
        assert!(matches!(err, BackendError::Throttled { .. }));
        server.join().unwrap();
    }

    #[test]
    fn success_without_data_is_protocol_error() {
        let (url, server) = one_shot_gateway(200, r#"{"version":"1.0","request_id":"r5","success":true}"#);
        let err = backend(&url).get_tags(&web()).unwrap_err();
        assert!(matches!(err, BackendError::Protocol { .. }));
        server.join().unwrap();
    }

    #[test]
    fn error_status_is_mapped() {
        let (url, server) = one_shot_gateway(403, r#"{"message":"denied"}"#);
        let err = backend(&url).get_tags(&web()).unwrap_err();
        assert!(matches!(err, BackendError::AccessDenied { .. }));
        server.join().unwrap();
    }
}
