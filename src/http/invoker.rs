//! Generic HTTP wrapper: GET/POST/PUT with merged headers, presigned
//! uploads, and every outcome folded into a [`CallResult`].

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use reqwest::Client;
use tracing::warn;

use crate::error::Error;
use crate::http::call_result::CallResult;

/// The only verbs the remote services use. Anything else is a configuration
/// error raised before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            other => Err(Error::UnsupportedMethod(other.to_string())),
        }
    }
}

/// Base headers first, caller extras on top. Extras may override anything,
/// including `Authorization`.
pub fn merge_headers(
    base: HashMap<String, String>,
    extra: Option<&HashMap<String, String>>,
) -> HashMap<String, String> {
    let mut merged = base;
    if let Some(extra) = extra {
        for (name, value) in extra {
            merged.insert(name.clone(), value.clone());
        }
    }
    merged
}

#[derive(Debug, Clone)]
pub struct HttpInvoker {
    client: Client,
}

impl Default for HttpInvoker {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpInvoker {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn get(&self, url: &str, headers: &HashMap<String, String>) -> CallResult {
        self.execute(HttpMethod::Get, url, headers, None).await
    }

    pub async fn post(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<&str>,
    ) -> CallResult {
        self.execute(HttpMethod::Post, url, headers, body).await
    }

    pub async fn put(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<&str>,
    ) -> CallResult {
        self.execute(HttpMethod::Put, url, headers, body).await
    }

    pub async fn invoke(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<&str>,
    ) -> CallResult {
        self.execute(method, url, headers, body).await
    }

    /// PUT raw bytes to a presigned URL. No authentication headers.
    pub async fn upload_with_put(
        &self,
        presigned_url: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> CallResult {
        let request = self
            .client
            .put(presigned_url)
            .header("Content-Type", content_type)
            .body(bytes);

        match request.send().await {
            Ok(response) => CallResult::from_response(response).await,
            Err(e) => {
                warn!(url = presigned_url, "upload failed: {e}");
                CallResult::transport_failure(e.to_string())
            }
        }
    }

    /// Convenience for on-disk content.
    pub async fn upload_file_with_put(
        &self,
        file: &Path,
        presigned_url: &str,
        content_type: &str,
    ) -> CallResult {
        let bytes = match tokio::fs::read(file).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return CallResult::precondition_failure(format!(
                    "Cannot read file {}: {e}",
                    file.display()
                ))
            }
        };
        self.upload_with_put(presigned_url, content_type, bytes).await
    }

    async fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<&str>,
    ) -> CallResult {
        let mut request = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
        };

        for (name, value) in headers {
            request = request.header(name, value);
        }
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        // Transport failures are data, not control flow.
        match request.send().await {
            Ok(response) => CallResult::from_response(response).await,
            Err(e) => {
                warn!(method = method.as_str(), url, "request failed: {e}");
                CallResult::transport_failure(e.to_string())
            }
        }
    }
}
