use {
    async_trait::async_trait,
    convene_protocol::{GraphQlRequest, GraphQlResponse, bearer_header_value, multipart},
    reqwest::header::{AUTHORIZATION, CONTENT_TYPE},
    secrecy::{ExposeSecret, Secret},
    url::Url,
};

use crate::error::{Error, Result};

/// Sends one GraphQL request and returns the decoded envelope.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: &GraphQlRequest,
        bearer: Option<&Secret<String>>,
    ) -> Result<GraphQlResponse>;
}

/// `reqwest`-backed transport against a single endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    /// Parse `endpoint` and build a transport with a default client.
    pub fn from_endpoint(endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| Error::message(format!("invalid endpoint {endpoint}: {e}")))?;
        Ok(Self::new(endpoint))
    }

    /// Build a `reqwest::Client` with an optional proxy and user agent.
    pub fn build_client(proxy_url: Option<&str>, user_agent: &str) -> reqwest::Client {
        let mut builder = reqwest::Client::builder().user_agent(user_agent.to_string());
        if let Some(url) = proxy_url
            && let Ok(proxy) = reqwest::Proxy::all(url)
        {
            let proxy = proxy.no_proxy(reqwest::NoProxy::from_string("localhost,127.0.0.1,::1"));
            builder = builder.proxy(proxy);
        }
        builder.build().unwrap_or_else(|_| reqwest::Client::new())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        request: &GraphQlRequest,
        bearer: Option<&Secret<String>>,
    ) -> Result<GraphQlResponse> {
        let mut builder = self.client.post(self.endpoint.clone());
        if let Some(token) = bearer {
            builder = builder.header(AUTHORIZATION, bearer_header_value(token.expose_secret()));
        }
        builder = if request.has_uploads() {
            builder.multipart(multipart_form(request)?)
        } else {
            builder
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(request)?)
        };

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Encode a request carrying files per the GraphQL multipart convention:
/// an `operations` part, a `map` part, then one part per file.
fn multipart_form(request: &GraphQlRequest) -> Result<reqwest::multipart::Form> {
    let mut form = reqwest::multipart::Form::new()
        .text(multipart::OPERATIONS, serde_json::to_string(request)?)
        .text(multipart::MAP, request.upload_map().to_string());
    for (index, (_, upload)) in request.uploads.iter().enumerate() {
        let mut part = reqwest::multipart::Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone());
        if let Some(content_type) = &upload.content_type {
            part = part.mime_str(content_type)?;
        }
        form = form.part(index.to_string(), part);
    }
    Ok(form)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn from_endpoint_rejects_garbage() {
        let err = HttpTransport::from_endpoint("not a url").unwrap_err();
        assert!(err.to_string().contains("invalid endpoint"));
    }

    #[test]
    fn from_endpoint_keeps_trailing_slash() {
        let transport = HttpTransport::from_endpoint("http://127.0.0.1:8483/graphql/").unwrap();
        assert_eq!(transport.endpoint().path(), "/graphql/");
    }

    #[test]
    fn build_client_ignores_bad_proxy() {
        // Falls back to a direct client instead of failing.
        let _client = HttpTransport::build_client(Some("::not a proxy::"), "convene-test");
    }
}
