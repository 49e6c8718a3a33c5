use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use jobscout_core::error::AppError;
use jobscout_core::traits::{HttpRequest, HttpResponse, Transport};
use reqwest::header::USER_AGENT;
use reqwest::{Client, Proxy};
use url::Url;

/// [`Transport`] backed by reqwest.
///
/// Direct requests share one client. Proxied requests get a client per
/// proxy and target scheme, so an `http://` target only ever goes through
/// the proxy registered for plain HTTP and an `https://` target through
/// the one registered for HTTPS.
#[derive(Clone)]
pub struct ReqwestTransport {
    direct: Client,
    proxied: Arc<Mutex<HashMap<String, Client>>>,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, AppError> {
        let direct = Client::builder()
            .build()
            .map_err(|e| AppError::NetworkError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            direct,
            proxied: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    fn client_for(&self, target: &str, proxy: Option<&str>) -> Result<Client, AppError> {
        let Some(proxy) = proxy else {
            return Ok(self.direct.clone());
        };
        let scheme = Url::parse(target)
            .map_err(|e| AppError::NetworkError(format!("Invalid URL '{target}': {e}")))?
            .scheme()
            .to_string();
        let key = format!("{scheme}|{proxy}");

        let mut clients = self.proxied.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(client) = clients.get(&key) {
            return Ok(client.clone());
        }
        let client = build_proxied(&scheme, proxy)?;
        clients.insert(key, client.clone());
        Ok(client)
    }
}

fn build_proxied(scheme: &str, proxy: &str) -> Result<Client, AppError> {
    let proxy = match scheme {
        "https" => Proxy::https(proxy),
        _ => Proxy::http(proxy),
    }
    .map_err(|e| AppError::ConfigError(format!("Invalid proxy '{proxy}': {e}")))?;

    Client::builder()
        .proxy(proxy)
        .build()
        .map_err(|e| AppError::NetworkError(format!("Failed to build proxied client: {e}")))
}

impl Transport for ReqwestTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, AppError> {
        let client = self.client_for(&request.url, request.proxy.as_deref())?;

        let mut builder = client
            .get(&request.url)
            .timeout(request.timeout)
            .header(USER_AGENT, &request.user_agent);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let timeout_ms = request.timeout.as_millis() as u64;
        let response = builder
            .send()
            .await
            .map_err(|e| map_send_error(e, timeout_ms))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| map_send_error(e, timeout_ms))?;

        Ok(HttpResponse { status, body })
    }
}

fn map_send_error(e: reqwest::Error, timeout_ms: u64) -> AppError {
    if e.is_timeout() {
        AppError::Timeout(timeout_ms)
    } else if e.is_connect() {
        AppError::NetworkError(format!("Connection failed: {e}"))
    } else {
        AppError::NetworkError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_client_per_scheme_and_proxy() {
        let transport = ReqwestTransport::new().unwrap();
        transport
            .client_for("https://indeed.com/jobs", Some("http://127.0.0.1:8080"))
            .unwrap();
        transport
            .client_for("https://linkedin.com/jobs", Some("http://127.0.0.1:8080"))
            .unwrap();
        transport
            .client_for("http://bdjobs.com/x", Some("http://127.0.0.1:8080"))
            .unwrap();
        let clients = transport.proxied.lock().unwrap();
        assert_eq!(clients.len(), 2);
        assert!(clients.contains_key("https|http://127.0.0.1:8080"));
        assert!(clients.contains_key("http|http://127.0.0.1:8080"));
    }

    #[test]
    fn direct_requests_skip_the_proxy_cache() {
        let transport = ReqwestTransport::new().unwrap();
        transport.client_for("https://indeed.com/jobs", None).unwrap();
        assert!(transport.proxied.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let transport = ReqwestTransport::new().unwrap();
        let request = HttpRequest {
            url: "http://127.0.0.1:1/".into(),
            user_agent: "test".into(),
            headers: vec![("Accept-Language".into(), "en".into())],
            proxy: None,
            timeout: std::time::Duration::from_secs(2),
        };
        let err = transport.get(&request).await.unwrap_err();
        assert!(err.is_retryable(), "{err}");
    }
}
