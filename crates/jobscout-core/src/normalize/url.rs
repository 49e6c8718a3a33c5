use url::Url;

/// Reduce a job URL to scheme + host + path.
///
/// The host is lower-cased and leading `www.` labels dropped; query string and
/// fragment are discarded. Empty or unparseable input yields `""`.
pub fn canonical_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    let Ok(url) = Url::parse(raw) else {
        return String::new();
    };
    let Some(host) = url.host_str() else {
        return String::new();
    };
    let host = host.to_lowercase();
    let mut host = host.as_str();
    while let Some(rest) = host.strip_prefix("www.").filter(|r| !r.is_empty()) {
        host = rest;
    }
    let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();

    let path = match url.path().trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    format!("{}://{}{}{}", url.scheme(), host, port, path)
}
