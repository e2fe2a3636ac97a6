//! Authenticated HTTP requests over libcurl.
//!
//! Two requests exist: the recursive WebDAV listing (`PROPFIND`, `Depth: infinity`)
//! and the image `GET`. Both send `Authorization: Basic base64(user:password)`.
//! These run in the current thread; call from `spawn_blocking` in async code.

mod error;

pub use error::RequestError;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const LISTING_TIMEOUT: Duration = Duration::from_secs(60);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Minimal property request: resource type, content type and display name.
pub const PROPFIND_BODY: &str = r#"<?xml version="1.0"?>
<d:propfind xmlns:d="DAV:">
  <d:prop>
    <d:resourcetype/>
    <d:getcontenttype/>
    <d:displayname/>
  </d:prop>
</d:propfind>"#;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Value of the `Authorization` header.
    pub fn basic_auth_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", token)
    }
}

/// Issues the recursive listing request and returns the raw multistatus body.
pub fn propfind(url: &str, credentials: &Credentials) -> Result<Vec<u8>, RequestError> {
    let headers = [
        "Depth: infinity".to_string(),
        "Content-Type: application/xml".to_string(),
        format!("Authorization: {}", credentials.basic_auth_header()),
    ];
    perform(
        url,
        Some(("PROPFIND", PROPFIND_BODY.as_bytes())),
        &headers,
        LISTING_TIMEOUT,
    )
}

/// Downloads `url` and returns the response body.
pub fn get(url: &str, credentials: &Credentials) -> Result<Vec<u8>, RequestError> {
    let headers = [format!(
        "Authorization: {}",
        credentials.basic_auth_header()
    )];
    perform(url, None, &headers, DOWNLOAD_TIMEOUT)
}

/// Runs one request. `custom` carries a method name and body for non-GET requests.
fn perform(
    url: &str,
    custom: Option<(&str, &[u8])>,
    headers: &[String],
    timeout: Duration,
) -> Result<Vec<u8>, RequestError> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(CONNECT_TIMEOUT)?;
    easy.timeout(timeout)?;

    if let Some((method, payload)) = custom {
        easy.post(true)?;
        easy.post_fields_copy(payload)?;
        easy.custom_request(method)?;
    }

    let mut list = curl::easy::List::new();
    for h in headers {
        list.append(h)?;
    }
    easy.http_headers(list)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(RequestError::Http(code));
    }
    Ok(body)
}
