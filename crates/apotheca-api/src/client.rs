// Hand-crafted async HTTP client for the medicine REST service.
//
// Base path: configurable, e.g. http://localhost:8082/api/medicines
// Bodies: JSON, camelCase

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{MedicineCreateRequest, MedicineResponse, MedicineUpdateRequest};

/// Default `days` window for [`MedicineClient::list_expiring_soon`].
pub const DEFAULT_EXPIRING_DAYS: u32 = 30;

/// Default threshold for [`MedicineClient::list_low_stock`].
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

/// Characters of an unparseable body quoted in the error message.
const BODY_PREVIEW_CHARS: usize = 200;

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the remote medicine store.
///
/// Every call is bounded by the transport deadline. Non-success statuses
/// surface as [`Error::RemoteRequestFailed`] carrying the status text;
/// bodies that do not parse surface as [`Error::Deserialization`].
#[derive(Debug, Clone)]
pub struct MedicineClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: std::time::Duration,
}

impl MedicineClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` using the shared transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages its deadline).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout: crate::transport::DEFAULT_TIMEOUT,
        })
    }

    /// Parse the base URL and strip any trailing slash so `GET /` hits the
    /// collection path exactly as configured.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::UnsupportedBaseUrl(raw.into()));
        }
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&path);
        Ok(url)
    }

    /// The collection base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|()| Error::UnsupportedBaseUrl(self.base_url.to_string()))?
                .pop_if_empty()
                .extend(segments);
        }
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        action: &'static str,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        debug!("GET {url} params={params:?}");

        let mut builder = self.http.get(url);
        if !params.is_empty() {
            builder = builder.query(params);
        }
        let resp = builder.send().await.map_err(|e| self.transport_error(e))?;
        self.handle_response(action, resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        action: &'static str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(&[])?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.handle_response(action, resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        action: &'static str,
        segments: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        debug!("PUT {url}");

        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.handle_response(action, resp).await
    }

    async fn delete(&self, action: &'static str, segments: &[&str]) -> Result<(), Error> {
        let url = self.url(segments)?;
        debug!("DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::status_error(action, status))
        }
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        action: &'static str,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::status_error(action, status));
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        trace!(bytes = body.len(), "response body received");
        serde_json::from_str(&body).map_err(|e| {
            let preview = body_preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    fn status_error(action: &'static str, status: reqwest::StatusCode) -> Error {
        Error::RemoteRequestFailed {
            action,
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .map_or_else(|| status.as_str().to_owned(), String::from),
        }
    }

    /// Fold reqwest's deadline errors into [`Error::Timeout`].
    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout: self.timeout,
            }
        } else {
            Error::Transport(err)
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── CRUD ─────────────────────────────────────────────────────────

    pub async fn list_medicines(&self) -> Result<Vec<MedicineResponse>, Error> {
        self.get("fetch medicines", &[], &[]).await
    }

    pub async fn get_medicine(&self, id: &str) -> Result<MedicineResponse, Error> {
        self.get("fetch medicine", &[id], &[]).await
    }

    pub async fn create_medicine(
        &self,
        body: &MedicineCreateRequest,
    ) -> Result<MedicineResponse, Error> {
        self.post("create medicine", body).await
    }

    pub async fn update_medicine(
        &self,
        id: &str,
        body: &MedicineUpdateRequest,
    ) -> Result<MedicineResponse, Error> {
        self.put("update medicine", &[id], body).await
    }

    pub async fn delete_medicine(&self, id: &str) -> Result<(), Error> {
        self.delete("delete medicine", &[id]).await
    }

    // ── Filtered reads ───────────────────────────────────────────────

    pub async fn list_by_category(&self, category: &str) -> Result<Vec<MedicineResponse>, Error> {
        self.get("fetch medicines by category", &["category", category], &[])
            .await
    }

    pub async fn search_by_name(&self, name: &str) -> Result<Vec<MedicineResponse>, Error> {
        self.get("search medicines", &["search"], &[("name", name.to_owned())])
            .await
    }

    pub async fn list_expiring_soon(&self, days: u32) -> Result<Vec<MedicineResponse>, Error> {
        self.get(
            "fetch expiring medicines",
            &["expiring-soon"],
            &[("days", days.to_string())],
        )
        .await
    }

    pub async fn list_expired(&self) -> Result<Vec<MedicineResponse>, Error> {
        self.get("fetch expired medicines", &["expired"], &[]).await
    }

    pub async fn list_low_stock(&self, threshold: u32) -> Result<Vec<MedicineResponse>, Error> {
        self.get(
            "fetch low stock medicines",
            &["low-stock"],
            &[("threshold", threshold.to_string())],
        )
        .await
    }
}

/// Leading slice of `body`, cut on a character boundary.
fn body_preview(body: &str) -> &str {
    body.char_indices()
        .nth(BODY_PREVIEW_CHARS)
        .map_or(body, |(end, _)| &body[..end])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn body_preview_respects_multibyte_text() {
        let body = format!("<html>{}</html>", "€".repeat(300));
        let preview = body_preview(&body);
        assert_eq!(preview.chars().count(), BODY_PREVIEW_CHARS);
        assert!(preview.ends_with('€'));

        assert_eq!(body_preview("short"), "short");
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = MedicineClient::from_reqwest(
            "http://localhost:8082/api/medicines/",
            reqwest::Client::new(),
        )
        .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8082/api/medicines");
    }

    #[test]
    fn segments_are_appended_and_encoded() {
        let client =
            MedicineClient::from_reqwest("http://localhost:8082/api/medicines", reqwest::Client::new())
                .unwrap();
        let url = client.url(&["category", "Ayurvedic"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8082/api/medicines/category/Ayurvedic");

        let odd = client.url(&["a b/c"]).unwrap();
        assert_eq!(odd.as_str(), "http://localhost:8082/api/medicines/a%20b%2Fc");
    }

    #[test]
    fn rejects_non_hierarchical_urls() {
        let err = MedicineClient::from_reqwest("mailto:pharmacy@example.com", reqwest::Client::new())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedBaseUrl(_)));
    }
}
