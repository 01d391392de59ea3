//! REST API Client
//!
//! Frontend bindings to the backend endpoints, organized by domain.
//! Every call goes through [`ApiClient`], which adds the token header,
//! builds the URL, and turns error bodies into [`ApiError`].

mod auth;
mod items;
mod reference;
mod requests;
mod schedule;
mod tasks;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortSignal, FormData, Headers, RequestInit, Response};

use crate::error::ApiError;

// Re-export all public items
pub use auth::*;
pub use items::*;
pub use reference::*;
pub use requests::*;
pub use schedule::*;
pub use tasks::*;

/// Characters kept verbatim in query values and path segments
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Upper bound on `next` links followed for one list
const MAX_PAGES: usize = 50;

// ========================
// Response Shapes
// ========================

/// List endpoints answer either paginated or with a bare array
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Paginated {
        results: Vec<T>,
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
    },
    Bare(Vec<T>),
}

impl<T> ListResponse<T> {
    /// Items of this page plus the link to the next one
    pub fn into_parts(self) -> (Vec<T>, Option<String>) {
        match self {
            Self::Paginated { results, next, .. } => (results, next.filter(|n| !n.is_empty())),
            Self::Bare(items) => (items, None),
        }
    }
}

/// Decode a response body; an empty body (204) reads as `null`
pub fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

// ========================
// URL Helpers
// ========================

/// Fill `{name}` placeholders with encoded values
pub fn expand_path(template: &str, params: &[(&str, &str)]) -> String {
    params.iter().fold(template.to_string(), |path, (name, value)| {
        path.replace(&format!("{{{}}}", name), &utf8_percent_encode(value, COMPONENT).to_string())
    })
}

/// Join base and path and append non-empty query pairs
pub fn build_url(base: &str, path: &str, query: &[(&str, &str)]) -> String {
    let mut url = if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
    };
    let pairs: Vec<String> = query
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{}={}", k, utf8_percent_encode(v, COMPONENT)))
        .collect();
    if !pairs.is_empty() {
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(&pairs.join("&"));
    }
    url
}

// ========================
// Client
// ========================

enum Body {
    Empty,
    Json(String),
    Form(FormData),
}

/// Token-authenticated client for the backend
#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), token }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str, query: &[(&str, &str)]) -> String {
        build_url(&self.base_url, path, query)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, ApiError> {
        let body = self.send("GET", &self.url(path, query), Body::Empty, None).await?;
        decode_json(&body)
    }

    /// Fetch every page of a list endpoint
    pub async fn get_list<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<T>, ApiError> {
        self.get_list_with_signal(path, query, None).await
    }

    pub async fn get_list_with_signal<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        signal: Option<&AbortSignal>,
    ) -> Result<Vec<T>, ApiError> {
        let mut url = self.url(path, query);
        let mut all = Vec::new();
        for _ in 0..MAX_PAGES {
            let body = self.send("GET", &url, Body::Empty, signal).await?;
            let (mut page, next) = decode_json::<ListResponse<T>>(&body)?.into_parts();
            all.append(&mut page);
            match next {
                Some(next) => url = build_url(&self.base_url, &next, &[]),
                None => return Ok(all),
            }
        }
        log::warn!("[API] {} stopped after {} pages", path, MAX_PAGES);
        Ok(all)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let text = self.send("POST", &self.url(path, &[]), Body::Json(to_json(body)?), None).await?;
        decode_json(&text)
    }

    /// POST without a meaningful response body
    pub async fn post_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.send("POST", &self.url(path, &[]), Body::Json(to_json(body)?), None).await?;
        Ok(())
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let text = self.send("PUT", &self.url(path, &[]), Body::Json(to_json(body)?), None).await?;
        decode_json(&text)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send("DELETE", &self.url(path, &[]), Body::Empty, None).await?;
        Ok(())
    }

    /// Multipart POST; the browser sets the boundary header
    pub async fn post_form<T: DeserializeOwned>(&self, path: &str, form: FormData) -> Result<T, ApiError> {
        let text = self.send("POST", &self.url(path, &[]), Body::Form(form), None).await?;
        decode_json(&text)
    }

    async fn send(&self, method: &str, url: &str, body: Body, signal: Option<&AbortSignal>) -> Result<String, ApiError> {
        let headers = Headers::new().map_err(|e| ApiError::from_js(&e))?;
        headers.set("Accept", "application/json").map_err(|e| ApiError::from_js(&e))?;
        if let Some(token) = &self.token {
            headers
                .set("Authorization", &format!("Token {}", token))
                .map_err(|e| ApiError::from_js(&e))?;
        }

        let init = RequestInit::new();
        init.set_method(method);
        match body {
            Body::Empty => {}
            Body::Json(json) => {
                headers.set("Content-Type", "application/json").map_err(|e| ApiError::from_js(&e))?;
                init.set_body(&JsValue::from_str(&json));
            }
            Body::Form(form) => init.set_body(&form),
        }
        init.set_headers(&headers);
        init.set_signal(signal);

        let request = web_sys::Request::new_with_str_and_init(url, &init).map_err(|e| ApiError::from_js(&e))?;
        let window = web_sys::window().ok_or_else(|| ApiError::Browser("no window".into()))?;

        log::debug!("[API] {} {}", method, url);
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ApiError::from_js(&e))?
            .dyn_into()
            .map_err(|e| ApiError::from_js(&e))?;

        let text_promise = response.text().map_err(|e| ApiError::from_js(&e))?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(|e| ApiError::from_js(&e))?
            .as_string()
            .unwrap_or_default();

        if response.ok() {
            Ok(text)
        } else {
            let err = ApiError::from_response(response.status(), &response.status_text(), &text);
            log::warn!("[API] {} {} failed: {}", method, url, err);
            Err(err)
        }
    }
}

fn to_json<B: Serialize>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_joins_and_encodes() {
        assert_eq!(
            build_url("https://lab.example/", "/api/items/", &[("search", "pipette tips & racks")]),
            "https://lab.example/api/items/?search=pipette%20tips%20%26%20racks"
        );
        assert_eq!(build_url("", "/api/funds/", &[]), "/api/funds/");
    }

    #[test]
    fn test_build_url_skips_empty_values() {
        assert_eq!(
            build_url("", "/api/requests/", &[("status", ""), ("search", "ethanol")]),
            "/api/requests/?search=ethanol"
        );
    }

    #[test]
    fn test_build_url_keeps_absolute_next_links() {
        assert_eq!(
            build_url("https://lab.example", "https://lab.example/api/items/?page=2", &[]),
            "https://lab.example/api/items/?page=2"
        );
        assert_eq!(
            build_url("", "/api/items/?page=2", &[("search", "x")]),
            "/api/items/?page=2&search=x"
        );
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(
            expand_path("/api/requests/{id}/{action}/", &[("id", "12"), ("action", "place_order")]),
            "/api/requests/12/place_order/"
        );
        assert_eq!(expand_path("/api/items/{code}/", &[("code", "A/B")]), "/api/items/A%2FB/");
    }

    #[test]
    fn test_list_response_accepts_both_shapes() {
        let paginated: ListResponse<u32> =
            decode_json(r#"{"count": 3, "next": "/api/x/?page=2", "previous": null, "results": [1, 2]}"#).unwrap();
        assert_eq!(paginated.into_parts(), (vec![1, 2], Some("/api/x/?page=2".to_string())));

        let bare: ListResponse<u32> = decode_json("[4, 5, 6]").unwrap();
        assert_eq!(bare.into_parts(), (vec![4, 5, 6], None));

        let last_page: ListResponse<u32> = decode_json(r#"{"results": [], "next": null}"#).unwrap();
        assert_eq!(last_page.into_parts(), (vec![], None));
    }

    #[test]
    fn test_decode_error_is_reported() {
        let result: Result<ListResponse<u32>, _> = decode_json(r#"{"unexpected": true}"#);
        assert!(matches!(result, Err(ApiError::Decode(_))));

        let empty: serde_json::Value = decode_json("").unwrap();
        assert!(empty.is_null());
    }

    #[test]
    fn test_client_trims_base() {
        let client = ApiClient::new("https://lab.example/", None);
        assert_eq!(client.base_url(), "https://lab.example");
        assert_eq!(client.url("/api/funds/", &[]), "https://lab.example/api/funds/");
    }
}
