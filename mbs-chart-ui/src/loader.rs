//! Async retrieval of CSV assets from the app's origin.

use mbs_core::error::DataError;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

/// Fetch a same-origin CSV file and return its body as text.
///
/// Every failure stage maps to [`DataError::Load`]; a failed load is
/// terminal for the pipeline that requested it (no retry).
pub async fn fetch_csv(url: &str) -> Result<String, DataError> {
    let window =
        web_sys::window().ok_or_else(|| DataError::Load("no window object".to_string()))?;

    let response_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|_| DataError::Load(format!("request for {} failed", url)))?;
    let response: Response = response_value
        .dyn_into()
        .map_err(|_| DataError::Load(format!("unexpected fetch result for {}", url)))?;

    if !response.ok() {
        return Err(DataError::Load(format!(
            "HTTP {} for {}",
            response.status(),
            url
        )));
    }

    let text_promise = response
        .text()
        .map_err(|_| DataError::Load(format!("no body for {}", url)))?;
    let body = JsFuture::from(text_promise)
        .await
        .map_err(|_| DataError::Load(format!("reading body of {} failed", url)))?;

    body.as_string()
        .ok_or_else(|| DataError::Load(format!("body of {} is not text", url)))
}
