//! `fetch` plumbing. Every `JsValue` failure becomes a `FetchError` here so
//! nothing browser-shaped leaks into the pipelines.

use js_sys::Promise;
use shoal_core::FetchError;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{RequestCache, RequestInit, RequestMode, Response};

fn network(err: JsValue) -> FetchError {
    FetchError::Network(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// GET `url` and return the body. Non-2xx statuses are errors.
pub async fn fetch_text(url: &str) -> Result<String, FetchError> {
    let window = web_sys::window().ok_or_else(|| FetchError::Network("no window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(network)?
        .dyn_into()
        .map_err(network)?;
    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }
    let body = JsFuture::from(response.text().map_err(network)?)
        .await
        .map_err(network)?;
    body.as_string()
        .ok_or_else(|| FetchError::Network("response body is not text".into()))
}

/// Whether the browser can answer `url` from its HTTP cache without the
/// network. Cross-origin urls cannot be probed and report `false`.
pub async fn probe_cached(url: &str) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let init = RequestInit::new();
    init.set_method("HEAD");
    init.set_cache(RequestCache::OnlyIfCached);
    init.set_mode(RequestMode::SameOrigin);
    match JsFuture::from(window.fetch_with_str_and_init(url, &init)).await {
        Ok(value) => value.dyn_into::<Response>().map(|r| r.ok()).unwrap_or(false),
        Err(_) => false,
    }
}

/// Resolve after `ms` milliseconds.
pub async fn sleep(ms: u32) {
    let promise = Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window().and_then(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32)
                .ok()
        });
        if scheduled.is_none() {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = JsFuture::from(promise).await;
}
