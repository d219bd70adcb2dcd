//! Off-DOM image loads. Each load is a promise resolving to `true` on
//! `load` and `false` on `error`; it never rejects.

use js_sys::{Array, Function, Promise};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

fn settle(resolve: &Function, loaded: bool) -> JsValue {
    let resolve = resolve.clone();
    Closure::once_into_js(move || {
        let _ = resolve.call1(&JsValue::NULL, &JsValue::from_bool(loaded));
    })
}

fn load_promise(url: &str) -> Promise {
    Promise::new(&mut |resolve, _reject| {
        let Ok(img) = HtmlImageElement::new() else {
            let _ = resolve.call1(&JsValue::NULL, &JsValue::FALSE);
            return;
        };
        let on_load = settle(&resolve, true);
        let on_error = settle(&resolve, false);
        img.set_onload(Some(on_load.unchecked_ref()));
        img.set_onerror(Some(on_error.unchecked_ref()));
        img.set_src(url);
    })
}

/// Load every url concurrently; the result is in input order.
pub async fn load_all(urls: &[String]) -> Vec<bool> {
    let promises: Array = urls.iter().map(|url| JsValue::from(load_promise(url))).collect();
    match JsFuture::from(Promise::all(&promises)).await {
        Ok(values) => Array::from(&values)
            .iter()
            .map(|v| v.as_bool().unwrap_or(false))
            .collect(),
        Err(_) => vec![false; urls.len()],
    }
}
