use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlImageElement};

pub fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// Create `<tag class=...>`.
pub fn el(doc: &Document, tag: &str, class: &str) -> Result<Element, JsValue> {
    let node = doc.create_element(tag)?;
    if !class.is_empty() {
        node.set_class_name(class);
    }
    Ok(node)
}

/// Like [`el`] with text content. Text is never parsed as markup.
pub fn text_el(doc: &Document, tag: &str, class: &str, text: &str) -> Result<Element, JsValue> {
    let node = el(doc, tag, class)?;
    node.set_text_content(Some(text));
    Ok(node)
}

pub fn clear(node: &Element) {
    node.set_text_content(None);
}

pub fn set_style(node: &Element, property: &str, value: &str) {
    if let Some(html) = node.dyn_ref::<HtmlElement>() {
        if let Err(err) = html.style().set_property(property, value) {
            log::debug!("dom: style {property} rejected: {err:?}");
        }
    }
}

pub fn set_visible(node: &Element, visible: bool) {
    set_style(node, "display", if visible { "" } else { "none" });
}

/// Element `id`, created under `<body>` when absent.
pub fn ensure_element(doc: &Document, id: &str, tag: &str) -> Result<Element, JsValue> {
    if let Some(existing) = doc.get_element_by_id(id) {
        return Ok(existing);
    }
    let node = doc.create_element(tag)?;
    node.set_id(id);
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
    body.append_child(&node)?;
    Ok(node)
}

/// Install a `<style id=...>` in `<head>` once.
pub fn ensure_style(doc: &Document, id: &str, css: &str) -> Result<(), JsValue> {
    if doc.get_element_by_id(id).is_some() {
        return Ok(());
    }
    let style = doc.create_element("style")?;
    style.set_id(id);
    style.set_text_content(Some(css));
    match doc.head() {
        Some(head) => head.append_child(&style)?,
        None => doc
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&style)?,
    };
    Ok(())
}

/// Swap `img` to `fallback` the first time it fails, then stop listening
/// so a broken fallback cannot loop. `on_fallback` runs after the swap.
pub fn on_error_once(img: &HtmlImageElement, fallback: &str, on_fallback: impl FnOnce() + 'static) {
    let target = img.clone();
    let fallback = fallback.to_string();
    let on_error = Closure::once_into_js(move || {
        target.set_onerror(None);
        target.set_src(&fallback);
        on_fallback();
    });
    img.set_onerror(Some(on_error.unchecked_ref()));
}

pub fn image_with_fallback(doc: &Document, class: &str, src: &str, alt: &str, fallback: &str) -> Result<HtmlImageElement, JsValue> {
    let img: HtmlImageElement = el(doc, "img", class)?.dyn_into()?;
    img.set_alt(alt);
    on_error_once(&img, fallback, || {});
    img.set_src(src);
    Ok(img)
}

/// Wire a click handler for the lifetime of the page.
pub fn on_click(node: &Element, handler: impl FnMut() + 'static) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut()>::new(handler);
    node.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

pub fn reload_page() {
    if let Some(window) = web_sys::window() {
        if let Err(err) = window.location().reload() {
            log::error!("dom: reload failed: {err:?}");
        }
    }
}
