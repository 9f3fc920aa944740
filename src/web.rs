//! Browser page: header buttons, viewer container, error banner and the PNG
//! download.
//!
//! Button clicks are turned into [`ViewerEvent::Action`]s on the event loop,
//! so all state changes happen in the application handler.

use wasm_bindgen::{JsCast, JsValue, prelude::Closure};
use web_sys::{Document, HtmlCanvasElement};
use winit::event_loop::EventLoopProxy;

use crate::{app::ViewerEvent, config::ViewerConfig, controls::Action};

const BANNER_CLASS: &str = "error-message";
const HEADER_STYLE: &str = "height:40px;display:flex;gap:8px;align-items:center;padding:0 8px";
const BANNER_STYLE: &str = "position:fixed;top:48px;left:50%;transform:translateX(-50%);\
    background:#c0392b;color:#fff;padding:8px 16px;border-radius:4px;\
    font-family:sans-serif;z-index:10";

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// Build the header and the viewer container and return the canvas to render into.
pub fn mount(
    config: &ViewerConfig,
    proxy: &EventLoopProxy<ViewerEvent>,
) -> Result<HtmlCanvasElement, JsValue> {
    let document = document()?;
    let root = match document.get_element_by_id(&config.container_id) {
        Some(root) => root,
        None => document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .into(),
    };

    let header = document.create_element("header")?;
    header.set_attribute("style", HEADER_STYLE)?;
    for action in Action::ALL {
        let button = document.create_element("button")?;
        button.set_id(action.element_id());
        button.set_text_content(Some(action.label()));
        let proxy = proxy.clone();
        let on_click = Closure::<dyn FnMut()>::new(move || {
            if let Err(e) = proxy.send_event(ViewerEvent::Action(action)) {
                log::error!("Event loop is gone: {}", e);
            }
        });
        button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        // Buttons live as long as the page.
        on_click.forget();
        header.append_child(&button)?;
    }
    root.append_child(&header)?;

    let container = document.create_element("div")?;
    container.set_class_name("viewer-container");
    container.set_attribute("style", "width:100vw;height:calc(100vh - 40px)")?;
    let canvas = document.create_element("canvas")?;
    canvas.set_id(&config.canvas_id);
    canvas.set_attribute("style", "width:100%;height:100%;display:block")?;
    container.append_child(&canvas)?;
    root.append_child(&container)?;

    canvas.dyn_into::<HtmlCanvasElement>().map_err(JsValue::from)
}

/// Show `message` in the banner, replacing any visible one, and remove it
/// after `duration_ms`.
pub fn show_banner(message: &str, duration_ms: i32) -> Result<(), JsValue> {
    let document = document()?;
    if let Some(previous) = document.query_selector(&format!(".{}", BANNER_CLASS))? {
        previous.remove();
    }
    let banner = document.create_element("div")?;
    banner.set_class_name(BANNER_CLASS);
    banner.set_attribute("style", BANNER_STYLE)?;
    banner.set_text_content(Some(message));
    document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?
        .append_child(&banner)?;

    let remove = Closure::once_into_js(move || banner.remove());
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            remove.unchecked_ref(),
            duration_ms,
        )?;
    Ok(())
}

/// Offer `png` as a download named `file_name`.
pub fn download_png(png: &[u8], file_name: &str) -> Result<(), JsValue> {
    let document = document()?;
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(png));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("image/png");
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let link = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(JsValue::from)?;
    link.set_href(&url);
    link.set_download(file_name);
    link.click();
    web_sys::Url::revoke_object_url(&url)?;
    Ok(())
}
