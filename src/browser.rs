use crate::config::game::{CANVAS_HEIGHT, CANVAS_WIDTH};
use anyhow::{anyhow, Result};
use futures::channel::oneshot::channel;
use serde::de::DeserializeOwned;
use std::future::Future;
use wasm_bindgen::closure::{Closure, WasmClosure, WasmClosureFnOnce};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

#[rustfmt::skip]
use web_sys::{
    CanvasRenderingContext2d,
    Document,
    Element,
    HtmlCanvasElement,
    HtmlImageElement,
    Response,
    Window,
};

// ==================== Logging ====================
// Console output only exists inside the browser, so these must never be
// reached from the simulation (host tests would panic on the JS import).
macro_rules! log {
    ($($t:tt)*) => {
        web_sys::console::log_1(&format!($($t)*).into())
    }
}

macro_rules! error {
    ($($t:tt)*) => {
        web_sys::console::error_1(&format!($($t)*).into())
    }
}

// ==================== Page ====================
mod html {
    pub const CANVAS_ID: &str = "canvas";
    pub const CONTEXT_2D: &str = "2d";
}

pub type LoopClosure = Closure<dyn FnMut(f64)>;

pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| anyhow!("Window not found"))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| anyhow!("No Document Found"))
}

/// Optional page elements (touch buttons) are simply absent on some pages
pub fn element_by_id(id: &str) -> Option<Element> {
    document().ok()?.get_element_by_id(id)
}

/// The page canvas, resized to the logical play field. Collision math
/// assumes 800x500 regardless of how CSS stretches it.
pub fn canvas() -> Result<HtmlCanvasElement> {
    let canvas = element_by_id(html::CANVAS_ID)
        .ok_or_else(|| anyhow!("Page has no <canvas id=\"{}\">", html::CANVAS_ID))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|element| anyhow!("#{} is not a canvas : {:#?}", html::CANVAS_ID, element))?;
    canvas.set_width(CANVAS_WIDTH as u32);
    canvas.set_height(CANVAS_HEIGHT as u32);
    Ok(canvas)
}

pub fn context() -> Result<CanvasRenderingContext2d> {
    canvas()?
        .get_context(html::CONTEXT_2D)
        // Result<Option<Object>, JsValue> : both the error and the None
        // end up as anyhow errors
        .map_err(|js_value| anyhow!("Canvas refused a 2d context : {:#?}", js_value))?
        .ok_or_else(|| anyhow!("Canvas has no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|object| anyhow!("{:#?} is not a CanvasRenderingContext2d", object))
}

pub fn create_html_image_element() -> Result<HtmlImageElement> {
    HtmlImageElement::new()
        .map_err(|err| anyhow!("Could not create image element : {:#?}", err))
}

pub fn closure_once<F, A, R>(f: F) -> Closure<F::FnMut>
where
    F: 'static + WasmClosureFnOnce<A, R>,
{
    Closure::once(f)
}

pub fn closure_wrap<T: WasmClosure + ?Sized>(data: Box<T>) -> Closure<T> {
    Closure::wrap(data)
}

pub fn spawn_local<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

/// GET `json_path` and deserialize the body. Non-2xx answers are errors,
/// so a missing file never reaches serde.
pub async fn fetch_json<T>(json_path: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let resp: Response = fetch_with_str(json_path)
        .await?
        .dyn_into()
        .map_err(|value| anyhow!("{} : expected a Response, got {:#?}", json_path, value))?;
    if !resp.ok() {
        return Err(anyhow!("{} responded with status {}", json_path, resp.status()));
    }

    let body = resp
        .json()
        .map_err(|err| anyhow!("{} : body is not JSON : {:#?}", json_path, err))?;
    let value = JsFuture::from(body)
        .await
        .map_err(|err| anyhow!("{} : reading body failed : {:#?}", json_path, err))?;

    serde_wasm_bindgen::from_value(value)
        .map_err(|err| anyhow!("{} : unexpected shape : {}", json_path, err))
}

async fn fetch_with_str(resource: &str) -> Result<JsValue> {
    JsFuture::from(window()?.fetch_with_str(resource))
        .await
        .map_err(|err| anyhow!("Error fetching {} : {:#?}", resource, err))
}

pub fn now() -> Result<f64> {
    Ok(window()?
        .performance()
        .ok_or_else(|| anyhow!("Performance object not found"))?
        .now())
}

pub fn create_raf_closure(f: impl FnMut(f64) + 'static) -> LoopClosure {
    closure_wrap(Box::new(f) as Box<dyn FnMut(f64)>)
}

pub fn request_animation_frame(callback: &LoopClosure) -> Result<i32> {
    window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(|err| anyhow!("Cannot request animation frame : {:#?}", err))
}

/// Resolves after `millis`, backed by setTimeout
pub async fn sleep(millis: i32) -> Result<()> {
    let (tx, rx) = channel::<()>();
    let callback = closure_once(move || {
        let _ = tx.send(());
    });
    window()?
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            millis,
        )
        .map_err(|err| anyhow!("Cannot set timeout : {:#?}", err))?;
    // keep callback alive until the timer fires
    callback.forget();

    rx.await
        .map_err(|err| anyhow!("Timer channel dropped : {:#?}", err))
}
