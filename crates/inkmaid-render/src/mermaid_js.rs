//! Mermaid.js renderer for the browser.

use super::{BoxFuture, DiagramRenderer, RenderError, RenderResult};
use inkmaid_core::RenderOptions;
use js_sys::{Function, JSON, Promise, Reflect};
use std::cell::{Cell, RefCell};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlScriptElement;

/// Script loaded when the page does not already provide `window.mermaid`.
pub const MERMAID_CDN_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/mermaid/10.6.1/mermaid.min.js";

/// Renders through the page's Mermaid.js, loading it on first use.
///
/// Note: This is intentionally not Send/Sync since WASM is single-threaded
/// and JS handles are not thread-safe.
pub struct MermaidJs {
    script_url: String,
    options: RenderOptions,
    /// Pending or finished script load, shared by concurrent renders.
    loading: RefCell<Option<Promise>>,
    initialized: Cell<bool>,
}

impl Default for MermaidJs {
    fn default() -> Self {
        Self::new()
    }
}

impl MermaidJs {
    pub fn new() -> Self {
        Self::with_script_url(MERMAID_CDN_URL)
    }

    /// Load Mermaid from a custom URL instead of the CDN.
    pub fn with_script_url(url: impl Into<String>) -> Self {
        Self {
            script_url: url.into(),
            options: RenderOptions::default(),
            loading: RefCell::new(None),
            initialized: Cell::new(false),
        }
    }

    /// Return `window.mermaid`, injecting the script tag if needed.
    async fn mermaid(&self) -> RenderResult<JsValue> {
        let window = web_sys::window()
            .ok_or_else(|| RenderError::Unavailable("No window object".to_string()))?;

        let existing = Reflect::get(&window, &JsValue::from_str("mermaid")).map_err(js_other)?;
        if !existing.is_undefined() && !existing.is_null() {
            return Ok(existing);
        }

        let pending = self.loading.borrow().clone();
        let promise = match pending {
            Some(promise) => promise,
            None => {
                let promise = self.inject_script(&window)?;
                *self.loading.borrow_mut() = Some(promise.clone());
                promise
            }
        };

        if let Err(e) = JsFuture::from(promise).await {
            // Allow a later render to retry the download.
            self.loading.borrow_mut().take();
            return Err(RenderError::Unavailable(format!(
                "Failed to load {}: {}",
                self.script_url,
                js_message(&e)
            )));
        }
        log::info!("Loaded Mermaid from {}", self.script_url);

        let mermaid = Reflect::get(&window, &JsValue::from_str("mermaid")).map_err(js_other)?;
        if mermaid.is_undefined() {
            return Err(RenderError::Unavailable(
                "Mermaid script loaded but window.mermaid is missing".to_string(),
            ));
        }
        Ok(mermaid)
    }

    fn inject_script(&self, window: &web_sys::Window) -> RenderResult<Promise> {
        let document = window
            .document()
            .ok_or_else(|| RenderError::Unavailable("No document".to_string()))?;
        let head = document
            .head()
            .ok_or_else(|| RenderError::Unavailable("No document head".to_string()))?;
        let script: HtmlScriptElement = document
            .create_element("script")
            .map_err(js_other)?
            .dyn_into()
            .map_err(|_| RenderError::Other("script element has the wrong type".to_string()))?;
        script.set_src(&self.script_url);

        let promise = Promise::new(&mut |resolve: Function, reject: Function| {
            script.set_onload(Some(&resolve));
            script.set_onerror(Some(&reject));
        });
        head.append_child(&script).map_err(js_other)?;
        Ok(promise)
    }

    /// Call `mermaid.initialize` once per session.
    fn ensure_initialized(&self, mermaid: &JsValue) -> RenderResult<()> {
        if self.initialized.get() {
            return Ok(());
        }
        let json = serde_json::to_string(&self.options)
            .map_err(|e| RenderError::Other(format!("Failed to encode options: {}", e)))?;
        let config = JSON::parse(&json).map_err(js_other)?;
        Reflect::set(&config, &JsValue::from_str("startOnLoad"), &JsValue::FALSE)
            .map_err(js_other)?;

        let initialize: Function = Reflect::get(mermaid, &JsValue::from_str("initialize"))
            .map_err(js_other)?
            .dyn_into()
            .map_err(|_| RenderError::Unavailable("mermaid.initialize is missing".to_string()))?;
        initialize.call1(mermaid, &config).map_err(js_other)?;
        self.initialized.set(true);
        Ok(())
    }

    async fn render_async(&self, id: &str, source: &str) -> RenderResult<String> {
        let mermaid = self.mermaid().await?;
        self.ensure_initialized(&mermaid)?;

        let render: Function = Reflect::get(&mermaid, &JsValue::from_str("render"))
            .map_err(js_other)?
            .dyn_into()
            .map_err(|_| RenderError::Unavailable("mermaid.render is missing".to_string()))?;

        let outcome = match render.call2(&mermaid, &JsValue::from_str(id), &JsValue::from_str(source)) {
            Ok(value) => match value.dyn_into::<Promise>() {
                Ok(promise) => JsFuture::from(promise).await,
                Err(value) => Ok(value),
            },
            Err(e) => Err(e),
        };
        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                remove_leftover(id);
                return Err(RenderError::Syntax(js_message(&e)));
            }
        };

        Reflect::get(&result, &JsValue::from_str("svg"))
            .map_err(js_other)?
            .as_string()
            .ok_or_else(|| RenderError::Other("mermaid.render returned no svg".to_string()))
    }
}

/// Mermaid leaves a `#d<id>` container behind when a render throws.
fn remove_leftover(id: &str) {
    let leftover = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(&format!("d{}", id)));
    if let Some(element) = leftover {
        element.remove();
    }
}

/// Best-effort human-readable text of a JS exception.
fn js_message(value: &JsValue) -> String {
    Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| value.as_string())
        .unwrap_or_default()
}

fn js_other(value: JsValue) -> RenderError {
    RenderError::Other(js_message(&value))
}

impl DiagramRenderer for MermaidJs {
    fn name(&self) -> &'static str {
        "mermaid-js"
    }

    fn initialize(&mut self, options: &RenderOptions) -> RenderResult<()> {
        self.options = options.clone();
        self.initialized.set(false);
        Ok(())
    }

    fn render(&self, id: &str, source: &str) -> BoxFuture<'_, RenderResult<String>> {
        let id = id.to_string();
        let source = source.to_string();
        Box::pin(async move { self.render_async(&id, &source).await })
    }
}
