/// Mesh text over the browser's fetch API
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, Window};
use wireview_core::LoadError;

pub async fn fetch_text(window: &Window, url: &str) -> Result<String, LoadError> {
    let transport = |err: JsValue| LoadError::Transport {
        reference: url.to_string(),
        message: describe(&err),
    };

    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(transport)?
        .dyn_into::<Response>()
        .map_err(transport)?;

    if !response.ok() {
        return Err(LoadError::Status {
            reference: url.to_string(),
            status: response.status(),
        });
    }

    let text = JsFuture::from(response.text().map_err(transport)?)
        .await
        .map_err(transport)?;

    text.as_string().ok_or_else(|| LoadError::Transport {
        reference: url.to_string(),
        message: "response body is not text".to_string(),
    })
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| String::from(err.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}
