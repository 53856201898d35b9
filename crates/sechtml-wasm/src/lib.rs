use std::sync::Arc;

use sechtml_core::{OsRandom, RandomSource, RendererConfig};
use sechtml_widgets::{Button, ButtonConfig};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderOptions {
    nonce: Option<String>,
    sanitize: Option<bool>,
}

#[wasm_bindgen]
pub fn render_button(button: JsValue) -> Result<String, JsValue> {
    render_button_with_options(button, JsValue::UNDEFINED)
}

#[wasm_bindgen]
pub fn render_button_with_options(button: JsValue, options: JsValue) -> Result<String, JsValue> {
    let config: ButtonConfig = serde_wasm_bindgen::from_value(button).map_err(to_js_error)?;
    let mut rendered = render_all(vec![config], options)?;
    Ok(rendered.pop().unwrap_or_default())
}

#[wasm_bindgen]
pub fn render_buttons(buttons: JsValue, options: JsValue) -> Result<Vec<String>, JsValue> {
    let configs: Vec<ButtonConfig> = serde_wasm_bindgen::from_value(buttons).map_err(to_js_error)?;
    render_all(configs, options)
}

fn render_all(configs: Vec<ButtonConfig>, options: JsValue) -> Result<Vec<String>, JsValue> {
    let renderer_config = renderer_config_from_js(options)?;
    let random: Arc<dyn RandomSource> = Arc::new(OsRandom::new().map_err(to_js_error)?);
    let renderer = Arc::new(renderer_config.build(Arc::clone(&random)));

    configs
        .into_iter()
        .map(|config| {
            Button::new(config, Arc::clone(&renderer), Arc::clone(&random))
                .to_html()
                .map_err(to_js_error)
        })
        .collect()
}

fn renderer_config_from_js(value: JsValue) -> Result<RendererConfig, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(RendererConfig::default());
    }
    let parsed: RenderOptions = serde_wasm_bindgen::from_value(value).map_err(to_js_error)?;
    let mut out = RendererConfig::default();
    if let Some(nonce) = parsed.nonce {
        out = out.with_processor(sechtml_core::ProcessorConfig::Nonce { nonce });
    }
    if parsed.sanitize.unwrap_or(false) {
        out = out.with_processor(sechtml_core::ProcessorConfig::Sanitize);
    }
    Ok(out)
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
