use feedmark_core::{ConvertOptions, UnterminatedLinks};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsConvertOptions {
    flush_unterminated: Option<bool>,
}

#[wasm_bindgen]
pub fn convert(fragment: &str) -> Result<JsValue, JsValue> {
    convert_with_options(fragment, JsValue::UNDEFINED)
}

#[wasm_bindgen(js_name = convertWithOptions)]
pub fn convert_with_options(fragment: &str, options: JsValue) -> Result<JsValue, JsValue> {
    let options = options_from_js(options)?;
    let conversion = feedmark_core::convert_with_options(fragment, &options);
    serde_wasm_bindgen::to_value(&conversion).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn options_from_js(value: JsValue) -> Result<ConvertOptions, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(ConvertOptions::default());
    }
    let parsed: JsConvertOptions =
        serde_wasm_bindgen::from_value(value).map_err(|err| JsValue::from_str(&err.to_string()))?;
    let mut out = ConvertOptions::default();
    if parsed.flush_unterminated == Some(true) {
        out.unterminated_links = UnterminatedLinks::Flush;
    }
    Ok(out)
}
