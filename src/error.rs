use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("no global window")]
    NoWindow,
    #[error("no document on window")]
    NoDocument,
    #[error("animation frame scheduling unavailable")]
    SchedulerUnavailable,
    #[error("javascript error: {0}")]
    Js(String),
}

pub type Result<T, E = ResolverError> = std::result::Result<T, E>;

impl From<wasm_bindgen::JsValue> for ResolverError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        let msg = value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}"));
        ResolverError::Js(msg)
    }
}

impl From<ResolverError> for wasm_bindgen::JsValue {
    fn from(err: ResolverError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
