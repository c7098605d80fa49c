use thiserror::Error;
use wasm_bindgen::JsValue;

/// Rejected scene configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("particle count must be positive")]
    EmptyPopulation,

    #[error("{name} must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} must lie in [0, 1], got {value}")]
    OpacityRange { name: &'static str, value: f64 },

    #[error("cell size {cell_size} is smaller than connection distance {connection_distance}")]
    CellTooSmall {
        cell_size: f64,
        connection_distance: f64,
    },

    #[error("invalid options object: {0}")]
    Options(String),
}

/// Resume data that could not be turned into page content.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    #[error("document is empty")]
    Empty,

    #[error("top-level document is not a mapping")]
    NotAMapping,
}

/// Failures talking to the browser host.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("no global `window`")]
    NoWindow,

    #[error("window has no `document`")]
    NoDocument,

    #[error("no element with id `{0}`")]
    MissingElement(String),

    #[error("element `{0}` has the wrong type")]
    WrongElementType(String),

    #[error("canvas has no 2d context")]
    NoContext,

    #[error("request for `{url}` failed with status {status}")]
    Http { url: String, status: u16 },

    #[error("javascript error: {0}")]
    Js(String),
}

impl WebError {
    pub fn js(value: JsValue) -> WebError {
        match value.as_string() {
            Some(message) => WebError::Js(message),
            None => WebError::Js(format!("{:?}", value)),
        }
    }
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}

impl From<ConfigError> for JsValue {
    fn from(err: ConfigError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}
