use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures talking to the browser surface the graph is drawn on.
#[derive(Debug, Error)]
pub enum SurfaceError {
	/// Not running in a browser window.
	#[error("no global `window` exists")]
	NoWindow,
	/// The window reported a non-numeric size.
	#[error("window {0} is not a number")]
	BadDimension(&'static str),
	/// An event could not be tied to an element.
	#[error("event has no element target")]
	NoTarget,
	/// A DOM call threw.
	#[error("javascript error: {0}")]
	Js(String),
}

impl From<JsValue> for SurfaceError {
	fn from(value: JsValue) -> Self {
		Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
