use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures while attaching the widget to the page. Interactions themselves
/// cannot fail once mounted.
#[derive(Debug, Error)]
pub enum MountError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("no element matches selector `{0}`")]
    MissingElement(String),
    #[error("element matching `{0}` is not an HTMLElement")]
    NotHtmlElement(String),
    #[error("invalid selector `{selector}`: {message}")]
    BadSelector { selector: String, message: String },
    #[error("failed to attach `{event}` listener: {message}")]
    Listener { event: &'static str, message: String },
    #[error("invalid widget config: {0}")]
    Config(#[from] ConfigError),
}

/// A configuration value that would break the easing or the reject flow.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed JSON: {0}")]
    Json(String),
    #[error("`{field}` must be {rule}, got {value}")]
    OutOfRange {
        field: &'static str,
        rule: &'static str,
        value: f64,
    },
}

impl From<MountError> for JsValue {
    fn from(err: MountError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Best-effort text for a `JsValue` error.
pub(crate) fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_selector() {
        let err = MountError::MissingElement(".face-slider".into());
        assert_eq!(err.to_string(), "no element matches selector `.face-slider`");
        let err = MountError::BadSelector {
            selector: "..".into(),
            message: "SyntaxError".into(),
        };
        assert!(err.to_string().contains("`..`"));
        let err = MountError::from(ConfigError::OutOfRange {
            field: "snap_epsilon",
            rule: "> 0",
            value: 0.0,
        });
        assert_eq!(
            err.to_string(),
            "invalid widget config: `snap_epsilon` must be > 0, got 0"
        );
    }
}
