//! Extensions
//!
//! Side-channel data attached to an element. The core preserves
//! extensions in order without interpreting them; modifier extensions
//! carry the stronger contract that a consumer which does not recognize
//! one must reject the containing element rather than ignore it.

use crate::element::Node;

#[derive(Debug, Clone, PartialEq)]
pub struct Extension {
    /// Identity of the extension
    pub url: String,

    /// Carried value, if any
    pub value: Option<Node>,
}

impl Extension {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<Node>) -> Self {
        self.value = Some(value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn carries_value() {
        let ext = Extension::new("http://example.org/ext/flag")
            .with_value(Value::boolean(true));
        assert_eq!(ext.url, "http://example.org/ext/flag");
        assert!(matches!(ext.value, Some(Node::Value(Value::Boolean(true)))));
    }
}
