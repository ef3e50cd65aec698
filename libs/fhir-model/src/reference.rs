//! Reference values
//!
//! A [`Reference`] names another entity by a logical pointer plus an
//! optional literal type tag. Target-type resolution prefers the inline
//! tag; failing that it reads the type segment out of a `/`-separated
//! literal; anything else stays unresolved and reference-type checking
//! skips it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reference {
    /// Literal pointer, e.g. "Patient/123" or an absolute URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Explicit target type tag
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,

    /// Human-readable label for the target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    /// Reference by literal pointer
    pub fn to(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, type_tag: impl Into<String>) -> Self {
        self.type_tag = Some(type_tag.into());
        self
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.reference.is_none() && self.type_tag.is_none() && self.display.is_none()
    }

    /// Resolve the declared target type, if it can be determined
    /// statically.
    ///
    /// The inline type tag wins. Otherwise the literal is split on `/`
    /// and the segment before the final id segment is taken, provided it
    /// looks like a type name; this covers both "Patient/123" and
    /// "http://example.org/fhir/Patient/123". Fragments, urns, and
    /// purely logical identifiers resolve to `None`.
    pub fn target_type(&self) -> Option<&str> {
        if let Some(tag) = self.type_tag.as_deref() {
            return Some(tag);
        }

        let literal = self.reference.as_deref()?;
        if literal.starts_with('#') || literal.starts_with("urn:") {
            return None;
        }

        let segments: Vec<&str> = literal.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() < 2 {
            return None;
        }
        let candidate = segments[segments.len() - 2];
        if is_type_name(candidate) {
            Some(candidate)
        } else {
            None
        }
    }
}

fn is_type_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_tag_wins() {
        let r = Reference::to("Patient/123").with_type("Group");
        assert_eq!(r.target_type(), Some("Group"));
    }

    #[test]
    fn relative_literal() {
        assert_eq!(Reference::to("Patient/123").target_type(), Some("Patient"));
        assert_eq!(Reference::to("Group/5").target_type(), Some("Group"));
    }

    #[test]
    fn absolute_literal() {
        let r = Reference::to("http://example.org/fhir/Patient/123");
        assert_eq!(r.target_type(), Some("Patient"));
    }

    #[test]
    fn unresolvable_literals() {
        assert_eq!(Reference::to("#contained-1").target_type(), None);
        assert_eq!(
            Reference::to("urn:uuid:4c6d6f84-47a2-4fb2-9a1c-2a4a2bd77a09").target_type(),
            None
        );
        assert_eq!(Reference::to("just-an-id").target_type(), None);
        assert_eq!(Reference::to("lowercase/123").target_type(), None);
        assert_eq!(Reference::default().target_type(), None);
    }

    #[test]
    fn emptiness() {
        assert!(Reference::default().is_empty());
        assert!(!Reference::to("Patient/1").is_empty());
        assert!(!Reference::default().with_display("someone").is_empty());
    }
}
