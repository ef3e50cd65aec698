//! Outline rendering for `cuprum inspect`
//!
//! A visitor that prints one indented line per node, using the descent
//! gate to honor a depth limit.

use cuprum_model::{Element, Reference, Value};
use cuprum_visit::Visitor;
use std::fmt::Write;

pub struct OutlinePrinter {
    out: String,
    depth: usize,
    max_depth: Option<usize>,
}

impl OutlinePrinter {
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            out: String::new(),
            depth: 0,
            max_depth,
        }
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn label(name: &str, index: Option<usize>) -> String {
        match index {
            Some(i) => format!("{}[{}]", name, i),
            None => name.to_string(),
        }
    }
}

impl Visitor for OutlinePrinter {
    fn visit_start(&mut self, name: &str, index: Option<usize>, element: &Element) {
        let mut line = Self::label(name, index);
        let _ = write!(line, " ({})", element.type_name());
        if let Some(id) = element.id() {
            let _ = write!(line, " id={}", id);
        }
        self.line(&line);
        self.depth += 1;
    }

    fn visit(&mut self, _name: &str, _index: Option<usize>, _element: &Element) -> bool {
        match self.max_depth {
            Some(max) => self.depth <= max,
            None => true,
        }
    }

    fn visit_end(&mut self, _name: &str, _index: Option<usize>, _element: &Element) {
        self.depth -= 1;
    }

    fn visit_value(&mut self, name: &str, index: Option<usize>, value: &Value) {
        let line = format!(
            "{}: {} ({})",
            Self::label(name, index),
            value,
            value.type_name()
        );
        self.line(&line);
    }

    fn visit_reference(&mut self, name: &str, index: Option<usize>, reference: &Reference) {
        let target = reference.reference.as_deref().unwrap_or("(logical)");
        let line = format!("{}: -> {}", Self::label(name, index), target);
        self.line(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuprum_model::Element;
    use cuprum_schema::{Cardinality, FieldDef, FieldKind, PrimitiveKind, TypeKind, TypeSchema};
    use cuprum_visit::walk;
    use std::sync::Arc;

    fn tree() -> Element {
        let inner = Arc::new(TypeSchema::new("Coding", TypeKind::Complex).field(
            FieldDef::new(
                "code",
                FieldKind::Primitive(PrimitiveKind::Code),
                Cardinality::optional(),
            ),
        ));
        let outer = Arc::new(TypeSchema::new("CodeableConcept", TypeKind::Complex).field(
            FieldDef::new(
                "coding",
                FieldKind::Complex("Coding".into()),
                Cardinality::repeating(),
            ),
        ));
        let coding = Element::builder(inner)
            .set("code", Value::code("active").unwrap())
            .build()
            .unwrap();
        Element::builder(outer).add("coding", coding).build().unwrap()
    }

    #[test]
    fn renders_indented_outline() {
        let mut printer = OutlinePrinter::new(None);
        walk("CodeableConcept", &tree(), &mut printer);
        let text = printer.into_string();
        assert_eq!(
            text,
            "CodeableConcept (CodeableConcept)\n  coding[0] (Coding)\n    code: active (code)\n"
        );
    }

    #[test]
    fn depth_limit_prunes_children() {
        let mut printer = OutlinePrinter::new(Some(1));
        walk("CodeableConcept", &tree(), &mut printer);
        let text = printer.into_string();
        assert!(text.contains("coding[0]"));
        assert!(!text.contains("code: active"));
    }
}
