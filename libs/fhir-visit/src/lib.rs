//! Uniform pre-order traversal over element trees
//!
//! External consumers (serializers, summarizers, profile checkers) walk
//! any element tree through one [`Visitor`] contract, independent of
//! concrete type. Traversal is synchronous, depth-first, and
//! deterministic: children are visited in field declaration order as
//! fixed by the schema.
//!
//! Callback protocol per element node:
//!
//! 1. [`Visitor::pre_visit`] - gate; `false` skips the entire subtree
//!    (no further events for it).
//! 2. [`Visitor::visit_start`] - unconditional entry announcement.
//! 3. [`Visitor::visit`] - gate; `false` skips the children but
//!    `visit_end`/`post_visit` still fire, enabling "summarize without
//!    descending".
//! 4. Child traversal; primitive and reference children go through the
//!    value-only [`Visitor::visit_value`] / [`Visitor::visit_reference`]
//!    variants.
//! 5. [`Visitor::visit_end`] - unconditional exit, strictly paired with
//!    its `visit_start`.
//! 6. [`Visitor::post_visit`] - fires iff `pre_visit` returned `true`.
//!
//! `index` is `Some(position)` for entries reached through a list field
//! and `None` otherwise.

use cuprum_model::{Element, FieldValue, Node, Reference, Value};

/// Callbacks driven by [`walk`]
pub trait Visitor {
    /// Subtree gate; returning `false` suppresses every event for this
    /// element and its children
    fn pre_visit(&mut self, _element: &Element) -> bool {
        true
    }

    /// Entry announcement, carrying the field name under which this
    /// element was reached
    fn visit_start(&mut self, _name: &str, _index: Option<usize>, _element: &Element) {}

    /// Descent gate; returning `false` skips the children only
    fn visit(&mut self, _name: &str, _index: Option<usize>, _element: &Element) -> bool {
        true
    }

    /// Exit announcement, always paired with the matching `visit_start`
    fn visit_end(&mut self, _name: &str, _index: Option<usize>, _element: &Element) {}

    /// Fires after `visit_end` whenever `pre_visit` gated the element in
    fn post_visit(&mut self, _element: &Element) {}

    /// Primitive child
    fn visit_value(&mut self, _name: &str, _index: Option<usize>, _value: &Value) {}

    /// Reference child
    fn visit_reference(&mut self, _name: &str, _index: Option<usize>, _reference: &Reference) {}
}

/// Walk an element tree depth-first, firing [`Visitor`] callbacks.
///
/// `name` is the field name reported for the root (conventionally the
/// type name for a top-level resource).
pub fn walk<V: Visitor + ?Sized>(name: &str, element: &Element, visitor: &mut V) {
    walk_element(name, None, element, visitor);
}

fn walk_element<V: Visitor + ?Sized>(
    name: &str,
    index: Option<usize>,
    element: &Element,
    visitor: &mut V,
) {
    if !visitor.pre_visit(element) {
        return;
    }
    visitor.visit_start(name, index, element);

    if visitor.visit(name, index, element) {
        for (field, value) in element.fields() {
            match value {
                FieldValue::Single(node) => walk_node(field, None, node, visitor),
                FieldValue::Many(nodes) => {
                    for (i, node) in nodes.iter().enumerate() {
                        walk_node(field, Some(i), node, visitor);
                    }
                }
            }
        }
    }

    visitor.visit_end(name, index, element);
    visitor.post_visit(element);
}

fn walk_node<V: Visitor + ?Sized>(name: &str, index: Option<usize>, node: &Node, visitor: &mut V) {
    match node {
        Node::Value(value) => visitor.visit_value(name, index, value),
        Node::Reference(reference) => visitor.visit_reference(name, index, reference),
        Node::Element(element) => walk_element(name, index, element, visitor),
    }
}
