//! Builds nested maps from listing events

use crate::listing::event::{ListingEvent, Tokenizer};
use std::collections::HashMap;

/// A parsed listing scope: keys mapped to scalars or nested objects.
pub type ListingObject = HashMap<String, ListingValue>;

/// One value inside a [`ListingObject`].
#[derive(Debug, Clone, PartialEq)]
pub enum ListingValue {
    Scalar(String),
    Object(ListingObject),
}

impl ListingValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ListingValue::Scalar(value) => Some(value),
            ListingValue::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&ListingObject> {
        match self {
            ListingValue::Scalar(_) => None,
            ListingValue::Object(object) => Some(object),
        }
    }
}

/// Parses brace-nested listing output into a tree of maps.
///
/// Repeated keys within one scope keep the last occurrence. Malformed input
/// never fails: scopes still open at end of input are kept with whatever
/// they accumulated, and stray close braces are ignored.
pub fn parse(output: &str) -> ListingObject {
    let mut root = ListingObject::new();
    let mut stack: Vec<(String, ListingObject)> = Vec::new();

    for event in Tokenizer::new(output) {
        match event {
            ListingEvent::Enter { key } => {
                stack.push((key, ListingObject::new()));
            }
            ListingEvent::Pair { key, value } => {
                let target = match stack.last_mut() {
                    Some((_, object)) => object,
                    None => &mut root,
                };
                target.insert(key, ListingValue::Scalar(value));
            }
            ListingEvent::Exit => {
                close_scope(&mut stack, &mut root);
            }
        }
    }

    while !stack.is_empty() {
        close_scope(&mut stack, &mut root);
    }

    root
}

fn close_scope(stack: &mut Vec<(String, ListingObject)>, root: &mut ListingObject) {
    if let Some((key, object)) = stack.pop() {
        let parent = match stack.last_mut() {
            Some((_, object)) => object,
            None => root,
        };
        parent.insert(key, ListingValue::Object(object));
    }
}

/// Parses the output of a `list` command for a single object.
///
/// Such output is one top-level block whose key repeats the object's module
/// path and name; the caller already knows both, so the wrapper is peeled off
/// and the object's own properties are returned. Output with any other shape
/// is returned as [`parse`] produced it.
pub fn parse_listed(output: &str) -> ListingObject {
    let mut tree = parse(output);
    if tree.len() == 1 {
        if let Some(key) = tree.keys().next().cloned() {
            match tree.remove(&key) {
                Some(ListingValue::Object(inner)) => return inner,
                Some(value) => {
                    tree.insert(key, value);
                }
                None => {}
            }
        }
    }
    tree
}

/// Renders a tree back into listing text, four-space indented.
///
/// Key order follows map iteration and is not stable, but [`parse`] of the
/// result always reproduces the input tree.
pub fn render(tree: &ListingObject) -> String {
    let mut out = String::new();
    render_into(tree, 0, &mut out);
    out
}

fn render_into(tree: &ListingObject, level: usize, out: &mut String) {
    let pad = "    ".repeat(level);
    for (key, value) in tree {
        match value {
            ListingValue::Scalar(scalar) => {
                out.push_str(&format!("{pad}{key} {scalar}\n"));
            }
            ListingValue::Object(object) => {
                out.push_str(&format!("{pad}{key} {{\n"));
                render_into(object, level + 1, out);
                out.push_str(&format!("{pad}}}\n"));
            }
        }
    }
}
