//! Minimal path expressions over [`Element`] trees
//!
//! Supports the subset the response shapes need: `/` child steps, `//`
//! descendant steps, and `*` as a name wildcard. Results keep document order
//! and never contain the same element twice.

use std::ptr;

use super::Element;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step<'p> {
    Child(&'p str),
    Descendant(&'p str),
}

impl Step<'_> {
    fn matches(&self, element: &Element) -> bool {
        let name = match self {
            Step::Child(name) | Step::Descendant(name) => *name,
        };
        name == "*" || element.name() == name
    }
}

fn parse_steps(path: &str) -> Vec<Step<'_>> {
    let mut steps = Vec::new();
    let mut descendant = false;

    for (i, segment) in path.split('/').enumerate() {
        let segment = segment.trim();
        if segment.is_empty() {
            // A leading "/" only anchors the path; any later empty segment is "//"
            if i > 0 {
                descendant = true;
            }
            continue;
        }

        steps.push(if descendant {
            Step::Descendant(segment)
        } else {
            Step::Child(segment)
        });
        descendant = false;
    }

    steps
}

/// Evaluate `path` with the document root as the only top-level node
pub(super) fn select_from_document<'a>(root: &'a Element, path: &str) -> Vec<&'a Element> {
    let steps = parse_steps(path);
    let Some((first, rest)) = steps.split_first() else {
        return Vec::new();
    };

    let context = match first {
        Step::Child(_) if first.matches(root) => vec![root],
        Step::Child(_) => Vec::new(),
        Step::Descendant(_) => {
            let mut matched = Vec::new();
            if first.matches(root) {
                matched.push(root);
            }
            matched.extend(root.descendants().into_iter().filter(|e| first.matches(e)));
            matched
        }
    };

    apply_steps(context, rest)
}

/// Evaluate `path` relative to `element`
pub(super) fn select_from_element<'a>(element: &'a Element, path: &str) -> Vec<&'a Element> {
    apply_steps(vec![element], &parse_steps(path))
}

fn apply_steps<'a>(mut context: Vec<&'a Element>, steps: &[Step<'_>]) -> Vec<&'a Element> {
    for step in steps {
        let mut next: Vec<&'a Element> = Vec::new();

        for node in &context {
            match step {
                Step::Child(_) => {
                    next.extend(node.children().iter().filter(|c| step.matches(c)));
                }
                Step::Descendant(_) => {
                    for candidate in node.descendants() {
                        if step.matches(candidate) && !next.iter().any(|e| ptr::eq(*e, candidate))
                        {
                            next.push(candidate);
                        }
                    }
                }
            }
        }

        if next.is_empty() {
            return next;
        }
        context = next;
    }

    context
}
