//! This module contains the rendering of descriptors back to signature text.
//!
//! The name-less, `indexed`-less rendering produced by [`canonical`] is the
//! exact byte string hashed to obtain method identifiers and topic zero, so
//! it must stay stable down to the last comma. The annotated renderings
//! produced by [`canonical_with`] exist for display purposes only and must
//! never be hashed.

use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::{selector::FunctionSelector, types::Param};

/// Options controlling which annotations [`canonical_with`] injects into the
/// parenthesized argument list.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CanonicalOpts {
    /// Whether to append ` <name>` to arguments that carry names.
    pub names: bool,

    /// Whether to append ` indexed` to arguments flagged as indexed.
    pub indexed: bool,
}

/// Renders the canonical signature of `selector`: the name (if any) followed
/// by the comma-joined canonical renderings of the input types in
/// parentheses.
///
/// This is the form used as hash input, and therefore omits argument names
/// and `indexed` markers, widens `uint`/`int` shorthands, and renders structs
/// as plain tuples.
#[must_use]
pub fn canonical(selector: &FunctionSelector) -> String {
    canonical_with(selector, CanonicalOpts::default())
}

/// Renders the signature of `selector` with the annotations requested in
/// `opts` injected after each argument type, `indexed` before the name.
#[must_use]
pub fn canonical_with(selector: &FunctionSelector, opts: CanonicalOpts) -> String {
    let arguments = selector
        .inputs
        .iter()
        .map(|param| render_param(param, opts))
        .join(",");
    let name = selector.name.as_deref().unwrap_or("");
    format!("{name}({arguments})")
}

/// Renders a single argument as `<type>[ indexed][ <name>]`.
fn render_param(param: &Param, opts: CanonicalOpts) -> String {
    let mut rendered = param.tp.to_string();
    if opts.indexed && param.indexed {
        rendered.push_str(" indexed");
    }
    if opts.names {
        if let Some(name) = &param.name {
            rendered.push(' ');
            rendered.push_str(name);
        }
    }
    rendered
}

/// Displays the selector in its canonical, hashable form.
impl Display for FunctionSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", canonical(self))
    }
}
