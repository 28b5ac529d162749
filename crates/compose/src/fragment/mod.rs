// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Sanitized insertables for the composition surface.
//!
//! Composed text can arrive as an HTML-like string (paste, prefill,
//! forwarding). Whatever it contains, only two things are ever admitted
//! into the surface: text and hard line breaks. Everything else, elements
//! and their entire subtrees included, is discarded during
//! conversion. This allow-list is the markup-injection boundary for the
//! composer: content can never smuggle arbitrary elements into the
//! editable region by way of `append`/`prepend`.

mod frag_creator;
mod frag_node;

use std::fmt;

use crate::surface::node::SurfaceNode;
use self::frag_creator::FragDomCreator;
use self::frag_node::{FragDom, FragDomNode};

/// An ordered run of surface nodes ready for insertion: text nodes and
/// line breaks only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fragment {
    nodes: Vec<SurfaceNode>,
}

impl Fragment {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse an HTML-like string down to its admissible nodes.
    ///
    /// Total: any input produces a fragment, possibly empty. Parse
    /// diagnostics are dropped here; use [`Fragment::try_from_html`] to
    /// observe them.
    pub fn from_html(html: &str) -> Self {
        match Self::try_from_html(html) {
            Ok(fragment) => fragment,
            Err(error) => error.fragment,
        }
    }

    /// Like [`Fragment::from_html`], but surfaces parser diagnostics. The
    /// error still carries everything that was admissible.
    pub fn try_from_html(html: &str) -> Result<Self, FragmentCreationError> {
        match FragDomCreator::parse(html) {
            Ok(dom) => Ok(Self::convert(&dom)),
            Err(creation) => Err(FragmentCreationError {
                fragment: Self::convert(&creation.dom),
                parse_errors: creation.parse_errors,
            }),
        }
    }

    /// Apply the allow-list to the fragment root's direct children.
    fn convert(dom: &FragDom) -> Self {
        let mut nodes = Vec::new();
        let root = match dom.root() {
            Some(root) => root,
            None => return Self::empty(),
        };
        for handle in &root.children {
            match dom.get_node(handle) {
                FragDomNode::Text(text) => {
                    nodes.push(SurfaceNode::Text(text.content.clone()));
                }
                FragDomNode::Container(container)
                    if container.tag() == "br" =>
                {
                    nodes.push(SurfaceNode::LineBreak);
                }
                // Any other element, and anything opaque, is discarded
                // along with its subtree.
                _ => {}
            }
        }
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[SurfaceNode] {
        &self.nodes
    }

    pub(crate) fn into_nodes(self) -> Vec<SurfaceNode> {
        self.nodes
    }
}

/// A fragment parse that produced diagnostics, along with the sanitized
/// fragment that was still recovered.
#[derive(Clone, Debug)]
pub struct FragmentCreationError {
    pub fragment: Fragment,
    pub parse_errors: Vec<String>,
}

impl fmt::Display for FragmentCreationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "fragment parsed with {} diagnostic(s)",
            self.parse_errors.len()
        )
    }
}
