// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Arena node types used only while parsing an HTML-like fragment.
//!
//! Parents refer to their children by [`FragDomHandle`]; every node is
//! owned by the [`FragDom`] itself. The arena may contain nodes that were
//! created during parsing but never attached anywhere; the conversion in
//! [`super::Fragment::from_html`] simply never visits them.

use html5ever::tree_builder::ElementFlags;
use html5ever::{namespace_url, ns, Attribute, LocalName, QualName};

pub(crate) fn frag_qual_name(name: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(name))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FragDomHandle(pub(crate) usize);

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum FragDomNode {
    Document(FragNodeDocument),
    Container(FragNodeContainer),
    Text(FragNodeText),
    /// Comments and processing instructions: kept in the arena so the
    /// parser has a handle to append into, never converted.
    Opaque,
}

impl FragDomNode {
    /// The element name; only ever requested by the parser for elements.
    pub(crate) fn name(&self) -> &QualName {
        match self {
            FragDomNode::Container(container) => &container.name,
            _ => panic!("name() requested for a non-element node"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct FragNodeDocument {
    pub(crate) children: Vec<FragDomHandle>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FragNodeContainer {
    pub(crate) name: QualName,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) children: Vec<FragDomHandle>,
}

impl FragNodeContainer {
    pub(crate) fn tag(&self) -> &str {
        self.name.local.as_ref()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FragNodeText {
    pub(crate) content: String,
}

/// The parse arena.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FragDom {
    pub(crate) nodes: Vec<FragDomNode>,
    pub(crate) document_handle: FragDomHandle,
}

impl FragDom {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![FragDomNode::Document(FragNodeDocument::default())],
            document_handle: FragDomHandle(0),
        }
    }

    pub(crate) fn document_handle(&self) -> &FragDomHandle {
        &self.document_handle
    }

    pub(crate) fn get_node(&self, handle: &FragDomHandle) -> &FragDomNode {
        &self.nodes[handle.0]
    }

    pub(crate) fn get_mut_node(
        &mut self,
        handle: &FragDomHandle,
    ) -> &mut FragDomNode {
        &mut self.nodes[handle.0]
    }

    pub(crate) fn add_node(&mut self, node: FragDomNode) -> FragDomHandle {
        self.nodes.push(node);
        FragDomHandle(self.nodes.len() - 1)
    }

    pub(crate) fn create_element(
        &mut self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> FragDomHandle {
        let attrs = attrs
            .iter()
            .map(|attr| {
                (
                    attr.name.local.as_ref().to_owned(),
                    attr.value.as_ref().to_owned(),
                )
            })
            .collect();
        self.add_node(FragDomNode::Container(FragNodeContainer {
            name,
            attrs,
            children: Vec::new(),
        }))
    }

    /// The synthetic root container the fragment parser wraps everything
    /// in. Absent only if parsing produced nothing at all.
    pub(crate) fn root(&self) -> Option<&FragNodeContainer> {
        let document = match self.get_node(self.document_handle()) {
            FragDomNode::Document(document) => document,
            _ => return None,
        };
        document.children.iter().find_map(|handle| {
            match self.get_node(handle) {
                FragDomNode::Container(container) => Some(container),
                _ => None,
            }
        })
    }
}
