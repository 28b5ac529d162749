// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The simulated editable surface.
//!
//! [`Surface`] models the host's content-editable region as far as the
//! composer can observe it: a flat list of [`SurfaceNode`] children, a
//! class-marker list, focus and a collapsed caret. The native-editing
//! primitives (`insert_char`, `delete_backward`, …) reproduce what the host
//! does to the region between the key-down and input notifications; they
//! are crate-internal and reached through [`crate::Composer::press`].
//!
//! Selection is modeled as a collapsed caret only: a node-boundary index
//! into the child list. Range selection is host behavior the composer
//! never inspects.

pub mod events;
pub mod node;

use std::collections::BTreeSet;

use widestring::Utf16String;

use self::node::SurfaceNode;

/// A minimal `classList`: an unordered set of string markers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassList {
    classes: BTreeSet<String>,
}

impl ClassList {
    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub(crate) fn add(&mut self, class: &str) {
        self.classes.insert(class.to_owned());
    }

    pub(crate) fn remove(&mut self, class: &str) {
        self.classes.remove(class);
    }
}

/// The editable region the composer owns.
#[derive(Clone, Debug, Default)]
pub struct Surface {
    children: Vec<SurfaceNode>,
    classes: ClassList,
    focused: bool,
    /// Node-boundary index; meaningful while `focused`.
    caret: usize,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children(&self) -> &[SurfaceNode] {
        &self.children
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// The collapsed caret, as a node-boundary index, while focused.
    pub fn caret(&self) -> Option<usize> {
        self.focused.then_some(self.caret)
    }

    /// Raw text content: the concatenation of every text child. Breaks and
    /// frames contribute nothing.
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .map(SurfaceNode::text_content)
            .collect()
    }

    /// Text length in UTF-16 code units, the unit platform text APIs (and
    /// the max-length lock) count in.
    pub fn text_len_utf16(&self) -> usize {
        Utf16String::from_str(&self.text_content()).len()
    }

    pub fn line_break_count(&self) -> usize {
        self.children.iter().filter(|n| n.is_line_break()).count()
    }

    pub fn has_frame(&self) -> bool {
        self.children.iter().any(SurfaceNode::is_frame)
    }

    /// Render the child list in the style of a DOM tree dump, for test
    /// assertions.
    pub fn to_tree(&self) -> String {
        let mut tree = String::from("\n");
        let last = self.children.len().saturating_sub(1);
        for (i, child) in self.children.iter().enumerate() {
            let join = if i == last { "└>" } else { "├>" };
            let label = match child {
                SurfaceNode::Text(text) => format!("\"{text}\""),
                SurfaceNode::LineBreak => "br".to_owned(),
                SurfaceNode::Frame(frame) => {
                    format!("frame \"{}\"", frame.class_name)
                }
            };
            tree.push_str(join);
            tree.push_str(&label);
            tree.push('\n');
        }
        tree
    }

    // ─── Class markers ──────────────────────────────────────────────────

    pub(crate) fn add_class(&mut self, class: &str) {
        self.classes.add(class);
    }

    pub(crate) fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    // ─── Focus and caret (host-side) ────────────────────────────────────

    pub(crate) fn focus(&mut self) {
        self.focused = true;
        self.caret = self.children.len();
    }

    pub(crate) fn blur(&mut self) {
        self.focused = false;
    }

    pub(crate) fn set_caret(&mut self, index: usize) {
        self.caret = index.min(self.children.len());
    }

    /// The boundary edits apply at: the caret while focused, else the end.
    pub(crate) fn edit_point(&self) -> usize {
        if self.focused {
            self.caret
        } else {
            self.children.len()
        }
    }

    // ─── Structural mutation ────────────────────────────────────────────

    /// Insert `nodes` at boundary `at`, keeping the caret on the same
    /// boundary it pointed at before.
    pub(crate) fn splice(&mut self, at: usize, nodes: Vec<SurfaceNode>) {
        let at = at.min(self.children.len());
        let count = nodes.len();
        self.children.splice(at..at, nodes);
        if self.focused && self.caret >= at {
            self.caret += count;
        }
    }

    pub(crate) fn clear_children(&mut self) {
        self.children.clear();
        self.caret = 0;
    }

    // ─── Native editing primitives ──────────────────────────────────────

    /// Type one character: extend the text node before the edit point, or
    /// start a new one.
    pub(crate) fn insert_char(&mut self, ch: char) {
        let at = self.edit_point();
        if at > 0 {
            if let Some(SurfaceNode::Text(text)) =
                self.children.get_mut(at - 1)
            {
                text.push(ch);
                return;
            }
        }
        self.splice(at, vec![SurfaceNode::Text(ch.to_string())]);
    }

    /// Insert a hard line break at the edit point.
    pub(crate) fn insert_line_break(&mut self) {
        let at = self.edit_point();
        self.splice(at, vec![SurfaceNode::LineBreak]);
    }

    /// Delete backward from the edit point: the last character of a
    /// preceding text node, or the whole preceding node.
    pub(crate) fn delete_backward(&mut self) {
        let at = self.edit_point();
        if at == 0 {
            return;
        }
        let remove = match &mut self.children[at - 1] {
            SurfaceNode::Text(text) => {
                text.pop();
                text.is_empty()
            }
            SurfaceNode::LineBreak | SurfaceNode::Frame(_) => true,
        };
        if remove {
            self.children.remove(at - 1);
            if self.focused && self.caret >= at {
                self.caret -= 1;
            }
        }
    }
}

/// The companion submit control: sending is disabled while the surface is
/// logically empty.
#[derive(Clone, Debug, Default)]
pub struct SendButton {
    disabled: bool,
}

impl SendButton {
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub(crate) fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }
}

/// The container [`crate::Composer::init`] binds to: the editable region
/// and its submit control.
#[derive(Clone, Debug, Default)]
pub struct ComposeForm {
    pub(crate) message: Surface,
    pub(crate) button: SendButton,
}

impl ComposeForm {
    pub fn new() -> Self {
        Self::default()
    }
}
