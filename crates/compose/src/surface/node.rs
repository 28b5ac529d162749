// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The node kinds an editable surface can hold.

use crate::attachment::AttachmentId;

/// One immediate child of the surface.
///
/// The surface is deliberately flat: the fragment sanitizer admits nothing
/// that would nest (see [`crate::fragment`]), so the composer only ever
/// walks a single level of children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceNode {
    /// A run of plain text.
    Text(String),
    /// A `<br>`-equivalent hard line break.
    LineBreak,
    /// An embedded-document container (the host renders these as iframes,
    /// which its caret logic treats as a single opaque unit).
    Frame(FrameNode),
}

impl SurfaceNode {
    /// The text this node contributes to the surface's raw text content.
    ///
    /// Breaks and frames contribute nothing: an embedded document exposes
    /// no text to its parent.
    pub fn text_content(&self) -> &str {
        match self {
            SurfaceNode::Text(text) => text,
            SurfaceNode::LineBreak | SurfaceNode::Frame(_) => "",
        }
    }

    pub fn is_line_break(&self) -> bool {
        matches!(self, SurfaceNode::LineBreak)
    }

    pub fn is_frame(&self) -> bool {
        matches!(self, SurfaceNode::Frame(_))
    }

    pub fn as_frame(&self) -> Option<&FrameNode> {
        match self {
            SurfaceNode::Frame(frame) => Some(frame),
            _ => None,
        }
    }
}

/// The rendered container for an attachment: an isolated embedded document
/// addressed by a `data:text/html` resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameNode {
    /// The `data:` URI of the embedded document.
    pub src: String,
    /// Stable class marker, `"attachment"` for attachment frames.
    pub class_name: String,
    /// Set at insertion time; the key into the composer's attachment index.
    /// A frame that was never inserted through the composer (or whose entry
    /// has been swept) carries `None` and serializes as its empty text
    /// content, like any other non-text node.
    pub(crate) attachment_id: Option<AttachmentId>,
}

impl FrameNode {
    /// The id this frame was indexed under, if any.
    pub fn attachment_id(&self) -> Option<AttachmentId> {
        self.attachment_id
    }
}
