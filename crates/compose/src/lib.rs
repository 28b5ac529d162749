// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Model code for the message-composition surface of an SMS/MMS client.
//!
//! The heart of the crate is [`Composer`]: it owns an editable [`Surface`]
//! whose children mix text nodes, line breaks and attachment frames, keeps
//! the derived empty/placeholder state and the max-length input lock in
//! sync after every change, and serializes the surface into an ordered
//! sequence of [`ContentEntry`] values (contiguous text runs and
//! [`Attachment`]s) on demand.
//!
//! The real host environment (a content-editable region with key and input
//! events, and an iframe-like embedded-document primitive the caret cannot
//! enter) stays outside the crate. [`Surface`] is the in-memory model of
//! that region; the test suites drive it through the same key-down → edit →
//! input cycle the host would.

pub mod attachment;
mod bubble;
mod composer;
mod content;
mod fragment;
mod surface;

pub use attachment::{
    Attachment, AttachmentId, AttachmentKind, RenderOrigin, ATTACHMENT_CLASS,
};
pub use bubble::build_body;
pub use composer::{
    ComposeItem, Composer, ComposerEvent, PLACEHOLDER_CLASS,
};
pub use content::ContentEntry;
pub use fragment::{Fragment, FragmentCreationError};
pub use surface::events::{
    InputEvent, InputSource, Key, KeyDisposition, KeyEvent,
};
pub use surface::node::{FrameNode, SurfaceNode};
pub use surface::{ComposeForm, SendButton, Surface};

// Re-exported so `build_body` callers don't need a direct sms_links
// dependency for the classifier seam.
pub use sms_links::{BodySegment, LinkedSpan, SpanClassifier, SpanKind};
