// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The logical content sequence a composed message serializes to.

use crate::attachment::Attachment;

/// One entry of the serialized message: a contiguous run of plain text on
/// one logical line, or an inline attachment.
///
/// Empty text entries are meaningful inside a message: each one records
/// the position of a line break between populated entries. Trailing empty
/// entries never survive serialization (see
/// [`crate::Composer::get_content`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentEntry {
    Text(String),
    Attachment(Attachment),
}

impl ContentEntry {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentEntry::Text(text) => Some(text),
            ContentEntry::Attachment(_) => None,
        }
    }

    pub fn as_attachment(&self) -> Option<&Attachment> {
        match self {
            ContentEntry::Text(_) => None,
            ContentEntry::Attachment(attachment) => Some(attachment),
        }
    }

    pub fn is_attachment(&self) -> bool {
        matches!(self, ContentEntry::Attachment(_))
    }
}

impl PartialEq<&str> for ContentEntry {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

impl PartialEq<Attachment> for ContentEntry {
    fn eq(&self, other: &Attachment) -> bool {
        self.as_attachment() == Some(other)
    }
}

impl From<&str> for ContentEntry {
    fn from(text: &str) -> Self {
        ContentEntry::Text(text.to_owned())
    }
}

impl From<Attachment> for ContentEntry {
    fn from(attachment: Attachment) -> Self {
        ContentEntry::Attachment(attachment)
    }
}
