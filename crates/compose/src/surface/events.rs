// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Host event types.
//!
//! These mirror the two notifications the editable surface delivers: a
//! key-down before any character is inserted, and an input event after the
//! content has changed. The composer consumes the first through
//! [`crate::Composer::handle_key_down`] and the second through
//! [`crate::Composer::handle_input`].

/// A key the host is about to apply to the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Backward deletion (the only key the input lock never suppresses).
    Backspace,
    /// Line break insertion.
    Enter,
    /// A printable character.
    Char(char),
}

impl Key {
    pub(crate) fn is_deletion(&self) -> bool {
        matches!(self, Key::Backspace)
    }
}

/// The key-down notification, delivered before the edit is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
}

/// What the host should do with a pending key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Apply the edit, then deliver an input event.
    Allow,
    /// Prevent the default edit; no input event follows.
    Suppress,
}

/// The input notification, delivered after a content change. Observers
/// registered on the `"input"` channel receive the originating event, or
/// `None` when the change came from a composer operation rather than the
/// host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEvent {
    pub source: InputSource,
}

/// Where an input event originated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputSource {
    /// Native editing driven by a key.
    Keyboard(Key),
}
