// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The [`Composer`]: owner of the editable surface and of everything
//! derived from it.
//!
//! Two flags drive the model. `empty` says whether the surface holds any
//! meaningful content; it is recomputed synchronously after every mutation,
//! before observers fire, so no caller ever reads a stale value. `locked`
//! is the max-length backpressure latch: it is set during recompute once
//! the text reaches the configured budget and released only by the
//! key-down check when a deletion comes through.
//!
//! The content sequence is never cached: [`Composer::get_content`] walks
//! the live child list on every call, so the surface itself stays the
//! single source of truth.

use std::collections::BTreeMap;
use std::str::FromStr;

use strum_macros::EnumString;

use crate::attachment::{Attachment, AttachmentId, RenderOrigin};
use crate::content::ContentEntry;
use crate::fragment::Fragment;
use crate::surface::events::{
    InputEvent, InputSource, Key, KeyDisposition, KeyEvent,
};
use crate::surface::node::{FrameNode, SurfaceNode};
use crate::surface::{ComposeForm, SendButton, Surface};

/// Class marker shown on the surface while it is logically empty.
pub const PLACEHOLDER_CLASS: &str = "placeholder";

/// The observer channels a composer exposes. Only `"input"` exists;
/// registering for any other name is silently ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ComposerEvent {
    Input,
}

type InputObserver = Box<dyn FnMut(Option<&InputEvent>)>;

/// Anything that can be handed to [`Composer::append`] /
/// [`Composer::prepend`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComposeItem {
    /// Render, index and insert an attachment.
    Attachment(Attachment),
    /// Re-insert an already rendered container as-is.
    Frame(FrameNode),
    /// Parse an HTML-like string down to text and breaks.
    Html(String),
}

impl From<Attachment> for ComposeItem {
    fn from(attachment: Attachment) -> Self {
        ComposeItem::Attachment(attachment)
    }
}

impl From<FrameNode> for ComposeItem {
    fn from(frame: FrameNode) -> Self {
        ComposeItem::Frame(frame)
    }
}

impl From<&str> for ComposeItem {
    fn from(html: &str) -> Self {
        ComposeItem::Html(html.to_owned())
    }
}

impl From<String> for ComposeItem {
    fn from(html: String) -> Self {
        ComposeItem::Html(html)
    }
}

/// The message-composition model.
pub struct Composer {
    surface: Surface,
    button: SendButton,
    /// Container identity → attachment value. Entries are swept on every
    /// recompute, so an id only stays here while its frame is still in
    /// the surface.
    attachments: BTreeMap<AttachmentId, Attachment>,
    next_attachment_id: u64,
    empty: bool,
    max_length: Option<usize>,
    locked: bool,
    origin: RenderOrigin,
    observers: Vec<InputObserver>,
}

impl Composer {
    /// Bind to a compose form and reset it to the empty state.
    pub fn init(form: ComposeForm) -> Self {
        let mut composer = Self {
            surface: form.message,
            button: form.button,
            attachments: BTreeMap::new(),
            next_attachment_id: 0,
            empty: true,
            max_length: None,
            locked: false,
            origin: RenderOrigin::default(),
            observers: Vec::new(),
        };
        composer.clear();
        composer
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn button(&self) -> &SendButton {
        &self.button
    }

    /// Configure the origin attachment frames are rendered against.
    pub fn set_render_origin(&mut self, origin: RenderOrigin) -> &mut Self {
        self.origin = origin;
        self
    }

    /// Register an observer on a channel by name. Unrecognized channel
    /// names are silently ignored.
    pub fn on(
        &mut self,
        event: &str,
        observer: impl FnMut(Option<&InputEvent>) + 'static,
    ) -> &mut Self {
        if let Ok(ComposerEvent::Input) = ComposerEvent::from_str(event) {
            self.observers.push(Box::new(observer));
        }
        self
    }

    /// Enable or disable the submit control.
    pub fn disable(&mut self, disabled: bool) -> &mut Self {
        self.button.set_disabled(disabled);
        self
    }

    /// Raw text content of the surface, unmodified.
    pub fn get_text(&self) -> String {
        self.surface.text_content()
    }

    /// The `empty` flag as of the last recompute; not recomputed here.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Cap the text budget, in UTF-16 code units, or lift it with `None`.
    ///
    /// If the surface already meets or exceeds a new bound the lock
    /// latches immediately; text already present is never rejected.
    /// Lifting the bound also releases the latch, since with no budget
    /// there is nothing left to enforce.
    pub fn set_max_length(&mut self, limit: Option<usize>) -> &mut Self {
        self.max_length = limit;
        match limit {
            Some(max) if self.surface.text_len_utf16() >= max => {
                self.locked = true;
            }
            None => self.locked = false,
            _ => {}
        }
        self
    }

    // ─── Host notifications ─────────────────────────────────────────────

    /// Content-change notification: recompute derived state and fire the
    /// `input` observers with the originating event.
    pub fn handle_input(&mut self, event: Option<&InputEvent>) {
        self.recompute(event);
    }

    /// Key-down notification, delivered before the edit. While locked,
    /// everything except deletion is suppressed; a deletion key always
    /// releases the latch, whatever the current length.
    pub fn handle_key_down(&mut self, event: &KeyEvent) -> KeyDisposition {
        if self.locked && !event.key.is_deletion() {
            KeyDisposition::Suppress
        } else {
            self.locked = false;
            KeyDisposition::Allow
        }
    }

    /// Drive one full native editing cycle the way the host would: the
    /// key-down gate, then the edit, then the input notification. A
    /// suppressed key edits nothing and notifies nobody.
    pub fn press(&mut self, key: Key) -> &mut Self {
        let event = KeyEvent { key };
        if self.handle_key_down(&event) == KeyDisposition::Suppress {
            return self;
        }
        match key {
            Key::Backspace => self.surface.delete_backward(),
            Key::Enter => self.surface.insert_line_break(),
            Key::Char(ch) => self.surface.insert_char(ch),
        }
        let input = InputEvent {
            source: InputSource::Keyboard(key),
        };
        self.handle_input(Some(&input));
        self
    }

    /// [`Composer::press`] for every character of `text`.
    pub fn type_text(&mut self, text: &str) -> &mut Self {
        for ch in text.chars() {
            self.press(Key::Char(ch));
        }
        self
    }

    // ─── Focus (host-side) ──────────────────────────────────────────────

    pub fn focus(&mut self) -> &mut Self {
        self.surface.focus();
        self
    }

    pub fn blur(&mut self) -> &mut Self {
        self.surface.blur();
        self
    }

    /// Place the collapsed caret on a node boundary.
    pub fn set_caret(&mut self, index: usize) -> &mut Self {
        self.surface.set_caret(index);
        self
    }

    // ─── Content mutation ───────────────────────────────────────────────

    /// Render `attachment`, index its container and insert it.
    pub fn attach(&mut self, attachment: Attachment) -> &mut Self {
        self.append(attachment)
    }

    /// Insert at the caret while the surface is focused, else at the end.
    pub fn append(&mut self, item: impl Into<ComposeItem>) -> &mut Self {
        let nodes = self.insertable(item.into());
        let at = self.surface.edit_point();
        let inserted = !nodes.is_empty();
        self.surface.splice(at, nodes);
        if self.surface.is_focused() && inserted {
            // The caret lands right after the first inserted node.
            self.surface.set_caret(at + 1);
        }
        self.recompute(None);
        self
    }

    /// Insert at the very start, but after a leading break node if one
    /// exists, so a leading blank line stays ahead of prepended content.
    pub fn prepend(&mut self, item: impl Into<ComposeItem>) -> &mut Self {
        let nodes = self.insertable(item.into());
        let at = match self.surface.children().first() {
            Some(first) if first.is_line_break() => 1,
            _ => 0,
        };
        self.surface.splice(at, nodes);
        self.recompute(None);
        self
    }

    /// Empty the surface entirely.
    pub fn clear(&mut self) -> &mut Self {
        self.surface.clear_children();
        self.recompute(None);
        self
    }

    /// Reconstruct the logical content from the surface's current child
    /// list: one entry per text run or attachment, with a slot for every
    /// break between populated entries and trailing empties trimmed.
    pub fn get_content(&self) -> Vec<ContentEntry> {
        let mut content: Vec<ContentEntry> = Vec::new();
        // Index one past the last entry that actually carried content.
        let mut last_content = 0;

        for node in self.surface.children() {
            if let SurfaceNode::Frame(frame) = node {
                let attachment = frame
                    .attachment_id()
                    .and_then(|id| self.attachments.get(&id));
                if let Some(attachment) = attachment {
                    content.push(ContentEntry::Attachment(attachment.clone()));
                    last_content = content.len();
                    continue;
                }
                // An unindexed frame falls through and serializes as its
                // (empty) text content, like any other opaque node.
            }

            let text = node.text_content();
            match content.last_mut() {
                // Non-empty text joins the current text run, which may be
                // the empty slot a break just left, making the break a
                // separator rather than a visible entry.
                Some(ContentEntry::Text(run)) if !text.is_empty() => {
                    run.push_str(text);
                }
                // Pushed even when empty: the slot records a break's
                // position.
                _ => content.push(ContentEntry::Text(text.to_owned())),
            }
            if !text.is_empty() {
                last_content = content.len();
            }
        }

        content.truncate(last_content);
        content
    }

    // ─── Internals ──────────────────────────────────────────────────────

    /// Turn an item into surface nodes, indexing attachments on the way.
    fn insertable(&mut self, item: ComposeItem) -> Vec<SurfaceNode> {
        match item {
            ComposeItem::Attachment(attachment) => {
                let mut frame = attachment.render(&self.origin);
                let id = AttachmentId(self.next_attachment_id);
                self.next_attachment_id += 1;
                frame.attachment_id = Some(id);
                self.attachments.insert(id, attachment);
                vec![SurfaceNode::Frame(frame)]
            }
            ComposeItem::Frame(frame) => vec![SurfaceNode::Frame(frame)],
            ComposeItem::Html(html) => Fragment::from_html(&html).into_nodes(),
        }
    }

    /// Recompute all derived state, then notify observers.
    fn recompute(&mut self, event: Option<&InputEvent>) {
        let text_len = self.surface.text_len_utf16();
        let mut empty = text_len == 0;

        if let Some(max) = self.max_length {
            if text_len >= max {
                self.locked = true;
            }
        }

        if empty {
            // Zero text is not conclusive: the host leaves a stray break
            // behind after a full deletion, and an attachment carries no
            // text at all.
            if self.surface.line_break_count() > 1 || self.surface.has_frame()
            {
                empty = false;
            }
        }

        let placeholding = self.surface.has_class(PLACEHOLDER_CLASS);
        if placeholding && !empty {
            self.surface.remove_class(PLACEHOLDER_CLASS);
            self.button.set_disabled(false);
        }
        if !placeholding && empty {
            self.surface.add_class(PLACEHOLDER_CLASS);
            self.button.set_disabled(true);
        }
        self.empty = empty;

        self.sweep_attachments();

        for observer in self.observers.iter_mut() {
            observer(event);
        }
    }

    /// Drop index entries whose container is no longer in the surface.
    fn sweep_attachments(&mut self) {
        let children = self.surface.children();
        self.attachments.retain(|id, _| {
            children
                .iter()
                .any(|node| node.as_frame().and_then(FrameNode::attachment_id) == Some(*id))
        });
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::rc::Rc;

    use speculoos::prelude::*;

    use super::*;
    use crate::attachment::AttachmentKind;

    fn composer() -> Composer {
        Composer::init(ComposeForm::new())
    }

    fn image() -> Attachment {
        Attachment::new(AttachmentKind::Image, "/media/IMG_0554.jpg", 12345)
    }

    #[test]
    fn init_starts_empty_and_placeholding() {
        let composer = composer();
        assert_that!(composer.is_empty()).is_true();
        assert!(composer.surface().has_class(PLACEHOLDER_CLASS));
        assert!(composer.button().is_disabled());
    }

    #[test]
    fn observers_fire_in_registration_order_with_the_event() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut composer = composer();
        for tag in ["first", "second"] {
            let calls = Rc::clone(&calls);
            composer.on("input", move |event| {
                calls.borrow_mut().push((tag, event.copied()));
            });
        }
        composer.append("x");
        let input = InputEvent {
            source: InputSource::Keyboard(Key::Char('y')),
        };
        composer.handle_input(Some(&input));

        let calls = calls.borrow();
        assert_eq!(
            *calls,
            [
                ("first", None),
                ("second", None),
                ("first", Some(input)),
                ("second", Some(input)),
            ]
        );
    }

    #[test]
    fn unknown_observer_channels_are_ignored() {
        let called = Rc::new(RefCell::new(false));
        let mut composer = composer();
        let flag = Rc::clone(&called);
        composer.on("keypress", move |_| *flag.borrow_mut() = true);
        composer.append("x");
        assert_that!(*called.borrow()).is_false();
    }

    #[test]
    fn lock_suppresses_everything_but_deletion() {
        let mut composer = composer();
        composer.type_text("abcde");
        composer.set_max_length(Some(5));

        let press = KeyEvent { key: Key::Char('f') };
        assert_eq!(
            composer.handle_key_down(&press),
            KeyDisposition::Suppress
        );
        let enter = KeyEvent { key: Key::Enter };
        assert_eq!(
            composer.handle_key_down(&enter),
            KeyDisposition::Suppress
        );
        let backspace = KeyEvent { key: Key::Backspace };
        assert_eq!(
            composer.handle_key_down(&backspace),
            KeyDisposition::Allow
        );
        // The deletion released the latch; the next key is allowed even
        // though nothing was actually deleted yet.
        assert_eq!(composer.handle_key_down(&press), KeyDisposition::Allow);
    }

    #[test]
    fn recompute_relatches_while_still_over_budget() {
        let mut composer = composer();
        composer.type_text("abcdef");
        composer.set_max_length(Some(3));
        // Deleting one character leaves the text over budget, so the input
        // that follows the edit latches the lock again.
        composer.press(Key::Backspace);
        let press = KeyEvent { key: Key::Char('x') };
        assert_eq!(
            composer.handle_key_down(&press),
            KeyDisposition::Suppress
        );
    }

    #[test]
    fn lifting_the_max_length_releases_the_latch() {
        let mut composer = composer();
        composer.type_text("abcde");
        composer.set_max_length(Some(3));
        composer.set_max_length(None);
        let press = KeyEvent { key: Key::Char('x') };
        assert_eq!(composer.handle_key_down(&press), KeyDisposition::Allow);
    }

    #[test]
    fn max_length_counts_utf16_code_units() {
        let mut composer = composer();
        composer.type_text("😀a"); // 2 + 1 code units
        composer.set_max_length(Some(3));
        let press = KeyEvent { key: Key::Char('x') };
        assert_eq!(
            composer.handle_key_down(&press),
            KeyDisposition::Suppress
        );
    }

    #[test]
    fn a_lone_stray_break_still_counts_as_empty() {
        let mut composer = composer();
        composer.append("<br>");
        assert_that!(composer.is_empty()).is_true();
        composer.append("<br>");
        assert_that!(composer.is_empty()).is_false();
    }

    #[test]
    fn append_at_the_caret_when_focused() {
        let mut composer = composer();
        composer.append("start<br>");
        composer.focus().set_caret(0);
        composer.append("pre");
        assert_eq!(
            composer.surface().to_tree(),
            "\n├>\"pre\"\n├>\"start\"\n└>br\n"
        );
        // Caret sits right after the inserted node.
        assert_eq!(composer.surface().caret(), Some(1));
    }

    #[test]
    fn prepend_lands_after_a_leading_break() {
        let mut composer = composer();
        composer.append("<br>tail");
        composer.prepend("head");
        assert_eq!(
            composer.surface().to_tree(),
            "\n├>br\n├>\"head\"\n└>\"tail\"\n"
        );
        // The leading blank line survives in the surface; in serialized
        // content the break only separates, so the text still opens the
        // first entry.
        assert_eq!(composer.get_content(), ["headtail"]);
    }

    #[test]
    fn prepend_without_a_leading_break_goes_first() {
        let mut composer = composer();
        composer.append("tail");
        composer.prepend("head");
        assert_eq!(composer.get_content(), ["headtail"]);
    }

    #[test]
    fn reinserting_a_swept_frame_serializes_as_an_empty_slot() {
        let mut composer = composer();
        composer.attach(image());
        let frame = composer.surface().children()[0]
            .as_frame()
            .cloned()
            .unwrap();
        composer.clear();
        // The clear swept the index; the same container re-inserted is no
        // longer an attachment as far as serialization is concerned.
        composer.append("start");
        composer.append(frame);
        composer.append("end");
        assert_eq!(composer.get_content(), ["start", "end"]);
    }

    #[test]
    fn attachment_ids_are_never_reused() {
        let mut composer = composer();
        composer.attach(image());
        let first = composer.surface().children()[0]
            .as_frame()
            .and_then(FrameNode::attachment_id)
            .unwrap();
        composer.clear();
        composer.attach(image());
        let second = composer.surface().children()[0]
            .as_frame()
            .and_then(FrameNode::attachment_id)
            .unwrap();
        assert_that!(first).is_not_equal_to(second);
    }

    #[test]
    fn get_content_merges_runs_split_across_text_nodes() {
        let mut composer = composer();
        composer.append("start");
        composer.append("end");
        assert_eq!(composer.get_content(), ["startend"]);
    }

    #[test]
    fn disable_chains_and_reaches_the_button() {
        let mut composer = composer();
        composer.disable(false).disable(true);
        assert!(composer.button().is_disabled());
    }
}
