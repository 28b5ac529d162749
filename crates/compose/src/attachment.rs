// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The [`Attachment`] value object and its frame rendering.
//!
//! An attachment renders to an isolated embedded document (an iframe on
//! the host side) rather than an inline element: the host refuses to place
//! a text caret inside an embedded-document boundary, so the editable
//! surface treats the whole container as one opaque unit and the caret can
//! never end up inside the rendered media.
//!
//! The embedded document is addressed by a `data:text/html` resource that
//! pulls in the app stylesheet, so attachment styling lives with the rest
//! of the app's styles.

use once_cell::sync::Lazy;
use strum_macros::{AsRefStr, Display, EnumString};
use url::Url;

use crate::surface::node::FrameNode;

/// Class marker carried by every attachment frame.
pub const ATTACHMENT_CLASS: &str = "attachment";

static DEFAULT_ORIGIN: Lazy<Url> =
    Lazy::new(|| Url::parse("app://sms.gaiamobile.org").expect("static url"));

/// Category of an attachment's media.
#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Video,
    Audio,
}

/// Identity of an inserted attachment container.
///
/// Ids are handed out monotonically by the composer when a frame is
/// inserted, and key the composer's attachment index. They are never
/// reused, so a swept id stays dead.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct AttachmentId(pub(crate) u64);

/// The origin attachment frames resolve their stylesheet against.
///
/// Stands in for the host document's location; only the scheme and host
/// are used, the way the host composed `protocol + '//' + hostname`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOrigin(Url);

impl RenderOrigin {
    pub fn new(url: Url) -> Self {
        Self(url)
    }

    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Url::parse(input).map(Self)
    }

    /// `scheme://host`, without port or path.
    fn base(&self) -> String {
        format!(
            "{}://{}",
            self.0.scheme(),
            self.0.host_str().unwrap_or_default()
        )
    }
}

impl Default for RenderOrigin {
    fn default() -> Self {
        Self(DEFAULT_ORIGIN.clone())
    }
}

/// An immutable media attachment: what it is, where its bytes live, and
/// how many of them there are.
///
/// Construction performs no validation beyond the types themselves;
/// `byte_size` in particular is taken as-is. Rendering is a pure function
/// of these three fields and the given origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    kind: AttachmentKind,
    locator: String,
    byte_size: u64,
}

impl Attachment {
    pub fn new(
        kind: AttachmentKind,
        locator: impl Into<String>,
        byte_size: u64,
    ) -> Self {
        Self {
            kind,
            locator: locator.into(),
            byte_size,
        }
    }

    pub fn kind(&self) -> AttachmentKind {
        self.kind
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }

    /// Human-readable size: kilobytes rounded down to one decimal digit,
    /// `"K"`-suffixed. Integral values print without the decimal, matching
    /// the host's number-to-string behavior (`12K`, not `12.0K`).
    pub fn size_label(&self) -> String {
        // floor(bytes / 102.4) / 10, in exact integer arithmetic.
        let tenths = (self.byte_size as u128) * 10 / 1024;
        let (whole, frac) = (tenths / 10, tenths % 10);
        if frac == 0 {
            format!("{whole}K")
        } else {
            format!("{whole}.{frac}K")
        }
    }

    /// Render the sandboxed container for this attachment.
    ///
    /// The returned frame is not yet indexed; the composer tags it with an
    /// [`AttachmentId`] when it is inserted into the surface.
    pub fn render(&self, origin: &RenderOrigin) -> FrameNode {
        FrameNode {
            src: self.frame_document(origin),
            class_name: ATTACHMENT_CLASS.to_owned(),
            attachment_id: None,
        }
    }

    /// The `data:text/html` resource the frame displays.
    fn frame_document(&self, origin: &RenderOrigin) -> String {
        format!(
            "data:text/html,\
             <base href=\"{base}\">\
             <link rel=\"stylesheet\" href=\"/style/sms.css\">\
             <body class=\"{class}\"><img src=\"{locator}\">\
             <div>{size}</div>",
            base = origin.base(),
            class = ATTACHMENT_CLASS,
            locator =
                html_escape::encode_double_quoted_attribute(&self.locator),
            size = self.size_label(),
        )
    }
}

#[cfg(test)]
mod test {
    use speculoos::prelude::*;

    use super::*;

    fn image(byte_size: u64) -> Attachment {
        Attachment::new(AttachmentKind::Image, "/media/IMG_0554.jpg", byte_size)
    }

    #[test]
    fn size_label_rounds_down_to_one_decimal() {
        assert_eq!(image(1500).size_label(), "1.4K");
        assert_eq!(image(55555).size_label(), "54.2K");
    }

    #[test]
    fn size_label_drops_the_decimal_when_integral() {
        assert_eq!(image(12345).size_label(), "12K");
        assert_eq!(image(1024).size_label(), "1K");
        assert_eq!(image(0).size_label(), "0K");
    }

    #[test]
    fn render_produces_an_attachment_classed_frame() {
        let frame = image(12345).render(&RenderOrigin::default());
        assert_that!(frame.class_name.as_str()).is_equal_to(ATTACHMENT_CLASS);
        assert_that!(frame.attachment_id()).is_none();
    }

    #[test]
    fn frame_document_matches_the_host_template() {
        let frame = image(12345).render(&RenderOrigin::default());
        assert_eq!(
            frame.src,
            "data:text/html,\
             <base href=\"app://sms.gaiamobile.org\">\
             <link rel=\"stylesheet\" href=\"/style/sms.css\">\
             <body class=\"attachment\"><img src=\"/media/IMG_0554.jpg\">\
             <div>12K</div>"
        );
    }

    #[test]
    fn locator_is_attribute_escaped_in_the_frame_document() {
        let hostile =
            Attachment::new(AttachmentKind::Image, "x\"><script>", 1);
        let frame = hostile.render(&RenderOrigin::default());
        // The quote is neutralized, so the locator cannot close the
        // src attribute it is interpolated into.
        assert!(!frame.src.contains("x\"><script>"));
        assert!(frame.src.contains("x&quot;"));
    }

    #[test]
    fn render_uses_the_given_origin() {
        let origin = RenderOrigin::parse("https://example.org:8080/ignored")
            .unwrap();
        let frame = image(1).render(&origin);
        // Port and path are dropped, as the host's protocol+hostname was.
        assert!(frame.src.contains("<base href=\"https://example.org\">"));
    }

    #[test]
    fn kind_parses_from_its_lowercase_name() {
        assert_eq!("image".parse(), Ok(AttachmentKind::Image));
        assert_eq!(AttachmentKind::Video.to_string(), "video");
    }
}
