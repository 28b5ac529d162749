// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Message-bubble body markup.
//!
//! Received and sent messages render as bubbles whose URLs, email
//! addresses and phone numbers are tappable. The recognizers are
//! host-provided [`SpanClassifier`]s; this module applies them (URL before
//! email before phone is the conventional order) and emits the anchor
//! markup the bubble view consumes, with the annotation value carried in
//! the kind's `data-*` attribute.

use sms_links::{link_body, BodySegment, SpanClassifier};

/// Build the inner markup of a message bubble from its plain-text body.
///
/// Text is entity-escaped; each claimed span becomes an
/// `<a data-…="value">text</a>` anchor. The returned string contains no
/// markup other than those anchors.
pub fn build_body(body: &str, classifiers: &[&dyn SpanClassifier]) -> String {
    let mut markup = String::new();
    for segment in link_body(body, classifiers) {
        match segment {
            BodySegment::Text(text) => {
                markup.push_str(&html_escape::encode_text(&text));
            }
            BodySegment::Link { kind, value, text } => {
                markup.push_str("<a ");
                markup.push_str(kind.dataset_attr());
                markup.push_str("=\"");
                markup.push_str(&html_escape::encode_double_quoted_attribute(
                    &value,
                ));
                markup.push_str("\">");
                markup.push_str(&html_escape::encode_text(&text));
                markup.push_str("</a>");
            }
        }
    }
    markup
}
