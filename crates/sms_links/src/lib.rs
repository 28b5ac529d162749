// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Tappable-span annotation for SMS/MMS message bodies.
//!
//! Detection of URLs, email addresses and phone numbers is host-provided:
//! the platform ships its own recognizers and exposes them to us as
//! black-box [`SpanClassifier`]s that annotate byte ranges of a body with a
//! [`LinkedSpan`]. This crate owns everything around that seam: the span
//! types, the dataset attribute each kind maps to in bubble markup, and
//! [`link_body`], which applies a prioritized classifier list to a body and
//! produces the ordered segment sequence a renderer consumes.
//!
//! Priority matters: a URL like `mail.google.com/mail/help` contains what a
//! naive email recognizer would claim, and phone recognizers fire inside
//! almost anything numeric. Classifiers therefore run strictly in the order
//! given, and each one only ever sees text that no earlier classifier has
//! claimed.

use strum_macros::{AsRefStr, Display, EnumString};

/// The kind of clickable data a classifier recognizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SpanKind {
    Url,
    Email,
    Phone,
}

impl SpanKind {
    /// The `data-*` attribute carrying this kind's annotation value in
    /// rendered bubble markup.
    pub fn dataset_attr(&self) -> &'static str {
        match self {
            SpanKind::Url => "data-url",
            SpanKind::Email => "data-email",
            SpanKind::Phone => "data-phonenumber",
        }
    }
}

/// One annotated range of a classified body.
///
/// `start..end` is a byte range into the text handed to
/// [`SpanClassifier::classify`]; `value` is the classifier's annotation for
/// it (e.g. the normalized `http://…` form of a bare `www.` URL), which may
/// differ from the covered text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkedSpan {
    pub kind: SpanKind,
    pub start: usize,
    pub end: usize,
    pub value: String,
}

/// A host-provided recognizer for one [`SpanKind`].
///
/// Implementations live outside this workspace. The only contract here is
/// shape: `classify` returns annotated byte ranges of its input, in any
/// order; [`link_body`] sorts, bounds-checks and de-overlaps them.
pub trait SpanClassifier {
    /// The kind this classifier is registered for.
    fn kind(&self) -> SpanKind;

    /// Annotate every recognized occurrence in `text`.
    fn classify(&self, text: &str) -> Vec<LinkedSpan>;
}

/// One piece of a linked message body, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BodySegment {
    /// Plain text no classifier claimed.
    Text(String),
    /// A claimed range: the annotation `value` plus the covered `text`.
    Link {
        kind: SpanKind,
        value: String,
        text: String,
    },
}

/// Split `body` into plain-text and linked segments.
///
/// Classifiers run in the order given; each only sees the still-plain
/// segments left over by its predecessors, so earlier classifiers take
/// priority on overlapping claims. Within a single classifier's output,
/// spans are applied left to right and a span overlapping an already
/// applied one (or falling outside the text) is dropped.
pub fn link_body(
    body: &str,
    classifiers: &[&dyn SpanClassifier],
) -> Vec<BodySegment> {
    if body.is_empty() {
        return Vec::new();
    }
    let mut segments = vec![BodySegment::Text(body.to_owned())];
    for classifier in classifiers {
        segments = segments
            .into_iter()
            .flat_map(|segment| match segment {
                BodySegment::Text(text) => apply(*classifier, &text),
                linked => vec![linked],
            })
            .collect();
    }
    segments
}

/// Apply one classifier to a plain run, splitting it around accepted spans.
fn apply(classifier: &dyn SpanClassifier, text: &str) -> Vec<BodySegment> {
    let mut spans = classifier.classify(text);
    spans.sort_by_key(|span| span.start);

    let mut out = Vec::new();
    let mut cursor = 0;
    for span in spans {
        let in_bounds = span.start >= cursor
            && span.start < span.end
            && span.end <= text.len()
            && text.is_char_boundary(span.start)
            && text.is_char_boundary(span.end);
        if !in_bounds {
            continue;
        }
        if span.start > cursor {
            out.push(BodySegment::Text(text[cursor..span.start].to_owned()));
        }
        out.push(BodySegment::Link {
            kind: span.kind,
            value: span.value,
            text: text[span.start..span.end].to_owned(),
        });
        cursor = span.end;
    }
    if cursor < text.len() {
        out.push(BodySegment::Text(text[cursor..].to_owned()));
    }
    out
}
