//! The VAST `<Extension>` element.
//!
//! An extension carries one of three bodies under the same tag:
//!
//! - a `<CustomTracking>` list of `<Tracking event="...">URI</Tracking>` entries,
//! - an opaque vendor XML fragment, kept byte-for-byte,
//! - nothing at all (typically a waterfall extension that only carries
//!   `fallback_index`).
//!
//! Canonical form produced by [`XmlCodec::encode`]:
//!
//! ```text
//! <Extension type="T" fallback_index="N"><CustomTracking><Tracking event="E"><![CDATA[URI]]></Tracking></CustomTracking></Extension>
//! ```
//!
//! `fallback_index` is only written when it is non-zero, so an explicit
//! `fallback_index="0"` in the input does not survive a round trip.

use error_stack::{Report, ResultExt};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Deserializer, Serialize};

use crate::codec::{self, XmlCodec};
use crate::error::VastError;
use crate::tracking::{Tracking, TRACKING};

pub(crate) const EXTENSION: &str = "Extension";
const CUSTOM_TRACKING: &str = "CustomTracking";
const TYPE_ATTR: &str = "type";
const FALLBACK_INDEX_ATTR: &str = "fallback_index";

/// Content of an `<Extension>` element.
///
/// Never holds an empty list or an empty fragment: those collapse to
/// [`ExtensionBody::Empty`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExtensionBody {
    #[default]
    Empty,
    CustomTracking(Vec<Tracking>),
    Data(String),
}

impl ExtensionBody {
    fn normalized(self) -> Self {
        match self {
            Self::CustomTracking(list) if list.is_empty() => Self::Empty,
            Self::Data(data) if data.is_empty() => Self::Empty,
            body => body,
        }
    }
}

fn deserialize_body<'de, D>(deserializer: D) -> Result<ExtensionBody, D::Error>
where
    D: Deserializer<'de>,
{
    ExtensionBody::deserialize(deserializer).map(ExtensionBody::normalized)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    /// Vendor identifier from the `type` attribute. Not interpreted.
    #[serde(rename = "type")]
    pub extension_type: String,
    /// Waterfall position from `fallback_index`; 0 when absent.
    #[serde(default)]
    pub fallback_index: u32,
    #[serde(default, deserialize_with = "deserialize_body")]
    body: ExtensionBody,
}

impl Extension {
    #[must_use]
    pub fn new(extension_type: impl Into<String>) -> Self {
        Self {
            extension_type: extension_type.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_fallback_index(mut self, fallback_index: u32) -> Self {
        self.fallback_index = fallback_index;
        self
    }

    #[must_use]
    pub fn with_custom_tracking(mut self, custom_tracking: Vec<Tracking>) -> Self {
        self.set_custom_tracking(custom_tracking);
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.set_data(data);
        self
    }

    #[must_use]
    pub fn body(&self) -> &ExtensionBody {
        &self.body
    }

    /// Tracking entries in document order; empty unless the body is a
    /// custom tracking list.
    #[must_use]
    pub fn custom_tracking(&self) -> &[Tracking] {
        match &self.body {
            ExtensionBody::CustomTracking(list) => list.as_slice(),
            _ => &[],
        }
    }

    /// Raw vendor fragment; empty unless the body is opaque data.
    #[must_use]
    pub fn data(&self) -> &str {
        match &self.body {
            ExtensionBody::Data(data) => data.as_str(),
            _ => "",
        }
    }

    /// Replaces the body with a tracking list, discarding any data.
    pub fn set_custom_tracking(&mut self, custom_tracking: Vec<Tracking>) {
        self.body = ExtensionBody::CustomTracking(custom_tracking).normalized();
    }

    /// Replaces the body with an opaque fragment, discarding any tracking.
    /// The fragment is written back unchecked.
    pub fn set_data(&mut self, data: impl Into<String>) {
        self.body = ExtensionBody::Data(data.into()).normalized();
    }

    pub fn clear_body(&mut self) {
        self.body = ExtensionBody::Empty;
    }

    /// Builds an extension from its start tag and the raw text between its
    /// start and end tags.
    pub(crate) fn from_parts(
        start: &BytesStart<'_>,
        inner: &str,
    ) -> Result<Self, Report<VastError>> {
        let extension_type = codec::attribute(start, TYPE_ATTR)?.unwrap_or_default();

        let fallback_index = match codec::attribute(start, FALLBACK_INDEX_ATTR)? {
            Some(value) => value.parse::<u32>().change_context_lazy(|| {
                VastError::MalformedAttribute {
                    name: FALLBACK_INDEX_ATTR.to_string(),
                    value: value.clone(),
                }
            })?,
            None => 0,
        };

        let body = decode_body(inner)?;
        log::trace!(
            "decoded extension type={extension_type} fallback_index={fallback_index} body={}",
            match &body {
                ExtensionBody::Empty => "empty",
                ExtensionBody::CustomTracking(_) => "custom_tracking",
                ExtensionBody::Data(_) => "data",
            }
        );

        Ok(Self {
            extension_type,
            fallback_index,
            body,
        })
    }

    pub(crate) fn push_xml(&self, out: &mut String) {
        out.push('<');
        out.push_str(EXTENSION);
        codec::push_attribute(out, TYPE_ATTR, &self.extension_type);
        if self.fallback_index != 0 {
            codec::push_attribute(out, FALLBACK_INDEX_ATTR, &self.fallback_index.to_string());
        }
        out.push('>');

        match &self.body {
            ExtensionBody::CustomTracking(list) if !list.is_empty() => {
                out.push_str("<CustomTracking>");
                for tracking in list {
                    tracking.push_xml(out);
                }
                out.push_str("</CustomTracking>");
            }
            ExtensionBody::Data(data) => out.push_str(data),
            _ => {}
        }

        out.push_str("</");
        out.push_str(EXTENSION);
        out.push('>');
    }
}

/// Picks the body variant from the raw inner XML of an `<Extension>`.
///
/// Any `<CustomTracking>` child makes the body a tracking list and everything
/// else is dropped. Without one, the whole inner text, minus surrounding XML
/// whitespace, is the data
/// fragment. The fragment is still tokenized so malformed content is rejected.
fn decode_body(inner: &str) -> Result<ExtensionBody, Report<VastError>> {
    let mut reader = Reader::from_str(inner);
    let mut custom_tracking: Option<Vec<Tracking>> = None;
    let mut other_content = false;

    loop {
        match codec::next_event(&mut reader)? {
            Event::Start(child) if codec::is_named(&child, CUSTOM_TRACKING) => {
                let list = read_custom_tracking(&mut reader)?;
                custom_tracking.get_or_insert_with(Vec::new).extend(list);
            }
            Event::Empty(child) if codec::is_named(&child, CUSTOM_TRACKING) => {
                custom_tracking.get_or_insert_with(Vec::new);
            }
            Event::Start(child) => {
                codec::skip_element(&mut reader, &child)?;
                other_content = true;
            }
            Event::Empty(_) | Event::CData(_) => other_content = true,
            Event::Text(text) => {
                if !text.iter().all(|&b| codec::is_xml_whitespace(char::from(b))) {
                    other_content = true;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let body = match custom_tracking {
        Some(list) => {
            if other_content {
                log::debug!(
                    "extension mixes {CUSTOM_TRACKING} with other content, keeping tracking only"
                );
            }
            ExtensionBody::CustomTracking(list)
        }
        None => {
            let data = inner.trim_matches(codec::is_xml_whitespace);
            ExtensionBody::Data(data.to_string())
        }
    };
    Ok(body.normalized())
}

fn read_custom_tracking(reader: &mut Reader<&[u8]>) -> Result<Vec<Tracking>, Report<VastError>> {
    let mut list = Vec::new();
    loop {
        match codec::next_event(reader)? {
            Event::Start(child) if codec::is_named(&child, TRACKING) => {
                list.push(Tracking::read(reader, &child)?);
            }
            Event::Empty(child) if codec::is_named(&child, TRACKING) => {
                list.push(Tracking::read_empty(&child)?);
            }
            Event::Start(child) => codec::skip_element(reader, &child)?,
            Event::End(_) => return Ok(list),
            Event::Eof => {
                return Err(Report::new(VastError::malformed_xml(format!(
                    "unterminated <{CUSTOM_TRACKING}>"
                ))));
            }
            _ => {}
        }
    }
}

impl XmlCodec for Extension {
    fn decode(xml: &str) -> Result<Self, Report<VastError>> {
        let (start, inner) = codec::read_root(xml)?;
        if !codec::is_named(&start, EXTENSION) {
            log::debug!(
                "decoding <{}> as an {EXTENSION}",
                codec::element_name(&start)
            );
        }
        Self::from_parts(&start, inner)
    }

    fn encode(&self) -> String {
        let mut out = String::with_capacity(64 + self.data().len());
        self.push_xml(&mut out);
        out
    }
}
