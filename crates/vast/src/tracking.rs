//! `<Tracking>` entries of a `<CustomTracking>` list.

use error_stack::Report;
use quick_xml::events::BytesStart;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::VastError;

pub(crate) const TRACKING: &str = "Tracking";
const EVENT_ATTR: &str = "event";

/// A custom tracking callback: the URI to ping when `event` fires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tracking {
    pub event: String,
    pub uri: String,
}

impl Tracking {
    #[must_use]
    pub fn new(event: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            uri: uri.into(),
        }
    }

    /// Decodes a `<Tracking>` element whose start tag was just read from
    /// `reader`. The URI is kept as written.
    pub(crate) fn read(
        reader: &mut Reader<&[u8]>,
        start: &BytesStart<'_>,
    ) -> Result<Self, Report<VastError>> {
        let event = codec::attribute(start, EVENT_ATTR)?.unwrap_or_default();
        let uri = codec::read_text(reader)?;
        Ok(Self::new(event, uri))
    }

    /// Decodes a self-closing `<Tracking/>`, which has no URI.
    pub(crate) fn read_empty(start: &BytesStart<'_>) -> Result<Self, Report<VastError>> {
        let event = codec::attribute(start, EVENT_ATTR)?.unwrap_or_default();
        Ok(Self::new(event, String::new()))
    }

    pub(crate) fn push_xml(&self, out: &mut String) {
        out.push_str("<Tracking");
        codec::push_attribute(out, EVENT_ATTR, &self.event);
        out.push('>');
        codec::push_cdata(out, &self.uri);
        out.push_str("</Tracking>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::events::Event;

    fn decode(xml: &str) -> Tracking {
        let mut reader = Reader::from_str(xml);
        match codec::next_event(&mut reader).unwrap() {
            Event::Start(start) => Tracking::read(&mut reader, &start).unwrap(),
            Event::Empty(start) => Tracking::read_empty(&start).unwrap(),
            other => unreachable!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_tracking_cdata_uri() {
        let tracking =
            decode(r#"<Tracking event="event.1"><![CDATA[http://event.1]]></Tracking>"#);
        assert_eq!(tracking, Tracking::new("event.1", "http://event.1"));
    }

    #[test]
    fn test_tracking_plain_text_uri() {
        let tracking = decode(
            "<Tracking event=\"start\">\n  https://t.example/s?a=1&amp;b=2\n</Tracking>",
        );
        assert_eq!(tracking.event, "start");
        assert_eq!(tracking.uri, "\n  https://t.example/s?a=1&b=2\n");
    }

    #[test]
    fn test_tracking_cdata_uri_keeps_inner_whitespace() {
        let tracking = decode(
            "<Tracking event=\"e\">\n    <![CDATA[ http://u ]]>\n  </Tracking>",
        );
        assert_eq!(tracking.uri, " http://u ");
    }

    #[test]
    fn test_tracking_without_event_or_uri() {
        let tracking = decode("<Tracking/>");
        assert_eq!(tracking, Tracking::default());
    }

    #[test]
    fn test_tracking_push_xml() {
        let mut out = String::new();
        Tracking::new("a&b", "http://x/?q=]]>").push_xml(&mut out);
        assert_eq!(
            out,
            r#"<Tracking event="a&amp;b"><![CDATA[http://x/?q=]]]]><![CDATA[>]]></Tracking>"#
        );
        assert_eq!(decode(&out), Tracking::new("a&b", "http://x/?q=]]>"));
    }
}
