//! Shared decode/encode contract for VAST elements and the low-level
//! `quick-xml` helpers the element codecs are built from.
//!
//! Decoding works on byte spans of the source document rather than on a
//! struct mapping, so opaque fragments can be handed back exactly as they
//! appeared in the input.

use std::io;

use error_stack::{Report, ResultExt};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::VastError;

/// Decode/encode contract implemented by every VAST element codec.
pub trait XmlCodec: Sized {
    /// Decodes the first element found in `xml`.
    ///
    /// # Errors
    ///
    /// Returns [`VastError::MalformedXml`] if the input is not well-formed or
    /// contains no element, and [`VastError::MalformedAttribute`] if a numeric
    /// attribute cannot be parsed.
    fn decode(xml: &str) -> Result<Self, Report<VastError>>;

    /// Encodes the value to its canonical XML form.
    fn encode(&self) -> String;

    /// Decodes from raw bytes, which must be UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`VastError::MalformedXml`] if the bytes are not valid UTF-8,
    /// otherwise the same errors as [`XmlCodec::decode`].
    fn decode_bytes(bytes: &[u8]) -> Result<Self, Report<VastError>> {
        let xml = std::str::from_utf8(bytes)
            .change_context(VastError::malformed_xml("input is not valid UTF-8"))?;
        Self::decode(xml)
    }

    /// Writes the canonical encoding to `out`.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised by the sink.
    fn write_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.encode().as_bytes())
    }
}

/// Returns true if the element's local name (prefix ignored) is `name`.
pub(crate) fn is_named(start: &BytesStart<'_>, name: &str) -> bool {
    start.local_name().as_ref() == name.as_bytes()
}

pub(crate) fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

/// Reads the next event, mapping parser failures to `MalformedXml`.
pub(crate) fn next_event<'i>(
    reader: &mut Reader<&'i [u8]>,
) -> Result<Event<'i>, Report<VastError>> {
    let position = reader.buffer_position();
    reader.read_event().change_context_lazy(|| {
        VastError::malformed_xml(format!("parse error near byte {position}"))
    })
}

/// Finds the first element of `xml` and returns its start tag together with
/// the raw text between its start and end tags (empty for `<x/>`).
pub(crate) fn read_root(xml: &str) -> Result<(BytesStart<'_>, &str), Report<VastError>> {
    let mut reader = Reader::from_str(xml);
    loop {
        match next_event(&mut reader)? {
            Event::Start(start) => {
                let inner = inner_xml(xml, &mut reader, &start)?;
                return Ok((start, inner));
            }
            Event::Empty(start) => return Ok((start, "")),
            Event::End(end) => {
                return Err(Report::new(VastError::malformed_xml(format!(
                    "unexpected closing tag </{}>",
                    String::from_utf8_lossy(end.name().as_ref())
                ))));
            }
            Event::Eof => {
                return Err(Report::new(VastError::malformed_xml(
                    "document contains no element",
                )));
            }
            _ => {}
        }
    }
}

/// Consumes everything up to the end tag matching `start` and returns the raw
/// source text in between.
///
/// `reader` must have been created over `source`, since the returned slice is
/// cut from `source` with the reader's byte offsets.
pub(crate) fn inner_xml<'i>(
    source: &'i str,
    reader: &mut Reader<&'i [u8]>,
    start: &BytesStart<'_>,
) -> Result<&'i str, Report<VastError>> {
    let span = reader.read_to_end(start.name()).change_context_lazy(|| {
        VastError::malformed_xml(format!("element <{}> is not closed", element_name(start)))
    })?;

    let from = usize::try_from(span.start)
        .change_context(VastError::malformed_xml("element offset out of range"))?;
    let to = usize::try_from(span.end)
        .change_context(VastError::malformed_xml("element offset out of range"))?;

    source.get(from..to).ok_or_else(|| {
        Report::new(VastError::malformed_xml(format!(
            "content of <{}> is not addressable",
            element_name(start)
        )))
    })
}

/// Skips a child element and all of its content.
pub(crate) fn skip_element(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
) -> Result<(), Report<VastError>> {
    reader.read_to_end(start.name()).change_context_lazy(|| {
        VastError::malformed_xml(format!("element <{}> is not closed", element_name(start)))
    })?;
    Ok(())
}

/// Looks up an attribute by local name and returns its unescaped value.
pub(crate) fn attribute(
    start: &BytesStart<'_>,
    name: &str,
) -> Result<Option<String>, Report<VastError>> {
    for attr in start.attributes() {
        let attr = attr.change_context_lazy(|| {
            VastError::malformed_xml(format!("invalid attribute on <{}>", element_name(start)))
        })?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            let value = attr.unescape_value().change_context_lazy(|| {
                VastError::malformed_xml(format!("invalid value for attribute {name}"))
            })?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Whitespace as defined by the XML grammar (`S`). Other Unicode spaces such
/// as U+00A0 are content.
pub(crate) fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Collects the character data of the element whose start tag was just read,
/// consuming its end tag. Text is unescaped, CDATA is taken as is, and nested
/// elements are skipped.
///
/// The result is verbatim, except that when the element holds a CDATA section
/// the whitespace-only text around it (indentation) is left out.
pub(crate) fn read_text(reader: &mut Reader<&[u8]>) -> Result<String, Report<VastError>> {
    let mut chunks: Vec<(bool, String)> = Vec::new();
    loop {
        match next_event(reader)? {
            Event::Text(chunk) => {
                let chunk = chunk
                    .unescape()
                    .change_context(VastError::malformed_xml("invalid character data"))?;
                chunks.push((false, chunk.into_owned()));
            }
            Event::CData(chunk) => {
                let chunk = std::str::from_utf8(&chunk)
                    .change_context(VastError::malformed_xml("CDATA section is not UTF-8"))?;
                chunks.push((true, chunk.to_string()));
            }
            Event::Start(child) => skip_element(reader, &child)?,
            Event::End(_) => break,
            Event::Eof => {
                return Err(Report::new(VastError::malformed_xml(
                    "unexpected end of input inside element",
                )));
            }
            _ => {}
        }
    }

    let has_cdata = chunks.iter().any(|(cdata, _)| *cdata);
    Ok(chunks
        .into_iter()
        .filter(|(cdata, chunk)| *cdata || !has_cdata || !chunk.chars().all(is_xml_whitespace))
        .map(|(_, chunk)| chunk)
        .collect())
}

/// Appends ` name="value"` with the value escaped.
pub(crate) fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

/// Appends `text` as a CDATA section. A `]]>` inside the text is split over
/// two sections.
pub(crate) fn push_cdata(out: &mut String, text: &str) {
    out.push_str("<![CDATA[");
    out.push_str(&text.replace("]]>", "]]]]><![CDATA[>"));
    out.push_str("]]>");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_root_skips_prolog() {
        let xml = "<?xml version=\"1.0\"?>\n<!-- c --><Root a=\"1\"> <b/> </Root>";
        let (start, inner) = read_root(xml).unwrap();
        assert!(is_named(&start, "Root"));
        assert_eq!(inner, " <b/> ");
    }

    #[test]
    fn test_read_root_self_closing() {
        let (start, inner) = read_root("<Root/>").unwrap();
        assert_eq!(element_name(&start), "Root");
        assert_eq!(inner, "");
    }

    #[test]
    fn test_read_root_no_element() {
        let err = read_root("  just text  ").unwrap_err();
        assert!(matches!(
            err.current_context(),
            VastError::MalformedXml { .. }
        ));
    }

    #[test]
    fn test_read_root_unclosed() {
        let err = read_root("<Root><b></Root>").unwrap_err();
        assert!(matches!(
            err.current_context(),
            VastError::MalformedXml { .. }
        ));
    }

    #[test]
    fn test_attribute_unescapes_and_ignores_prefix() {
        let (start, _) = read_root(r#"<Root x:event="a&amp;b" other="1"/>"#).unwrap();
        assert_eq!(attribute(&start, "event").unwrap().as_deref(), Some("a&b"));
        assert_eq!(attribute(&start, "missing").unwrap(), None);
    }

    #[test]
    fn test_attribute_duplicate_is_malformed() {
        let (start, _) = read_root(r#"<Root a="1" a="2" b="3"/>"#).unwrap();
        assert!(attribute(&start, "b").is_err());
    }

    #[test]
    fn test_read_text_mixes_cdata_and_text() {
        let xml = "<T>a&lt;b<![CDATA[<c>]]><skip>zzz</skip>d</T>";
        let mut reader = Reader::from_str(xml);
        let Event::Start(_) = next_event(&mut reader).unwrap() else {
            unreachable!("fixture starts with an element");
        };
        assert_eq!(read_text(&mut reader).unwrap(), "a<b<c>d");
    }

    #[test]
    fn test_read_text_keeps_plain_text_verbatim() {
        let xml = "<T>\n  http://u \u{a0}</T>";
        let mut reader = Reader::from_str(xml);
        let Event::Start(_) = next_event(&mut reader).unwrap() else {
            unreachable!("fixture starts with an element");
        };
        assert_eq!(read_text(&mut reader).unwrap(), "\n  http://u \u{a0}");
    }

    #[test]
    fn test_read_text_drops_indentation_around_cdata() {
        let xml = "<T>\n    <![CDATA[ http://u ]]>\n  </T>";
        let mut reader = Reader::from_str(xml);
        let Event::Start(_) = next_event(&mut reader).unwrap() else {
            unreachable!("fixture starts with an element");
        };
        assert_eq!(read_text(&mut reader).unwrap(), " http://u ");
    }

    #[test]
    fn test_is_xml_whitespace() {
        assert!(" \t\r\n".chars().all(is_xml_whitespace));
        assert!(!is_xml_whitespace('\u{a0}'));
        assert!(!is_xml_whitespace('\u{2028}'));
    }

    #[test]
    fn test_push_attribute_escapes() {
        let mut out = String::new();
        push_attribute(&mut out, "type", r#"a"<b>&"#);
        assert_eq!(out, r#" type="a&quot;&lt;b&gt;&amp;""#);
    }

    #[test]
    fn test_push_cdata_splits_terminator() {
        let mut out = String::new();
        push_cdata(&mut out, "x]]>y");
        assert_eq!(out, "<![CDATA[x]]]]><![CDATA[>y]]>");
    }
}
