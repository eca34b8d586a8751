//! The `<Extensions>` container holding an ad's `<Extension>` elements.

use error_stack::Report;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::codec::{self, XmlCodec};
use crate::error::VastError;
use crate::extension::{Extension, EXTENSION};

const EXTENSIONS: &str = "Extensions";

/// The `<Extensions>` container of an `InLine` or `Wrapper` ad.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Extensions(pub Vec<Extension>);

impl Extensions {
    /// First extension with the given `type`.
    #[must_use]
    pub fn find_by_type(&self, extension_type: &str) -> Option<&Extension> {
        self.0
            .iter()
            .find(|extension| extension.extension_type == extension_type)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Extension> {
        self.0.iter()
    }
}

impl From<Vec<Extension>> for Extensions {
    fn from(extensions: Vec<Extension>) -> Self {
        Self(extensions)
    }
}

impl<'a> IntoIterator for &'a Extensions {
    type Item = &'a Extension;
    type IntoIter = std::slice::Iter<'a, Extension>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn decode_children(inner: &str) -> Result<Vec<Extension>, Report<VastError>> {
    let mut reader = Reader::from_str(inner);
    let mut extensions = Vec::new();

    loop {
        match codec::next_event(&mut reader)? {
            Event::Start(child) if codec::is_named(&child, EXTENSION) => {
                let body = codec::inner_xml(inner, &mut reader, &child)?;
                extensions.push(Extension::from_parts(&child, body)?);
            }
            Event::Empty(child) if codec::is_named(&child, EXTENSION) => {
                extensions.push(Extension::from_parts(&child, "")?);
            }
            Event::Start(child) => {
                log::debug!(
                    "ignoring <{}> inside <{EXTENSIONS}>",
                    codec::element_name(&child)
                );
                codec::skip_element(&mut reader, &child)?;
            }
            Event::Eof => return Ok(extensions),
            _ => {}
        }
    }
}

impl XmlCodec for Extensions {
    fn decode(xml: &str) -> Result<Self, Report<VastError>> {
        let (start, inner) = codec::read_root(xml)?;
        if !codec::is_named(&start, EXTENSIONS) {
            log::debug!(
                "decoding <{}> as {EXTENSIONS}",
                codec::element_name(&start)
            );
        }
        let extensions = decode_children(inner)?;
        log::debug!("decoded {} extensions", extensions.len());
        Ok(Self(extensions))
    }

    /// Empty containers encode to nothing.
    fn encode(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let mut out = String::from("<Extensions>");
        for extension in &self.0 {
            extension.push_xml(&mut out);
        }
        out.push_str("</Extensions>");
        out
    }
}
