//! Error types for the VAST codec.
//!
//! Fallible operations return `error_stack::Report<VastError>`. Parser failures
//! from `quick-xml` are attached underneath the codec error with
//! `change_context`, so callers match on the top-level kind and still get the
//! low-level detail when the report is printed.

use derive_more::Display;

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum VastError {
    /// The input is not well-formed XML.
    #[display("Malformed XML: {message}")]
    MalformedXml { message: String },

    /// An attribute that must carry a number carries something else.
    #[display("Malformed attribute {name}=\"{value}\"")]
    MalformedAttribute { name: String, value: String },

    /// Settings could not be loaded or logging could not be installed.
    #[display("Configuration error: {message}")]
    Configuration { message: String },
}

impl core::error::Error for VastError {}

impl VastError {
    pub(crate) fn malformed_xml(message: impl Into<String>) -> Self {
        Self::MalformedXml {
            message: message.into(),
        }
    }
}
