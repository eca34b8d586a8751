//! VAST `<Extension>` codec for the trusted server.
//!
//! Decodes vendor extensions from VAST documents and writes them back in a
//! canonical form, keeping opaque vendor fragments byte-for-byte.
//!
//! # Modules
//!
//! - [`codec`]: The [`XmlCodec`] decode/encode contract shared by VAST elements
//! - [`error`]: Error types and error handling utilities
//! - [`extension`]: The polymorphic `<Extension>` element
//! - [`extensions`]: The `<Extensions>` container
//! - [`logging`]: Logger installation for binaries
//! - [`settings`]: Configuration management
//! - [`tracking`]: `<Tracking>` entries of a custom tracking list
//! - [`test_support`]: Shared test fixtures

pub mod codec;
pub mod error;
pub mod extension;
pub mod extensions;
pub mod logging;
pub mod settings;
pub mod test_support;
pub mod tracking;

pub use codec::XmlCodec;
pub use error::VastError;
pub use extension::{Extension, ExtensionBody};
pub use extensions::Extensions;
pub use tracking::Tracking;
