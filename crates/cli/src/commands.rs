//! Subcommand implementations. Each takes the input text and returns the text
//! to print.

use serde::de::DeserializeOwned;
use serde::Serialize;
use trusted_server_vast::{Extension, Extensions, XmlCodec};

use crate::error::CliError;

/// Decode and re-encode in canonical form.
pub fn roundtrip(input: &str, list: bool) -> Result<String, CliError> {
    if list {
        roundtrip_as::<Extensions>(input)
    } else {
        roundtrip_as::<Extension>(input)
    }
}

/// Decode and render the value as pretty JSON.
pub fn inspect(input: &str, list: bool) -> Result<String, CliError> {
    if list {
        inspect_as::<Extensions>(input)
    } else {
        inspect_as::<Extension>(input)
    }
}

/// Read the JSON form and encode it as XML.
pub fn encode(input: &str, list: bool) -> Result<String, CliError> {
    if list {
        encode_as::<Extensions>(input)
    } else {
        encode_as::<Extension>(input)
    }
}

fn roundtrip_as<T: XmlCodec>(input: &str) -> Result<String, CliError> {
    Ok(T::decode(input)?.encode())
}

fn inspect_as<T: XmlCodec + Serialize>(input: &str) -> Result<String, CliError> {
    let value = T::decode(input)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

fn encode_as<T: XmlCodec + DeserializeOwned>(input: &str) -> Result<String, CliError> {
    let value: T = serde_json::from_str(input)?;
    Ok(value.encode())
}
