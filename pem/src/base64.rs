//! Plain base64 helpers, independent of PEM framing.

use ::base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::Error;

pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes standard base64. Whitespace anywhere in the input is ignored so
/// wrapped text can be pasted as is.
pub fn decode(text: &str) -> Result<Vec<u8>, Error> {
    let compact = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>();
    STANDARD.decode(compact).map_err(Error::Base64Decode)
}
