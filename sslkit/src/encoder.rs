//! Encoder trait, the reverse direction of [`crate::decoder::Decoder`].
//!
//! ```text
//! Certificate → Element → Der → Vec<u8> → Pem
//! ```

/// Encoder trait for converting `self` (of type `T`) into type `E`.
///
/// ```ignore
/// use sslkit::encoder::Encoder;
/// use sslkit_der::Der;
///
/// let der: Der = element.encode()?;
/// let bytes: Vec<u8> = der.encode()?;
/// ```
pub trait Encoder<T, E: EncodableTo<T>> {
    /// The error type returned when encoding fails.
    type Error;

    /// Encodes `self` into type `E`.
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait indicating that type `E` can be encoded from type `T`.
pub trait EncodableTo<T> {}
