//! Decoder trait for type-safe conversions.
//!
//! The `Decoder` trait converts a source type `T` into a destination type
//! `D`. Every layer of sslkit is connected through it:
//!
//! ```text
//! &str → Pem → Vec<u8> → Der → Element → Certificate
//! ```
//!
//! # Design Pattern
//!
//! 1. `Decoder<T, D>` performs the conversion.
//! 2. `DecodableFrom<T>` is a marker on the destination type constraining
//!    which conversions exist.
//!
//! Only explicitly declared pairs compile.
//!
//! ```no_run
//! use sslkit::decoder::{DecodableFrom, Decoder};
//!
//! struct Source(Vec<u8>);
//! struct Dest(String);
//!
//! #[derive(Debug)]
//! struct MyError;
//!
//! impl DecodableFrom<Source> for Dest {}
//!
//! impl Decoder<Source, Dest> for Source {
//!     type Error = MyError;
//!
//!     fn decode(&self) -> Result<Dest, Self::Error> {
//!         Ok(Dest(String::from_utf8_lossy(&self.0).to_string()))
//!     }
//! }
//! ```

/// Decoder trait for converting from type `T` to type `D`.
///
/// Implemented by the source type. The destination type must implement
/// `DecodableFrom<T>`.
///
/// ```ignore
/// use sslkit::decoder::Decoder;
/// use sslkit_der::Der;
///
/// let bytes = vec![0x30, 0x00];
/// let der: Der = bytes.decode().unwrap();
/// ```
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error if the conversion fails. The specific error
    /// conditions depend on the implementing type.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait indicating that type `D` can be decoded from type `T`.
///
/// It has no methods. Implement it for each valid destination/source pair.
pub trait DecodableFrom<T> {}
