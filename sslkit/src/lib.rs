//! # sslkit
//!
//! Core traits for encoding and decoding in the sslkit certificate and key
//! toolkit, and the error taxonomy every crate reports through.
//!
//! ## Overview
//!
//! ```text
//! PEM → Vec<u8> → DER → Element → Certificate
//! ```
//!
//! Each step uses the `Decoder` trait to convert from one type to the next,
//! and the `Encoder` trait to convert in the reverse direction. Marker traits
//! (`DecodableFrom` and `EncodableTo`) restrict which conversions exist.
//!
//! ```ignore
//! use sslkit::decoder::Decoder;
//! use sslkit_der::Der;
//! use sslkit_asn1::ASN1Object;
//!
//! let bytes = vec![0x30, 0x00];
//! let der: Der = bytes.decode().unwrap();
//! let asn1: ASN1Object = der.decode().unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
pub mod error;
