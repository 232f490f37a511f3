//! RSA and ECC keys: generation, import, export and signing.
//!
//! RSA moduli are 2048, 3072 or 4096 bits with public exponent 65537.
//! EC keys live on P-256, P-384 or P-521. Generation can run on a worker
//! thread through [`spawn`] and be aborted through its [`AbortSignal`].

pub mod digest;
pub mod error;
mod generate;
mod key_pair;
mod prime;
mod public_key;
mod signal;
mod spec;

pub use digest::{HashAlgorithm, digest, hash};
pub use error::{Error, Result};
pub use generate::{GenerationHandle, generate, generate_with_rng, generate_with_signal, spawn};
pub use key_pair::KeyPair;
pub use public_key::PublicKey;
pub use signal::AbortSignal;
pub use spec::{KeySpec, RSA_KEY_SIZES};
