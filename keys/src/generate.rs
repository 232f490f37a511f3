use std::thread::{self, JoinHandle};

use num_bigint::BigUint;
use num_traits::One;
use rand_core::{CryptoRng, OsRng, RngCore};
use rsa::RsaPrivateKey;
use sslkit_pkix_types::NamedCurve;
use tracing::debug;

use crate::error::{Error, Result};
use crate::key_pair::{EcSigningKey, KeyPair};
use crate::prime::{gcd, random_bytes, random_prime};
use crate::signal::AbortSignal;
use crate::spec::{KeySpec, RsaGenerationConfig};

fn to_rsa(value: &BigUint) -> rsa::BigUint {
    rsa::BigUint::from_bytes_be(&value.to_bytes_be())
}

pub(crate) fn generate_rsa<R: RngCore + CryptoRng>(
    bits: usize,
    config: &RsaGenerationConfig,
    rng: &mut R,
    signal: &AbortSignal,
) -> Result<KeyPair> {
    let e = BigUint::from(config.public_exponent);
    let one = BigUint::one();
    let mut candidates = 0;
    let mut pairs = 0;
    loop {
        pairs += 1;
        let (p, p_tries) = random_prime(bits / 2, config.miller_rabin_rounds, rng, signal)?;
        let (q, q_tries) = random_prime(bits - bits / 2, config.miller_rabin_rounds, rng, signal)?;
        candidates += p_tries + q_tries;
        if p == q {
            continue;
        }

        let p1 = &p - 1u32;
        let q1 = &q - 1u32;
        let phi = &p1 * &q1;
        if gcd(&e, &phi) != one {
            debug!(pairs, "public exponent shares a factor with phi(n), retrying");
            continue;
        }
        let lambda = &phi / gcd(&p1, &q1);
        let Some(d) = e.modinv(&lambda) else {
            continue;
        };
        let n = &p * &q;

        debug!(bits, candidates, pairs, "generated RSA key");
        let key = RsaPrivateKey::from_components(
            to_rsa(&n),
            to_rsa(&e),
            to_rsa(&d),
            vec![to_rsa(&p), to_rsa(&q)],
        )?;
        return Ok(KeyPair::from_rsa(key));
    }
}

/// Rejection sampling of the private scalar from `[1, order - 1]`.
fn generate_ec<R: RngCore + CryptoRng>(
    curve: NamedCurve,
    rng: &mut R,
    signal: &AbortSignal,
) -> Result<KeyPair> {
    let mut attempts = 0;
    loop {
        signal.check()?;
        attempts += 1;
        let mut scalar = random_bytes(rng, curve.field_size())?;
        if curve == NamedCurve::P521 {
            // 66 bytes hold 528 bits; the order has 521.
            scalar[0] &= 0x01;
        }
        if let Ok(key) = EcSigningKey::from_scalar(curve, &scalar) {
            debug!(%curve, attempts, "generated EC key");
            return Ok(KeyPair::from_ec(key));
        }
    }
}

pub fn generate(spec: &KeySpec) -> Result<KeyPair> {
    generate_with_signal(spec, &AbortSignal::new())
}

/// Generation that stops with [`Error::Cancelled`] once `signal` is aborted.
pub fn generate_with_signal(spec: &KeySpec, signal: &AbortSignal) -> Result<KeyPair> {
    generate_with_rng(spec, &mut OsRng, signal)
}

pub fn generate_with_rng<R: RngCore + CryptoRng>(
    spec: &KeySpec,
    rng: &mut R,
    signal: &AbortSignal,
) -> Result<KeyPair> {
    spec.validate()?;
    debug!(%spec, "generating key");
    match *spec {
        KeySpec::Rsa { bits } => generate_rsa(bits, &RsaGenerationConfig::default(), rng, signal),
        KeySpec::Ec { curve } => generate_ec(curve, rng, signal),
    }
}

/// Key generation running on its own thread.
#[derive(Debug)]
pub struct GenerationHandle {
    signal: AbortSignal,
    handle: JoinHandle<Result<KeyPair>>,
}

impl GenerationHandle {
    pub fn signal(&self) -> &AbortSignal {
        &self.signal
    }

    pub fn abort(&self) {
        self.signal.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn join(self) -> Result<KeyPair> {
        self.handle.join().map_err(|_| Error::WorkerPanicked)?
    }
}

pub fn spawn(spec: KeySpec) -> GenerationHandle {
    let signal = AbortSignal::new();
    let worker = signal.clone();
    let handle = thread::spawn(move || generate_with_signal(&spec, &worker));
    GenerationHandle { signal, handle }
}
