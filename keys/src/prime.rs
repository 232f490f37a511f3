//! Probabilistic prime generation for RSA.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::signal::AbortSignal;

// Odd primes below 1000, for trial division.
const SMALL_PRIMES: [u32; 167] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283,
    293, 307, 311, 313, 317, 331, 337, 347, 349, 353, 359, 367, 373, 379, 383, 389, 397, 401,
    409, 419, 421, 431, 433, 439, 443, 449, 457, 461, 463, 467, 479, 487, 491, 499, 503, 509,
    521, 523, 541, 547, 557, 563, 569, 571, 577, 587, 593, 599, 601, 607, 613, 617, 619, 631,
    641, 643, 647, 653, 659, 661, 673, 677, 683, 691, 701, 709, 719, 727, 733, 739, 743, 751,
    757, 761, 769, 773, 787, 797, 809, 811, 821, 823, 827, 829, 839, 853, 857, 859, 863, 877,
    881, 883, 887, 907, 911, 919, 929, 937, 941, 947, 953, 967, 971, 977, 983, 991, 997,
];

pub(crate) fn random_bytes<R: RngCore + CryptoRng>(
    rng: &mut R,
    len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    let mut buf = Zeroizing::new(vec![0u8; len]);
    rng.try_fill_bytes(&mut buf).map_err(Error::Entropy)?;
    Ok(buf)
}

/// Uniform value with at most `bits` bits.
fn random_bits<R: RngCore + CryptoRng>(rng: &mut R, bits: usize) -> Result<BigUint> {
    let len = bits.div_ceil(8);
    let bytes = random_bytes(rng, len)?;
    Ok(BigUint::from_bytes_be(&bytes) >> (len * 8 - bits))
}

/// Odd `bits`-bit candidate with the top two bits set, so the product of two
/// such candidates has exactly `2 * bits` bits.
fn candidate<R: RngCore + CryptoRng>(rng: &mut R, bits: usize) -> Result<BigUint> {
    let top = BigUint::from(3u32) << (bits - 2);
    Ok(random_bits(rng, bits)? | top | BigUint::one())
}

/// Uniform witness in `[2, n - 2]` by rejection sampling.
fn witness<R: RngCore + CryptoRng>(rng: &mut R, n: &BigUint) -> Result<BigUint> {
    let bound = n - 3u32;
    let bits = n.bits() as usize;
    loop {
        let a = random_bits(rng, bits)?;
        if a < bound {
            return Ok(a + 2u32);
        }
    }
}

pub(crate) fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    let (mut a, mut b) = (a.clone(), b.clone());
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

/// Trial division by the small primes, then `rounds` Miller-Rabin rounds with
/// random bases. The signal is checked before every round.
pub(crate) fn is_probable_prime<R: RngCore + CryptoRng>(
    n: &BigUint,
    rounds: usize,
    rng: &mut R,
    signal: &AbortSignal,
) -> Result<bool> {
    let two = BigUint::from(2u32);
    if *n < two {
        return Ok(false);
    }
    if *n == two {
        return Ok(true);
    }
    if (n % &two).is_zero() {
        return Ok(false);
    }
    for p in SMALL_PRIMES {
        let p = BigUint::from(p);
        if *n == p {
            return Ok(true);
        }
        if (n % &p).is_zero() {
            return Ok(false);
        }
    }

    let one = BigUint::one();
    let n_minus_one = n - &one;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for _ in 0..rounds {
        signal.check()?;
        let a = witness(rng, n)?;
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return Ok(false);
    }
    Ok(true)
}

/// Draws candidates until one passes. Returns the prime and the number of
/// candidates tried.
pub(crate) fn random_prime<R: RngCore + CryptoRng>(
    bits: usize,
    rounds: usize,
    rng: &mut R,
    signal: &AbortSignal,
) -> Result<(BigUint, usize)> {
    let mut attempts = 0;
    loop {
        signal.check()?;
        attempts += 1;
        let candidate = candidate(rng, bits)?;
        if is_probable_prime(&candidate, rounds, rng, signal)? {
            return Ok((candidate, attempts));
        }
    }
}
