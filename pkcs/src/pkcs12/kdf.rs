//! RFC 7292 Appendix B key derivation.
//!
//! Only the MAC key (ID 3) is derived this way; bag encryption uses PBES2.

use sha2::Digest;
use zeroize::Zeroizing;

pub(crate) const ID_MAC: u8 = 3;

// Block size v of SHA-1 and SHA-256.
const V: usize = 64;

/// BMPString form of the password with its two-byte terminator.
pub(crate) fn bmp_password(password: &str) -> Zeroizing<Vec<u8>> {
    let mut out = Zeroizing::new(Vec::with_capacity(password.len() * 2 + 2));
    for unit in password.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    out.extend_from_slice(&[0, 0]);
    out
}

fn stretch(input: &[u8]) -> Vec<u8> {
    let len = V * input.len().div_ceil(V);
    input.iter().cycle().take(len).copied().collect()
}

pub(crate) fn derive<D: Digest>(
    password: &[u8],
    salt: &[u8],
    id: u8,
    iterations: u32,
    len: usize,
) -> Zeroizing<Vec<u8>> {
    let diversifier = [id; V];
    let mut input = Zeroizing::new(stretch(salt));
    input.extend_from_slice(&Zeroizing::new(stretch(password)));

    let mut out = Zeroizing::new(Vec::with_capacity(len));
    loop {
        let mut a = D::new()
            .chain_update(diversifier)
            .chain_update(input.as_slice())
            .finalize();
        for _ in 1..iterations {
            a = D::digest(&a);
        }
        let take = (len - out.len()).min(a.len());
        out.extend_from_slice(&a[..take]);
        if out.len() >= len {
            return out;
        }

        // I_j = (I_j + B + 1) mod 2^(8v)
        let b: Vec<u8> = a.iter().cycle().take(V).copied().collect();
        for block in input.chunks_exact_mut(V) {
            let mut carry = 1u16;
            for (x, y) in block.iter_mut().zip(b.iter()).rev() {
                let sum = u16::from(*x) + u16::from(*y) + carry;
                *x = sum as u8;
                carry = sum >> 8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use sha1::Sha1;
    use sha2::Sha256;

    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02X}", b)).collect()
    }

    #[rstest]
    #[case("", &[0, 0])]
    #[case("ab", &[0, 0x61, 0, 0x62, 0, 0])]
    #[case("é", &[0, 0xe9, 0, 0])]
    fn test_bmp_password(#[case] password: &str, #[case] expected: &[u8]) {
        assert_eq!(expected, bmp_password(password).as_slice());
    }

    #[rstest]
    #[case(1, 24, "8AAAE6297B6CB04642AB5B077851284EB7128F1A2A7FBCA3")]
    #[case(2, 8, "79993DFE048D3B76")]
    fn test_derive_sha1_vectors(#[case] id: u8, #[case] len: usize, #[case] expected: &str) {
        let password = bmp_password("smeg");
        let salt = [0x0a, 0x58, 0xcf, 0x64, 0x53, 0x0d, 0x82, 0x3f];
        let key = derive::<Sha1>(&password, &salt, id, 1, len);
        assert_eq!(expected, hex(&key));
    }

    #[test]
    fn test_derive_prefix_stable() {
        let password = bmp_password("secret");
        let short = derive::<Sha256>(&password, b"salt", ID_MAC, 10, 32);
        let long = derive::<Sha256>(&password, b"salt", ID_MAC, 10, 80);
        assert_eq!(short.as_slice(), &long[..32]);
        assert_eq!(80, long.len());
    }

    #[test]
    fn test_derive_depends_on_id() {
        let password = bmp_password("secret");
        let mac = derive::<Sha256>(&password, b"salt", ID_MAC, 1, 32);
        let other = derive::<Sha256>(&password, b"salt", 1, 1, 32);
        assert_ne!(mac, other);
    }
}
