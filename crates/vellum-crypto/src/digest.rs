#![forbid(unsafe_code)]

//! Digest algorithms used for reference digests, XAdES certificate digests
//! and timestamp message imprints.

use vellum_core::{algorithm, Error};
use digest::Digest;

/// A digest algorithm identified by its XML-DSig URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestMethod {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
}

impl DigestMethod {
    /// Resolve a `DigestMethod/@Algorithm` URI.
    pub fn from_uri(uri: &str) -> Result<Self, Error> {
        Ok(match uri {
            algorithm::SHA1 => Self::Sha1,
            algorithm::SHA224 => Self::Sha224,
            algorithm::SHA256 => Self::Sha256,
            algorithm::SHA384 => Self::Sha384,
            algorithm::SHA512 => Self::Sha512,
            algorithm::SHA3_224 => Self::Sha3_224,
            algorithm::SHA3_256 => Self::Sha3_256,
            algorithm::SHA3_384 => Self::Sha3_384,
            algorithm::SHA3_512 => Self::Sha3_512,
            _ => {
                return Err(Error::UnsupportedAlgorithm(format!(
                    "digest algorithm: {uri}"
                )))
            }
        })
    }

    /// Resolve a digest algorithm OID (as found in CMS and TSTInfo structures).
    pub fn from_oid(oid: &der::asn1::ObjectIdentifier) -> Result<Self, Error> {
        Ok(match oid.to_string().as_str() {
            "1.3.14.3.2.26" => Self::Sha1,
            "2.16.840.1.101.3.4.2.4" => Self::Sha224,
            "2.16.840.1.101.3.4.2.1" => Self::Sha256,
            "2.16.840.1.101.3.4.2.2" => Self::Sha384,
            "2.16.840.1.101.3.4.2.3" => Self::Sha512,
            "2.16.840.1.101.3.4.2.7" => Self::Sha3_224,
            "2.16.840.1.101.3.4.2.8" => Self::Sha3_256,
            "2.16.840.1.101.3.4.2.9" => Self::Sha3_384,
            "2.16.840.1.101.3.4.2.10" => Self::Sha3_512,
            other => {
                return Err(Error::UnsupportedAlgorithm(format!(
                    "digest algorithm OID: {other}"
                )))
            }
        })
    }

    pub fn uri(self) -> &'static str {
        match self {
            Self::Sha1 => algorithm::SHA1,
            Self::Sha224 => algorithm::SHA224,
            Self::Sha256 => algorithm::SHA256,
            Self::Sha384 => algorithm::SHA384,
            Self::Sha512 => algorithm::SHA512,
            Self::Sha3_224 => algorithm::SHA3_224,
            Self::Sha3_256 => algorithm::SHA3_256,
            Self::Sha3_384 => algorithm::SHA3_384,
            Self::Sha3_512 => algorithm::SHA3_512,
        }
    }

    /// Compute the digest of `data` in one shot.
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha1 => sha1::Sha1::digest(data).to_vec(),
            Self::Sha224 => sha2::Sha224::digest(data).to_vec(),
            Self::Sha256 => sha2::Sha256::digest(data).to_vec(),
            Self::Sha384 => sha2::Sha384::digest(data).to_vec(),
            Self::Sha512 => sha2::Sha512::digest(data).to_vec(),
            Self::Sha3_224 => sha3::Sha3_224::digest(data).to_vec(),
            Self::Sha3_256 => sha3::Sha3_256::digest(data).to_vec(),
            Self::Sha3_384 => sha3::Sha3_384::digest(data).to_vec(),
            Self::Sha3_512 => sha3::Sha3_512::digest(data).to_vec(),
        }
    }
}

/// Compute a digest in one shot from an algorithm URI.
pub fn digest(uri: &str, data: &[u8]) -> Result<Vec<u8>, Error> {
    Ok(DigestMethod::from_uri(uri)?.digest(data))
}

/// Recompute the digest of `data` and compare it with `expected`.
pub fn matches(uri: &str, data: &[u8], expected: &[u8]) -> Result<bool, Error> {
    let computed = digest(uri, data)?;
    Ok(constant_time_eq(&computed, expected))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
