use std::fmt;

/// Digest algorithm behind a `ContentHash`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha256,
    Fnv1a,
}

/// Digest of an asset's raw bytes, used as its cache and upload key.
///
/// SHA-256 keys are plain lowercase hex; FNV-1a keys carry an `h_` prefix
/// so the weaker digest is recognizable on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash {
    algorithm: HashAlgorithm,
    key: String,
}

impl ContentHash {
    /// Hash with the strongest algorithm compiled in.
    pub fn of(bytes: &[u8]) -> Self {
        #[cfg(feature = "sha2")]
        {
            Self::sha256(bytes)
        }
        #[cfg(not(feature = "sha2"))]
        {
            Self::fnv1a(bytes)
        }
    }

    #[cfg(feature = "sha2")]
    pub fn sha256(bytes: &[u8]) -> Self {
        use sha2::{Digest, Sha256};

        let digest = Sha256::digest(bytes);
        let key = digest.iter().map(|b| format!("{:02x}", b)).collect();
        Self {
            algorithm: HashAlgorithm::Sha256,
            key,
        }
    }

    pub fn fnv1a(bytes: &[u8]) -> Self {
        Self {
            algorithm: HashAlgorithm::Fnv1a,
            key: format!("h_{:x}", fnv1a_32(bytes)),
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// 32-bit FNV-1a
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 0x811c9dc5;
    for byte in bytes {
        hash ^= *byte as u32;
        hash = hash.wrapping_mul(0x01000193);
    }
    hash
}
