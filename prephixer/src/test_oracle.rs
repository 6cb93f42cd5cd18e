use crate::errors::*;
use crate::oracle::Oracle;

/// Toy deterministic block cipher: every block is XORed with a fixed key.
/// Cryptographically worthless, but deterministic and block-respecting,
/// which is all the attack assumes, and unlike AES it comes in whatever
/// block size a test wants.
pub struct XorEcbOracle {
    block_size: usize,
    key: Vec<u8>,
    leading: Vec<u8>,
    secret: Vec<u8>,
    pad: bool,
    advertise: bool,
}

impl XorEcbOracle {
    pub fn new(block_size: usize, leading: &[u8], secret: &[u8]) -> XorEcbOracle {
        XorEcbOracle {
            block_size,
            key: (0..block_size).map(|i| (i * 37 + 11) as u8).collect(),
            leading: leading.to_vec(),
            secret: secret.to_vec(),
            pad: true,
            advertise: false,
        }
    }

    /// Stream-style variant: no padding, and the block size is advertised
    /// because length probing cannot find it.
    pub fn unpadded(block_size: usize, leading: &[u8], secret: &[u8]) -> XorEcbOracle {
        XorEcbOracle {
            pad: false,
            advertise: true,
            ..XorEcbOracle::new(block_size, leading, secret)
        }
    }
}

impl Oracle for XorEcbOracle {
    fn encrypt_with_prefix(&self, prefix: &[u8]) -> Result<Vec<u8>> {
        let mut message =
            Vec::with_capacity(self.leading.len() + prefix.len() + self.secret.len());
        message.extend_from_slice(&self.leading);
        message.extend_from_slice(prefix);
        message.extend_from_slice(&self.secret);

        if self.pad {
            let fill = self.block_size - message.len() % self.block_size;
            message.extend(::std::iter::repeat(fill as u8).take(fill));
        }

        for (i, byte) in message.iter_mut().enumerate() {
            *byte ^= self.key[i % self.block_size];
        }
        Ok(message)
    }

    fn block_size(&self) -> Option<usize> {
        if self.advertise {
            Some(self.block_size)
        } else {
            None
        }
    }

    fn name(&self) -> &str {
        "xor toy oracle"
    }
}

/// Stands in for a broken endpoint that hashes instead of encrypting:
/// input-dependent bytes, but a length that never moves.
pub struct FixedLengthOracle;

impl Oracle for FixedLengthOracle {
    fn encrypt_with_prefix(&self, prefix: &[u8]) -> Result<Vec<u8>> {
        let mut state: u64 = 0xcbf2_9ce4_8422_2325;
        for &b in prefix {
            state = (state ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3);
        }

        let mut digest = Vec::with_capacity(32);
        for _ in 0..32 {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            digest.push((state >> 32) as u8);
        }
        Ok(digest)
    }

    fn name(&self) -> &str {
        "fixed-length stub"
    }
}
