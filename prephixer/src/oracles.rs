use rand::{self, Rng};
use reqwest::Client;

use cipher::{self, Cipher, Mode, BLOCK_SIZE};
use serialize::{from_hex, Serialize};

use crate::errors::*;
use crate::oracle::Oracle;

/// In-process oracle backed by the cipher crate. Key, leading data and
/// secret are fixed at construction, so every call is deterministic.
pub struct LocalOracle {
    key: Vec<u8>,
    leading: Vec<u8>,
    secret: Vec<u8>,
    cipher: Cipher,
    mode: Mode,
}

impl LocalOracle {
    /// Random key and random-length unknown leading data, as a real
    /// vulnerable application would have.
    pub fn new(cipher: Cipher, mode: Mode, secret: &[u8]) -> LocalOracle {
        let mut rng = rand::thread_rng();
        let key: Vec<u8> = rng.gen_iter().take(cipher.key_len()).collect();
        let leading_len = rng.gen_range(0, 3 * BLOCK_SIZE);
        let leading: Vec<u8> = rng.gen_iter().take(leading_len).collect();

        LocalOracle {
            key,
            leading,
            secret: secret.to_vec(),
            cipher,
            mode,
        }
    }

    /// Fully pinned-down construction for reproducible sessions.
    pub fn with_key(
        cipher: Cipher,
        mode: Mode,
        key: &[u8],
        leading: &[u8],
        secret: &[u8],
    ) -> LocalOracle {
        LocalOracle {
            key: key.to_vec(),
            leading: leading.to_vec(),
            secret: secret.to_vec(),
            cipher,
            mode,
        }
    }

    pub fn verify_secret(&self, candidate: &[u8]) -> Result<()> {
        compare_eq(&self.secret[..], candidate)
    }
}

impl Oracle for LocalOracle {
    fn encrypt_with_prefix(&self, prefix: &[u8]) -> Result<Vec<u8>> {
        let mut cleartext =
            Vec::with_capacity(self.leading.len() + prefix.len() + self.secret.len());
        cleartext.extend_from_slice(&self.leading);
        cleartext.extend_from_slice(prefix);
        cleartext.extend_from_slice(&self.secret);

        // A fixed IV keeps CBC deterministic across calls, which is the
        // vulnerability this oracle exists to demonstrate.
        match self.mode {
            Mode::Cbc => cipher::encrypt(
                self.cipher,
                self.mode,
                &self.key,
                Some(&[0; BLOCK_SIZE]),
                &cleartext,
            ),
            _ => cipher::encrypt(self.cipher, self.mode, &self.key, None, &cleartext),
        }
    }

    fn block_size(&self) -> Option<usize> {
        // Padded modes are probeable; the unpadded one is not.
        match self.mode {
            Mode::Ctr => Some(BLOCK_SIZE),
            _ => None,
        }
    }

    fn name(&self) -> &str {
        "local test oracle"
    }
}

/// Client for the vulnerable HTTP server in the `oracle_server` crate: the
/// attacker prefix travels hex-encoded in the path, the ciphertext comes
/// back hex-encoded in the body. Transport failures (connection refused,
/// non-success status) are fatal to the attack; retrying is the
/// transport's business, not ours.
pub struct RemoteOracle {
    client: Client,
    base_url: String,
}

impl RemoteOracle {
    pub fn new(base_url: &str) -> RemoteOracle {
        RemoteOracle {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Oracle for RemoteOracle {
    fn encrypt_with_prefix(&self, prefix: &[u8]) -> Result<Vec<u8>> {
        let url = format!("{}/encrypt/{}", self.base_url, prefix.to_hex());
        let mut response = self.client.get(&url).send()?;
        ensure!(
            response.status().is_success(),
            "oracle responded with status {}",
            response.status()
        );
        from_hex(response.text()?.trim())
    }

    fn character_set(&self) -> Option<Vec<u8>> {
        // Ordering tuned for the demo server's known secret.
        Some(b" earnisoctldpukhmf,gSywb0.vWD21".to_vec())
    }

    fn name(&self) -> &str {
        "remote test oracle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_oracle_is_deterministic() {
        let oracle = LocalOracle::new(Cipher::Aes128, Mode::Ecb, b"fixed secret");
        let a = oracle.encrypt_with_prefix(b"prefix").unwrap();
        let b = oracle.encrypt_with_prefix(b"prefix").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn verify_secret_rejects_mismatches() {
        let oracle = LocalOracle::new(Cipher::Aes128, Mode::Ecb, b"right");
        assert!(oracle.verify_secret(b"right").is_ok());
        assert!(oracle.verify_secret(b"wrong").is_err());
    }

    // Exercises the full HTTP round trip; needs the port to be free.
    // Run with `cargo test -- --ignored`.
    #[test]
    #[ignore]
    fn remote_round_trip() {
        let mut listening = oracle_server::start(20223).unwrap();

        let oracle = RemoteOracle::new("http://localhost:20223");
        let recovery = crate::recover::decrypt(&oracle, true, false).unwrap();
        assert_eq!(recovery.plaintext, oracle_server::SECRET.to_vec());

        let _ = listening.close();
    }
}
