#[macro_use]
extern crate failure;
extern crate openssl;

use failure::Error;
use openssl::symm;

pub const BLOCK_SIZE: usize = 16;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cipher {
    Aes128,
    Aes256,
}

impl Cipher {
    pub fn key_len(self) -> usize {
        match self {
            Cipher::Aes128 => 16,
            Cipher::Aes256 => 32,
        }
    }

    fn ecb(self) -> symm::Cipher {
        match self {
            Cipher::Aes128 => symm::Cipher::aes_128_ecb(),
            Cipher::Aes256 => symm::Cipher::aes_256_ecb(),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Mode {
    Ecb,
    Cbc,
    Ctr,
}

impl Mode {
    /// CTR turns the cipher into a stream and needs no padding.
    pub fn uses_padding(self) -> bool {
        self != Mode::Ctr
    }
}

#[derive(Debug, Fail)]
pub enum CipherError {
    #[fail(display = "invalid padding")]
    InvalidPadding,

    #[fail(display = "failed to encrypt block {:?}", block)]
    EncryptionFailed { block: Vec<u8> },

    #[fail(display = "failed to decrypt block {:?}", block)]
    DecryptionFailed { block: Vec<u8> },
}

pub fn pad_inplace(u: &mut Vec<u8>, k: u8) -> Result<(), Error> {
    ensure!(k >= 2, "invalid parameter");

    let p = k - (u.len() % k as usize) as u8;
    for _ in 0..p {
        u.push(p);
    }
    Ok(())
}

pub fn unpad_inplace(u: &mut Vec<u8>, k: u8) -> Result<(), Error> {
    if !padding_valid(u, k)? {
        return Err(CipherError::InvalidPadding.into());
    }

    let len_new = u.len() - u[u.len() - 1] as usize;
    u.truncate(len_new);
    Ok(())
}

pub fn pad(u: &[u8], k: u8) -> Result<Vec<u8>, Error> {
    let mut v = u.to_vec();
    pad_inplace(&mut v, k)?;
    Ok(v)
}

pub fn padding_valid(u: &[u8], k: u8) -> Result<bool, Error> {
    ensure!(k >= 2, "invalid parameter");

    if u.is_empty() || u.len() % k as usize != 0 {
        return Ok(false);
    }
    let padding = u[u.len() - 1];
    if !(1 <= padding && padding <= k) {
        return Ok(false);
    }
    Ok(u[u.len() - padding as usize..].iter().all(|&b| b == padding))
}

fn xor_inplace(u: &mut [u8], t: &[u8]) {
    for (c, &d) in u.iter_mut().zip(t.iter()) {
        *c ^= d;
    }
}

fn encrypt_block(cipher: Cipher, key: &[u8], block: &[u8]) -> Result<Vec<u8>, Error> {
    ensure!(
        block.len() == BLOCK_SIZE,
        "input does not consist of {} bytes",
        BLOCK_SIZE
    );

    let mut ciphertext = symm::encrypt(cipher.ecb(), key, None, block).map_err(|_| {
        CipherError::EncryptionFailed {
            block: block.to_vec(),
        }
    })?;

    // The one-shot API appends a full padding block; the raw block cipher
    // output is the first BLOCK_SIZE bytes.
    ciphertext.truncate(BLOCK_SIZE);
    Ok(ciphertext)
}

fn decrypt_block(cipher: Cipher, key: &[u8], block: &[u8]) -> Result<Vec<u8>, Error> {
    ensure!(
        block.len() == BLOCK_SIZE,
        "input does not consist of {} bytes",
        BLOCK_SIZE
    );

    // The one-shot API insists on unpadding, so feed it a block that
    // decrypts to a full block of padding.
    let dummy_padding = encrypt_block(cipher, key, &[BLOCK_SIZE as u8; BLOCK_SIZE])?;
    let mut u = block.to_vec();
    u.extend_from_slice(&dummy_padding);
    symm::decrypt(cipher.ecb(), key, None, &u).map_err(|_| {
        CipherError::DecryptionFailed {
            block: block.to_vec(),
        }
        .into()
    })
}

pub fn encrypt(
    cipher: Cipher,
    mode: Mode,
    key: &[u8],
    iv: Option<&[u8]>,
    data: &[u8],
) -> Result<Vec<u8>, Error> {
    ensure!(
        key.len() == cipher.key_len(),
        "key does not consist of {} bytes",
        cipher.key_len()
    );

    match mode {
        Mode::Ecb => {
            ensure!(iv.is_none(), "iv not supported for ECB mode");
            let u = pad(data, BLOCK_SIZE as u8)?;
            let mut ciphertext = Vec::with_capacity(u.len());
            for block in u.chunks(BLOCK_SIZE) {
                ciphertext.extend_from_slice(&encrypt_block(cipher, key, block)?);
            }
            Ok(ciphertext)
        }

        Mode::Cbc => {
            let iv = iv.ok_or_else(|| format_err!("iv required for CBC mode"))?;
            ensure!(iv.len() == BLOCK_SIZE, "iv does not consist of {} bytes", BLOCK_SIZE);
            let u = pad(data, BLOCK_SIZE as u8)?;
            let mut ciphertext = Vec::with_capacity(u.len());
            let mut prev = iv.to_vec();
            for block in u.chunks(BLOCK_SIZE) {
                xor_inplace(&mut prev, block);
                prev = encrypt_block(cipher, key, &prev)?;
                ciphertext.extend_from_slice(&prev);
            }
            Ok(ciphertext)
        }

        Mode::Ctr => {
            ensure!(iv.is_none(), "iv not supported for CTR mode");
            ctr(cipher, key, data)
        }
    }
}

pub fn decrypt(
    cipher: Cipher,
    mode: Mode,
    key: &[u8],
    iv: Option<&[u8]>,
    data: &[u8],
) -> Result<Vec<u8>, Error> {
    ensure!(
        key.len() == cipher.key_len(),
        "key does not consist of {} bytes",
        cipher.key_len()
    );

    match mode {
        Mode::Ecb => {
            ensure!(iv.is_none(), "iv not supported for ECB mode");
            ensure!(
                data.len() % BLOCK_SIZE == 0,
                "input length not a multiple of {}",
                BLOCK_SIZE
            );
            let mut cleartext = Vec::with_capacity(data.len());
            for block in data.chunks(BLOCK_SIZE) {
                cleartext.extend_from_slice(&decrypt_block(cipher, key, block)?);
            }
            unpad_inplace(&mut cleartext, BLOCK_SIZE as u8)?;
            Ok(cleartext)
        }

        Mode::Cbc => {
            let iv = iv.ok_or_else(|| format_err!("iv required for CBC mode"))?;
            ensure!(
                data.len() % BLOCK_SIZE == 0,
                "input length not a multiple of {}",
                BLOCK_SIZE
            );
            let mut cleartext = Vec::with_capacity(data.len());
            let mut prev = iv;
            for block in data.chunks(BLOCK_SIZE) {
                let mut cur = decrypt_block(cipher, key, block)?;
                xor_inplace(&mut cur, prev);
                cleartext.extend_from_slice(&cur);
                prev = block;
            }
            unpad_inplace(&mut cleartext, BLOCK_SIZE as u8)?;
            Ok(cleartext)
        }

        Mode::Ctr => {
            ensure!(iv.is_none(), "iv not supported for CTR mode");
            ctr(cipher, key, data)
        }
    }
}

// CTR with a zero nonce and a little-endian counter in the second half of
// the keystream block. Deliberately deterministic across calls.
fn ctr(cipher: Cipher, key: &[u8], data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut output = Vec::with_capacity(data.len());
    let mut counter = [0u8; BLOCK_SIZE];
    for chunk in data.chunks(BLOCK_SIZE) {
        let keystream = encrypt_block(cipher, key, &counter)?;
        let mut block = chunk.to_vec();
        xor_inplace(&mut block, &keystream);
        output.extend_from_slice(&block);
        increment_counter(&mut counter[BLOCK_SIZE / 2..]);
    }
    Ok(output)
}

fn increment_counter(v: &mut [u8]) {
    for b in v.iter_mut() {
        *b = b.wrapping_add(1);
        if *b != 0 {
            break;
        }
    }
}
