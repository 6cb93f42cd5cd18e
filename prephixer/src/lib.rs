//! Chosen-plaintext recovery of a secret that a deterministic block cipher
//! encrypts behind an attacker-controlled prefix.
//!
//! The only capability this crate needs is an oracle computing
//! `E(k, u || a || s)` for attacker-chosen `a`, where the key `k`, the
//! leading data `u` and the secret `s` are fixed and unknown. By sliding
//! `a` so that each unknown byte in turn lands on the last position of a
//! block, the byte can be narrowed down with at most 256 further queries.
//! Block size and the length of `u` are discovered from oracle responses
//! alone.

#[macro_use]
extern crate failure;

extern crate cipher;
extern crate rand;
extern crate reqwest;
extern crate serialize;

pub mod charset;
pub mod detect;
pub mod errors;
pub mod oracle;
pub mod oracles;
pub mod recover;

mod helper;

#[cfg(test)]
mod test_oracle;

pub use crate::oracle::Oracle;
pub use crate::recover::{decrypt, Recovery};
