//! A deliberately vulnerable HTTP service: it encrypts caller-supplied
//! data prepended to a fixed secret under AES-256-ECB with a fixed key,
//! which is exactly the oracle the prephixer attack consumes.

extern crate cipher;
extern crate failure;
extern crate iron;
extern crate rand;
extern crate serialize;

use failure::Error;
use iron::prelude::*;
use iron::status;
use rand::Rng;

use cipher::{Cipher, Mode};
use serialize::{from_hex, Serialize};

/// The secret the server leaks one byte at a time.
pub const SECRET: &[u8] =
    b"SkullSpace is a hackerspace in Winnipeg, founded December 2010. \
      SkullSpace is a place for hackers, builders, programmers, artists, \
      and anybody interested in how stuff works to gather in a common \
      place and help focus their knowledge and creativity.";

fn encrypt_with_prefix(key: &[u8], prefix: &[u8]) -> Result<Vec<u8>, Error> {
    let mut cleartext = Vec::with_capacity(prefix.len() + SECRET.len());
    cleartext.extend_from_slice(prefix);
    cleartext.extend_from_slice(SECRET);
    cipher::encrypt(Cipher::Aes256, Mode::Ecb, key, None, &cleartext)
}

fn handle_request(req: &mut Request, key: &[u8]) -> IronResult<Response> {
    let path = req.url.path();

    let ciphertext = if path.len() == 1 && path[0] == "get_encrypted_data" {
        encrypt_with_prefix(key, &[]).ok()
    } else if path.len() == 2 && path[0] == "encrypt" {
        from_hex(path[1])
            .ok()
            .and_then(|prefix| encrypt_with_prefix(key, &prefix).ok())
    } else {
        None
    };

    match ciphertext {
        Some(ciphertext) => Ok(Response::with((status::Ok, ciphertext.to_hex()))),
        None => Ok(Response::with(status::NotFound)),
    }
}

/// Starts the server on localhost with a fresh random key and returns the
/// listener handle so callers can shut it down.
pub fn start(port: u16) -> Result<iron::Listening, Error> {
    let mut rng = rand::thread_rng();
    let key: Vec<u8> = rng.gen_iter().take(Cipher::Aes256.key_len()).collect();

    Iron::new(move |req: &mut Request| handle_request(req, &key))
        .http(("localhost", port))
        .map_err(|err| err.into())
}
