extern crate cipher;
extern crate failure;
extern crate prephixer;
extern crate serialize;

use std::env;
use std::process;
use std::time::Instant;

use failure::Error;

use cipher::{Cipher, Mode};
use prephixer::oracles::{LocalOracle, RemoteOracle};
use prephixer::{decrypt, Recovery};
use serialize::from_base64;

const DEMO_SECRET: &str =
    "U2t1bGxTcGFjZSBpcyBhIGhhY2tlcnNwYWNlIGluIFdpbm5pcGVnLCBmb3Vu\
     ZGVkIERlY2VtYmVyIDIwMTAuIFNrdWxsU3BhY2UgaXMgYSBwbGFjZSBmb3Ig\
     aGFja2VycywgYnVpbGRlcnMsIHByb2dyYW1tZXJzLCBhcnRpc3RzLCBhbmQg\
     YW55Ym9keSBpbnRlcmVzdGVkIGluIGhvdyBzdHVmZiB3b3JrcyB0byBnYXRo\
     ZXIgaW4gYSBjb21tb24gcGxhY2UgYW5kIGhlbHAgZm9jdXMgdGhlaXIga25v\
     d2xlZGdlIGFuZCBjcmVhdGl2aXR5Lg==";

fn report(recovery: &Recovery, elapsed: ::std::time::Duration) {
    println!("Recovered: {}", String::from_utf8_lossy(&recovery.plaintext));
    println!("Oracle calls: {}", recovery.oracle_calls);
    println!("Time: {:?}", elapsed);
}

fn run_local() -> Result<(), Error> {
    let secret = from_base64(DEMO_SECRET)?;
    let oracle = LocalOracle::new(Cipher::Aes128, Mode::Ecb, &secret);

    let start = Instant::now();
    let recovery = decrypt(&oracle, true, true)?;
    oracle.verify_secret(&recovery.plaintext)?;

    report(&recovery, start.elapsed());
    Ok(())
}

fn run_remote() -> Result<(), Error> {
    println!("Starting remote attack (requires the oracle_server binary on localhost:20222)");
    let oracle = RemoteOracle::new("http://localhost:20222");

    let start = Instant::now();
    let recovery = decrypt(&oracle, true, true)?;

    report(&recovery, start.elapsed());
    Ok(())
}

fn main() {
    let arg = env::args().nth(1);
    let result = match arg.as_ref().map(String::as_str) {
        None => run_local(),
        Some("remote") => run_remote(),
        Some(other) => {
            println!("Unknown argument \"{}\", expected no argument or \"remote\"", other);
            process::exit(1);
        }
    };

    if let Err(e) = result {
        println!("Attack failed: {}", e);
        process::exit(1);
    }
}
