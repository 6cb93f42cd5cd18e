use crate::charset::{complete_character_set, DEFAULT_CHARACTER_SET};
use crate::detect;
use crate::errors::*;
use crate::helper::nth_block;
use crate::oracle::{Oracle, Session};

/// Outcome of a successful decrypt call.
#[derive(Debug)]
pub struct Recovery {
    pub plaintext: Vec<u8>,
    /// Total number of oracle queries the attack needed.
    pub oracle_calls: usize,
}

// Recovers the next secret byte, or None once no candidate reproduces the
// goal block (the natural end of the secret).
//
// The filler puts the attacker region on a block boundary, the 'A' run
// places the next unknown byte last in the target block:
//
//   leading | filler | A .. A unknown | rest of the secret
//           |<-- offset blocks -->|
//
// The same block filled with recovered bytes plus a candidate matches the
// goal ciphertext exactly when the candidate is the unknown byte.
fn find_character<T: Oracle + ?Sized>(
    session: &Session<T>,
    recovered: &[u8],
    block_size: usize,
    character_set: &[u8],
    offset: usize,
    filler: &[u8],
) -> Result<Option<u8>> {
    let index = recovered.len() % block_size;
    let block = recovered.len() / block_size;
    let target = block + offset;

    let mut input = filler.to_vec();
    input.resize(filler.len() + block_size - index - 1, b'A');

    let response = session.encrypt(&input)?;
    let goal = match nth_block(&response, block_size, target) {
        Some(chunk) if chunk.len() == block_size => chunk.to_vec(),
        // The message ends inside the target block; nothing left to align.
        _ => return Ok(None),
    };

    input.extend_from_slice(recovered);
    for &candidate in character_set {
        input.push(candidate);
        let response = session.encrypt(&input)?;
        if nth_block(&response, block_size, target) == Some(&goal[..]) {
            return Ok(Some(candidate));
        }
        input.pop();
    }
    Ok(None)
}

/// Recovers the secret behind `oracle` one byte at a time.
///
/// `has_padding` tells the attack whether the oracle's cipher mode pads its
/// plaintext (ECB and CBC do, CTR does not). The alignment always drags in
/// exactly one byte of synthetic padding behind a padded secret, so the run
/// must end in `0x01`, which is validated and stripped. Claiming padding on
/// an unpadded oracle fails with `BadPadding`; the other way round leaves a
/// stray `0x01` on the result.
///
/// `verbose` prints progress; it never changes behaviour.
pub fn decrypt<T: Oracle + ?Sized>(
    oracle: &T,
    has_padding: bool,
    verbose: bool,
) -> Result<Recovery> {
    let session = Session::new(oracle);

    let block_size = detect::block_size(&session)?;
    let (offset, filler) = detect::offset(&session, block_size)?;

    if verbose {
        println!("> Starting Prephixer decrypter with oracle {}", oracle.name());
        println!(">> Block size: {}", block_size);
        println!(">> Offset: {} blocks, filler: {} bytes", offset, filler.len());
    }

    let seed = oracle
        .character_set()
        .unwrap_or_else(|| DEFAULT_CHARACTER_SET.to_vec());
    let character_set = complete_character_set(&seed);

    // The ciphertext is never shorter than the message it encrypts, so its
    // length bounds the loop against a misbehaving oracle.
    let longest = session.encrypt(&filler)?.len();

    let mut result = Vec::new();
    while result.len() < longest {
        match find_character(
            &session,
            &result,
            block_size,
            &character_set,
            offset,
            &filler,
        )? {
            Some(c) => result.push(c),
            None => break,
        }

        if verbose {
            println!("{}", String::from_utf8_lossy(&result));
        }
    }

    if result.is_empty() {
        return Err(AttackError::NoBytesRecovered.into());
    }

    if has_padding {
        let last = result[result.len() - 1];
        if last != 1 {
            return Err(AttackError::BadPadding { last }.into());
        }
        result.pop();
    }

    Ok(Recovery {
        plaintext: result,
        oracle_calls: session.calls(),
    })
}
