use std::cmp::min;

use crate::errors::*;
use crate::helper::first_difference;
use crate::oracle::{Oracle, Session};

// Ceiling for the length-delta probe, generous enough for any block size
// the candidate list below knows about.
const PROBE_CEILING: usize = 256;

const CANDIDATE_SIZES: [usize; 8] = [4, 8, 16, 24, 32, 64, 128, 256];

/// Discovers the cipher's block size from oracle responses alone, unless
/// the oracle advertises it. Primary method: grow the attacker input until
/// the ciphertext length jumps; the jump is exactly one block. Falls back
/// to candidate-size confirmation when length deltas carry no information.
pub fn block_size<T: Oracle + ?Sized>(session: &Session<T>) -> Result<usize> {
    if let Some(size) = session.oracle().block_size() {
        if size > 0 {
            return Ok(size);
        }
    }

    let initial = session.encrypt(&[])?.len();

    // An oracle whose output grows byte for byte with its input runs an
    // unpadded mode; no input length will ever straddle a padding
    // boundary.
    if session.encrypt(&[b'A'])?.len() == initial + 1 {
        return candidate_block_size(session);
    }

    for i in (1..=PROBE_CEILING).step_by(4) {
        let size = session.encrypt(&vec![b'A'; i])?.len();
        if size != initial {
            // A step of 4 crosses at most one padding boundary, so the
            // delta is the block size itself.
            return Ok(size - initial);
        }
    }

    candidate_block_size(session)
}

// Confirms a block size by self-consistency: two inputs identical except
// for one trailing byte leave the first s ciphertext bytes untouched
// exactly when s is a multiple of the block size. Assumes the attacker
// region starts the message; oracles hiding a leading prefix are served by
// the length-delta probe instead.
fn candidate_block_size<T: Oracle + ?Sized>(session: &Session<T>) -> Result<usize> {
    for &s in CANDIDATE_SIZES.iter() {
        let mut input = vec![b'A'; s + 1];
        let x = session.encrypt(&input)?;
        input[s] = b'B';
        let y = session.encrypt(&input)?;

        if x.len() >= s && y.len() >= s && x[..s] == y[..s] {
            return Ok(s);
        }
    }
    Err(AttackError::BlockSizeUndetected.into())
}

/// Discovers how many whole ciphertext blocks the oracle's unknown leading
/// data occupies, and the minimal filler that pushes the attacker region
/// onto a block boundary.
///
/// Three distinct filler bytes are compared pairwise so that a secret (or
/// leading) byte coinciding with one filler value cannot fake a boundary.
/// Returns `(offset, filler)` with `filler.len() < block_size`; the filler
/// is empty when the leading data is already aligned.
pub fn offset<T: Oracle + ?Sized>(
    session: &Session<T>,
    block_size: usize,
) -> Result<(usize, Vec<u8>)> {
    let baseline = session.encrypt(&vec![b'A'; 2 * block_size])?;
    let b = session.encrypt(&vec![b'B'; 2 * block_size])?;
    let c = session.encrypt(&vec![b'C'; 2 * block_size])?;
    let original = diverging_block(&baseline, &b, &c, block_size)?;

    for i in 0..=2 * block_size {
        let mut input = vec![b'A'; 2 * block_size];
        for slot in input[i..].iter_mut() {
            *slot = b'B';
        }
        let b = session.encrypt(&input)?;
        for slot in input[i..].iter_mut() {
            *slot = b'C';
        }
        let c = session.encrypt(&input)?;

        let shifted = diverging_block(&baseline, &b, &c, block_size)?;
        if shifted != original {
            // i filler bytes reached the next boundary. When the leading
            // data was already aligned that takes a whole block of filler,
            // which reduces to none at all.
            let filler_len = i % block_size;
            let offset = if filler_len == 0 { shifted - 1 } else { shifted };
            return Ok((offset, vec![b'A'; filler_len]));
        }
    }
    Err(AttackError::OffsetUndetected.into())
}

// Block index of the earliest divergence between the baseline response and
// either of the two others.
fn diverging_block(
    baseline: &[u8],
    b: &[u8],
    c: &[u8],
    block_size: usize,
) -> Result<usize> {
    let index = match (first_difference(baseline, b), first_difference(baseline, c)) {
        (Some(x), Some(y)) => min(x, y),
        (Some(x), None) => x,
        (None, Some(y)) => y,
        (None, None) => return Err(AttackError::OffsetUndetected.into()),
    };
    Ok(index / block_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_oracle::{FixedLengthOracle, XorEcbOracle};

    #[test]
    fn block_size_detection_over_supported_sizes() {
        for &b in &[4usize, 8, 16, 24, 32, 64] {
            for &u in &[0usize, 1, b - 1, b, 2 * b + 3] {
                let oracle = XorEcbOracle::new(b, &vec![7u8; u], b"some secret");
                let session = Session::new(&oracle);
                assert_eq!(
                    block_size(&session).unwrap(),
                    b,
                    "block size {} with {} leading bytes",
                    b,
                    u
                );
            }
        }
    }

    #[test]
    fn advertised_block_size_skips_probing() {
        let oracle = XorEcbOracle::unpadded(24, b"", b"secret");
        let session = Session::new(&oracle);
        assert_eq!(block_size(&session).unwrap(), 24);
        assert_eq!(session.calls(), 0);
    }

    #[test]
    fn fixed_length_oracle_is_rejected() {
        let oracle = FixedLengthOracle;
        let session = Session::new(&oracle);
        let err = block_size(&session).unwrap_err();
        match err.downcast_ref::<AttackError>() {
            Some(AttackError::BlockSizeUndetected) => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn offset_detection_over_leading_lengths() {
        let block = 16;
        for &u in &[0usize, 1, 15, 16, 17, 47] {
            let oracle = XorEcbOracle::new(block, &vec![9u8; u], b"another secret");
            let session = Session::new(&oracle);
            let (off, filler) = offset(&session, block).unwrap();
            assert!(filler.len() < block, "filler too long for {} leading bytes", u);
            assert_eq!((u + filler.len()) % block, 0);
            assert_eq!(off, (u + filler.len()) / block);
        }
    }

    #[test]
    fn input_insensitive_oracle_fails_offset_detection() {
        struct ConstantOracle;
        impl crate::oracle::Oracle for ConstantOracle {
            fn encrypt_with_prefix(&self, _prefix: &[u8]) -> Result<Vec<u8>> {
                Ok(vec![0x42; 48])
            }
        }

        let oracle = ConstantOracle;
        let session = Session::new(&oracle);
        let err = offset(&session, 16).unwrap_err();
        match err.downcast_ref::<AttackError>() {
            Some(AttackError::OffsetUndetected) => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
