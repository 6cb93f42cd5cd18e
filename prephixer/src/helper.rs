/// The n-th `block_size` chunk of `data`. The final chunk may be shorter
/// when the length is not a multiple of the block size; callers that need
/// a full block must check the length themselves.
pub fn nth_block(data: &[u8], block_size: usize, n: usize) -> Option<&[u8]> {
    data.chunks(block_size).nth(n)
}

/// Index of the first byte where `a` and `b` differ, `None` if they agree
/// over the shorter of the two. The detectors only ever compare responses
/// of equal length.
pub fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    a.iter().zip(b.iter()).position(|(x, y)| x != y)
}
