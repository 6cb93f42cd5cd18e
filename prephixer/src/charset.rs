/// Default candidate ordering for English-ish plaintext, most frequent
/// first, derived from letter frequencies in a wiki text corpus.
pub const DEFAULT_CHARACTER_SET: &[u8] =
    b" eationsrlhdcumpfgybw.k:v-/,CT0SA;B#G2xI1PFWE)3(*M'!LRDHN_\"9UO54Vj87q$K6zJY%?Z+=@QX&|[]<>^{}";

/// Completes a frequency-ranked seed into a permutation of all 256 byte
/// values: first occurrences keep their relative order, every missing
/// value follows in ascending order. Total for any input.
pub fn complete_character_set(seed: &[u8]) -> Vec<u8> {
    let mut seen = [false; 256];
    let mut set = Vec::with_capacity(256);

    for &c in seed {
        if !seen[c as usize] {
            seen[c as usize] = true;
            set.push(c);
        }
    }

    for c in 0..=255u8 {
        if !seen[c as usize] {
            set.push(c);
        }
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_complete(set: &[u8]) {
        assert_eq!(set.len(), 256);
        let mut seen = [false; 256];
        for &c in set {
            assert!(!seen[c as usize], "duplicate value {}", c);
            seen[c as usize] = true;
        }
    }

    #[test]
    fn empty_seed_yields_ascending_values() {
        let set = complete_character_set(&[]);
        assert_complete(&set);
        assert_eq!(set, (0..=255u8).collect::<Vec<u8>>());
    }

    #[test]
    fn default_seed_is_completed() {
        let set = complete_character_set(DEFAULT_CHARACTER_SET);
        assert_complete(&set);
        assert_eq!(&set[..DEFAULT_CHARACTER_SET.len()], DEFAULT_CHARACTER_SET);
    }

    #[test]
    fn duplicates_are_dropped_keeping_first_occurrence() {
        let set = complete_character_set(b"aabca");
        assert_complete(&set);
        assert_eq!(&set[..3], b"abc");
    }
}
