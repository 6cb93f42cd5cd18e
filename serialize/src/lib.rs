#[macro_use]
extern crate failure;

use failure::Error;

const BASE64_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

pub trait Serialize {
    fn to_base64(&self) -> String;
    fn to_hex(&self) -> String;
}

impl Serialize for [u8] {
    fn to_base64(&self) -> String {
        let mut base64 = String::with_capacity(4 * self.len() / 3);
        for block in self.chunks(3) {
            block_to_base64(block, &mut base64);
        }

        if self.len() % 3 >= 1 {
            base64.pop();
            if self.len() % 3 == 1 {
                base64.pop();
                base64.push('=');
            }
            base64.push('=');
        }

        base64
    }

    fn to_hex(&self) -> String {
        let mut u4 = Vec::with_capacity(2 * self.len());
        for u in self {
            u4.push(u >> 4);
            u4.push(u & 0xf);
        }
        u4.iter()
            .map(|&u| std::char::from_digit(u32::from(u), 16).unwrap())
            .collect()
    }
}

fn block_to_base64(block: &[u8], base64: &mut String) {
    let mut u = [0u8; 3];
    u[..block.len()].copy_from_slice(block);

    let digits = [
        u[0] >> 2,
        ((u[0] & 0x3) << 4) | (u[1] >> 4),
        ((u[1] & 0xf) << 2) | (u[2] >> 6),
        u[2] & 0x3f,
    ];
    for &digit in &digits {
        base64.push(BASE64_CHARS[digit as usize] as char);
    }
}

fn u8_from_base64(c: char) -> Result<u8, Error> {
    let u = match c {
        'A'..='Z' => c as u8 - b'A',
        'a'..='z' => c as u8 - b'a' + 26,
        '0'..='9' => c as u8 - b'0' + 52,
        '+' => 62,
        '/' => 63,
        _ => bail!("not a valid base64 character: {}", c),
    };
    Ok(u)
}

pub fn from_base64(s: &str) -> Result<Vec<u8>, Error> {
    ensure!(s.len() % 4 == 0, "input length needs to be a multiple of 4");

    let mut n = s.len();
    if n > 0 && s.as_bytes()[n - 1] == b'=' {
        if s.as_bytes()[n - 2] == b'=' {
            n -= 1;
        }
        n -= 1;
    }

    let mut digits = Vec::with_capacity(n);
    for c in s.chars().take(n) {
        digits.push(u8_from_base64(c)?);
    }

    let mut u = Vec::with_capacity(3 * s.len() / 4);
    for b in digits.chunks(4) {
        u.push((b[0] << 2) + (b[1] >> 4));
        if b.len() == 2 {
            ensure!(b[1] << 4 == 0, "input not padded with zero");
            break;
        }

        u.push((b[1] << 4) + (b[2] >> 2));
        if b.len() == 3 {
            ensure!(b[2] << 6 == 0, "input not padded with zero");
            break;
        }

        u.push((b[2] << 6) + b[3]);
    }
    Ok(u)
}

pub fn from_hex(s: &str) -> Result<Vec<u8>, Error> {
    ensure!(s.len() % 2 == 0, "input length needs to be even");

    let mut digits = Vec::with_capacity(s.len());
    for c in s.chars() {
        match c.to_digit(16) {
            Some(digit) => digits.push(digit as u8),
            None => bail!("not a valid hex character: {}", c),
        }
    }
    Ok(digits.chunks(2).map(|d| (d[0] << 4) | d[1]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let u = b"I'm killing your brain like a poisonous mushroom";
        assert_eq!(from_hex(&u.to_hex()).unwrap(), u.to_vec());
    }

    #[test]
    fn hex_rejects_bad_input() {
        assert!(from_hex("abc").is_err());
        assert!(from_hex("zz").is_err());
        assert_eq!(from_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn base64_known_vectors() {
        assert_eq!(b"any carnal pleasure.".to_base64(), "YW55IGNhcm5hbCBwbGVhc3VyZS4=");
        assert_eq!(b"any carnal pleasure".to_base64(), "YW55IGNhcm5hbCBwbGVhc3VyZQ==");
        assert_eq!(b"any carnal pleasur".to_base64(), "YW55IGNhcm5hbCBwbGVhc3Vy");
    }

    #[test]
    fn base64_round_trip() {
        let u: Vec<u8> = (0u16..=255).map(|i| i as u8).collect();
        assert_eq!(from_base64(&u.to_base64()).unwrap(), u);
    }
}
