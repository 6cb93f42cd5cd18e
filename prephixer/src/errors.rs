use failure::Error;

pub type Result<T> = ::std::result::Result<T, Error>;

/// Fatal failure kinds produced by the attack itself. Transport errors
/// from remote oracles pass through untouched as `failure::Error`s.
#[derive(Debug, Fail)]
pub enum AttackError {
    #[fail(display = "ciphertext length never changed within the probing ceiling")]
    BlockSizeUndetected,

    #[fail(display = "no block boundary shift observed while sliding the filler")]
    OffsetUndetected,

    #[fail(display = "failed to recover any bytes from the oracle")]
    NoBytesRecovered,

    #[fail(display = "invalid padding on result: last byte was {:#04x}", last)]
    BadPadding { last: u8 },
}

pub fn compare_eq<T>(x: T, y: T) -> Result<()>
where
    T: Eq + ::std::fmt::Debug,
{
    if x == y {
        Ok(())
    } else {
        bail!("expected {:?}, found {:?}", x, y)
    }
}
