//! Cursor over a little-endian account buffer.
//!
//! Every read is bounds-checked; running past the end of the buffer is a
//! [`SdkError::BufferUnderrun`], never a zero-filled value.

use solana_program::pubkey::Pubkey;

use crate::error::{Result, SdkError};

pub struct AccountReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> AccountReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(SdkError::BufferUnderrun {
                offset: self.offset,
                needed: n,
                len: self.data.len(),
            });
        }
        let bytes = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(bytes)
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_pubkey(&mut self) -> Result<Pubkey> {
        let bytes = self.take(32)?;
        let mut key = [0u8; 32];
        key.copy_from_slice(bytes);
        Ok(Pubkey::new_from_array(key))
    }

    /// Low half first, then high half shifted by 32.
    pub fn read_u64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        let lo = self.read_u32()? as u64;
        let hi = self.read_u32()? as u64;
        Ok((hi << 32) | lo)
    }

    /// Same as [`read_u64`](Self::read_u64) but the high half is sign-extended.
    pub fn read_i64(&mut self) -> Result<i64> {
        self.ensure(8)?;
        let lo = self.read_u32()? as i64;
        let hi = self.read_i32()? as i64;
        Ok((hi << 32) + lo)
    }

    pub fn read_u128(&mut self) -> Result<u128> {
        self.ensure(16)?;
        let lo = self.read_u64()? as u128;
        let hi = self.read_u64()? as u128;
        Ok((hi << 64) | lo)
    }

    // Composite reads check their full width first; a failed read never
    // moves the cursor.
    fn ensure(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(SdkError::BufferUnderrun {
                offset: self.offset,
                needed: n,
                len: self.data.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_advance_cursor() {
        let mut data = vec![7u8, 1];
        data.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
        data.extend_from_slice(&0x0123_4567_89AB_CDEFu64.to_le_bytes());

        let mut r = AccountReader::new(&data);
        assert_eq!(r.read_u8().unwrap(), 7);
        assert!(r.read_bool().unwrap());
        assert_eq!(r.read_u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(r.read_u64().unwrap(), 0x0123_4567_89AB_CDEF);
        assert_eq!(r.offset(), data.len());
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_i64_sign_extension() {
        for v in [-1i64, i64::MIN, i64::MAX, -4_294_967_296, -4_294_967_297, 1_700_000_000] {
            let bytes = v.to_le_bytes();
            let mut r = AccountReader::new(&bytes);
            assert_eq!(r.read_i64().unwrap(), v, "value {v}");
        }
    }

    #[test]
    fn test_u128_high_half() {
        let v: u128 = (u64::MAX as u128) << 64 | 42;
        let bytes = v.to_le_bytes();
        let mut r = AccountReader::new(&bytes);
        assert_eq!(r.read_u128().unwrap(), v);
    }

    #[test]
    fn test_underrun_is_an_error() {
        let data = [1u8, 2, 3, 4, 5];
        let mut r = AccountReader::new(&data);
        r.skip(2).unwrap();
        match r.read_u64() {
            Err(SdkError::BufferUnderrun { offset, needed, len }) => {
                assert_eq!((offset, needed, len), (2, 8, 5));
            }
            other => panic!("expected underrun, got {other:?}"),
        }
        // Cursor untouched by the failed read
        assert_eq!(r.offset(), 2);
        assert!(r.skip(4).is_err());
        assert!(r.read_u32().is_err());
        assert_eq!(r.read_u8().unwrap(), 3);
        assert_eq!(r.remaining(), 2);
    }
}
