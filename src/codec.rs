//! Binary network buffer.
//!
//! Integers that describe counts and costs are written as VarInts: 7 bits per
//! byte, least significant group first, high bit set while more bytes follow.
//! A 32-bit value never needs more than 5 bytes.

use crate::error::RecipeError;
use crate::resource::ResourceLocation;

pub const MAX_VARINT_LEN: usize = 5;
pub const MAX_STRING_LEN: usize = 32767;

const SEGMENT_BITS: u8 = 0x7F;
const CONTINUE_BIT: u8 = 0x80;

// ============================================================================
// Writer
// ============================================================================

#[derive(Debug, Default)]
pub struct PacketWriter {
    buf: Vec<u8>,
}

impl PacketWriter {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(value as u8);
    }

    pub fn write_var_int(&mut self, value: i32) {
        let mut value = value as u32;
        loop {
            if value & !(SEGMENT_BITS as u32) == 0 {
                self.buf.push(value as u8);
                return;
            }
            self.buf.push((value as u8 & SEGMENT_BITS) | CONTINUE_BIT);
            value >>= 7;
        }
    }

    /// Write a length prefix. Lengths above `i32::MAX` cannot be encoded.
    pub fn write_len(&mut self, len: usize) -> Result<(), RecipeError> {
        let len = i32::try_from(len)
            .map_err(|_| RecipeError::malformed(format!("length {} too large to encode", len)))?;
        self.write_var_int(len);
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), RecipeError> {
        self.write_len(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> Result<(), RecipeError> {
        if value.len() > MAX_STRING_LEN {
            return Err(RecipeError::malformed(format!(
                "string of {} bytes exceeds limit of {}",
                value.len(),
                MAX_STRING_LEN
            )));
        }
        self.write_bytes(value.as_bytes())
    }

    pub fn write_resource_location(&mut self, id: &ResourceLocation) -> Result<(), RecipeError> {
        self.write_string(&id.to_string())
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

// ============================================================================
// Reader
// ============================================================================

#[derive(Debug)]
pub struct PacketReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PacketReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Fail if any bytes are left unread
    pub fn finish(&self) -> Result<(), RecipeError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(RecipeError::malformed(format!("{} trailing bytes", n))),
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], RecipeError> {
        if self.remaining() < n {
            return Err(RecipeError::malformed(format!(
                "unexpected end of data: needed {} bytes at offset {}, {} left",
                n,
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, RecipeError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool, RecipeError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(RecipeError::malformed(format!("invalid boolean byte {}", other))),
        }
    }

    pub fn read_var_int(&mut self) -> Result<i32, RecipeError> {
        let mut value: u32 = 0;
        for i in 0..MAX_VARINT_LEN {
            let byte = self.read_u8()?;
            value |= ((byte & SEGMENT_BITS) as u32) << (7 * i);
            if byte & CONTINUE_BIT == 0 {
                return Ok(value as i32);
            }
        }
        Err(RecipeError::malformed("VarInt is too big"))
    }

    /// Read a length prefix, rejecting negative values and lengths that
    /// cannot possibly fit in the remaining data.
    pub fn read_len(&mut self) -> Result<usize, RecipeError> {
        let len = self.read_var_int()?;
        let len = usize::try_from(len)
            .map_err(|_| RecipeError::malformed(format!("negative length {}", len)))?;
        if len > self.remaining() {
            return Err(RecipeError::malformed(format!(
                "length {} exceeds the {} remaining bytes",
                len,
                self.remaining()
            )));
        }
        Ok(len)
    }

    pub fn read_bytes(&mut self) -> Result<&'a [u8], RecipeError> {
        let len = self.read_len()?;
        self.take(len)
    }

    pub fn read_string(&mut self) -> Result<String, RecipeError> {
        let bytes = self.read_bytes()?;
        if bytes.len() > MAX_STRING_LEN {
            return Err(RecipeError::malformed(format!(
                "string of {} bytes exceeds limit of {}",
                bytes.len(),
                MAX_STRING_LEN
            )));
        }
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| RecipeError::malformed(format!("invalid UTF-8 in string: {}", e)))
    }

    pub fn read_resource_location(&mut self) -> Result<ResourceLocation, RecipeError> {
        self.read_string()?.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_var_int(value: i32) -> Vec<u8> {
        let mut writer = PacketWriter::new();
        writer.write_var_int(value);
        writer.into_bytes()
    }

    #[test]
    fn test_var_int_known_encodings() {
        assert_eq!(encode_var_int(0), vec![0x00]);
        assert_eq!(encode_var_int(1), vec![0x01]);
        assert_eq!(encode_var_int(127), vec![0x7F]);
        assert_eq!(encode_var_int(128), vec![0x80, 0x01]);
        assert_eq!(encode_var_int(255), vec![0xFF, 0x01]);
        assert_eq!(encode_var_int(25565), vec![0xDD, 0xC7, 0x01]);
        assert_eq!(encode_var_int(i32::MAX), vec![0xFF, 0xFF, 0xFF, 0xFF, 0x07]);
        assert_eq!(encode_var_int(-1), vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    }

    #[test]
    fn test_var_int_decodes_extremes() {
        for value in [0, 300, i32::MAX, i32::MIN, -1] {
            let bytes = encode_var_int(value);
            let mut reader = PacketReader::new(&bytes);
            assert_eq!(reader.read_var_int().unwrap(), value);
            assert_eq!(reader.remaining(), 0);
        }
    }

    #[test]
    fn test_var_int_too_long() {
        let bytes = [0x80, 0x80, 0x80, 0x80, 0x80, 0x01];
        let mut reader = PacketReader::new(&bytes);
        assert!(matches!(reader.read_var_int(), Err(RecipeError::MalformedData(_))));
    }

    #[test]
    fn test_truncated_var_int() {
        let bytes = [0x80, 0x80];
        let mut reader = PacketReader::new(&bytes);
        assert!(matches!(reader.read_var_int(), Err(RecipeError::MalformedData(_))));
    }

    #[test]
    fn test_string_length_past_end() {
        // Claims 10 bytes, provides 3
        let bytes = [10, b'a', b'b', b'c'];
        let mut reader = PacketReader::new(&bytes);
        assert!(reader.read_string().is_err());
    }

    #[test]
    fn test_string_invalid_utf8() {
        let bytes = [2, 0xC3, 0x28];
        let mut reader = PacketReader::new(&bytes);
        assert!(matches!(reader.read_string(), Err(RecipeError::MalformedData(_))));
    }

    #[test]
    fn test_invalid_bool() {
        let mut reader = PacketReader::new(&[2]);
        assert!(reader.read_bool().is_err());
    }

    #[test]
    fn test_finish_reports_trailing_bytes() {
        let mut reader = PacketReader::new(&[1, 2]);
        reader.read_u8().unwrap();
        assert!(reader.finish().is_err());
        reader.read_u8().unwrap();
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn test_resource_location_on_wire() {
        let id: ResourceLocation = "botania:rune_fire".parse().unwrap();
        let mut writer = PacketWriter::new();
        writer.write_resource_location(&id).unwrap();
        let bytes = writer.into_bytes();
        assert_eq!(bytes[0] as usize, "botania:rune_fire".len());

        let mut reader = PacketReader::new(&bytes);
        assert_eq!(reader.read_resource_location().unwrap(), id);
    }
}
