use crate::types::DataType;

/// A single value of a log row, borrowed from the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'v> {
    Boolean(bool),
    U8(u8),
    S8(i8),
    U16(u16),
    S16(i16),
    U32(u32),
    S32(i32),
    U64(u64),
    S64(i64),
    Float(f32),
    Double(f64),
    Char(u8),
    String(&'v str),
    ShortBlob(&'v [u8]),
    Blob(&'v [u8]),
    /// Seconds since the UNIX epoch.
    UnixTimestamp(i64),
    Timeval { secs: u32, usecs: u32 },
}

impl Value<'_> {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Boolean(_) => DataType::Boolean,
            Value::U8(_) => DataType::U8,
            Value::S8(_) => DataType::S8,
            Value::U16(_) => DataType::U16,
            Value::S16(_) => DataType::S16,
            Value::U32(_) => DataType::U32,
            Value::S32(_) => DataType::S32,
            Value::U64(_) => DataType::U64,
            Value::S64(_) => DataType::S64,
            Value::Float(_) => DataType::Float,
            Value::Double(_) => DataType::Double,
            Value::Char(_) => DataType::Char,
            Value::String(_) => DataType::String,
            Value::ShortBlob(_) => DataType::ShortBlob,
            Value::Blob(_) => DataType::Blob,
            Value::UnixTimestamp(_) => DataType::UnixTimestamp,
            Value::Timeval { .. } => DataType::Timeval,
        }
    }

    /// Number of bytes the value takes once encoded.
    pub fn encoded_len(&self) -> usize {
        match self {
            Value::String(s) => s.len() + 1,
            Value::ShortBlob(b) => b.len() + 1,
            Value::Blob(b) => b.len() + 2,
            _ => self.data_type().info().length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_len() {
        assert_eq!(Value::U16(1).encoded_len(), 2);
        assert_eq!(Value::Double(1.0).encoded_len(), 8);
        assert_eq!(Value::String("abc").encoded_len(), 4);
        assert_eq!(Value::ShortBlob(b"ab").encoded_len(), 3);
        assert_eq!(Value::Blob(b"ab").encoded_len(), 4);
        assert_eq!(Value::Timeval { secs: 0, usecs: 0 }.encoded_len(), 8);
    }
}
