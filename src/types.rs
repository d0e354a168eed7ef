use crate::error::{Error, Result};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Unknown = 0,
    Comment = 1,
    LogHeader = 2,
    LogEntry = 3,
    Event = 4,
}

impl TryFrom<u8> for BlockType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(BlockType::Unknown),
            1 => Ok(BlockType::Comment),
            2 => Ok(BlockType::LogHeader),
            3 => Ok(BlockType::LogEntry),
            4 => Ok(BlockType::Event),
            _ => {
                tracing::warn!(target: "types", "unknown block type: {}", value);
                Err(Error::InvalidArgument(format!(
                    "unknown block type: {}",
                    value
                )))
            }
        }
    }
}

/// Type of the values stored in a log column. The numeric value is the code
/// used in log header blocks.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataType {
    #[default]
    Unknown = 0,
    Boolean = 1,
    U8 = 2,
    S8 = 3,
    U16 = 4,
    S16 = 5,
    U32 = 6,
    S32 = 7,
    Float = 8,
    Double = 9,
    Char = 10,
    String = 11,
    ShortBlob = 12,
    Blob = 13,
    UnixTimestamp = 14,
    Timeval = 15,
    U64 = 16,
    S64 = 17,
}

impl DataType {
    pub const ALL: [DataType; 18] = [
        DataType::Unknown,
        DataType::Boolean,
        DataType::U8,
        DataType::S8,
        DataType::U16,
        DataType::S16,
        DataType::U32,
        DataType::S32,
        DataType::Float,
        DataType::Double,
        DataType::Char,
        DataType::String,
        DataType::ShortBlob,
        DataType::Blob,
        DataType::UnixTimestamp,
        DataType::Timeval,
        DataType::U64,
        DataType::S64,
    ];

    pub fn info(self) -> TypeInfo {
        let (name, rust_name, length) = match self {
            DataType::Unknown => ("unknown", None, 0),
            DataType::Boolean => ("Boolean", Some("bool"), 1),
            DataType::U8 => ("8-bit unsigned integer", Some("u8"), 1),
            DataType::S8 => ("8-bit signed integer", Some("i8"), 1),
            DataType::U16 => ("16-bit unsigned integer", Some("u16"), 2),
            DataType::S16 => ("16-bit signed integer", Some("i16"), 2),
            DataType::U32 => ("32-bit unsigned integer", Some("u32"), 4),
            DataType::S32 => ("32-bit signed integer", Some("i32"), 4),
            DataType::Float => ("IEEE-754 single-precision float", Some("f32"), 4),
            DataType::Double => ("IEEE-754 double-precision float", Some("f64"), 8),
            DataType::Char => ("Character", Some("u8"), 1),
            DataType::String => ("Null-terminated string", Some("&str"), 0),
            DataType::ShortBlob => ("Binary data with 1-byte length prefix", Some("&[u8]"), 0),
            DataType::Blob => ("Binary data with 2-byte length prefix", Some("&[u8]"), 0),
            DataType::UnixTimestamp => ("UNIX timestamp (secs since UNIX epoch)", Some("i64"), 8),
            DataType::Timeval => (
                "UNIX timestamp (secs+usecs since UNIX epoch)",
                Some("[u32; 2]"),
                8,
            ),
            DataType::U64 => ("64-bit unsigned integer", Some("u64"), 8),
            DataType::S64 => ("64-bit signed integer", Some("i64"), 8),
        };

        TypeInfo {
            data_type: self,
            name,
            rust_name,
            length,
            is_variable_length: matches!(
                self,
                DataType::String | DataType::ShortBlob | DataType::Blob
            ),
        }
    }
}

impl TryFrom<u8> for DataType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        DataType::ALL.get(value as usize).copied().ok_or_else(|| {
            tracing::warn!(target: "types", "unknown data type: {}", value);
            Error::InvalidArgument(format!("unknown data type: {}", value))
        })
    }
}

/// Static description of a [`DataType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    pub data_type: DataType,
    /// Human-readable name.
    pub name: &'static str,
    /// Rust type a value is written from; `None` for unknown.
    pub rust_name: Option<&'static str>,
    /// Encoded length in bytes; 0 for variable-length and unknown types.
    pub length: usize,
    pub is_variable_length: bool,
}

/// Transformation applied to column values before they are stored.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transform {
    #[default]
    Identity = 0,
    Linear = 1,
    IfThenElse = 2,
}

impl TryFrom<u8> for Transform {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Transform::Identity),
            1 => Ok(Transform::Linear),
            2 => Ok(Transform::IfThenElse),
            _ => Err(Error::InvalidArgument(format!(
                "unknown transform: {}",
                value
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_is_consistent() {
        for (code, ty) in DataType::ALL.iter().enumerate() {
            assert_eq!(*ty as usize, code);
            assert_eq!(DataType::try_from(code as u8).unwrap(), *ty);

            let info = ty.info();
            assert_eq!(info.data_type, *ty);
            assert!(info.name.len() >= 3);
            if *ty != DataType::Unknown {
                assert!(info.rust_name.is_some_and(|n| n.len() >= 2));
            }
            if info.is_variable_length {
                assert_eq!(info.length, 0);
            }
        }
    }

    #[test]
    fn lengths() {
        assert!(DataType::String.info().is_variable_length);
        assert!(DataType::Blob.info().is_variable_length);
        assert!(DataType::ShortBlob.info().is_variable_length);

        assert_eq!(DataType::U8.info().length, 1);
        assert_eq!(DataType::S8.info().length, 1);
        assert_eq!(DataType::Boolean.info().length, 1);
        assert_eq!(DataType::Char.info().length, 1);
        assert_eq!(DataType::U16.info().length, 2);
        assert_eq!(DataType::S16.info().length, 2);
        assert_eq!(DataType::U32.info().length, 4);
        assert_eq!(DataType::S32.info().length, 4);
        assert_eq!(DataType::Float.info().length, 4);
        assert_eq!(DataType::Double.info().length, 8);
        assert_eq!(DataType::UnixTimestamp.info().length, 8);
        assert_eq!(DataType::Timeval.info().length, 8);
    }

    #[test]
    fn unknown_codes() {
        assert!(DataType::try_from(18).is_err());
        assert!(BlockType::try_from(5).is_err());
        assert!(Transform::try_from(3).is_err());
        assert_eq!(BlockType::try_from(2).unwrap(), BlockType::LogHeader);
    }
}
