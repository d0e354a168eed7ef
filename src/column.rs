use bytes::Bytes;

use crate::{
    buffer::BufferLocation,
    error::{Error, Result},
    types::{DataType, Transform},
};

/// Definition of one column of the rows stored in a log.
///
/// Encoded in a log header block as:
///
/// ```text
///   +-------------------+------------+--------------+-------------------+
///   | name len: 1 byte  | name bytes | type: 1 byte | transform: 1 byte |
///   +-------------------+------------+--------------+-------------------+
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogColumn {
    name: Option<Bytes>,
    data_type: DataType,
    transform: Transform,
    transform_params: Option<Bytes>,
}

impl LogColumn {
    pub fn new(name: Option<&[u8]>, data_type: DataType) -> Self {
        Self {
            name: name.map(Bytes::copy_from_slice),
            data_type,
            ..Default::default()
        }
    }

    pub fn named(name: &str, data_type: DataType) -> Self {
        Self::new(Some(name.as_bytes()), data_type)
    }

    pub fn name(&self) -> Option<&[u8]> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<&[u8]>) {
        self.name = name.map(Bytes::copy_from_slice);
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn set_data_type(&mut self, data_type: DataType) {
        self.data_type = data_type;
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn transform_params(&self) -> Option<&[u8]> {
        self.transform_params.as_deref()
    }

    pub fn set_transform_params(&mut self, params: Option<Bytes>) {
        self.transform_params = params;
    }

    /// Encoded length of one value of this column, 0 if it varies.
    pub fn length(&self) -> usize {
        Self::total_length(std::slice::from_ref(self))
    }

    /// Encoded length of a row made of `columns`, 0 if any column has a
    /// variable length.
    pub fn total_length(columns: &[LogColumn]) -> usize {
        let mut total = 0;
        for column in columns {
            let info = column.data_type.info();
            if info.is_variable_length {
                return 0;
            }
            total += info.length;
        }
        total
    }

    /// Number of bytes [`LogColumn::write_to`] emits.
    pub fn encoded_len(&self) -> usize {
        self.name.as_ref().map_or(0, |n| n.len()) + 3
    }

    /// Serializes the column at `loc`, growing the buffer to fit, and moves
    /// `loc` past it. Nothing is written on failure.
    pub fn write_to(&self, loc: &mut BufferLocation<'_, '_>) -> Result<()> {
        if self.transform != Transform::Identity {
            return Err(Error::Unimplemented(format!(
                "column transform {:?}, only identity is supported",
                self.transform
            )));
        }

        let name = self.name.as_deref().unwrap_or_default();
        let name_len = u8::try_from(name.len()).map_err(|_| {
            Error::TooLong(format!("column name of {} bytes, max: 255", name.len()))
        })?;

        let end = loc.index() + self.encoded_len();
        loc.buffer_mut().resize_if_smaller(end)?;

        loc.put_u8(name_len)?;
        loc.update_from_slice(name)?;
        loc.put_u8(self.data_type as u8)?;
        loc.put_u8(self.transform as u8)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{buffer::Buffer, error::ErrorKind};

    #[test]
    fn get_length() {
        let columns = [
            DataType::Unknown,
            DataType::U8,
            DataType::S16,
            DataType::UnixTimestamp,
            DataType::Double,
            DataType::String,
            DataType::Blob,
        ]
        .map(|ty| LogColumn::new(None, ty));

        let lengths = columns.iter().map(|c| c.length()).collect::<Vec<_>>();
        assert_eq!(lengths, vec![0, 1, 2, 8, 8, 0, 0]);

        assert_eq!(LogColumn::total_length(&columns[..5]), 19);
        assert_eq!(LogColumn::total_length(&columns[..6]), 0);
        assert_eq!(LogColumn::total_length(&columns), 0);
    }

    #[test]
    fn get_set_name() {
        let name = b"Spanish inquisition";
        let mut column = LogColumn::new(None, DataType::Unknown);
        assert_eq!(column.name(), None);

        column.set_name(Some(&name[..]));
        assert_eq!(column.name(), Some(&name[..]));
        assert_ne!(column.name().unwrap().as_ptr(), name.as_ptr());

        column.set_name(None);
        assert_eq!(column.name(), None);
    }

    #[test]
    fn get_set_type() {
        let mut column = LogColumn::named("Spanish inquisition", DataType::Unknown);
        assert_eq!(column.data_type(), DataType::Unknown);
        column.set_data_type(DataType::Double);
        assert_eq!(column.data_type(), DataType::Double);
        assert_eq!(column.transform(), Transform::Identity);
        assert_eq!(column.transform_params(), None);
    }

    #[test]
    fn write() -> anyhow::Result<()> {
        let mut buf = Buffer::new(0)?;
        let mut loc = buf.front();

        LogColumn::named("lat", DataType::Float).write_to(&mut loc)?;
        assert_eq!(loc.index(), 6);
        LogColumn::named("lon", DataType::Float).write_to(&mut loc)?;
        assert_eq!(loc.index(), 12);

        let mut heading = LogColumn::named("heading", DataType::U16);
        heading.set_transform(Transform::Linear);
        let err = heading.write_to(&mut loc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unimplemented);
        assert_eq!(loc.index(), 12);

        LogColumn::new(None, DataType::Blob).write_to(&mut loc)?;
        assert_eq!(loc.index(), 15);
        drop(loc);

        assert_eq!(buf.size(), 15);
        assert_eq!(buf.as_slice(), b"\x03lat\x08\x00\x03lon\x08\x00\x00\x0d\x00");
        Ok(())
    }

    #[test]
    fn name_too_long() -> anyhow::Result<()> {
        let mut buf = Buffer::new(0)?;
        let mut loc = buf.front();
        let column = LogColumn::new(Some(&[b'x'; 256][..]), DataType::U8);
        let err = column.write_to(&mut loc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooLong);
        assert_eq!(loc.index(), 0);
        drop(loc);
        assert_eq!(buf.size(), 0);
        Ok(())
    }
}
