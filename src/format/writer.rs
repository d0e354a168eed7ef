use std::io::Write;

use crate::{
    buffer::{Buffer, BufferWriter},
    checksum::ChecksumType,
    column::LogColumn,
    error::{Error, Result},
    options::Options,
    types::{BlockType, DataType},
    value::Value,
};

/// Writes a unibin file into `W`.
///
/// The header is written on creation and every block uses the checksum type
/// announced in it. Once a log header block has been written, rows are
/// checked against its columns before anything is emitted.
pub struct UnibinWriter<W: Write> {
    sink: W,
    options: Options,

    // Types of the columns of the last log header.
    schema: Option<Vec<DataType>>,

    // Reused for encoding rows.
    scratch: Buffer<'static>,
}

impl<W: Write> UnibinWriter<W> {
    pub fn new(mut sink: W, options: Options) -> Result<Self> {
        super::write_header(&mut sink, options.version, options.checksum)?;

        let mut scratch = Buffer::new(0)?;
        scratch.reserve(options.initial_block_capacity)?;

        Ok(Self {
            sink,
            options,
            schema: None,
            scratch,
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn checksum(&self) -> ChecksumType {
        self.options.checksum
    }

    pub fn write_block(&mut self, ty: BlockType, payload: &[u8]) -> Result<()> {
        super::write_block(&mut self.sink, ty, payload, self.options.checksum)
    }

    pub fn write_comment(&mut self, text: &str) -> Result<()> {
        super::write_comment_block(&mut self.sink, text, self.options.checksum)
    }

    pub fn write_event(&mut self, payload: &[u8]) -> Result<()> {
        self.write_block(BlockType::Event, payload)
    }

    /// Writes a log header block; following rows must match `columns`.
    pub fn write_log_header(&mut self, columns: &[LogColumn]) -> Result<()> {
        super::write_log_header_block(&mut self.sink, columns, self.options.checksum)?;
        self.schema = Some(columns.iter().map(|c| c.data_type()).collect());
        Ok(())
    }

    /// Encodes `values` in order as a log entry block.
    pub fn write_row(&mut self, values: &[Value<'_>]) -> Result<()> {
        if let Some(schema) = &self.schema {
            if schema.len() != values.len() {
                return Err(Error::InvalidArgument(format!(
                    "row has {} values, log header has {} columns",
                    values.len(),
                    schema.len()
                )));
            }
            for (i, (ty, value)) in schema.iter().zip(values).enumerate() {
                if *ty != value.data_type() {
                    return Err(Error::InvalidArgument(format!(
                        "value {} has type {:?}, column expects {:?}",
                        i,
                        value.data_type(),
                        ty
                    )));
                }
            }
        }

        self.scratch.resize(0)?;
        let mut writer = BufferWriter::new(&mut self.scratch, 0, true)?;
        for value in values {
            writer.write_value(value)?;
        }

        tracing::trace!("encode row, values: {}, bytes: {}", values.len(), writer.tell());
        super::write_block_from_buffer(
            &mut self.sink,
            BlockType::LogEntry,
            &self.scratch,
            self.options.checksum,
        )
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
