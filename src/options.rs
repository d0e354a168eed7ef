use crate::checksum::ChecksumType;

pub const DEFAULT_VERSION: u8 = 1;
pub const DEFAULT_BLOCK_CAPACITY: usize = 256;

/// Settings of a unibin file, fixed once its header is written.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub(crate) version: u8,
    pub(crate) checksum: ChecksumType,
    /// Initial capacity of the scratch buffer log entries are encoded into.
    pub(crate) initial_block_capacity: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION,
            checksum: ChecksumType::None,
            initial_block_capacity: DEFAULT_BLOCK_CAPACITY,
        }
    }
}

impl Options {
    pub fn version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    pub fn checksum(mut self, checksum: ChecksumType) -> Self {
        self.checksum = checksum;
        self
    }

    pub fn initial_block_capacity(mut self, capacity: usize) -> Self {
        self.initial_block_capacity = capacity;
        self
    }

    pub fn get_version(&self) -> u8 {
        self.version
    }

    pub fn get_checksum(&self) -> ChecksumType {
        self.checksum
    }
}
