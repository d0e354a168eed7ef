pub mod buffer;
pub mod checksum;
pub mod column;
pub mod error;
pub mod format;
pub mod options;
pub mod types;
pub mod value;

pub use buffer::{Buffer, BufferLocation, BufferWriter, Whence};
pub use checksum::ChecksumType;
pub use column::LogColumn;
pub use error::{Error, ErrorKind, Result};
pub use format::writer::UnibinWriter;
pub use options::Options;
pub use types::{BlockType, DataType, Transform};
pub use value::Value;

#[cfg(feature = "mimalloc")]
use mimalloc::MiMalloc;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL_ALLOCATOR: MiMalloc = MiMalloc;

#[cfg(test)]
#[ctor::ctor]
fn init() {
    color_backtrace::install();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(true)
        .with_file(true)
        .with_level(true)
        .without_time()
        .with_thread_ids(true)
        .init();
}
