//! W2D ("WHIP!") opcode streams: the vector graphics payload of DWF files.
//!
//! - [`stream_reader`] / [`stream_writer`]: primitive codecs
//! - [`opcode`]: opcode tables for the three sub-formats
//! - [`context`]: per-stream graphics state
//! - [`reader`]: the opcode dispatcher ([`W2dReader`])

pub mod context;
pub mod opcode;
pub mod reader;
pub mod stream_reader;
pub mod stream_writer;

pub use context::DecodeContext;
pub use reader::{read_many, W2dReader, W2dReaderConfiguration};
pub use stream_reader::W2dStreamReader;
pub use stream_writer::W2dStreamWriter;
