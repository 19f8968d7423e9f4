//! I/O module for reading W2D opcode streams

pub mod w2d;

pub use w2d::{read_many, W2dReader, W2dReaderConfiguration};
