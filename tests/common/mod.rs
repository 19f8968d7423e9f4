//! Shared test utilities for dwfrust integration tests.
//!
//! Read helpers, configuration shortcuts and record filters used by every
//! test crate via `mod common;`.

#![allow(dead_code)]

pub mod builders;

use dwfrust::io::w2d::{W2dReader, W2dReaderConfiguration};
use dwfrust::records::PrimitiveKind;
use dwfrust::{OpcodeRecord, Result, W2dDrawing};

// ===========================================================================
// Configurations
// ===========================================================================

pub fn failsafe_config() -> W2dReaderConfiguration {
    W2dReaderConfiguration {
        failsafe: true,
        ..Default::default()
    }
}

// ===========================================================================
// Read helpers
// ===========================================================================

/// Strict, resolved read.
pub fn read(bytes: Vec<u8>) -> Result<W2dDrawing> {
    W2dReader::from_bytes(bytes).read()
}

/// Strict read, panicking with the error on failure.
pub fn read_ok(bytes: Vec<u8>) -> W2dDrawing {
    match read(bytes) {
        Ok(drawing) => drawing,
        Err(e) => panic!("decode failed: {e}"),
    }
}

pub fn read_failsafe(bytes: Vec<u8>) -> W2dDrawing {
    W2dReader::from_bytes(bytes)
        .with_config(failsafe_config())
        .read()
        .expect("failsafe read never fails")
}

pub fn read_unresolved(bytes: Vec<u8>) -> W2dDrawing {
    W2dReader::from_bytes(bytes)
        .read_unresolved()
        .expect("unresolved read failed")
}

// ===========================================================================
// Record filters
// ===========================================================================

pub fn geometry(drawing: &W2dDrawing) -> Vec<&OpcodeRecord> {
    drawing.geometry().collect()
}

pub fn of_kind(drawing: &W2dDrawing, kind: PrimitiveKind) -> Vec<&OpcodeRecord> {
    drawing
        .records
        .iter()
        .filter(|r| r.kind() == Some(kind))
        .collect()
}

/// Record names in order, for compact sequence assertions.
pub fn names(drawing: &W2dDrawing) -> Vec<&'static str> {
    drawing.records.iter().map(OpcodeRecord::name).collect()
}
