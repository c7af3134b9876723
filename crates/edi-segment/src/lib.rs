#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # edi-segment
//!
//! Segment tokenizer and structural classifier for X12 and EDIFACT interchanges.
//!
//! A raw segment string plus a [`Separators`] configuration is turned into an
//! immutable [`SegmentContext`]: the segment name, its leading values, the
//! hierarchical (`HL`) parent link and the [`SegmentTag`] that loop building
//! and envelope handling dispatch on.

/// Segment context construction.
pub mod context;
/// Splitting of whole interchanges into raw segments.
pub mod reader;
/// Delimiter configuration and the `UNA` service string advice.
pub mod separators;
/// Closed vocabulary of structural tags and the classifier.
pub mod tag;

pub use context::SegmentContext;
pub use reader::{RawSegment, SegmentReader, tokenize};
pub use separators::Separators;
pub use tag::{SegmentTag, classify};

use thiserror::Error;

/// Errors that can occur when tokenizing segments
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument { argument: String, reason: String },

    #[error("Malformed segment '{segment}': {reason}")]
    MalformedSegment { segment: String, reason: String },

    #[error("Invalid separators: {0}")]
    InvalidSeparators(String),

    #[error("Read error at offset {offset}: {message}")]
    Read { offset: usize, message: String },
}

impl Error {
    /// Build an invalid-argument error naming the offending argument.
    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    /// Build a malformed-segment error carrying the raw segment text.
    pub fn malformed(segment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedSegment {
            segment: segment.into(),
            reason: reason.into(),
        }
    }

    /// Build a read error at a byte offset of the interchange.
    pub fn read(offset: usize, message: impl Into<String>) -> Self {
        Self::Read {
            offset,
            message: message.into(),
        }
    }
}

/// Crate-local result type for tokenizer operations.
pub type Result<T> = std::result::Result<T, Error>;
