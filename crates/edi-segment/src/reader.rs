//! Raw segment reader
//!
//! Splits interchange text into raw segment strings on unreleased segment
//! terminators. Separators are either given explicitly or detected from a
//! leading `UNA` / `ISA`.

use crate::context::SegmentContext;
use crate::separators::{ISA_TAG, Separators, UNA_TAG};
use crate::{Error, Result};
use tracing::{debug, trace};

/// Prefix shared by EDIFACT service segments
const EDIFACT_SERVICE_PREFIX: &str = "UN";

/// One raw segment as it appeared in the interchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegment {
    /// Segment text including its terminator, if one was present
    pub text: String,
    /// Byte offset of the segment in the input
    pub offset: usize,
}

/// Iterator over the raw segments of an interchange
pub struct SegmentReader<'a> {
    input: &'a str,
    pos: usize,
    separators: Separators,
}

impl<'a> SegmentReader<'a> {
    /// Create a reader with known separators
    #[must_use]
    pub fn new(input: &'a str, separators: Separators) -> Self {
        Self {
            input,
            pos: 0,
            separators,
        }
    }

    /// Create a reader, picking separators from the interchange itself.
    ///
    /// A leading `UNA` or `ISA` declares the separators. Without either,
    /// input starting with an EDIFACT service segment (`UN…`) gets the
    /// EDIFACT defaults and anything else the X12 defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] when the `UNA`/`ISA` header is truncated and
    /// [`Error::InvalidSeparators`] when the declared separators clash.
    pub fn detect(input: &'a str) -> Result<Self> {
        let start = input.len() - input.trim_start().len();
        let head = &input[start..];

        let separators = if head.starts_with(UNA_TAG) {
            Separators::from_una(head)
                .ok_or_else(|| Error::read(start, "truncated UNA service string advice"))?
        } else if head.starts_with(ISA_TAG) {
            Separators::from_isa(head)
                .ok_or_else(|| Error::read(start, "ISA header shorter than 106 characters"))?
        } else if head.starts_with(EDIFACT_SERVICE_PREFIX) {
            Separators::default_edifact()
        } else {
            Separators::default_x12()
        };
        separators.validate()?;

        debug!(
            segment = %separators.segment(),
            element = %separators.element(),
            component = %separators.component(),
            "detected separators"
        );
        Ok(Self::new(input, separators))
    }

    /// Separators this reader splits with
    #[must_use]
    pub fn separators(&self) -> Separators {
        self.separators
    }

    /// Build a [`SegmentContext`] for every segment read.
    pub fn contexts(self) -> impl Iterator<Item = Result<SegmentContext>> + 'a {
        let separators = self.separators;
        self.map(move |segment| {
            segment.and_then(|segment| SegmentContext::build(&segment.text, Some(&separators)))
        })
    }

    /// Skip line breaks and blanks left between segments
    fn skip_whitespace(&mut self) {
        let terminator = self.separators.segment();
        let rest = &self.input[self.pos..];
        let trimmed = rest.trim_start_matches(|c: char| c.is_whitespace() && c != terminator);
        self.pos += rest.len() - trimmed.len();
    }
}

impl Iterator for SegmentReader<'_> {
    type Item = Result<RawSegment>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();

        let start = self.pos;
        let rest = &self.input[start..];
        if rest.is_empty() {
            return None;
        }

        let mut released = false;
        for (idx, ch) in rest.char_indices() {
            if released {
                released = false;
            } else if Some(ch) == self.separators.escape() {
                released = true;
            } else if ch == self.separators.segment() {
                let end = idx + ch.len_utf8();
                self.pos = start + end;
                trace!(offset = start, "read segment");
                return Some(Ok(RawSegment {
                    text: rest[..end].to_owned(),
                    offset: start,
                }));
            }
        }

        self.pos = self.input.len();
        if released {
            return Some(Err(Error::read(
                self.input.len(),
                "release character at end of input",
            )));
        }
        // Unterminated trailing segment
        Some(Ok(RawSegment {
            text: rest.to_owned(),
            offset: start,
        }))
    }
}

/// Tokenize a whole interchange with known separators.
///
/// # Errors
///
/// Fails on the first segment that cannot be read or built.
pub fn tokenize(input: &str, separators: &Separators) -> Result<Vec<SegmentContext>> {
    SegmentReader::new(input, *separators).contexts().collect()
}
