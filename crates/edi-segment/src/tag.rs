//! Structural segment tags
//!
//! Envelope and boundary segments of both syntax families map onto a closed
//! set of variants; everything else is [`SegmentTag::Regular`].

use crate::separators::{Separators, UNA_TAG};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural classification of a segment
#[allow(clippy::upper_case_acronyms)] // Variants mirror the segment tags on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentTag {
    /// Any business data segment
    Regular,
    /// EDIFACT service string advice
    UNA,
    /// EDIFACT interchange header
    UNB,
    /// EDIFACT functional group header
    UNG,
    /// EDIFACT functional group trailer
    UNE,
    /// EDIFACT interchange trailer
    UNZ,
    /// X12 interchange control header
    ISA,
    /// X12 interchange control trailer
    IEA,
    /// X12 functional group trailer
    GE,
    /// X12 functional group header
    GS,
    /// EDIFACT message header
    UNH,
    /// EDIFACT message trailer
    UNT,
    /// X12 transaction set header
    ST,
    /// X12 transaction set trailer
    SE,
}

impl SegmentTag {
    /// Every variant, in declaration order.
    pub const ALL: [SegmentTag; 14] = [
        Self::Regular,
        Self::UNA,
        Self::UNB,
        Self::UNG,
        Self::UNE,
        Self::UNZ,
        Self::ISA,
        Self::IEA,
        Self::GE,
        Self::GS,
        Self::UNH,
        Self::UNT,
        Self::ST,
        Self::SE,
    ];

    /// Map a segment name onto its tag. Matching is case-sensitive.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "UNA" => Self::UNA,
            "UNB" => Self::UNB,
            "UNG" => Self::UNG,
            "UNE" => Self::UNE,
            "UNZ" => Self::UNZ,
            "ISA" => Self::ISA,
            "IEA" => Self::IEA,
            "GE" => Self::GE,
            "GS" => Self::GS,
            "UNH" => Self::UNH,
            "UNT" => Self::UNT,
            "ST" => Self::ST,
            "SE" => Self::SE,
            _ => Self::Regular,
        }
    }

    /// Segment name for structural tags; `"Regular"` otherwise.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "Regular",
            Self::UNA => "UNA",
            Self::UNB => "UNB",
            Self::UNG => "UNG",
            Self::UNE => "UNE",
            Self::UNZ => "UNZ",
            Self::ISA => "ISA",
            Self::IEA => "IEA",
            Self::GE => "GE",
            Self::GS => "GS",
            Self::UNH => "UNH",
            Self::UNT => "UNT",
            Self::ST => "ST",
            Self::SE => "SE",
        }
    }

    /// Interchange and group envelopes plus the service string advice.
    ///
    /// Message and transaction set boundaries (`UNH`/`UNT`, `ST`/`SE`) are
    /// not headers: they belong to the message body handed to loop building.
    #[must_use]
    pub fn is_header(self) -> bool {
        matches!(
            self,
            Self::UNA
                | Self::UNB
                | Self::UNG
                | Self::UNE
                | Self::UNZ
                | Self::ISA
                | Self::IEA
                | Self::GS
                | Self::GE
        )
    }
}

impl fmt::Display for SegmentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw segment.
///
/// The name token is everything before the first element separator, with a
/// trailing segment terminator dropped. A segment starting with `UNA` is the
/// service string advice regardless of its layout.
#[must_use]
pub fn classify(raw: &str, separators: &Separators) -> SegmentTag {
    if raw.starts_with(UNA_TAG) {
        return SegmentTag::UNA;
    }
    let body = separators.strip_terminator(raw);
    let name = body
        .split_once(separators.element())
        .map_or(body, |(name, _)| name);
    SegmentTag::from_name(name)
}
