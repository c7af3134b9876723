//! Delimiter configuration and service string handling
//!
//! X12 interchanges carry their separators inside the fixed-width `ISA`
//! header; EDIFACT interchanges may declare them in a leading `UNA` service
//! string advice. Both families end up as the same [`Separators`] value.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tag of the EDIFACT service string advice segment
pub const UNA_TAG: &str = "UNA";
/// Tag of the X12 interchange control header
pub const ISA_TAG: &str = "ISA";
/// Fixed length of an X12 `ISA` header including its terminator
pub const ISA_LENGTH: usize = 106;

/// Decimal mark written into a rendered `UNA`
pub const UNA_DECIMAL_MARK: char = '.';
/// Placeholder written for unused `UNA` positions
pub const UNA_PLACEHOLDER: char = ' ';

/// Default X12 separators
pub const X12_SEGMENT_TERMINATOR: char = '~';
pub const X12_COMPONENT_SEPARATOR: char = '>';
pub const X12_ELEMENT_SEPARATOR: char = '*';
pub const X12_REPETITION_SEPARATOR: char = '^';

/// Default EDIFACT separators (when no UNA is present)
pub const EDIFACT_SEGMENT_TERMINATOR: char = '\'';
pub const EDIFACT_COMPONENT_SEPARATOR: char = ':';
pub const EDIFACT_ELEMENT_SEPARATOR: char = '+';
pub const EDIFACT_REPETITION_SEPARATOR: char = '*';
pub const EDIFACT_RELEASE_CHARACTER: char = '?';

/// Stand-ins for an undeclared repetition separator, in order of preference
const REPETITION_FALLBACKS: [char; 5] = ['*', '^', '`', '|', '\u{1f}'];

// Positions inside an ISA header
const ISA_ELEMENT_POS: usize = 3;
const ISA_REPETITION_POS: usize = 82;
const ISA_COMPONENT_POS: usize = 104;
const ISA_SEGMENT_POS: usize = 105;

/// Separators used to split a segment.
///
/// Values are immutable once built; share them by reference or copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Separators {
    segment: char,
    component: char,
    element: char,
    repetition: char,
    #[serde(default)]
    escape: Option<char>,
}

impl Separators {
    /// Separators for a syntax without a release character (X12).
    #[must_use]
    pub fn x12(segment: char, component: char, element: char, repetition: char) -> Self {
        Self {
            segment,
            component,
            element,
            repetition,
            escape: None,
        }
    }

    /// Separators for a syntax with an optional release character (EDIFACT).
    #[must_use]
    pub fn edifact(
        segment: char,
        component: char,
        element: char,
        repetition: char,
        escape: Option<char>,
    ) -> Self {
        Self {
            segment,
            component,
            element,
            repetition,
            escape,
        }
    }

    /// Conventional X12 separators: `~ > * ^`.
    #[must_use]
    pub fn default_x12() -> Self {
        Self::x12(
            X12_SEGMENT_TERMINATOR,
            X12_COMPONENT_SEPARATOR,
            X12_ELEMENT_SEPARATOR,
            X12_REPETITION_SEPARATOR,
        )
    }

    /// Conventional EDIFACT separators: `' : + *` with release `?`.
    #[must_use]
    pub fn default_edifact() -> Self {
        Self::edifact(
            EDIFACT_SEGMENT_TERMINATOR,
            EDIFACT_COMPONENT_SEPARATOR,
            EDIFACT_ELEMENT_SEPARATOR,
            EDIFACT_REPETITION_SEPARATOR,
            Some(EDIFACT_RELEASE_CHARACTER),
        )
    }

    /// Segment terminator
    #[must_use]
    pub fn segment(&self) -> char {
        self.segment
    }

    /// Component data element separator
    #[must_use]
    pub fn component(&self) -> char {
        self.component
    }

    /// Data element separator
    #[must_use]
    pub fn element(&self) -> char {
        self.element
    }

    /// Repetition separator
    #[must_use]
    pub fn repetition(&self) -> char {
        self.repetition
    }

    /// Release character, if the syntax has one
    #[must_use]
    pub fn escape(&self) -> Option<char> {
        self.escape
    }

    /// Render the `UNA` service string advice for these separators.
    ///
    /// Layout is `UNA`, component, element, decimal mark, release, reserved
    /// space, segment terminator. A missing release character is written as a
    /// space so the advice always keeps its nine-character shape.
    #[must_use]
    pub fn to_una(&self) -> String {
        format!(
            "{UNA_TAG}{}{}{UNA_DECIMAL_MARK}{}{UNA_PLACEHOLDER}{}",
            self.component,
            self.element,
            self.escape.unwrap_or(UNA_PLACEHOLDER),
            self.segment,
        )
    }

    /// Parse separators from a `UNA` service string advice.
    ///
    /// Only the first nine characters are inspected, so the advice may be
    /// followed by the rest of the interchange. A space in the release
    /// position means no release character; a non-space in the reserved
    /// position is taken as the repetition separator. A blank reserved
    /// position (syntax version 3, and everything [`Separators::to_una`]
    /// writes) does not declare one, so a repetition separator distinct from
    /// the declared characters is chosen and the original one is not
    /// recovered.
    #[must_use]
    pub fn from_una(una: &str) -> Option<Self> {
        let body = una.strip_prefix(UNA_TAG)?;
        let mut chars = body.chars();
        let component = chars.next()?;
        let element = chars.next()?;
        let _decimal = chars.next()?;
        let release = chars.next()?;
        let reserved = chars.next()?;
        let segment = chars.next()?;

        let escape = (release != UNA_PLACEHOLDER).then_some(release);
        let repetition = if reserved == UNA_PLACEHOLDER {
            let declared: Vec<char> = [segment, component, element]
                .into_iter()
                .chain(escape)
                .collect();
            fallback_repetition(&declared)
        } else {
            reserved
        };

        Some(Self::edifact(segment, component, element, repetition, escape))
    }

    /// Derive separators from a fixed-width X12 `ISA` header.
    ///
    /// Versions before 00402 carry a standards identifier instead of a
    /// repetition separator in ISA11; in that case a repetition separator
    /// distinct from the declared element, component and segment characters
    /// is chosen.
    #[must_use]
    pub fn from_isa(isa: &str) -> Option<Self> {
        if !isa.starts_with(ISA_TAG) {
            return None;
        }
        let chars: Vec<char> = isa.chars().take(ISA_LENGTH).collect();
        if chars.len() < ISA_LENGTH {
            return None;
        }

        let segment = chars[ISA_SEGMENT_POS];
        let component = chars[ISA_COMPONENT_POS];
        let element = chars[ISA_ELEMENT_POS];
        let repetition = match chars[ISA_REPETITION_POS] {
            ch if ch.is_ascii_alphanumeric() => {
                fallback_repetition(&[segment, component, element])
            }
            ch => ch,
        };
        Some(Self::x12(segment, component, element, repetition))
    }

    /// Check that no two separators share a character.
    ///
    /// Construction does not enforce this; readers call it before splitting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSeparators`] naming the first clash found.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("segment", Some(self.segment)),
            ("component", Some(self.component)),
            ("element", Some(self.element)),
            ("repetition", Some(self.repetition)),
            ("escape", self.escape),
        ];
        let present: Vec<(&str, char)> = named
            .iter()
            .filter_map(|&(name, ch)| ch.map(|ch| (name, ch)))
            .collect();

        for (idx, &(name, ch)) in present.iter().enumerate() {
            if let Some(&(other, _)) = present.iter().skip(idx + 1).find(|&&(_, c)| c == ch) {
                return Err(Error::InvalidSeparators(format!(
                    "{name} and {other} separators are both {ch:?}"
                )));
            }
        }
        Ok(())
    }

    /// Remove one trailing segment terminator unless it is released.
    #[must_use]
    pub fn strip_terminator<'a>(&self, raw: &'a str) -> &'a str {
        match raw.strip_suffix(self.segment) {
            Some(body) if !self.ends_with_release(body) => body,
            _ => raw,
        }
    }

    /// First component of a data element, honouring the release character.
    ///
    /// Release characters are left in the returned text.
    #[must_use]
    pub fn first_component<'a>(&self, element: &'a str) -> &'a str {
        let mut released = false;
        for (idx, ch) in element.char_indices() {
            if released {
                released = false;
            } else if Some(ch) == self.escape {
                released = true;
            } else if ch == self.component {
                return &element[..idx];
            }
        }
        element
    }

    /// Whether `text` ends in an odd run of release characters
    fn ends_with_release(&self, text: &str) -> bool {
        self.escape.is_some_and(|escape| {
            text.chars().rev().take_while(|&c| c == escape).count() % 2 == 1
        })
    }
}

/// First stand-in repetition separator not already declared
fn fallback_repetition(declared: &[char]) -> char {
    REPETITION_FALLBACKS
        .into_iter()
        .find(|ch| !declared.contains(ch))
        .unwrap_or(REPETITION_FALLBACKS[0])
}
