//! Per-segment descriptor consumed by loop building and schema binding

use crate::separators::{Separators, UNA_TAG};
use crate::tag::{SegmentTag, classify};
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use tracing::trace;

/// Name of the hierarchical loop segment
pub const HL_TAG: &str = "HL";

/// Hierarchical id of the root loop; it never counts as a jump
const ROOT_HIERARCHY_ID: &str = "1";

/// Parsed descriptor of one segment
///
/// Built once by [`SegmentContext::build`] and never mutated afterwards.
/// `first_value` is `Some("")` for a blank first element, while
/// `second_value` is `None` when the segment has no second element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentContext {
    name: String,
    raw: String,
    first_value: Option<String>,
    second_value: Option<String>,
    parent_id: Option<String>,
    is_jump: bool,
    tag: SegmentTag,
    is_header: bool,
    log_label: String,
}

impl SegmentContext {
    /// Tokenize and classify one raw segment.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] when `raw` is empty or no separators are given.
    /// - [`Error::MalformedSegment`] when the segment has no element separator,
    ///   or when an `HL` segment carries non-numeric hierarchy ids.
    pub fn build(raw: &str, separators: Option<&Separators>) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::invalid_argument("raw_segment", "segment text is empty"));
        }
        let separators = separators.ok_or_else(|| {
            Error::invalid_argument("separators", "no delimiter configuration supplied")
        })?;

        let elements: Vec<&str> = separators
            .strip_terminator(raw)
            .split(separators.element())
            .collect();
        let [name, first, rest @ ..] = elements.as_slice() else {
            return Err(Error::malformed(
                raw,
                "expected a segment name followed by at least one data element",
            ));
        };

        // The service string advice is positional, not element separated
        let name = if raw.starts_with(UNA_TAG) { UNA_TAG } else { *name };

        let first_value = Some(separators.first_component(first).to_owned());
        let second_value = rest
            .first()
            .map(|second| separators.first_component(second).to_owned());

        let is_hierarchy = name == HL_TAG;
        let parent_id = rest
            .first()
            .filter(|parent| is_hierarchy && !parent.is_empty())
            .map(|parent| (*parent).to_owned());
        let is_jump = is_hierarchy
            && hierarchy_jump(raw, first_value.as_deref(), parent_id.as_deref())?;

        let tag = classify(raw, separators);
        let log_label = log_label(
            name,
            first_value.as_deref(),
            second_value.as_deref(),
            parent_id.as_deref(),
        );

        trace!(label = %log_label, %tag, is_jump, "built segment context");

        Ok(Self {
            name: name.to_owned(),
            raw: raw.to_owned(),
            first_value,
            second_value,
            parent_id,
            is_jump,
            tag,
            is_header: tag.is_header(),
            log_label,
        })
    }

    /// Segment name (`UNA` for the service string advice)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Original segment text, terminator included when it was given
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn first_value(&self) -> Option<&str> {
        self.first_value.as_deref()
    }

    #[must_use]
    pub fn second_value(&self) -> Option<&str> {
        self.second_value.as_deref()
    }

    /// Parent hierarchical id of an `HL` segment
    #[must_use]
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Whether an `HL` id skips ahead of its parent by more than one
    #[must_use]
    pub fn is_jump(&self) -> bool {
        self.is_jump
    }

    #[must_use]
    pub fn tag(&self) -> SegmentTag {
        self.tag
    }

    /// Whether the segment is an interchange or group envelope
    #[must_use]
    pub fn is_header(&self) -> bool {
        self.is_header
    }

    /// Summary used in log lines, e.g. `Name = HL FirstValue = 3 ParentId = 2`
    #[must_use]
    pub fn log_label(&self) -> &str {
        &self.log_label
    }
}

impl fmt::Display for SegmentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.log_label)
    }
}

fn hierarchy_jump(raw: &str, id: Option<&str>, parent_id: Option<&str>) -> Result<bool> {
    let Some(id) = id.filter(|id| *id != ROOT_HIERARCHY_ID) else {
        return Ok(false);
    };
    let id = hierarchy_number(raw, "hierarchical id", id)?;
    let parent = parent_id.map_or(Ok(0), |parent| {
        hierarchy_number(raw, "parent id", parent)
    })?;
    Ok(i128::from(id) - i128::from(parent) > 1)
}

fn hierarchy_number(raw: &str, field: &str, value: &str) -> Result<i64> {
    value
        .parse()
        .map_err(|_| Error::malformed(raw, format!("{field} '{value}' is not numeric")))
}

fn log_label(
    name: &str,
    first_value: Option<&str>,
    second_value: Option<&str>,
    parent_id: Option<&str>,
) -> String {
    [
        ("FirstValue", first_value),
        ("SecondValue", second_value),
        ("ParentId", parent_id),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
    .fold(format!("Name = {name}"), |label, (key, value)| {
        format!("{label} {key} = {value}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edifact(raw: &str) -> Result<SegmentContext> {
        SegmentContext::build(raw, Some(&Separators::default_edifact()))
    }

    fn x12(raw: &str) -> Result<SegmentContext> {
        SegmentContext::build(raw, Some(&Separators::default_x12()))
    }

    #[test]
    fn test_transaction_set_header() {
        let ctx = x12("ST*850*0001").unwrap();
        assert_eq!(ctx.name(), "ST");
        assert_eq!(ctx.first_value(), Some("850"));
        assert_eq!(ctx.second_value(), Some("0001"));
        assert_eq!(ctx.parent_id(), None);
        assert_eq!(ctx.tag(), SegmentTag::ST);
        assert!(!ctx.is_jump());
        assert_eq!(ctx.log_label(), "Name = ST FirstValue = 850 SecondValue = 0001");
    }

    #[test]
    fn test_hl_sequential() {
        let ctx = edifact("HL+3+2+P'").unwrap();
        assert_eq!(ctx.name(), "HL");
        assert_eq!(ctx.first_value(), Some("3"));
        assert_eq!(ctx.second_value(), Some("2"));
        assert_eq!(ctx.parent_id(), Some("2"));
        assert!(!ctx.is_jump());
        assert_eq!(
            ctx.log_label(),
            "Name = HL FirstValue = 3 SecondValue = 2 ParentId = 2"
        );
    }

    #[test]
    fn test_hl_jump() {
        let ctx = edifact("HL+5+2+P'").unwrap();
        assert_eq!(ctx.first_value(), Some("5"));
        assert_eq!(ctx.parent_id(), Some("2"));
        assert!(ctx.is_jump());
    }

    #[test]
    fn test_hl_root_is_never_a_jump() {
        let ctx = x12("HL*1**S~").unwrap();
        assert_eq!(ctx.first_value(), Some("1"));
        assert_eq!(ctx.second_value(), Some(""));
        assert_eq!(ctx.parent_id(), None);
        assert!(!ctx.is_jump());
    }

    #[test]
    fn test_hl_without_parent_counts_from_zero() {
        assert!(!x12("HL*1").unwrap().is_jump());
        assert!(x12("HL*2").unwrap().is_jump());
        assert!(x12("HL*3**I").unwrap().is_jump());
    }

    #[test]
    fn test_hl_non_numeric_ids() {
        let err = x12("HL*A*1*I~").unwrap_err();
        assert!(matches!(err, Error::MalformedSegment { ref reason, .. } if reason.contains("hierarchical id")));

        let err = x12("HL*3*X*I~").unwrap_err();
        assert!(matches!(err, Error::MalformedSegment { ref reason, .. } if reason.contains("parent id")));
    }

    #[test]
    fn test_hl_root_skips_parent_parsing() {
        // The root id short-circuits before the parent is read
        let ctx = x12("HL*1*X*S~").unwrap();
        assert_eq!(ctx.parent_id(), Some("X"));
        assert!(!ctx.is_jump());
    }

    #[test]
    fn test_non_hl_segment_never_has_parent() {
        let ctx = x12("LIN*5*2*P~").unwrap();
        assert_eq!(ctx.parent_id(), None);
        assert!(!ctx.is_jump());
    }

    #[test]
    fn test_blank_first_element() {
        let ctx = edifact("BHT++0000'").unwrap();
        assert_eq!(ctx.name(), "BHT");
        assert_eq!(ctx.first_value(), Some(""));
        assert_eq!(ctx.second_value(), Some("0000"));
        assert_eq!(ctx.log_label(), "Name = BHT SecondValue = 0000");
    }

    #[test]
    fn test_blank_segment_body() {
        let ctx = edifact("BHT+'").unwrap();
        assert_eq!(ctx.first_value(), Some(""));
        assert_eq!(ctx.second_value(), None);
        assert_eq!(ctx.log_label(), "Name = BHT");
    }

    #[test]
    fn test_composite_values_take_first_component() {
        let ctx = edifact("UNH+1+ORDERS:D:96A:UN'").unwrap();
        assert_eq!(ctx.first_value(), Some("1"));
        assert_eq!(ctx.second_value(), Some("ORDERS"));
        assert_eq!(ctx.tag(), SegmentTag::UNH);
        assert!(!ctx.is_header());
    }

    #[test]
    fn test_released_component_separator_stays_in_value() {
        let ctx = edifact("FTX+AAI+1?:2:X'").unwrap();
        assert_eq!(ctx.second_value(), Some("1?:2"));
    }

    #[test]
    fn test_raw_is_kept_verbatim() {
        let ctx = edifact("BGM+220+PO123+9'").unwrap();
        assert_eq!(ctx.raw(), "BGM+220+PO123+9'");
    }

    #[test]
    fn test_una_name_is_forced() {
        let ctx = edifact("UNA:+.? '").unwrap();
        assert_eq!(ctx.name(), "UNA");
        assert_eq!(ctx.tag(), SegmentTag::UNA);
        assert!(ctx.is_header());
    }

    #[test]
    fn test_interchange_header() {
        let ctx = edifact("UNB+UNOA:3+SENDER+RECEIVER+200101:1200+12345'").unwrap();
        assert_eq!(ctx.first_value(), Some("UNOA"));
        assert_eq!(ctx.second_value(), Some("SENDER"));
        assert!(ctx.is_header());
    }

    #[test]
    fn test_empty_input() {
        let err = edifact("").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { ref argument, .. } if argument == "raw_segment"));
    }

    #[test]
    fn test_missing_separators() {
        let err = SegmentContext::build("BGM+220'", None).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { ref argument, .. } if argument == "separators"));
    }

    #[test]
    fn test_single_piece_is_malformed() {
        assert!(matches!(x12("ABC"), Err(Error::MalformedSegment { .. })));
        assert!(matches!(edifact("UNS'"), Err(Error::MalformedSegment { .. })));
    }

    #[test]
    fn test_display_is_log_label() {
        let ctx = x12("GS*PO*SENDER*RECEIVER~").unwrap();
        assert_eq!(ctx.to_string(), ctx.log_label());
    }
}
