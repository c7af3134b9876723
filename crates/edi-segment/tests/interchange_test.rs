//! End-to-end tokenizing of complete interchanges

use edi_segment::{Error, SegmentContext, SegmentReader, SegmentTag, Separators, tokenize};

const ORDERS_INTERCHANGE: &str = "UNA:+.? '\n\
UNB+UNOA:3+SENDER+RECEIVER+240101:1200+1'\n\
UNH+1+ORDERS:D:96A:UN'\n\
BGM+220+PO123+9'\n\
FTX+AAI+++CALL ?+31 ?'ASAP?''\n\
NAD+BY+1234567890123::9'\n\
UNS+S'\n\
UNT+6+1'\n\
UNZ+1+1'\n";

const X12_850: &str = "ISA*00*          *00*          *ZZ*SENDER         *ZZ*RECEIVER       *240101*1200*^*00501*000000001*0*P*>~\
GS*PO*SENDER*RECEIVER*20240101*1200*1*X*005010~\
ST*850*0001~\
BEG*00*SA*PO123**20240101~\
HL*1**S~\
HL*2*1*O~\
HL*5*2*I~\
SE*6*0001~\
GE*1*1~\
IEA*1*000000001~";

fn detect_all(input: &str) -> Vec<SegmentContext> {
    SegmentReader::detect(input)
        .expect("separators should be detected")
        .contexts()
        .collect::<Result<_, _>>()
        .expect("interchange should tokenize")
}

#[test]
fn edifact_interchange_with_una() {
    let contexts = detect_all(ORDERS_INTERCHANGE);

    let names: Vec<&str> = contexts.iter().map(SegmentContext::name).collect();
    assert_eq!(
        names,
        vec!["UNA", "UNB", "UNH", "BGM", "FTX", "NAD", "UNS", "UNT", "UNZ"]
    );

    let headers: Vec<&str> = contexts
        .iter()
        .filter(|ctx| ctx.is_header())
        .map(SegmentContext::name)
        .collect();
    assert_eq!(headers, vec!["UNA", "UNB", "UNZ"]);
}

#[test]
fn released_characters_stay_inside_segment() {
    let contexts = detect_all(ORDERS_INTERCHANGE);
    let ftx = contexts.iter().find(|ctx| ctx.name() == "FTX").unwrap();

    assert_eq!(ftx.raw(), "FTX+AAI+++CALL ?+31 ?'ASAP?''");
    assert_eq!(ftx.first_value(), Some("AAI"));
    assert_eq!(ftx.second_value(), Some(""));
}

#[test]
fn custom_una_separators_are_used() {
    let input = "UNA|=.# !UNB=UNOA|3=SENDER=RECEIVER!UNH=7=INVOIC|D|96A|UN!UNT=2=7!UNZ=1=1!";
    let reader = SegmentReader::detect(input).unwrap();
    assert_eq!(reader.separators().element(), '=');
    assert_eq!(reader.separators().segment(), '!');

    let contexts: Vec<SegmentContext> = reader.contexts().collect::<Result<_, _>>().unwrap();
    let unh = &contexts[2];
    assert_eq!(unh.tag(), SegmentTag::UNH);
    assert_eq!(unh.first_value(), Some("7"));
    assert_eq!(unh.second_value(), Some("INVOIC"));
}

#[test]
fn x12_interchange_from_isa() {
    let contexts = detect_all(X12_850);

    let tags: Vec<SegmentTag> = contexts.iter().map(SegmentContext::tag).collect();
    assert_eq!(tags.first(), Some(&SegmentTag::ISA));
    assert_eq!(tags.last(), Some(&SegmentTag::IEA));
    assert_eq!(contexts.iter().filter(|ctx| ctx.is_header()).count(), 4);

    let jumps: Vec<&str> = contexts
        .iter()
        .filter(|ctx| ctx.is_jump())
        .map(SegmentContext::raw)
        .collect();
    assert_eq!(jumps, vec!["HL*5*2*I~"]);
}

#[test]
fn explicit_separators_tokenize() {
    let contexts = tokenize("ST*850*0001~SE*2*0001~", &Separators::default_x12()).unwrap();
    assert_eq!(contexts.len(), 2);
    assert_eq!(contexts[1].tag(), SegmentTag::SE);
}

#[test]
fn malformed_hierarchy_aborts_tokenizing() {
    let result = tokenize("ST*856*0001~HL*A*1*S~", &Separators::default_x12());
    assert!(matches!(result, Err(Error::MalformedSegment { segment, .. }) if segment == "HL*A*1*S~"));
}
