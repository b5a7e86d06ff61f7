use std::collections::BTreeSet;

use super::*;
use crate::topology::{ElementId, LaneId, StaveId, Topology};

fn decoder() -> IntervalDecoder<'static> {
    IntervalDecoder::new(Topology::its(), "4").expect("known version")
}

#[test]
fn range_word_expands_to_every_chip() {
    let chips = decoder()
        .decode_elements(&[0x8005, 0x0008])
        .expect("well-formed stream");
    assert_eq!(chips, (5..=8).map(ElementId).collect::<BTreeSet<_>>());
}

#[test]
fn singleton_and_range_words_mix() {
    let chips = decoder()
        .decode_elements(&[3, 0x800A, 12, 20])
        .expect("well-formed stream");
    let expected: BTreeSet<_> = [3, 10, 11, 12, 20].into_iter().map(ElementId).collect();
    assert_eq!(chips, expected);
}

#[test]
fn aligned_outer_range_decodes_to_one_lane() {
    let lanes = decoder()
        .decode_lanes(&[0x81B0, 0x01B6])
        .expect("lane-aligned interval");
    assert_eq!(lanes, BTreeSet::from([LaneId(432)]));
}

#[test]
fn mid_lane_start_is_rejected() {
    let err = decoder()
        .decode_lanes(&[0x81B1, 0x01B6])
        .expect_err("interval starts mid-lane");
    assert_eq!(
        err,
        DecodeError::MisalignedInterval {
            first: 433,
            last: 438,
            edge: IntervalEdge::Start,
        }
    );
    assert_eq!(err.failure(), DecodeFailure::MalformedStream);
}

#[test]
fn mid_lane_end_is_rejected() {
    let err = decoder()
        .decode_lanes(&[0x81B0, 0x01B5])
        .expect_err("interval ends mid-lane");
    assert!(matches!(
        err,
        DecodeError::MisalignedInterval {
            edge: IntervalEdge::End,
            ..
        }
    ));
}

#[test]
fn failure_discards_earlier_intervals() {
    let result = decoder().decode_lanes(&[0x8000, 8, 0x81B1, 0x01B6]);
    assert!(result.is_err());
}

#[test]
fn inner_barrel_singletons_are_lanes() {
    let lanes = decoder().decode_lanes(&[7, 0x800A, 13]).expect("aligned");
    let expected: BTreeSet<_> = [7, 10, 11, 12, 13].into_iter().map(LaneId).collect();
    assert_eq!(lanes, expected);
}

#[test]
fn truncated_range_is_malformed() {
    let err = decoder().decode_elements(&[1, 0x8004]).expect_err("truncated");
    assert_eq!(err, DecodeError::TruncatedRange { position: 1 });
}

#[test]
fn reversed_range_is_malformed() {
    let err = decoder()
        .decode_elements(&[0x8009, 4])
        .expect_err("reversed");
    assert_eq!(err, DecodeError::ReversedRange { first: 9, last: 4 });
}

#[test]
fn chip_beyond_detector_is_malformed() {
    let err = decoder()
        .decode_elements(&[0x7000])
        .expect_err("out of range");
    assert!(matches!(err, DecodeError::ElementOutOfRange { element: 0x7000, .. }));
}

#[test]
fn unknown_version_is_distinct_failure() {
    let err = IntervalDecoder::new(Topology::its(), "5").expect_err("unknown tag");
    assert_eq!(err.failure(), DecodeFailure::UnrecognizedFormat);
    assert_eq!(err.to_string(), "map version \"5\" not recognized");
    for version in MapVersion::SUPPORTED {
        let decoder = IntervalDecoder::new(Topology::its(), version.tag()).expect("supported");
        assert_eq!(decoder.version(), version);
    }
}

#[test]
fn stave_counts_accumulate_across_intervals() {
    // Stave 48 spans chips 432..=543; split it into two lane-aligned intervals.
    let words = [0x81B0, 0x01E7, 0x81E8, 0x021F];
    let staves = decoder().decode_staves(&words).expect("aligned");
    assert_eq!(staves, BTreeSet::from([StaveId(48)]));
}

#[test]
fn partial_stave_is_not_reported() {
    let words = [0x81B0, 0x0218];
    let staves = decoder().decode_staves(&words).expect("aligned");
    assert!(staves.is_empty());
}

#[test]
fn inner_stave_from_singletons() {
    let words: Vec<u16> = (9..18).collect();
    let staves = decoder().decode_staves(&words).expect("aligned");
    assert_eq!(staves, BTreeSet::from([StaveId(1)]));
}

#[test]
fn decode_dispatches_on_granularity() {
    let decoded = decoder()
        .decode(&[0x81B0, 0x01B6], Granularity::Lane)
        .expect("aligned");
    assert_eq!(decoded.granularity(), Granularity::Lane);
    assert_eq!(decoded.len(), 1);
    let empty = decoder().decode(&[], Granularity::Stave).expect("empty");
    assert!(empty.is_empty());
}

#[test]
fn reader_reports_position() {
    let words = [0x8001, 3, 9];
    let mut reader = IntervalReader::new(&words);
    let first = reader.read_interval().expect("ok").expect("interval");
    assert_eq!(first, Interval { first: 1, last: 3 });
    assert_eq!(first.span(), 3);
    assert_eq!(reader.position(), 2);
    assert_eq!(reader.remaining(), 1);
    let second = reader.read_interval().expect("ok").expect("interval");
    assert!(second.is_singleton());
    assert_eq!(reader.read_interval(), Ok(None));
}
