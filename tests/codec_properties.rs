use std::collections::BTreeSet;

use deadmap_qa::codec::{DecodeError, Decoded, Granularity, IntervalDecoder, IntervalEdge};
use deadmap_qa::topology::{ElementId, LaneId, StaveId, Topology, N_ELEMENTS, N_LANES, N_LANES_IB};
use proptest::prelude::*;

fn decoder() -> IntervalDecoder<'static> {
    IntervalDecoder::new(Topology::its(), "4").expect("known version")
}

/// Encodes lanes `first..=last` as one chip interval.
fn encode_lanes(first: u16, last: u16) -> Vec<u16> {
    let topo = Topology::its();
    let first_chip = topo.first_element_of_lane(LaneId(first)).expect("lane").0;
    let last_chip = topo.last_element_of_lane(LaneId(last)).expect("lane").0;
    if first_chip == last_chip {
        vec![first_chip]
    } else {
        vec![0x8000 | first_chip, last_chip]
    }
}

fn arb_lane_ranges() -> impl Strategy<Value = Vec<(u16, u16)>> {
    prop::collection::vec((0u16..N_LANES as u16, 0u16..24), 0..12).prop_map(|ranges| {
        ranges
            .into_iter()
            .map(|(first, extra)| (first, (first + extra).min(N_LANES as u16 - 1)))
            .collect()
    })
}

proptest! {
    #[test]
    fn lane_aligned_streams_cover_the_same_chips(ranges in arb_lane_ranges()) {
        let words: Vec<u16> = ranges
            .iter()
            .flat_map(|&(first, last)| encode_lanes(first, last))
            .collect();
        let decoder = decoder();
        let chips = decoder.decode_elements(&words).expect("aligned stream");
        let lanes = decoder.decode_lanes(&words).expect("aligned stream");

        let topo = Topology::its();
        let expanded: BTreeSet<ElementId> = lanes
            .iter()
            .flat_map(|&lane| topo.lane_elements(lane).expect("lane").map(ElementId))
            .collect();
        prop_assert_eq!(chips, expanded);
    }

    #[test]
    fn misaligned_starts_are_rejected(lane in N_LANES_IB as u16..N_LANES as u16, offset in 1u16..7) {
        let topo = Topology::its();
        let first = topo.first_element_of_lane(LaneId(lane)).expect("lane").0 + offset;
        let last = topo.last_element_of_lane(LaneId(lane)).expect("lane").0;
        let words = [0x8000 | first, last];
        let err = decoder().decode(&words, Granularity::Lane).unwrap_err();
        prop_assert_eq!(err, DecodeError::MisalignedInterval { first, last, edge: IntervalEdge::Start });
        prop_assert!(decoder().decode(&words, Granularity::Stave).is_err());
    }

    #[test]
    fn misaligned_ends_are_rejected(lane in N_LANES_IB as u16..N_LANES as u16, short in 1u16..7) {
        let topo = Topology::its();
        let first = topo.first_element_of_lane(LaneId(lane)).expect("lane").0;
        let last = topo.last_element_of_lane(LaneId(lane)).expect("lane").0 - short;
        let words = if first == last { vec![first] } else { vec![0x8000 | first, last] };
        let err = decoder().decode_lanes(&words).unwrap_err();
        prop_assert_eq!(err, DecodeError::MisalignedInterval { first, last, edge: IntervalEdge::End });
    }

    #[test]
    fn topology_is_monotonic(a in 0u16..N_ELEMENTS as u16, b in 0u16..N_ELEMENTS as u16) {
        let (low, high) = (a.min(b), a.max(b));
        let topo = Topology::its();
        let lane_low = topo.element_to_lane(ElementId(low)).expect("chip");
        let lane_high = topo.element_to_lane(ElementId(high)).expect("chip");
        prop_assert!(lane_low <= lane_high);
        let stave_low = topo.lane_to_stave(lane_low).expect("lane");
        let stave_high = topo.lane_to_stave(lane_high).expect("lane");
        prop_assert!(stave_low <= stave_high);
        prop_assert!(topo.stave_to_layer(stave_low).expect("stave") <= topo.stave_to_layer(stave_high).expect("stave"));
        prop_assert!(topo.element_to_layer(ElementId(low)).expect("chip") <= topo.element_to_layer(ElementId(high)).expect("chip"));
    }

    #[test]
    fn staves_are_reported_only_when_complete(
        stave in 0u16..192,
        dropped in prop::collection::btree_set(0u16..28, 0..3),
    ) {
        let topo = Topology::its();
        let stave = StaveId(stave);
        let first = topo.first_lane_of_stave(stave).expect("stave").0;
        let width = topo.lanes_on_stave(stave).expect("stave");
        let dropped: BTreeSet<u16> = dropped.into_iter().filter(|&lane| lane < width).collect();
        let words: Vec<u16> = (0..width)
            .filter(|lane| !dropped.contains(lane))
            .flat_map(|lane| encode_lanes(first + lane, first + lane))
            .collect();

        let decoded = decoder().decode(&words, Granularity::Stave).expect("aligned stream");
        let Decoded::Staves(staves) = decoded else {
            panic!("stave granularity returns staves");
        };
        prop_assert_eq!(staves.contains(&stave), dropped.is_empty());
        prop_assert!(staves.len() <= 1);
    }
}

#[test]
fn scenario_streams_decode_as_documented() {
    let decoder = decoder();
    assert_eq!(
        decoder.decode(&[0x8005, 0x0008], Granularity::Element).expect("valid"),
        Decoded::Elements((5..=8).map(ElementId).collect())
    );
    assert_eq!(
        decoder.decode(&[0x81B0, 0x01B6], Granularity::Lane).expect("valid"),
        Decoded::Lanes([LaneId(432)].into_iter().collect())
    );
    assert!(matches!(
        decoder.decode(&[0x81B1, 0x01B6], Granularity::Lane),
        Err(DecodeError::MisalignedInterval { edge: IntervalEdge::Start, .. })
    ));
}
