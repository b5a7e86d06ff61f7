use criterion::{black_box, criterion_group, criterion_main, Criterion};
use deadmap_qa::codec::{Granularity, IntervalDecoder};
use deadmap_qa::topology::{LaneId, Topology, N_LANES};

/// Every third lane encoded as its own chip interval.
fn sparse_lane_stream(topology: &Topology) -> Vec<u16> {
    (0..N_LANES as u16)
        .step_by(3)
        .flat_map(|lane| {
            let first = topology.first_element_of_lane(LaneId(lane)).expect("lane").0;
            let last = topology.last_element_of_lane(LaneId(lane)).expect("lane").0;
            if first == last {
                vec![first]
            } else {
                vec![0x8000 | first, last]
            }
        })
        .collect()
}

fn bench_decode(c: &mut Criterion) {
    let topology = Topology::its();
    let decoder = IntervalDecoder::new(topology, "4").expect("known version");
    let stream = sparse_lane_stream(topology);
    let full = [0x8000, topology.n_elements() as u16 - 1];

    let mut group = c.benchmark_group("interval_decode");
    for (name, granularity) in [
        ("sparse_elements", Granularity::Element),
        ("sparse_lanes", Granularity::Lane),
        ("sparse_staves", Granularity::Stave),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| black_box(decoder.decode(black_box(&stream), granularity)));
        });
    }
    group.bench_function("full_detector_lanes", |b| {
        b.iter(|| black_box(decoder.decode_lanes(black_box(&full))));
    });
    group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
