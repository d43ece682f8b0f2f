//! Property-based tests for the streaming leaf nodes.

use cepstra_algorithms::{FrameCutter, ZeroCrossingRate};
use cepstra_analysis::{frame_count, frames};
use cepstra_core::{Network, ParameterMap, Pool, ProcessingGraph};
use proptest::prelude::*;

/// input -> FrameCutter -> {pool "frame", ZeroCrossingRate -> pool "zcr"}.
fn cutter_graph(frame_size: usize, hop_size: usize) -> (ProcessingGraph, Network) {
    let mut graph = ProcessingGraph::new();
    let input = graph.add_input();
    let cutter = graph.add_algorithm(Box::new(FrameCutter::new())).unwrap();
    let zcr = graph.add_algorithm(Box::new(ZeroCrossingRate::new())).unwrap();
    graph
        .configure_node(
            cutter,
            &ParameterMap::new()
                .with("frameSize", frame_size)
                .with("hopSize", hop_size)
                .with("silentFrames", "keep"),
        )
        .unwrap();

    let signal = graph.output(input, "signal").unwrap();
    let cutter_in = graph.input(cutter, "signal").unwrap();
    graph.connect(signal, cutter_in).unwrap();
    let frame = graph.output(cutter, "frame").unwrap();
    let zcr_in = graph.input(zcr, "signal").unwrap();
    graph.connect(frame, zcr_in).unwrap();
    graph.connect_pool(frame, "frame").unwrap();
    let rate = graph.output(zcr, "zeroCrossingRate").unwrap();
    graph.connect_pool(rate, "zcr").unwrap();

    let network = Network::new(&graph, input).unwrap();
    (graph, network)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn streamed_frames_match_batch_framing(
        signal in prop::collection::vec(-1.0f32..1.0, 0..6000),
        frame_size in 1usize..1024,
        hop_size in 16usize..1024,
    ) {
        let (mut graph, network) = cutter_graph(frame_size, hop_size);
        let mut pool = Pool::new();
        network.run(&mut graph, &signal, &mut pool).unwrap();

        let streamed = pool.value::<Vec<f32>>("frame").unwrap_or_default();
        prop_assert_eq!(streamed.len(), frame_count(signal.len(), frame_size, hop_size));
        prop_assert_eq!(streamed, frames(&signal, frame_size, hop_size));
    }

    #[test]
    fn zero_crossing_rate_stays_in_unit_range(
        signal in prop::collection::vec(-1.0f32..1.0, 1..6000),
    ) {
        let (mut graph, network) = cutter_graph(512, 256);
        let mut pool = Pool::new();
        network.run(&mut graph, &signal, &mut pool).unwrap();

        for rate in pool.value::<f32>("zcr").unwrap() {
            prop_assert!((0.0..=1.0).contains(&rate), "rate {}", rate);
        }
    }
}
