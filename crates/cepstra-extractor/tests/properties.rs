//! Property-based tests for the batch extractor.

use cepstra_analysis::frame_count;
use cepstra_core::ParameterMap;
use cepstra_extractor::BatchExtractor;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn every_output_has_one_entry_per_frame(
        len in 0usize..6000,
        frame_size in 64usize..1024,
        hop_divisor in 1usize..4,
    ) {
        let hop_size = (frame_size / hop_divisor).max(1);
        let mut extractor = BatchExtractor::new().unwrap();
        extractor
            .configure(
                &ParameterMap::new()
                    .with("frameSize", frame_size)
                    .with("hopSize", hop_size),
            )
            .unwrap();

        let signal: Vec<f32> = (0..len).map(|i| ((i * 7919) % 200) as f32 / 100.0 - 1.0).collect();
        let features = extractor.compute(&signal).unwrap();
        let expected = frame_count(len, frame_size, hop_size);

        prop_assert_eq!(features.mfcc.len(), expected);
        prop_assert_eq!(features.spectral_rms.len(), expected);
        prop_assert_eq!(features.spectral_rolloff.len(), expected);
        prop_assert_eq!(features.zerocrossingrate.len(), expected);
    }

    #[test]
    fn outputs_are_finite(samples in prop::collection::vec(-1.0f32..1.0, 1..5000)) {
        let mut extractor = BatchExtractor::new().unwrap();
        let features = extractor.compute(&samples).unwrap();
        prop_assert!(features.mfcc.iter().flatten().all(|v| v.is_finite()));
        prop_assert!(features.spectral_rms.iter().all(|v| v.is_finite()));
        prop_assert!(features.spectral_rolloff.iter().all(|v| v.is_finite()));
        prop_assert!(features.zerocrossingrate.iter().all(|v| v.is_finite()));
    }
}
