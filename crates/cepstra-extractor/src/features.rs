//! Harvested per-frame features.

use serde::Serialize;

/// Features of one signal, one entry per frame in every field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Features {
    /// Mel frequency cepstral coefficients.
    pub mfcc: Vec<Vec<f32>>,
    /// RMS of the magnitude spectrum.
    pub spectral_rms: Vec<f32>,
    /// Roll-off frequency [Hz].
    pub spectral_rolloff: Vec<f32>,
    /// Zero-crossing rate of the raw frame.
    pub zerocrossingrate: Vec<f32>,
}

impl Features {
    /// Number of frames.
    pub fn frame_count(&self) -> usize {
        self.spectral_rms.len()
    }

    /// Returns `true` if no frame was produced.
    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    /// Frame `index` as `(mfcc, rms, rolloff, zcr)`.
    pub fn frame(&self, index: usize) -> Option<(&[f32], f32, f32, f32)> {
        Some((
            self.mfcc.get(index)?,
            *self.spectral_rms.get(index)?,
            *self.spectral_rolloff.get(index)?,
            *self.zerocrossingrate.get(index)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let features = Features::default();
        assert!(features.is_empty());
        assert_eq!(features.frame(0), None);
    }

    #[test]
    fn test_frame_access() {
        let features = Features {
            mfcc: vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            spectral_rms: vec![0.1, 0.2],
            spectral_rolloff: vec![1000.0, 2000.0],
            zerocrossingrate: vec![0.01, 0.02],
        };
        assert_eq!(features.frame_count(), 2);
        assert_eq!(features.frame(1), Some((&[3.0, 4.0][..], 0.2, 2000.0, 0.02)));
    }
}
