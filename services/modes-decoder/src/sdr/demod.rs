//! Magnitude computation for IQ samples
//!
//! RTL-SDR outputs 8-bit unsigned IQ samples (I, Q pairs).
//! The decoder consumes magnitudes, sqrt(I² + Q²), one per IQ pair.

/// Offset of the unsigned 8-bit zero level
const IQ_CENTER: f32 = 127.5;

/// Pre-computed magnitude lookup table for fast IQ → magnitude conversion
/// Index: (I << 8) | Q where I, Q are 0-255
pub struct MagnitudeTable {
    table: Vec<f32>,
}

impl MagnitudeTable {
    /// Magnitudes are normalized so a full-scale component reads 1.0
    pub fn new() -> Self {
        let mut table = vec![0f32; 256 * 256];

        for i in 0..256usize {
            for q in 0..256usize {
                let si = (i as f32 - IQ_CENTER) / IQ_CENTER;
                let sq = (q as f32 - IQ_CENTER) / IQ_CENTER;
                table[(i << 8) | q] = (si * si + sq * sq).sqrt();
            }
        }

        Self { table }
    }

    /// Convert IQ sample pair to magnitude
    #[inline(always)]
    pub fn magnitude(&self, i: u8, q: u8) -> f32 {
        self.table[((i as usize) << 8) | (q as usize)]
    }

    /// Convert interleaved IQ bytes to magnitudes, appending to `output`.
    /// A trailing odd byte is ignored.
    pub fn compute_magnitudes(&self, iq_data: &[u8], output: &mut Vec<f32>) {
        output.extend(
            iq_data
                .chunks_exact(2)
                .map(|pair| self.magnitude(pair[0], pair[1])),
        );
    }
}

impl Default for MagnitudeTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude_table() {
        let table = MagnitudeTable::new();

        // Center (127, 128) sits half a step off zero
        assert!(table.magnitude(127, 128) < 0.01, "Center should be near zero");

        // Full-scale I or Q should read 1.0
        assert!((table.magnitude(255, 128) - 1.0).abs() < 0.01);
        assert!((table.magnitude(128, 0) - 1.0).abs() < 0.01);

        // Both at full scale
        assert!((table.magnitude(255, 255) - std::f32::consts::SQRT_2).abs() < 1e-4);
    }

    #[test]
    fn test_compute_magnitudes() {
        let table = MagnitudeTable::new();
        let mut out = Vec::new();
        table.compute_magnitudes(&[255, 255, 0, 0, 7], &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], out[1]);
    }
}
