use std::f32::consts::TAU;
use std::sync::Arc;

use num_complex::Complex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustfft::{Fft, FftPlanner};
use scanview_messages::{Decibels, MegaHertz, Sweep};

const NOISE_AMPLITUDE: f32 = 0.05;

/// Synthetic receiver: two drifting carriers in noise, one power spectrum per sweep.
pub struct SweepSource {
    bins: usize,
    fft: Arc<dyn Fft<f32>>,
    rng: StdRng,
    sweep_index: u64,
}

impl SweepSource {
    pub fn new(bins: usize, seed: u64) -> Self {
        let bins = bins.max(2);
        let mut planner = FftPlanner::<f32>::new();
        Self {
            bins,
            fft: planner.plan_fft_forward(bins),
            rng: StdRng::seed_from_u64(seed),
            sweep_index: 0,
        }
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Capture one sweep across `start..=stop`.
    pub fn sweep(&mut self, start: MegaHertz, stop: MegaHertz) -> Sweep {
        let samples = self.capture();
        let mut power = power_spectrum(self.fft.as_ref(), samples);

        // FFT shift: move DC from edges to center
        // This rearranges [DC, positive, negative] -> [negative, DC, positive]
        power.rotate_left(self.bins / 2);

        let span = stop.as_mhz() - start.as_mhz();
        let last = (self.bins - 1) as f64;
        power
            .into_iter()
            .enumerate()
            .map(|(k, p)| {
                let freq = start.as_mhz() + span * k as f64 / last;
                (freq, Decibels::from_power(p).as_db())
            })
            .collect()
    }

    fn capture(&mut self) -> Vec<Complex<f32>> {
        let t = self.sweep_index as f32;
        self.sweep_index += 1;

        // Carriers in cycles per sample, within the +-0.5 Nyquist band.
        let drifting = 0.2 + 0.1 * (0.05 * t).sin();
        let fixed = -0.25;
        let pulse = 0.3 + 0.25 * (0.2 * t).sin();

        (0..self.bins)
            .map(|n| {
                let n = n as f32;
                let noise = Complex::new(
                    self.rng.gen_range(-NOISE_AMPLITUDE..NOISE_AMPLITUDE),
                    self.rng.gen_range(-NOISE_AMPLITUDE..NOISE_AMPLITUDE),
                );
                Complex::from_polar(1.0, TAU * drifting * n)
                    + Complex::from_polar(pulse, TAU * fixed * n)
                    + noise
            })
            .collect()
    }
}

/// Normalised power of each FFT bin, in place over `samples`.
fn power_spectrum(fft: &dyn Fft<f32>, mut samples: Vec<Complex<f32>>) -> Vec<f32> {
    let scale = (samples.len() * samples.len()) as f32;
    fft.process(&mut samples);
    samples.iter().map(|bin| bin.norm_sqr() / scale).collect()
}
