/// Linear mapping of levels into `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub vmin: f32,
    pub vmax: f32,
}

impl Normalize {
    pub const fn new(vmin: f32, vmax: f32) -> Self {
        Self { vmin, vmax }
    }

    /// Clamped position of `value` between `vmin` and `vmax`.
    pub fn apply(&self, value: f32) -> f32 {
        let span = self.vmax - self.vmin;
        if !span.is_finite() || span.abs() < f32::EPSILON {
            return 0.0;
        }
        ((value - self.vmin) / span).clamp(0.0, 1.0)
    }
}

/// Piecewise-linear color map over evenly spaced RGB stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMap {
    name: &'static str,
    stops: &'static [[u8; 3]],
}

const VIRIDIS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 44, 122],
    [59, 81, 139],
    [44, 113, 142],
    [33, 144, 141],
    [39, 173, 129],
    [92, 200, 99],
    [170, 220, 50],
    [253, 231, 37],
];

impl ColorMap {
    /// Perceptually ordered dark-blue to yellow map.
    pub const fn viridis() -> Self {
        Self {
            name: "viridis",
            stops: &VIRIDIS,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Color at position `t` in `[0, 1]`.
    pub fn rgb(&self, t: f32) -> [u8; 3] {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let last = self.stops.len() - 1;
        let pos = t * last as f32;
        let i = (pos.floor() as usize).min(last - 1);
        let frac = pos - i as f32;
        let (a, b) = (self.stops[i], self.stops[i + 1]);
        let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * frac).round() as u8;
        [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
    }

    /// RGBA for a raster cell. Masked cells are fully transparent.
    pub fn rgba(&self, value: Option<f32>, norm: &Normalize) -> [u8; 4] {
        match value {
            Some(v) => {
                let [r, g, b] = self.rgb(norm.apply(v));
                [r, g, b, 255]
            }
            None => [0, 0, 0, 0],
        }
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::viridis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_clamps() {
        let norm = Normalize::new(-50.0, 0.0);
        assert_eq!(norm.apply(-50.0), 0.0);
        assert_eq!(norm.apply(-25.0), 0.5);
        assert_eq!(norm.apply(10.0), 1.0);
        assert_eq!(norm.apply(-80.0), 0.0);
    }

    #[test]
    fn test_degenerate_range_maps_to_zero() {
        assert_eq!(Normalize::new(-3.0, -3.0).apply(-3.0), 0.0);
    }

    #[test]
    fn test_end_stops() {
        let cmap = ColorMap::viridis();
        assert_eq!(cmap.rgb(0.0), VIRIDIS[0]);
        assert_eq!(cmap.rgb(1.0), VIRIDIS[8]);
        assert_eq!(cmap.rgb(0.5), VIRIDIS[4]);
    }

    #[test]
    fn test_lightness_increases() {
        let cmap = ColorMap::viridis();
        let luma = |[r, g, b]: [u8; 3]| 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        let samples: Vec<f32> = (0..=20).map(|i| luma(cmap.rgb(i as f32 / 20.0))).collect();
        assert!(samples.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_masked_cell_is_transparent() {
        let cmap = ColorMap::viridis();
        let norm = Normalize::new(0.0, 1.0);
        assert_eq!(cmap.rgba(None, &norm)[3], 0);
        assert_eq!(cmap.rgba(Some(0.3), &norm)[3], 255);
    }
}
