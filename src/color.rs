use std::f64::consts::TAU;

use palette::white_point::D65;
use palette::{Clamp, FromColor, IntoColor, Lab, LabHue, Lch, Srgb};

// ---------------------------------------------------------------------------
// Temperature → main color
// ---------------------------------------------------------------------------

/// Number of discrete levels in a generated colormap.
pub const CMAP_LEVELS: usize = 256;

/// Parameters controlling how a line-formation temperature maps onto the hue
/// axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CmapParams {
    /// Range of base-10 logarithm of temperature, in K.
    pub logt_range: (f64, f64),
    /// Chroma as a fraction of 100.
    pub saturation: f64,
    /// Factor applied to hue so that not all of the hue axis is used
    /// (avoids cycling back to red after purple).
    pub hue_factor: f64,
}

impl Default for CmapParams {
    fn default() -> Self {
        Self {
            logt_range: (4.0, 6.0),
            saturation: 0.5,
            hue_factor: 0.9,
        }
    }
}

/// Position of `logt` within the range, clamped to `[0, 1]`.
/// Out-of-range temperatures are clamped rather than rejected.
fn logt_fraction(logt: f64, logt_range: (f64, f64)) -> f64 {
    let (lo, hi) = logt_range;
    ((logt - lo) / (hi - lo)).clamp(0.0, 1.0)
}

/// Hue angle in radians for `logt`: 0 at the low end of the range,
/// `2π · hue_factor` at the high end.
fn hue_angle(logt: f64, params: &CmapParams) -> f64 {
    logt_fraction(logt, params.logt_range) * TAU * params.hue_factor
}

/// Choose the main color for a temperature, as sRGB components in `[0, 1]`.
///
/// The color is built in LCH (lightness 50, chroma `100 · saturation`, hue
/// from [`hue_angle`]) and converted LCH → Lab → sRGB, clipped to the sRGB
/// gamut.
pub fn main_color(logt: f64, params: &CmapParams) -> [f64; 3] {
    let hue = LabHue::from_radians(hue_angle(logt, params));
    let lch: Lch<D65, f64> = Lch::new(50.0, 100.0 * params.saturation, hue);
    let lab: Lab<D65, f64> = lch.into_color();
    let rgb: Srgb<f64> = Srgb::from_color(lab).clamp();
    [rgb.red, rgb.green, rgb.blue]
}

// ---------------------------------------------------------------------------
// ColorMap – named 256-level gradient with linear interpolation
// ---------------------------------------------------------------------------

/// A named colormap: 256 sRGB levels from black through a hue-coded mid-tone
/// to white, with linear interpolation between levels.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    name: String,
    levels: Vec<[f64; 3]>,
}

impl ColorMap {
    /// Colormap name, e.g. `spice_logt_4.5`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of discrete levels (always [`CMAP_LEVELS`]).
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the colormap has no levels.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The discrete levels as sRGB triples in `[0, 1]`.
    pub fn levels(&self) -> &[[f64; 3]] {
        &self.levels
    }

    /// Sample the colormap at a normalized position, interpolating linearly
    /// between the two nearest levels. `t` is clamped to `[0, 1]`.
    pub fn sample(&self, t: f64) -> [f64; 3] {
        let t = t.clamp(0.0, 1.0);
        let x = t * (self.levels.len() - 1) as f64;
        let low = x.floor() as usize;
        let high = (low + 1).min(self.levels.len() - 1);
        let frac = x - low as f64;
        let (a, b) = (self.levels[low], self.levels[high]);
        [
            a[0] + frac * (b[0] - a[0]),
            a[1] + frac * (b[1] - a[1]),
            a[2] + frac * (b[2] - a[2]),
        ]
    }

    /// The levels as 8-bit RGB rows, for display layers working in bytes.
    pub fn rgb8_levels(&self) -> Vec<[u8; 3]> {
        self.levels
            .iter()
            .map(|rgb| {
                [
                    (rgb[0] * 255.0).round() as u8,
                    (rgb[1] * 255.0).round() as u8,
                    (rgb[2] * 255.0).round() as u8,
                ]
            })
            .collect()
    }
}

/// Build the colormap for a line-formation temperature with default
/// parameters.
pub fn temperature_cmap(logt: f64) -> ColorMap {
    temperature_cmap_with(logt, &CmapParams::default())
}

/// Build the colormap for a line-formation temperature.
///
/// The main color's Lab chroma/hue coordinates are held fixed while
/// lightness ramps linearly over `[0, 100]`; the resulting gradient is then
/// blended with a neutral black→white ramp using a weight of `(2t − 1)^4`,
/// which is ~0 mid-ramp (pure hue shows through) and 1 at both ends (true
/// black at level 0, true white at the last level, masking gamut-clipping
/// artifacts at the extremes).
pub fn temperature_cmap_with(logt: f64, params: &CmapParams) -> ColorMap {
    let main = main_color(logt, params);
    let main_lab: Lab<D65, f64> = Srgb::new(main[0], main[1], main[2]).into_color();
    let (a, b) = (main_lab.a, main_lab.b);

    let mut levels = Vec::with_capacity(CMAP_LEVELS);
    for i in 0..CMAP_LEVELS {
        let t = i as f64 / (CMAP_LEVELS - 1) as f64;

        let lab: Lab<D65, f64> = Lab::new(100.0 * t, a, b);
        let rgb: Srgb<f64> = Srgb::from_color(lab).clamp();

        let alpha = (2.0 * t - 1.0).powi(4);
        levels.push([
            (1.0 - alpha) * rgb.red + alpha * t,
            (1.0 - alpha) * rgb.green + alpha * t,
            (1.0 - alpha) * rgb.blue + alpha * t,
        ]);
    }

    ColorMap {
        name: format!("spice_logt_{logt:.1}"),
        levels,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    /// Lab lightness of an sRGB triple, for monotonicity checks.
    fn lightness(rgb: [f64; 3]) -> f64 {
        let lab: Lab<D65, f64> = Srgb::new(rgb[0], rgb[1], rgb[2]).into_color();
        lab.l
    }

    /// Lab hue angle of an sRGB triple. Angles just below zero are kept
    /// near zero instead of wrapping, so a hue of exactly 0 stays stable
    /// under floating-point noise.
    fn measured_hue(rgb: [f64; 3]) -> f64 {
        let lab: Lab<D65, f64> = Srgb::new(rgb[0], rgb[1], rgb[2]).into_color();
        let hue = lab.b.atan2(lab.a);
        if hue < -0.1 {
            hue + TAU
        } else {
            hue
        }
    }

    #[test]
    fn requested_hue_spans_the_range() {
        let params = CmapParams::default();
        assert_relative_eq!(hue_angle(4.0, &params), 0.0, epsilon = 1e-12);
        assert_relative_eq!(hue_angle(6.0, &params), TAU * 0.9, epsilon = 1e-12);
        assert_relative_eq!(hue_angle(5.0, &params), TAU * 0.45, epsilon = 1e-12);
    }

    #[test]
    fn requested_hue_is_monotonic() {
        let params = CmapParams::default();
        let mut previous = -1.0;
        for i in 0..=20 {
            let logt = 4.0 + 0.1 * i as f64;
            let hue = hue_angle(logt, &params);
            assert!(hue > previous);
            previous = hue;
        }
    }

    #[test]
    fn out_of_range_logt_clamps() {
        let params = CmapParams::default();
        assert_eq!(main_color(3.0, &params), main_color(4.0, &params));
        assert_eq!(main_color(7.5, &params), main_color(6.0, &params));
    }

    #[test]
    fn main_color_hue_tracks_temperature() {
        let params = CmapParams::default();
        // Gamut clipping may shift the realized hue slightly, so only check
        // coarse agreement and ordering.
        let hues: Vec<f64> = [4.0, 4.5, 5.0, 5.5, 6.0]
            .iter()
            .map(|&logt| measured_hue(main_color(logt, &params)))
            .collect();
        assert_relative_eq!(hues[0], 0.0, epsilon = 0.05);
        for pair in hues.windows(2) {
            assert!(pair[1] > pair[0] + 0.5, "hues not increasing: {pair:?}");
        }
    }

    #[test]
    fn main_color_stays_in_unit_cube() {
        let params = CmapParams::default();
        for i in 0..=20 {
            let rgb = main_color(4.0 + 0.1 * i as f64, &params);
            for channel in rgb {
                assert!((0.0..=1.0).contains(&channel));
            }
        }
    }

    #[test]
    fn cmap_name_and_levels() {
        let cmap = temperature_cmap(4.5);
        assert_eq!(cmap.name(), "spice_logt_4.5");
        assert_eq!(cmap.len(), 256);
        assert!(!cmap.is_empty());
    }

    #[test]
    fn cmap_ends_are_black_and_white() {
        let cmap = temperature_cmap(4.5);
        let first = cmap.levels()[0];
        let last = cmap.levels()[255];
        for channel in 0..3 {
            assert_relative_eq!(first[channel], 0.0, epsilon = 1e-9);
            assert_relative_eq!(last[channel], 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn cmap_lightness_increases() {
        let cmap = temperature_cmap(5.2);
        let quartiles: Vec<f64> = [0, 64, 128, 192, 255]
            .iter()
            .map(|&i| lightness(cmap.levels()[i]))
            .collect();
        for pair in quartiles.windows(2) {
            assert!(pair[1] > pair[0] + 5.0, "lightness not increasing: {pair:?}");
        }
    }

    #[test]
    fn sample_interpolates() {
        let cmap = temperature_cmap(4.5);
        assert_eq!(cmap.sample(0.0), cmap.levels()[0]);
        assert_eq!(cmap.sample(1.0), cmap.levels()[255]);
        // Out-of-range positions clamp to the ends.
        assert_eq!(cmap.sample(-0.5), cmap.levels()[0]);
        assert_eq!(cmap.sample(2.0), cmap.levels()[255]);

        // Halfway between two adjacent levels.
        let x = (100.0 + 0.5) / 255.0;
        let a = cmap.levels()[100];
        let b = cmap.levels()[101];
        let mid = cmap.sample(x);
        for channel in 0..3 {
            assert_relative_eq!(
                mid[channel],
                0.5 * (a[channel] + b[channel]),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn cmap_is_deterministic() {
        assert_eq!(temperature_cmap(5.2), temperature_cmap(5.2));
    }

    #[test]
    fn rgb8_ends_are_black_and_white() {
        let levels = temperature_cmap(4.5).rgb8_levels();
        assert_eq!(levels[0], [0, 0, 0]);
        assert_eq!(levels[255], [255, 255, 255]);
    }
}
