use anyhow::{Context, Result};
use fitsio::images::{ImageDescription, ImageType};
use fitsio::tables::{ColumnDataType, ColumnDescription};
use fitsio::FitsFile;

// Synthetic SPICE-like L2 file: one 4-D spectral window in the primary HDU
// (x, y, wavelength, time axes) plus the VARIABLE_KEYWORDS binary table
// holding the RADCAL1 calibration column.

const NX: usize = 16;
const NY: usize = 32;
const N_LAMBDA: usize = 50;

const CRVAL3: f64 = 77.0421; // nm, Ne VIII window
const CDELT3: f64 = 0.0095;
const CRPIX3: f64 = 25.5;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Wavelength of 0-based spectral pixel `l`, matching the WCS keywords
/// written into the header.
fn wavelength(l: usize) -> f64 {
    CRVAL3 + (l as f64 + 1.0 - CRPIX3) * CDELT3
}

/// Emission-line cube: a Gaussian line profile on a flat continuum, with a
/// little spatial structure and noise.
fn window_cube(rng: &mut SimpleRng) -> Vec<f64> {
    let mut cube = Vec::with_capacity(N_LAMBDA * NY * NX);
    let line_center = wavelength(N_LAMBDA / 2);

    for l in 0..N_LAMBDA {
        let w = wavelength(l);
        for y in 0..NY {
            for x in 0..NX {
                let brightening = 1.0 + 0.5 * gaussian(y as f64, NY as f64 / 2.0, 6.0, 1.0);
                let amp = 40.0 * brightening * (1.0 + 0.02 * x as f64);
                let signal = 2.0 + gaussian(w, line_center, 0.04, amp);
                cube.push(signal + rng.gauss(0.0, 0.2));
            }
        }
    }
    cube
}

/// Calibration curve: a slow, nearly linear decline across the window,
/// shaped like the curves found in real L2 files.
fn radcal_curve() -> Vec<f64> {
    (0..N_LAMBDA)
        .map(|i| 34.0595 - 0.0392 * i as f64 - 2.0e-6 * (i * i) as f64)
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_l2.fits".to_string());

    let mut rng = SimpleRng::new(42);

    // Row-major dimensions: [NAXIS4, NAXIS3, NAXIS2, NAXIS1].
    let dims = [1, N_LAMBDA, NY, NX];
    let description = ImageDescription {
        data_type: ImageType::Double,
        dimensions: &dims,
    };

    let mut fits = FitsFile::create(&path)
        .with_custom_primary(&description)
        .overwrite()
        .open()
        .with_context(|| format!("creating {path}"))?;

    let primary = fits.primary_hdu()?;
    primary.write_key(&mut fits, "TELESCOP", "SOLO/SPICE")?;
    primary.write_key(&mut fits, "LEVEL", "L2")?;
    primary.write_key(&mut fits, "EXTNAME", "WIN_NE_VIII_770")?;
    primary.write_key(&mut fits, "VAR_KEYS", "VARIABLE_KEYWORDS;LAMBDA1,RADCAL1")?;
    primary.write_key(&mut fits, "CTYPE1", "HPLN-TAN")?;
    primary.write_key(&mut fits, "CTYPE2", "HPLT-TAN")?;
    primary.write_key(&mut fits, "CTYPE3", "WAVE")?;
    primary.write_key(&mut fits, "CTYPE4", "TIME")?;
    primary.write_key(&mut fits, "CUNIT3", "nm")?;
    primary.write_key(&mut fits, "CRVAL3", CRVAL3)?;
    primary.write_key(&mut fits, "CRPIX3", CRPIX3)?;
    primary.write_key(&mut fits, "CDELT3", CDELT3)?;

    let cube = window_cube(&mut rng);
    primary
        .write_image(&mut fits, &cube)
        .context("writing window cube")?;

    let columns = vec![
        ColumnDescription::new("LAMBDA1")
            .with_type(ColumnDataType::Double)
            .create()?,
        ColumnDescription::new("RADCAL1")
            .with_type(ColumnDataType::Double)
            .create()?,
    ];
    let table = fits
        .create_table("VARIABLE_KEYWORDS", &columns)
        .context("creating VARIABLE_KEYWORDS table")?;

    let lambda: Vec<f64> = (0..N_LAMBDA).map(wavelength).collect();
    table.write_col(&mut fits, "LAMBDA1", &lambda)?;
    table.write_col(&mut fits, "RADCAL1", &radcal_curve())?;

    println!("Wrote synthetic L2 window ({N_LAMBDA} spectral bins, {NY}x{NX} pixels) to {path}");
    Ok(())
}
