//! Radiometric calibration curves and temperature colormaps for SPICE L2
//! spectral FITS files.
//!
//! Two independent utilities:
//!
//! * [`radcal`] — read the radiometric calibration array for one spectral
//!   window of an L2 file (and optionally the window's wavelength axis),
//!   locating the right binary-table column from the `VAR_KEYS` header
//!   keyword.
//! * [`color`] — build a perceptually-based 256-level colormap keyed to a
//!   line-formation temperature (base-10 log of temperature in K).
//!
//! ```no_run
//! use std::path::Path;
//! use rusty_spice::{get_radcal, temperature_cmap, FitsSource};
//!
//! let path = Path::new("solo_L2_spice-n-ras.fits");
//! let radcal = get_radcal(FitsSource::Path(path), 0)?;
//! println!("{} calibration factors", radcal.len());
//!
//! let cmap = temperature_cmap(4.5);
//! assert_eq!(cmap.name(), "spice_logt_4.5");
//! # Ok::<(), rusty_spice::Error>(())
//! ```

pub mod color;
pub mod error;
pub mod radcal;

pub use color::{main_color, temperature_cmap, temperature_cmap_with, CmapParams, ColorMap};
pub use error::{Error, Result};
pub use radcal::{
    get_radcal, get_radcal_with_wavelength, FitsSource, SpectralWcs, VARIABLE_KEYWORDS_EXTNAME,
};
