//! Radiometric calibration lookup for SPICE L2 spectral windows.
//!
//! Architecture:
//! ```text
//!  L2 FITS file (path or open handle)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  lookup   │  select window HDU, guard caller contract
//!   └──────────┘
//!        │ VAR_KEYS
//!        ▼
//!   ┌──────────┐
//!   │ var_keys  │  parse grammar → RADCAL column name
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │   wcs     │  spectral WCS keywords → wavelength array
//!   └──────────┘
//! ```

pub mod lookup;
pub mod var_keys;
pub mod wcs;

pub use lookup::{
    get_radcal, get_radcal_with_wavelength, FitsSource, VARIABLE_KEYWORDS_EXTNAME,
};
pub use var_keys::{parse_var_keys, resolve_radcal_column, RadcalColumn, VarKeysGroup};
pub use wcs::SpectralWcs;
