use std::path::Path;

use fitsio::hdu::{DescribesHdu, FitsHdu, HduInfo};
use fitsio::FitsFile;
use log::debug;

use crate::error::{Error, Result};

use super::var_keys::{resolve_radcal_column, RadcalColumn};
use super::wcs::SpectralWcs;

/// Conventional EXTNAME of the binary table holding per-pixel variable
/// keyword arrays in SPICE L2 files.
pub const VARIABLE_KEYWORDS_EXTNAME: &str = "VARIABLE_KEYWORDS";

// ---------------------------------------------------------------------------
// Source handling
// ---------------------------------------------------------------------------

/// Where to read an L2 file from: a path the lookup opens (and closes)
/// itself, or a FITS handle the caller already holds.
///
/// A `Path` source is scoped to the call: the file is released on every exit
/// path, including errors. A `Handle` source is never closed by the lookup.
pub enum FitsSource<'a> {
    Path(&'a Path),
    Handle(&'a mut FitsFile),
}

impl<'a> From<&'a Path> for FitsSource<'a> {
    fn from(path: &'a Path) -> Self {
        FitsSource::Path(path)
    }
}

impl<'a> From<&'a mut FitsFile> for FitsSource<'a> {
    fn from(fits: &'a mut FitsFile) -> Self {
        FitsSource::Handle(fits)
    }
}

/// Run `op` against the source, opening the file first when the source is a
/// path. Used identically by every lookup regardless of who owns the handle.
fn with_file<T>(source: FitsSource<'_>, op: impl FnOnce(&mut FitsFile) -> Result<T>) -> Result<T> {
    match source {
        FitsSource::Path(path) => {
            let mut fits = FitsFile::open(path)?;
            op(&mut fits)
        }
        FitsSource::Handle(fits) => op(fits),
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read the radiometric calibration array for one spectral window.
///
/// `window` selects the window HDU by position or extension name. The
/// calibration column is named by the window header's `VAR_KEYS` keyword and
/// read from the companion variable-keywords binary table.
pub fn get_radcal<W: DescribesHdu>(source: FitsSource<'_>, window: W) -> Result<Vec<f64>> {
    with_file(source, |fits| {
        let (_, column) = locate_window(fits, window)?;
        read_calibration(fits, &column)
    })
}

/// Like [`get_radcal`], additionally deriving the window's wavelength axis
/// from its spectral WCS keywords. Both arrays have one value per spectral
/// bin.
pub fn get_radcal_with_wavelength<W: DescribesHdu>(
    source: FitsSource<'_>,
    window: W,
) -> Result<(Vec<f64>, Vec<f64>)> {
    with_file(source, |fits| {
        let (hdu, column) = locate_window(fits, window)?;
        let radcal = read_calibration(fits, &column)?;
        let wavelength = wavelength_axis(fits, &hdu)?;
        Ok((radcal, wavelength))
    })
}

// ---------------------------------------------------------------------------
// Lookup internals
// ---------------------------------------------------------------------------

/// Resolve the window HDU, guard the caller contract, and name the
/// calibration column from its `VAR_KEYS` keyword.
fn locate_window(
    fits: &mut FitsFile,
    window: impl DescribesHdu,
) -> Result<(FitsHdu, RadcalColumn)> {
    let hdu = fits.hdu(window)?;

    let extname: String = hdu.read_key(fits, "EXTNAME").unwrap_or_default();
    if extname == VARIABLE_KEYWORDS_EXTNAME {
        return Err(Error::InvalidWindow(format!(
            "'{VARIABLE_KEYWORDS_EXTNAME}' is the variable-keywords table, not a spectral window"
        )));
    }
    if !matches!(hdu.info, HduInfo::ImageInfo { .. }) {
        return Err(Error::InvalidWindow(format!(
            "HDU '{extname}' is not an image HDU"
        )));
    }

    let var_keys: String = hdu.read_key(fits, "VAR_KEYS")?;
    let column = resolve_radcal_column(&var_keys)?;
    debug!("window '{extname}': calibration column {} in '{}'", column.name, column.extname);
    Ok((hdu, column))
}

/// Read the named column from the variable-keywords table, flattened.
/// fitsio concatenates vector cells, which collapses singleton dimensions.
fn read_calibration(fits: &mut FitsFile, column: &RadcalColumn) -> Result<Vec<f64>> {
    let table = fits.hdu(column.extname.as_str())?;
    let values: Vec<f64> = table.read_col(fits, &column.name)?;
    debug!(
        "read {} calibration values from column {}",
        values.len(),
        column.name
    );
    Ok(values)
}

/// Build the wavelength array spanning the window's spectral axis.
fn wavelength_axis(fits: &mut FitsFile, hdu: &FitsHdu) -> Result<Vec<f64>> {
    let wcs = SpectralWcs::from_header(fits, hdu)?;
    let shape = match &hdu.info {
        HduInfo::ImageInfo { shape, .. } => shape,
        _ => {
            return Err(Error::InvalidWindow(
                "window HDU is not an image HDU".to_string(),
            ));
        }
    };

    // fitsio reports the shape in row-major order, so FITS axis i (1-based,
    // NAXIS1 fastest) sits at index len - i.
    let index = shape.len().checked_sub(wcs.axis()).ok_or_else(|| {
        Error::SpectralWcs(format!(
            "spectral axis {} outside the {}-dimensional image shape",
            wcs.axis(),
            shape.len()
        ))
    })?;

    Ok((0..shape[index])
        .map(|pixel| wcs.pixel_to_world(pixel as f64))
        .collect())
}
