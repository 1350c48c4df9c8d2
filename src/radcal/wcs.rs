use fitsio::hdu::FitsHdu;
use fitsio::FitsFile;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Linear spectral world-coordinate transform
// ---------------------------------------------------------------------------

/// Spectral pixel → wavelength transform derived from a window HDU header.
///
/// SPICE L2 windows carry a linear spectral axis described by the usual FITS
/// WCS keywords (`CTYPEi` = `WAVE`, `CRVALi`, `CRPIXi`, `CDELTi`, optional
/// diagonal `PCi_i`). This covers the linear case only; there is no
/// distortion model on the spectral axis of these files.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralWcs {
    axis: usize,
    crval: f64,
    crpix: f64,
    cdelt: f64,
    scale: f64,
    unit: Option<String>,
}

impl SpectralWcs {
    /// Derive the spectral transform from the header of `hdu`.
    ///
    /// Scans `CTYPE1..=CTYPEn` for the single axis whose type starts with
    /// `WAVE` or `AWAV`; fails when none or more than one is present, or
    /// when the axis is missing any of `CRVAL`/`CRPIX`/`CDELT`.
    pub fn from_header(fits: &mut FitsFile, hdu: &FitsHdu) -> Result<Self> {
        let naxis: i64 = hdu.read_key(fits, "NAXIS")?;

        let mut spectral: Option<usize> = None;
        for axis in 1..=naxis.max(0) as usize {
            let ctype: String = match hdu.read_key(fits, &format!("CTYPE{axis}")) {
                Ok(value) => value,
                Err(_) => continue,
            };
            if is_spectral_ctype(ctype.trim()) && spectral.replace(axis).is_some() {
                return Err(Error::SpectralWcs(
                    "more than one spectral axis in header".to_string(),
                ));
            }
        }
        let axis = spectral.ok_or_else(|| {
            Error::SpectralWcs("no spectral axis (CTYPEi = WAVE/AWAV) in header".to_string())
        })?;

        let crval: f64 = hdu.read_key(fits, &format!("CRVAL{axis}"))?;
        let crpix: f64 = hdu.read_key(fits, &format!("CRPIX{axis}"))?;
        let cdelt: f64 = hdu.read_key(fits, &format!("CDELT{axis}"))?;
        let scale: f64 = hdu.read_key(fits, &format!("PC{axis}_{axis}")).unwrap_or(1.0);
        let unit: Option<String> = hdu.read_key(fits, &format!("CUNIT{axis}")).ok();

        Ok(SpectralWcs {
            axis,
            crval,
            crpix,
            cdelt,
            scale,
            unit,
        })
    }

    /// FITS axis number (1-based) of the spectral axis.
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Wavelength unit from `CUNITi`, when the header carries one.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Map a 0-based pixel index along the spectral axis to a wavelength.
    ///
    /// FITS pixel coordinates are 1-based, hence the `+ 1`.
    pub fn pixel_to_world(&self, pixel: f64) -> f64 {
        self.crval + (pixel + 1.0 - self.crpix) * self.cdelt * self.scale
    }
}

fn is_spectral_ctype(ctype: &str) -> bool {
    ctype.starts_with("WAVE") || ctype.starts_with("AWAV")
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn linear_wcs() -> SpectralWcs {
        SpectralWcs {
            axis: 3,
            crval: 77.0,
            crpix: 25.5,
            cdelt: 0.009,
            scale: 1.0,
            unit: Some("nm".to_string()),
        }
    }

    #[test]
    fn maps_reference_pixel() {
        let wcs = linear_wcs();
        // 0-based pixel 24.5 is FITS pixel 25.5, the reference pixel.
        assert_relative_eq!(wcs.pixel_to_world(24.5), 77.0, epsilon = 1e-12);
    }

    #[test]
    fn maps_linear_ramp() {
        let wcs = linear_wcs();
        assert_relative_eq!(
            wcs.pixel_to_world(0.0),
            77.0 + (1.0 - 25.5) * 0.009,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            wcs.pixel_to_world(49.0),
            77.0 + (50.0 - 25.5) * 0.009,
            epsilon = 1e-12
        );
    }

    #[test]
    fn applies_pc_scale() {
        let mut wcs = linear_wcs();
        wcs.scale = 2.0;
        assert_relative_eq!(
            wcs.pixel_to_world(30.0),
            77.0 + (31.0 - 25.5) * 0.009 * 2.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn recognises_spectral_ctypes() {
        assert!(is_spectral_ctype("WAVE"));
        assert!(is_spectral_ctype("AWAV"));
        assert!(!is_spectral_ctype("HPLT-TAN"));
        assert!(!is_spectral_ctype("UTC"));
    }
}
