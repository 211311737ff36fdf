use std::f64::consts::PI;

use uom::si::{
    area::square_meter,
    f64::{Area, Length},
    length::meter,
};

use crate::bands::Bands;
use crate::tools::level_sum;

/// Sound power radiated by a segment of `area` with reduction index
/// `r_bands`, driven by the interior pressure level `interior_level`.
///
/// Bands without an R value radiate as an open hole (R = 0). A segment
/// without area radiates nothing (negative infinity).
pub fn calc_lw(r_bands: &Bands, area: Area, interior_level: f64, frequencies: &[u32]) -> Bands {
    let area = area.get::<square_meter>();
    frequencies
        .iter()
        .map(|&frequency| {
            let lw = if area > 0.0 {
                interior_level - r_bands.get(frequency).unwrap_or(0.0) + 10.0 * area.log10()
            } else {
                f64::NEG_INFINITY
            };
            (frequency, lw)
        })
        .collect()
}

/// Energy sum of the per-band sound power of all segments.
pub fn calc_lw_total<'a, I>(segments: I, frequencies: &[u32]) -> Bands
where
    I: IntoIterator<Item = &'a Bands>,
    I::IntoIter: Clone,
{
    let segments = segments.into_iter();
    frequencies
        .iter()
        .map(|&frequency| {
            let total = level_sum(segments.clone().filter_map(|lw| lw.get(frequency)));
            (frequency, total)
        })
        .collect()
}

/// Exterior sound pressure level at `distance` from a facade radiating `lw`,
/// assuming hemispherical free field spreading.
pub fn calc_lp_exterior(lw: &Bands, distance: Length, frequencies: &[u32]) -> anyhow::Result<Bands> {
    let r = distance.get::<meter>();
    anyhow::ensure!(
        r > 0.0 && r.is_finite(),
        "Receiver distance must be positive, got {} m",
        r
    );
    let spreading = 10.0 * (2.0 * PI * r * r).log10();
    Ok(frequencies
        .iter()
        .filter_map(|&frequency| lw.get(frequency).map(|l| (frequency, l - spreading)))
        .collect())
}
