use uom::si::{area::square_meter, f64::Area};

use crate::bands::{get_material_bands, BandType, Bands};
use crate::model::{AcousticMaterial, Condition};
use crate::segmentation::Constituent;
use crate::tools::{energy_to_level, level_to_energy};

/// Composite index reported when nothing gets through.
pub const NO_TRANSMISSION: f64 = 999.0;

/// Lower bound of the effective transmission loss in dB.
pub const MIN_EFFECTIVE_LOSS: f64 = 5.0;

/// Upper bound of the opening area reduction in dB.
pub const MAX_AREA_REDUCTION: f64 = 20.0;

pub const DEFAULT_REPRESENTATIVE_BANDS: [u32; 3] = [125, 500, 2000];

/// Scale every band by the condition factor.
pub fn calc_transmission_loss_bands(bands: &Bands, condition: Condition) -> Bands {
    let factor = condition.factor();
    bands.map(|r| r * factor)
}

/// Condition adjusted bands of a material, `None` without usable data.
pub fn element_bands(
    material: &AcousticMaterial,
    condition: Condition,
    band_type: BandType,
) -> Option<Bands> {
    get_material_bands(material, band_type).map(|bands| calc_transmission_loss_bands(&bands, condition))
}

/// Area weighted composite sound reduction index of a segment.
///
/// A constituent without a value for a band transmits everything in it
/// (τ = 1). Returns empty bands when the constituents have no area.
pub fn calc_segment_r(constituents: &[Constituent], band_type: BandType, frequencies: &[u32]) -> Bands {
    let total_area: f64 = constituents
        .iter()
        .map(|c| c.area.get::<square_meter>())
        .sum();
    if total_area <= 0.0 {
        return Bands::new();
    }

    let adjusted: Vec<(f64, Option<Bands>)> = constituents
        .iter()
        .map(|c| {
            (
                c.area.get::<square_meter>(),
                element_bands(&c.material, c.condition, band_type),
            )
        })
        .collect();

    frequencies
        .iter()
        .map(|&frequency| {
            let weighted: f64 = adjusted
                .iter()
                .map(|(area, bands)| {
                    let tau = bands
                        .as_ref()
                        .and_then(|b| b.get(frequency))
                        .map_or(1.0, |r| level_to_energy(-r));
                    area * tau
                })
                .sum();
            let tau_avg = weighted / total_area;
            let r = if tau_avg > 0.0 {
                -energy_to_level(tau_avg)
            } else {
                NO_TRANSMISSION
            };
            (frequency, r)
        })
        .collect()
}

/// Arithmetic mean of the given bands, missing ones count as zero loss.
pub fn calc_average_transmission_loss(bands: &Bands, keys: &[u32]) -> f64 {
    if keys.is_empty() {
        return 0.0;
    }
    keys.iter().map(|&k| bands.get(k).unwrap_or(0.0)).sum::<f64>() / keys.len() as f64
}

pub fn calc_effective_transmission_loss(
    average_loss: f64,
    area_reduction: f64,
    openings_penalty: f64,
) -> f64 {
    (average_loss - area_reduction - openings_penalty).max(MIN_EFFECTIVE_LOSS)
}

/// Reduction for larger openings transmitting disproportionately more,
/// 10·log10(S) capped at 20 dB. Zero for an empty opening area.
pub fn calc_area_reduction(opening_area: Area) -> f64 {
    let area = opening_area.get::<square_meter>();
    if area <= 0.0 {
        return 0.0;
    }
    (10.0 * area.log10()).min(MAX_AREA_REDUCTION)
}
