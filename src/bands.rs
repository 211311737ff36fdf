use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::model::{AcousticMaterial, ElementKind, ElementRef, Opening, Surface, Wall};
use crate::tools::level_mean;

/// Third-octave centre frequencies in Hz (ISO 266), 50 Hz to 5 kHz.
pub const THIRD_OCTAVE_FREQUENCIES: [u32; 21] = [
    50, 63, 80, 100, 125, 160, 200, 250, 315, 400, 500, 630, 800, 1000, 1250, 1600, 2000, 2500,
    3150, 4000, 5000,
];

/// Octave centre frequencies in Hz (ISO 266), 63 Hz to 4 kHz.
pub const OCTAVE_FREQUENCIES: [u32; 7] = [63, 125, 250, 500, 1000, 2000, 4000];

/// Third-octave bands composing each octave band.
const OCTAVE_COMPOSITION: [(u32, [u32; 3]); 7] = [
    (63, [50, 63, 80]),
    (125, [100, 125, 160]),
    (250, [200, 250, 315]),
    (500, [400, 500, 630]),
    (1000, [800, 1000, 1250]),
    (2000, [1600, 2000, 2500]),
    (4000, [3150, 4000, 5000]),
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BandType {
    ThirdOctave,
    Octave,
}

impl BandType {
    pub fn frequencies(self) -> &'static [u32] {
        match self {
            BandType::ThirdOctave => &THIRD_OCTAVE_FREQUENCIES,
            BandType::Octave => &OCTAVE_FREQUENCIES,
        }
    }

    pub fn contains(self, frequency: u32) -> bool {
        self.frequencies().contains(&frequency)
    }
}

impl fmt::Display for BandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandType::ThirdOctave => write!(f, "third-octave"),
            BandType::Octave => write!(f, "octave"),
        }
    }
}

/// Per-band dB values keyed by centre frequency in Hz.
///
/// Only standard third-octave frequencies (which include all octave centres)
/// are ever stored, entries with other keys are dropped on construction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bands(BTreeMap<u32, f64>);

impl Bands {
    pub fn new() -> Self {
        Self::default()
    }

    /// The same value in every band of the given resolution.
    pub fn flat(band_type: BandType, value: f64) -> Self {
        band_type.frequencies().iter().map(|&f| (f, value)).collect()
    }

    /// Build band data from loosely typed `(frequency, value)` pairs,
    /// rejecting frequencies that don't belong to `band_type`.
    pub fn from_pairs<I>(band_type: BandType, pairs: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        let mut map = BTreeMap::new();
        for (frequency, value) in pairs {
            if !band_type.contains(frequency) {
                anyhow::bail!("{} Hz is not a standard {} band", frequency, band_type);
            }
            map.insert(frequency, value);
        }
        Ok(Bands(map))
    }

    pub fn get(&self, frequency: u32) -> Option<f64> {
        self.0.get(&frequency).copied().filter(|v| !v.is_nan())
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.0.iter().map(|(&f, &v)| (f, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if at least one band holds a usable non-zero value.
    /// All-zero maps count as "no data". That also hides a material that
    /// truly transmits everything, which is harmless downstream since
    /// missing bands are treated as R = 0 anyway.
    pub fn has_data(&self) -> bool {
        self.0.values().any(|v| v.is_finite() && *v != 0.0)
    }

    /// Apply `f` to every value.
    pub fn map<F>(&self, f: F) -> Bands
    where
        F: Fn(f64) -> f64,
    {
        Bands(self.0.iter().map(|(&k, &v)| (k, f(v))).collect())
    }
}

impl FromIterator<(u32, f64)> for Bands {
    fn from_iter<T: IntoIterator<Item = (u32, f64)>>(iter: T) -> Self {
        Bands(
            iter.into_iter()
                .filter(|(f, _)| BandType::ThirdOctave.contains(*f))
                .collect(),
        )
    }
}

/// Band resolution chosen for a model.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyAnalysisResult {
    pub band_type: BandType,
    pub frequencies: Vec<u32>,
    pub missing: Vec<MissingBandData>,
}

impl FrequencyAnalysisResult {
    pub fn new(band_type: BandType) -> Self {
        FrequencyAnalysisResult {
            band_type,
            frequencies: band_type.frequencies().to_vec(),
            missing: Vec::new(),
        }
    }
}

/// An element whose material has no data at the chosen resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingBandData {
    pub element: ElementRef,
    pub material: String,
}

/// Scan all elements' materials and pick the band resolution for the whole
/// model.
///
/// Third-octave wins when at least one material has third-octave data and
/// materials with third-octave data are at least as common as octave-only ones.
/// Materials with third-octave but no octave data get derived octave bands
/// cached on them. Elements that lack data at the chosen resolution are
/// listed in the result.
pub fn determine_frequency_bands(
    walls: &[Wall],
    ceilings: &[Surface],
    floors: &[Surface],
    openings: &[Opening],
) -> FrequencyAnalysisResult {
    let elements: Vec<(ElementRef, &AcousticMaterial)> = walls
        .iter()
        .enumerate()
        .map(|(i, w)| (ElementRef::new(ElementKind::Wall, i), w.material.as_ref()))
        .chain(
            ceilings
                .iter()
                .enumerate()
                .map(|(i, c)| (ElementRef::new(ElementKind::Ceiling, i), c.material.as_ref())),
        )
        .chain(
            floors
                .iter()
                .enumerate()
                .map(|(i, f)| (ElementRef::new(ElementKind::Floor, i), f.material.as_ref())),
        )
        .chain(
            openings
                .iter()
                .enumerate()
                .map(|(i, o)| (ElementRef::new(ElementKind::Opening, i), o.material.as_ref())),
        )
        .collect();

    let mut third_octave_count = 0usize;
    let mut octave_only_count = 0usize;
    for (_, material) in elements.iter() {
        let has_third_octave = material.third_octave.has_data();
        let has_octave = material.octave().map_or(false, Bands::has_data);
        if has_third_octave {
            third_octave_count += 1;
        } else if has_octave {
            octave_only_count += 1;
        }
    }

    for (_, material) in elements.iter() {
        if material.third_octave.has_data() && material.octave().is_none() {
            material.cache_octave(convert_third_octave_to_octave(&material.third_octave));
        }
    }

    let band_type = if third_octave_count > 0 && third_octave_count >= octave_only_count {
        BandType::ThirdOctave
    } else {
        BandType::Octave
    };
    log::debug!(
        "{} materials with third-octave data, {} octave-only, using {} bands",
        third_octave_count,
        octave_only_count,
        band_type
    );

    let mut result = FrequencyAnalysisResult::new(band_type);
    result.missing = elements
        .into_iter()
        .filter(|(_, material)| get_material_bands(material, band_type).is_none())
        .map(|(element, material)| MissingBandData {
            element,
            material: material.name.clone(),
        })
        .collect();
    if !result.missing.is_empty() {
        log::warn!(
            "{} elements are missing {} band data",
            result.missing.len(),
            band_type
        );
    }

    result
}

/// Energy-average each octave's three third-octave constituents.
/// Absent constituents are left out of the mean; an octave with no
/// constituents at all is left out of the result.
pub fn convert_third_octave_to_octave(bands: &Bands) -> Bands {
    OCTAVE_COMPOSITION
        .iter()
        .filter_map(|(octave, parts)| {
            let values = parts
                .iter()
                .filter_map(|&f| bands.get(f))
                .filter(|v| v.is_finite());
            level_mean(values).map(|mean| (*octave, mean))
        })
        .collect()
}

/// Band data of a material at the requested resolution.
///
/// Octave data can be derived from third-octave data, the other direction is
/// not attempted. Returns `None` when nothing usable is available.
pub fn get_material_bands(material: &AcousticMaterial, band_type: BandType) -> Option<Cow<'_, Bands>> {
    match band_type {
        BandType::ThirdOctave => material
            .third_octave
            .has_data()
            .then_some(Cow::Borrowed(&material.third_octave)),
        BandType::Octave => match material.octave() {
            Some(octave) if octave.has_data() => Some(Cow::Borrowed(octave)),
            _ if material.third_octave.has_data() => Some(Cow::Owned(
                convert_third_octave_to_octave(&material.third_octave),
            )),
            _ => None,
        },
    }
}
