use rayon::prelude::*;

use crate::analysis::{analyze_elements, ElementAnalysis};
use crate::bands::{determine_frequency_bands, Bands, FrequencyAnalysisResult};
use crate::config::AnalysisConfig;
use crate::heatmap::{HeatmapPoint, HeatmapProjector};
use crate::model::{Building, ElementKind, ElementRef, Opening, Surface, Wall};
use crate::segmentation::{Segment, Segmenter};
use crate::sound_power::{calc_lp_exterior, calc_lw, calc_lw_total};
use crate::transmission::calc_segment_r;

/// An element that radiates sound to the outside.
#[derive(Copy, Clone, Debug)]
pub enum FacadeElement<'a> {
    Wall(usize, &'a Wall),
    Floor(usize, &'a Surface),
    Ceiling(usize, &'a Surface),
}

impl<'a> FacadeElement<'a> {
    pub fn element_ref(&self) -> ElementRef {
        match self {
            FacadeElement::Wall(i, _) => ElementRef::new(ElementKind::Wall, *i),
            FacadeElement::Floor(i, _) => ElementRef::new(ElementKind::Floor, *i),
            FacadeElement::Ceiling(i, _) => ElementRef::new(ElementKind::Ceiling, *i),
        }
    }

    /// All walls, floors and ceilings of a building, in that order.
    pub fn all(building: &'a Building) -> Vec<FacadeElement<'a>> {
        let walls = building
            .walls
            .iter()
            .enumerate()
            .map(|(i, w)| FacadeElement::Wall(i, w));
        let floors = building
            .floors
            .iter()
            .enumerate()
            .map(|(i, f)| FacadeElement::Floor(i, f));
        let ceilings = building
            .ceilings
            .iter()
            .enumerate()
            .map(|(i, c)| FacadeElement::Ceiling(i, c));
        walls.chain(floors).chain(ceilings).collect()
    }
}

/// A segment with its composite reduction index and radiated power.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalyzedSegment {
    pub segment: Segment,
    pub r: Bands,
    pub lw: Bands,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FacadeInsulation {
    pub element: ElementRef,
    pub segments: Vec<AnalyzedSegment>,
    /// Energy sum of all segments.
    pub lw: Bands,
}

/// Segment an element, attach the composite R and Lw of every segment and
/// sum the power over the element.
pub fn calculate_facade_sound_insulation(
    segmenter: &Segmenter,
    element: FacadeElement<'_>,
    openings: &[&Opening],
    frequencies: &FrequencyAnalysisResult,
    interior_level: f64,
) -> FacadeInsulation {
    let element_ref = element.element_ref();
    let segments = match element {
        FacadeElement::Wall(i, wall) => segmenter.segment_wall(i, wall, openings),
        FacadeElement::Floor(_, surface) | FacadeElement::Ceiling(_, surface) => {
            segmenter.segment_surface(element_ref, surface, openings)
        }
    };

    let segments: Vec<AnalyzedSegment> = segments
        .into_iter()
        .map(|segment| {
            let r = calc_segment_r(
                &segment.constituents,
                frequencies.band_type,
                &frequencies.frequencies,
            );
            let lw = calc_lw(&r, segment.area, interior_level, &frequencies.frequencies);
            AnalyzedSegment { segment, r, lw }
        })
        .collect();
    let lw = calc_lw_total(segments.iter().map(|s| &s.lw), &frequencies.frequencies);

    log::debug!(
        "{}: {} segments, {} openings",
        element_ref,
        segments.len(),
        openings.len()
    );

    FacadeInsulation {
        element: element_ref,
        segments,
        lw,
    }
}

/// Everything computed for one building.
#[derive(Clone, Debug)]
pub struct BuildingAnalysis {
    pub frequencies: FrequencyAnalysisResult,
    pub facades: Vec<FacadeInsulation>,
    /// Total sound power of the whole envelope.
    pub lw: Bands,
    /// Exterior pressure level at the configured receiver distance.
    pub lp_exterior: Option<Bands>,
    pub elements: Vec<ElementAnalysis>,
    pub heatmap: Vec<HeatmapPoint>,
    pub segment_heatmap: Vec<HeatmapPoint>,
}

impl BuildingAnalysis {
    pub fn missing_data_count(&self) -> usize {
        self.frequencies.missing.len()
    }
}

/// Run the full pipeline over a building.
pub fn analyze_building(
    building: &Building,
    config: &AnalysisConfig,
) -> anyhow::Result<BuildingAnalysis> {
    let frequencies = determine_frequency_bands(
        &building.walls,
        &building.ceilings,
        &building.floors,
        &building.openings,
    );
    let segmenter = Segmenter::new(config.segmentation.clone());
    let openings = building.openings_by_parent();

    let facades: Vec<FacadeInsulation> = FacadeElement::all(building)
        .par_iter()
        .map(|element| {
            let element_openings = openings
                .get_vec(&element.element_ref())
                .map_or(&[][..], Vec::as_slice);
            calculate_facade_sound_insulation(
                &segmenter,
                *element,
                element_openings,
                &frequencies,
                config.interior_level,
            )
        })
        .collect();

    let lw = calc_lw_total(facades.iter().map(|f| &f.lw), &frequencies.frequencies);
    let lp_exterior = config
        .receiver_distance
        .map(|distance| calc_lp_exterior(&lw, distance, &frequencies.frequencies))
        .transpose()?;

    let elements = analyze_elements(
        building,
        frequencies.band_type,
        &config.representative_bands,
    );

    let projector = HeatmapProjector::from_config(config);
    let heatmap = projector.project_elements(building, frequencies.band_type);
    let segment_heatmap = projector.project_segments(&facades);

    if !frequencies.missing.is_empty() {
        log::warn!(
            "{} elements missing {} frequency data, counted as fully transmitting",
            frequencies.missing.len(),
            frequencies.band_type
        );
    }

    Ok(BuildingAnalysis {
        frequencies,
        facades,
        lw,
        lp_exterior,
        elements,
        heatmap,
        segment_heatmap,
    })
}
