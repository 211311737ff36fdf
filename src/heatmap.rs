use nalgebra::Point2;

use crate::bands::BandType;
use crate::config::AnalysisConfig;
use crate::facade::FacadeInsulation;
use crate::model::{
    square_meters, AcousticMaterial, Building, Condition, ElementKind, Opening, OpeningParent,
};
use crate::transmission::{calc_average_transmission_loss, element_bands};

/// Position in the building plan.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlanCoordinates {
    pub x: f64,
    pub z: f64,
}

impl From<Point2<f64>> for PlanCoordinates {
    fn from(p: Point2<f64>) -> Self {
        PlanCoordinates { x: p.x, z: p.y }
    }
}

/// One sample of the transmitted intensity field.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatmapPoint {
    pub id: String,
    pub kind: ElementKind,
    pub coordinates: PlanCoordinates,
    /// Transmitted level relative to the interior level, in [0, 1].
    pub intensity: f64,
    /// Average reduction index over the representative bands.
    pub transmission_loss: f64,
    pub description: String,
}

/// Maps acoustic results onto plan points for visualisation.
#[derive(Clone, Debug)]
pub struct HeatmapProjector {
    interior_level: f64,
    representative_bands: Vec<u32>,
    samples_per_wall: usize,
}

impl HeatmapProjector {
    pub fn new(interior_level: f64, representative_bands: Vec<u32>, samples_per_wall: usize) -> Self {
        HeatmapProjector {
            interior_level,
            representative_bands,
            samples_per_wall,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(
            config.interior_level,
            config.representative_bands.clone(),
            config.heatmap.samples_per_wall,
        )
    }

    /// Exterior level Lp_in - R normalised by the interior level.
    pub fn intensity(&self, average_loss: f64) -> f64 {
        if self.interior_level <= 0.0 {
            return 0.0;
        }
        ((self.interior_level - average_loss) / self.interior_level).clamp(0.0, 1.0)
    }

    fn point(
        &self,
        id: String,
        kind: ElementKind,
        coordinates: PlanCoordinates,
        transmission_loss: f64,
        description: String,
    ) -> HeatmapPoint {
        HeatmapPoint {
            id,
            kind,
            coordinates,
            intensity: self.intensity(transmission_loss),
            transmission_loss,
            description,
        }
    }

    /// Points along every wall and at every opening with a valid parent.
    /// Elements without band data count as fully transmitting.
    pub fn project_elements(&self, building: &Building, band_type: BandType) -> Vec<HeatmapPoint> {
        let average = |material: &AcousticMaterial, condition: Condition| {
            element_bands(material, condition, band_type).map_or(0.0, |bands| {
                calc_average_transmission_loss(&bands, &self.representative_bands)
            })
        };

        let samples = self.samples_per_wall.max(1);
        let walls = building.walls.iter().enumerate().flat_map(|(index, wall)| {
            let loss = average(&wall.material, wall.condition);
            (0..samples).map(move |i| {
                let t = if samples == 1 {
                    0.5
                } else {
                    i as f64 / (samples - 1) as f64
                };
                self.point(
                    format!("wall-{index}-{i}"),
                    ElementKind::Wall,
                    wall.point_at(t).into(),
                    loss,
                    format!(
                        "Wall {} ({}, {})",
                        index, wall.material.name, wall.condition
                    ),
                )
            })
        });

        let openings = building
            .openings
            .iter()
            .enumerate()
            .filter_map(|(index, opening)| {
                let coordinates = opening_position(building, opening)?;
                Some(self.point(
                    format!("opening-{index}"),
                    ElementKind::Opening,
                    coordinates,
                    average(&opening.material, opening.condition),
                    format!(
                        "{} {} ({}, {})",
                        opening.kind, index, opening.material.name, opening.condition
                    ),
                ))
            });

        walls.chain(openings).collect()
    }

    /// One point at the centre of every analysed segment.
    pub fn project_segments(&self, facades: &[FacadeInsulation]) -> Vec<HeatmapPoint> {
        facades
            .iter()
            .flat_map(|facade| {
                facade.segments.iter().enumerate().map(move |(i, analyzed)| {
                    let center = analyzed.segment.geometry.center;
                    self.point(
                        format!("{}/segment-{}", facade.element, i),
                        facade.element.kind,
                        PlanCoordinates {
                            x: center.x,
                            z: center.z,
                        },
                        calc_average_transmission_loss(&analyzed.r, &self.representative_bands),
                        format!(
                            "Segment {} of {}, {:.2} m²",
                            i,
                            facade.element,
                            square_meters(analyzed.segment.area)
                        ),
                    )
                })
            })
            .collect()
    }
}

/// Plan position of an opening's centre, `None` for a missing parent.
fn opening_position(building: &Building, opening: &Opening) -> Option<PlanCoordinates> {
    let surface = match opening.parent {
        OpeningParent::Wall(i) => {
            let wall = building.walls.get(i)?;
            return Some(wall.point_at(opening.position).into());
        }
        OpeningParent::Floor(i) => building.floors.get(i)?,
        OpeningParent::Ceiling(i) => building.ceilings.get(i)?,
    };
    let (min, max) = surface.bounding_box()?;
    Some(PlanCoordinates {
        x: min.x + opening.position * (max.x - min.x),
        z: min.y + opening.depth_position * (max.y - min.y),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::FrequencyAnalysisResult;
    use crate::facade::{calculate_facade_sound_insulation, FacadeElement};
    use crate::model::tests::{flat_material, sample_building_json, sample_wall};
    use crate::segmentation::Segmenter;
    use crate::transmission::DEFAULT_REPRESENTATIVE_BANDS;
    use approx::assert_relative_eq;
    use std::sync::Arc;
    use test_case::test_case;

    fn projector(samples_per_wall: usize) -> HeatmapProjector {
        HeatmapProjector::new(70.0, DEFAULT_REPRESENTATIVE_BANDS.to_vec(), samples_per_wall)
    }

    #[test_case(70.0, 40.0, 30.0 / 70.0; "partial")]
    #[test_case(70.0, 0.0, 1.0; "open")]
    #[test_case(70.0, 90.0, 0.0; "louder than source")]
    #[test_case(70.0, -5.0, 1.0; "clamped above")]
    #[test_case(0.0, 40.0, 0.0; "silent interior")]
    fn intensity(interior_level: f64, loss: f64, expected: f64) {
        let projector = HeatmapProjector::new(interior_level, vec![500], 1);
        assert_relative_eq!(projector.intensity(loss), expected, epsilon = 1e-12);
    }

    #[test]
    fn element_points() {
        let building = Building::from_json(sample_building_json()).unwrap();

        let points = projector(5).project_elements(&building, BandType::Octave);

        assert_eq!(points.len(), 12);
        assert_eq!(points[0].id, "wall-0-0");
        assert_eq!(points[0].coordinates, PlanCoordinates { x: 0.0, z: 0.0 });
        assert_relative_eq!(points[4].coordinates.x, 6.0, epsilon = 1e-12);
        assert_relative_eq!(points[9].coordinates.z, 4.0, epsilon = 1e-12);

        let window = &points[10];
        assert_eq!(window.id, "opening-0");
        assert_eq!(window.kind, ElementKind::Opening);
        assert_relative_eq!(window.coordinates.x, 3.0, epsilon = 1e-12);
        assert!(window.description.starts_with("window"));

        let skylight = &points[11];
        assert_relative_eq!(skylight.coordinates.x, 1.5, epsilon = 1e-12);
        assert_relative_eq!(skylight.coordinates.z, 2.0, epsilon = 1e-12);
        assert_relative_eq!(skylight.transmission_loss, 88.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(
            skylight.intensity,
            (70.0 - 88.0 / 3.0) / 70.0,
            epsilon = 1e-9
        );
        assert!(points.iter().all(|p| (0.0..=1.0).contains(&p.intensity)));
    }

    #[test]
    fn single_sample_sits_mid_wall() {
        let building = Building::from_json(sample_building_json()).unwrap();

        let points = projector(1).project_elements(&building, BandType::Octave);

        assert_eq!(points.len(), 4);
        assert_eq!(points[1].coordinates, PlanCoordinates { x: 6.0, z: 2.0 });
    }

    #[test]
    fn missing_data_is_fully_transmitting() {
        let building = Building::from_json(sample_building_json()).unwrap();

        // glazing has no third-octave data
        let points = projector(2).project_elements(&building, BandType::ThirdOctave);

        let window = points.iter().find(|p| p.id == "opening-0").unwrap();
        assert_eq!(window.transmission_loss, 0.0);
        assert_eq!(window.intensity, 1.0);
    }

    #[test]
    fn orphan_opening_has_no_point() {
        let mut building = Building::from_json(sample_building_json()).unwrap();
        building.openings[0].parent = OpeningParent::Wall(7);

        let points = projector(5).project_elements(&building, BandType::Octave);

        assert_eq!(points.len(), 11);
        assert!(points.iter().all(|p| p.id != "opening-0"));
    }

    #[test]
    fn segment_points() {
        let wall = sample_wall(Arc::new(flat_material("brick", 40.0)));
        let facade = calculate_facade_sound_insulation(
            &Segmenter::default(),
            FacadeElement::Wall(0, &wall),
            &[],
            &FrequencyAnalysisResult::new(BandType::ThirdOctave),
            70.0,
        );

        let points = projector(5).project_segments(&[facade]);

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].id, "wall-0/segment-0");
        assert_relative_eq!(points[0].coordinates.x, 4.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(points[0].coordinates.z, 0.0);
        for point in &points {
            assert_relative_eq!(point.transmission_loss, 40.0, epsilon = 1e-9);
            assert_relative_eq!(point.intensity, 30.0 / 70.0, epsilon = 1e-9);
        }
    }
}
