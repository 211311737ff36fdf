use std::sync::Arc;

use itertools::Itertools;
use nalgebra::{Point2, Point3, Vector3};
use uom::si::{area::square_meter, f64::Area};

use crate::config::SegmentationConfig;
use crate::model::{
    meters, AcousticMaterial, Condition, ElementKind, ElementRef, Opening, OpeningKind, Surface,
    Wall,
};

const EPS: f64 = 1e-9;

/// Part of a segment made of a single material.
#[derive(Clone, Debug, PartialEq)]
pub struct Constituent {
    pub kind: ConstituentKind,
    pub area: Area,
    pub material: Arc<AcousticMaterial>,
    pub condition: Condition,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConstituentKind {
    Wall,
    Floor,
    Ceiling,
    Opening(OpeningKind),
}

/// Rectangular piece of one element's surface.
///
/// `u` runs along the wall (or the bounding box width), `v` up the wall
/// (or along the bounding box depth). Both are fractions in [0, 1].
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub parent: ElementRef,
    pub u: (f64, f64),
    pub v: (f64, f64),
    /// Geometric area of the cell, equal to the sum of the constituents.
    pub area: Area,
    pub constituents: Vec<Constituent>,
    pub geometry: SegmentGeometry,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SegmentGeometry {
    /// Cell corners in order (u0,v0), (u1,v0), (u1,v1), (u0,v1); `y` is up.
    pub corners: [Point3<f64>; 4],
    pub center: Point3<f64>,
    pub normal: Vector3<f64>,
}

/// Fractional bounding box of an opening within its parent.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Extent {
    u: (f64, f64),
    v: (f64, f64),
}

impl Extent {
    fn clipped(u: (f64, f64), v: (f64, f64)) -> Option<Extent> {
        let u = (u.0.max(0.0), u.1.min(1.0));
        let v = (v.0.max(0.0), v.1.min(1.0));
        (u.1 - u.0 > EPS && v.1 - v.0 > EPS).then_some(Extent { u, v })
    }
}

fn overlap(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.1.min(b.1) - a.0.max(b.0)).max(0.0)
}

/// What is being cut into cells, in absolute sizes.
struct Grid<'a> {
    parent: ElementRef,
    width: f64,
    height: f64,
    base_kind: ConstituentKind,
    base_material: &'a Arc<AcousticMaterial>,
    base_condition: Condition,
    openings: Vec<(Extent, &'a Opening)>,
}

impl<'a> Grid<'a> {
    fn cell_area(&self, u: (f64, f64), v: (f64, f64)) -> f64 {
        (u.1 - u.0) * self.width * (v.1 - v.0) * self.height
    }

    /// Constituents of the cell spanning `u` x `v`: every overlapping
    /// opening plus the residual base material. They always add up to the
    /// cell area; openings covering more than the cell (overlapping each
    /// other) or leaving only a sliver are scaled to fill it exactly.
    fn constituents(&self, u: (f64, f64), v: (f64, f64), min_residual: f64) -> Vec<Constituent> {
        let cell_area = self.cell_area(u, v);
        let mut constituents: Vec<Constituent> = self
            .openings
            .iter()
            .filter_map(|(extent, opening)| {
                let area = overlap(u, extent.u) * self.width * overlap(v, extent.v) * self.height;
                (area > 0.0).then(|| Constituent {
                    kind: ConstituentKind::Opening(opening.kind),
                    area: Area::new::<square_meter>(area),
                    material: Arc::clone(&opening.material),
                    condition: opening.condition,
                })
            })
            .collect();

        let opening_area: f64 = constituents
            .iter()
            .map(|c| c.area.get::<square_meter>())
            .sum();
        let residual = cell_area - opening_area;
        if residual > min_residual {
            constituents.push(Constituent {
                kind: self.base_kind,
                area: Area::new::<square_meter>(residual),
                material: Arc::clone(self.base_material),
                condition: self.base_condition,
            });
        } else if opening_area > 0.0 {
            if residual < -EPS {
                log::warn!(
                    "Openings of {} overlap, {:.3} m² of openings in a {:.3} m² cell",
                    self.parent,
                    opening_area,
                    cell_area
                );
            }
            let scale = cell_area / opening_area;
            for constituent in constituents.iter_mut() {
                constituent.area = constituent.area * scale;
            }
        }
        constituents
    }
}

/// Splits walls, floors and ceilings into a grid of segments.
#[derive(Clone, Debug, Default)]
pub struct Segmenter {
    config: SegmentationConfig,
}

impl Segmenter {
    pub fn new(config: SegmentationConfig) -> Self {
        Segmenter { config }
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Segment a wall of index `index` punctured by `openings`.
    /// Walls of zero length or height produce no segments.
    pub fn segment_wall(&self, index: usize, wall: &Wall, openings: &[&Opening]) -> Vec<Segment> {
        let parent = ElementRef::new(ElementKind::Wall, index);
        let length = meters(wall.length());
        let height = meters(wall.height);
        if length < EPS || height < EPS {
            log::warn!("Skipping degenerate {} ({} x {} m)", parent, length, height);
            return Vec::new();
        }

        let grid = Grid {
            parent,
            width: length,
            height,
            base_kind: ConstituentKind::Wall,
            base_material: &wall.material,
            base_condition: wall.condition,
            openings: openings
                .iter()
                .filter_map(|opening| {
                    let half_width = meters(opening.width) / 2.0 / length;
                    let bottom = meters(opening.bottom_offset) / height;
                    let extent = Extent::clipped(
                        (opening.position - half_width, opening.position + half_width),
                        (bottom, bottom + meters(opening.height) / height),
                    );
                    if extent.is_none() {
                        log::warn!("An opening of {} lies outside of it, ignoring", parent);
                    }
                    extent.map(|extent| (extent, *opening))
                })
                .collect(),
        };

        let direction = wall.end - wall.start;
        let normal = Vector3::new(direction.y, 0.0, -direction.x).normalize();
        let base = meters(wall.base_elevation);
        let corner = |u: f64, v: f64| {
            let p = wall.point_at(u);
            Point3::new(p.x, base + v * height, p.y)
        };

        self.cells(
            &grid,
            self.config.horizontal_divisions,
            self.config.vertical_divisions,
            |_, _| true,
            |u, v| SegmentGeometry {
                corners: [
                    corner(u.0, v.0),
                    corner(u.1, v.0),
                    corner(u.1, v.1),
                    corner(u.0, v.1),
                ],
                center: corner((u.0 + u.1) / 2.0, (v.0 + v.1) / 2.0),
                normal,
            },
        )
    }

    /// Segment a floor or ceiling over its bounding box, keeping only the
    /// cells whose centre lies inside the polygon.
    pub fn segment_surface(
        &self,
        parent: ElementRef,
        surface: &Surface,
        openings: &[&Opening],
    ) -> Vec<Segment> {
        if surface.polygon.len() < 3 {
            log::warn!("Skipping {} with fewer than 3 vertices", parent);
            return Vec::new();
        }
        let Some((min, max)) = surface.bounding_box() else {
            return Vec::new();
        };
        let width = max.x - min.x;
        let depth = max.y - min.y;
        if width < EPS || depth < EPS {
            log::warn!("Skipping degenerate {}", parent);
            return Vec::new();
        }

        let (base_kind, normal) = match parent.kind {
            ElementKind::Floor => (ConstituentKind::Floor, Vector3::new(0.0, -1.0, 0.0)),
            _ => (ConstituentKind::Ceiling, Vector3::new(0.0, 1.0, 0.0)),
        };
        let grid = Grid {
            parent,
            width,
            height: depth,
            base_kind,
            base_material: &surface.material,
            base_condition: surface.condition,
            openings: openings
                .iter()
                .filter_map(|opening| {
                    let half_width = meters(opening.width) / 2.0 / width;
                    let half_depth = meters(opening.height) / 2.0 / depth;
                    Extent::clipped(
                        (opening.position - half_width, opening.position + half_width),
                        (
                            opening.depth_position - half_depth,
                            opening.depth_position + half_depth,
                        ),
                    )
                    .map(|extent| (extent, *opening))
                })
                .collect(),
        };

        let elevation = meters(surface.elevation);
        let plan = |u: f64, v: f64| Point2::new(min.x + u * width, min.y + v * depth);
        let corner = |u: f64, v: f64| {
            let p = plan(u, v);
            Point3::new(p.x, elevation, p.y)
        };

        self.cells(
            &grid,
            self.config.surface_divisions,
            self.config.surface_divisions,
            |u, v| {
                point_in_polygon(
                    &plan((u.0 + u.1) / 2.0, (v.0 + v.1) / 2.0),
                    &surface.polygon,
                )
            },
            |u, v| SegmentGeometry {
                corners: [
                    corner(u.0, v.0),
                    corner(u.1, v.0),
                    corner(u.1, v.1),
                    corner(u.0, v.1),
                ],
                center: corner((u.0 + u.1) / 2.0, (v.0 + v.1) / 2.0),
                normal,
            },
        )
    }

    fn cells<K, G>(
        &self,
        grid: &Grid<'_>,
        u_divisions: usize,
        v_divisions: usize,
        keep: K,
        geometry: G,
    ) -> Vec<Segment>
    where
        K: Fn((f64, f64), (f64, f64)) -> bool,
        G: Fn((f64, f64), (f64, f64)) -> SegmentGeometry,
    {
        let us = divisions(u_divisions);
        let vs = divisions(v_divisions);

        us.iter()
            .copied()
            .tuple_windows()
            .cartesian_product(vs.iter().copied().tuple_windows().collect_vec())
            .filter(|&(u, v)| keep(u, v))
            .filter_map(|(u, v)| {
                let constituents = grid.constituents(u, v, self.config.min_residual_area);
                if constituents.is_empty() {
                    return None;
                }
                Some(Segment {
                    parent: grid.parent,
                    u,
                    v,
                    area: Area::new::<square_meter>(grid.cell_area(u, v)),
                    constituents,
                    geometry: geometry(u, v),
                })
            })
            .collect()
    }
}

/// Sorted, deduplicated division points {0, 1} ∪ {i / count}.
pub fn divisions(count: usize) -> Vec<f64> {
    let count = count.max(1);
    let mut points: Vec<f64> = (0..=count)
        .map(|i| i as f64 / count as f64)
        .chain([0.0, 1.0])
        .collect();
    points.sort_by(f64::total_cmp);
    points.dedup_by(|a, b| (*a - *b).abs() < EPS);
    points
}

/// Even-odd ray casting test.
///
/// Half-open on the boundary: points on the bottom (min z) and left (min x)
/// edges of an axis aligned polygon are inside, points on the top and
/// right edges are outside.
pub fn point_in_polygon(point: &Point2<f64>, polygon: &[Point2<f64>]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    polygon
        .iter()
        .circular_tuple_windows()
        .filter(|(a, b)| {
            (a.y > point.y) != (b.y > point.y)
                && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        })
        .count()
        % 2
        == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::{flat_material, sample_wall, sample_window, square_surface};
    use crate::model::{square_meters, OpeningParent};
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use proptest::prelude::prop;
    use test_case::test_case;
    use test_strategy::proptest;
    use uom::si::{f64::Length, length::meter};

    fn constituent_sum(segment: &Segment) -> f64 {
        segment
            .constituents
            .iter()
            .map(|c| square_meters(c.area))
            .sum()
    }

    #[test]
    fn division_points() {
        assert_eq!(divisions(1), vec![0.0, 1.0]);
        assert_eq!(divisions(0), vec![0.0, 1.0]);
        assert_eq!(divisions(4), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(divisions(3).len(), 4);
    }

    #[test_case(2.0, 2.0, true; "centre")]
    #[test_case(5.0, 5.0, false; "outside")]
    #[test_case(-0.1, 2.0, false; "left of")]
    #[test_case(2.0, 0.0, true; "bottom edge")]
    #[test_case(0.0, 2.0, true; "left edge")]
    #[test_case(2.0, 4.0, false; "top edge")]
    #[test_case(4.0, 2.0, false; "right edge")]
    fn square_membership(x: f64, z: f64, expected: bool) {
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
        ];
        assert_eq!(point_in_polygon(&Point2::new(x, z), &square), expected);
    }

    #[test]
    fn concave_polygon_membership() {
        // L shape missing its upper right quarter
        let l_shape = [
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 4.0),
            Point2::new(0.0, 4.0),
        ];
        assert!(point_in_polygon(&Point2::new(1.0, 3.0), &l_shape));
        assert!(point_in_polygon(&Point2::new(3.0, 1.0), &l_shape));
        assert!(!point_in_polygon(&Point2::new(3.0, 3.0), &l_shape));
    }

    #[test]
    fn degenerate_polygon_contains_nothing() {
        let line = [Point2::new(0.0, 0.0), Point2::new(4.0, 0.0)];
        assert!(!point_in_polygon(&Point2::new(2.0, 0.0), &line));
    }

    #[test]
    fn plain_wall_is_one_constituent_per_cell() {
        let wall = sample_wall(Arc::new(flat_material("brick", 40.0)));

        let segments = Segmenter::default().segment_wall(0, &wall, &[]);

        assert_eq!(segments.len(), 3);
        for segment in segments.iter() {
            assert_matches!(segment.constituents.as_slice(), [Constituent { kind: ConstituentKind::Wall, area, .. }] => {
                assert_relative_eq!(square_meters(*area), 4.0, epsilon = 1e-9);
            });
        }
    }

    #[test]
    fn window_splits_into_overlapping_cells() {
        let wall = sample_wall(Arc::new(flat_material("brick", 40.0)));
        // 0.8 m wide, centred at 1/3 of the wall: straddles the first division
        let window = sample_window(Arc::new(flat_material("glass", 25.0)), 1.0 / 3.0, 0.8, 1.2);

        let segments = Segmenter::default().segment_wall(0, &wall, &[&window]);

        assert_eq!(segments.len(), 3);
        let window_areas: Vec<f64> = segments
            .iter()
            .map(|s| {
                s.constituents
                    .iter()
                    .filter(|c| matches!(c.kind, ConstituentKind::Opening(_)))
                    .map(|c| square_meters(c.area))
                    .sum()
            })
            .collect();
        assert_relative_eq!(window_areas[0], 0.48, epsilon = 1e-9);
        assert_relative_eq!(window_areas[1], 0.48, epsilon = 1e-9);
        assert_relative_eq!(window_areas[2], 0.0, epsilon = 1e-9);
        let total: f64 = segments.iter().map(|s| square_meters(s.area)).sum();
        assert_relative_eq!(total, 12.0, epsilon = 1e-9);
    }

    #[test]
    fn overlapping_openings_never_exceed_cell_area() {
        let wall = sample_wall(Arc::new(flat_material("brick", 40.0)));
        let mut first = sample_window(Arc::new(flat_material("glass", 25.0)), 0.5, 1.2, 3.0);
        first.bottom_offset = Length::new::<meter>(0.0);
        let second = first.clone();

        let segments = Segmenter::default().segment_wall(0, &wall, &[&first, &second]);

        assert_eq!(segments.len(), 3);
        for segment in segments.iter() {
            assert_relative_eq!(square_meters(segment.area), 4.0, epsilon = 1e-9);
            assert_relative_eq!(constituent_sum(segment), 4.0, epsilon = 1e-9);
        }
        // the middle cell is covered twice over by 3.6 m² of glass
        assert_matches!(segments[1].constituents.as_slice(), [a, b] => {
            assert!(matches!(a.kind, ConstituentKind::Opening(_)));
            assert_relative_eq!(square_meters(a.area), 2.0, epsilon = 1e-9);
            assert_relative_eq!(square_meters(b.area), 2.0, epsilon = 1e-9);
        });
        let total: f64 = segments.iter().map(|s| square_meters(s.area)).sum();
        assert_relative_eq!(total, 12.0, epsilon = 1e-9);
    }

    #[test]
    fn opening_outside_wall_is_ignored() {
        let wall = sample_wall(Arc::new(flat_material("brick", 40.0)));
        let window = sample_window(Arc::new(flat_material("glass", 25.0)), 3.0, 1.0, 1.0);

        let segments = Segmenter::default().segment_wall(0, &wall, &[&window]);

        assert!(segments.iter().all(|s| s.constituents.len() == 1));
    }

    #[test]
    fn zero_length_wall_has_no_segments() {
        let mut wall = sample_wall(Arc::new(flat_material("brick", 40.0)));
        wall.end = wall.start;
        assert!(Segmenter::default().segment_wall(0, &wall, &[]).is_empty());
    }

    #[test]
    fn wall_geometry() {
        let wall = sample_wall(Arc::new(flat_material("brick", 40.0)));

        let segments = Segmenter::new(SegmentationConfig {
            horizontal_divisions: 2,
            vertical_divisions: 3,
            ..Default::default()
        })
        .segment_wall(0, &wall, &[]);

        assert_eq!(segments.len(), 6);
        let first = &segments[0].geometry;
        assert_relative_eq!(first.corners[0], Point3::new(0.0, 0.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(first.corners[2], Point3::new(2.0, 1.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(first.center, Point3::new(1.0, 0.5, 0.0), epsilon = 1e-9);
        assert_relative_eq!(first.normal, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-9);
    }

    #[test]
    fn square_floor_keeps_all_cells() {
        let floor = Surface {
            elevation: Length::new::<meter>(0.0),
            ..square_surface(Arc::new(flat_material("slab", 55.0)))
        };
        let parent = ElementRef::new(ElementKind::Floor, 0);

        let segments = Segmenter::default().segment_surface(parent, &floor, &[]);

        assert_eq!(segments.len(), 9);
        assert!(segments.iter().all(|s| s.parent == parent));
        assert_relative_eq!(segments[0].geometry.normal, Vector3::new(0.0, -1.0, 0.0));
        let total: f64 = segments.iter().map(|s| square_meters(s.area)).sum();
        assert_relative_eq!(total, 16.0, epsilon = 1e-9);
    }

    #[test]
    fn triangular_ceiling_drops_outside_cells() {
        let mut ceiling = square_surface(Arc::new(flat_material("slab", 55.0)));
        ceiling.polygon = vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(0.0, 3.0),
        ];

        let segments = Segmenter::default().segment_surface(
            ElementRef::new(ElementKind::Ceiling, 0),
            &ceiling,
            &[],
        );

        // cell centres at 0.5, 1.5, 2.5 on each axis; inside where x + z < 3
        assert_eq!(segments.len(), 3);
        assert!(segments.iter().all(|s| {
            let c = s.geometry.center;
            c.x + c.z < 3.0 && c.y == 3.0
        }));
    }

    #[test]
    fn skylight_in_ceiling() {
        let ceiling = square_surface(Arc::new(flat_material("slab", 55.0)));
        let mut skylight = sample_window(Arc::new(flat_material("glass", 25.0)), 0.5, 1.0, 1.0);
        skylight.parent = OpeningParent::Ceiling(0);
        skylight.kind = OpeningKind::Skylight;

        let segments = Segmenter::default().segment_surface(
            ElementRef::new(ElementKind::Ceiling, 0),
            &ceiling,
            &[&skylight],
        );

        let centre = segments
            .iter()
            .find(|s| s.u.0 < 0.5 && s.u.1 > 0.5 && s.v.0 < 0.5 && s.v.1 > 0.5)
            .unwrap();
        assert_matches!(centre.constituents.as_slice(), [
            Constituent { kind: ConstituentKind::Opening(OpeningKind::Skylight), area: a, .. },
            Constituent { kind: ConstituentKind::Ceiling, area: b, .. },
        ] => {
            assert_relative_eq!(square_meters(*a), 1.0, epsilon = 1e-9);
            assert_relative_eq!(square_meters(*b), 16.0 / 9.0 - 1.0, epsilon = 1e-9);
        });
    }

    #[test]
    fn too_few_vertices() {
        let mut floor = square_surface(Arc::new(flat_material("slab", 55.0)));
        floor.polygon.truncate(2);
        assert!(Segmenter::default()
            .segment_surface(ElementRef::new(ElementKind::Floor, 0), &floor, &[])
            .is_empty());
    }

    #[proptest]
    fn wall_area_is_conserved(
        wall: Wall,
        #[strategy(0.05f64..0.95f64)] position: f64,
        #[strategy(0.1f64..3f64)] width: f64,
        #[strategy(0.1f64..3f64)] height: f64,
        #[strategy(1usize..8)] columns: usize,
        #[strategy(1usize..4)] rows: usize,
    ) {
        let mut window = sample_window(Arc::new(flat_material("glass", 20.0)), position, width, height);
        window.bottom_offset = Length::new::<meter>(0.0);
        let segmenter = Segmenter::new(SegmentationConfig {
            horizontal_divisions: columns,
            vertical_divisions: rows,
            ..Default::default()
        });

        let segments = segmenter.segment_wall(0, &wall, &[&window]);

        for segment in segments.iter() {
            let sum = constituent_sum(segment);
            let area = square_meters(segment.area);
            assert!((sum - area).abs() <= 1e-6 * area.max(1.0));
        }
        let total: f64 = segments.iter().map(|s| square_meters(s.area)).sum();
        let gross = square_meters(wall.gross_area());
        assert!(total <= gross + 1e-6);
        assert!(total >= gross - segments.len() as f64 * segmenter.config().min_residual_area - 1e-6);
    }

    #[proptest]
    fn cells_outside_polygon_are_dropped(
        #[strategy(prop::collection::vec((-10f64..10f64, -10f64..10f64), 3..8))] points: Vec<(f64, f64)>,
    ) {
        let mut floor = square_surface(Arc::new(flat_material("slab", 55.0)));
        floor.polygon = points.iter().map(|&(x, z)| Point2::new(x, z)).collect();

        let segments = Segmenter::default().segment_surface(
            ElementRef::new(ElementKind::Floor, 0),
            &floor,
            &[],
        );

        for segment in segments.iter() {
            let c = segment.geometry.center;
            assert!(point_in_polygon(&Point2::new(c.x, c.z), &floor.polygon));
        }
    }

    #[proptest]
    fn surface_area_is_conserved(
        #[strategy(prop::collection::vec((-10f64..10f64, -10f64..10f64), 3..8))] points: Vec<(f64, f64)>,
        #[strategy(0f64..1f64)] position: f64,
        #[strategy(0f64..1f64)] depth_position: f64,
        #[strategy(0.1f64..6f64)] width: f64,
        #[strategy(0.1f64..6f64)] depth: f64,
        #[strategy(1usize..6)] divisions: usize,
    ) {
        let mut ceiling = square_surface(Arc::new(flat_material("slab", 55.0)));
        ceiling.polygon = points.iter().map(|&(x, z)| Point2::new(x, z)).collect();
        let mut skylight = sample_window(Arc::new(flat_material("glass", 25.0)), position, width, depth);
        skylight.parent = OpeningParent::Ceiling(0);
        skylight.depth_position = depth_position;
        let segmenter = Segmenter::new(SegmentationConfig {
            surface_divisions: divisions,
            ..Default::default()
        });

        let segments = segmenter.segment_surface(
            ElementRef::new(ElementKind::Ceiling, 0),
            &ceiling,
            &[&skylight],
        );

        for segment in segments.iter() {
            let sum = constituent_sum(segment);
            let area = square_meters(segment.area);
            assert!((sum - area).abs() <= 1e-6 * area.max(1.0));
        }
        let total: f64 = segments.iter().map(|s| square_meters(s.area)).sum();
        let bounding_area = ceiling
            .bounding_box()
            .map_or(0.0, |(min, max)| (max.x - min.x) * (max.y - min.y));
        assert!(total <= bounding_area + 1e-6);
    }
}
