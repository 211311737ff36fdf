use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use multimap::MultiMap;
use nalgebra::Point2;
use serde::Deserialize;
use uom::si::{
    area::square_meter,
    f64::{Area, Length},
    length::meter,
};

use crate::bands::Bands;

#[cfg(test)]
use proptest::{
    arbitrary::Arbitrary,
    strategy::{BoxedStrategy, Strategy},
};

/// Building envelope as supplied by the surrounding application.
///
/// Plan coordinates are `(x, z)` stored in a `Point2`, elevation is the
/// vertical `y` axis.
#[derive(Clone, Debug)]
pub struct Building {
    pub materials: HashMap<String, Arc<AcousticMaterial>>,
    pub walls: Vec<Wall>,
    pub openings: Vec<Opening>,
    pub floors: Vec<Surface>,
    pub ceilings: Vec<Surface>,
}

impl Building {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let string = fs::read_to_string(path)?;
        Self::from_json(&string)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let loaded: as_loaded::Building = json5::from_str(json)?;
        let converted = loaded.try_into()?;
        Ok(converted)
    }

    pub fn element_count(&self) -> usize {
        self.walls.len() + self.openings.len() + self.floors.len() + self.ceilings.len()
    }

    pub fn has_element(&self, element: ElementRef) -> bool {
        let count = match element.kind {
            ElementKind::Wall => self.walls.len(),
            ElementKind::Opening => self.openings.len(),
            ElementKind::Floor => self.floors.len(),
            ElementKind::Ceiling => self.ceilings.len(),
        };
        element.index < count
    }

    /// Group openings by the element they puncture.
    /// Openings that reference a non-existent parent are left out.
    pub fn openings_by_parent(&self) -> MultiMap<ElementRef, &Opening> {
        let mut grouped = MultiMap::new();
        for (index, opening) in self.openings.iter().enumerate() {
            let parent = opening.parent.element_ref();
            if !self.has_element(parent) {
                log::warn!(
                    "Opening {} references missing {}, ignoring it",
                    index,
                    parent
                );
                continue;
            }
            grouped.insert(parent, opening);
        }
        grouped
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Wall,
    Opening,
    Floor,
    Ceiling,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Wall => "wall",
            ElementKind::Opening => "opening",
            ElementKind::Floor => "floor",
            ElementKind::Ceiling => "ceiling",
        };
        write!(f, "{name}")
    }
}

/// Position of an element in its building list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementRef {
    pub kind: ElementKind,
    pub index: usize,
}

impl ElementRef {
    pub fn new(kind: ElementKind, index: usize) -> Self {
        ElementRef { kind, index }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.index)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Wall {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    pub height: Length,
    pub base_elevation: Length,
    pub material: Arc<AcousticMaterial>,
    pub condition: Condition,
}

impl Wall {
    pub fn length(&self) -> Length {
        Length::new::<meter>((self.end - self.start).norm())
    }

    pub fn gross_area(&self) -> Area {
        self.length() * self.height
    }

    /// Plan point at fraction `t` of the way from start to end.
    pub fn point_at(&self, t: f64) -> Point2<f64> {
        self.start + (self.end - self.start) * t
    }
}

#[cfg(test)]
impl Arbitrary for Wall {
    type Parameters = ();
    type Strategy = BoxedStrategy<Wall>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (
            (-50f64..50f64, -50f64..50f64),
            (0f64..std::f64::consts::TAU, 0.5f64..30f64),
            0.5f64..10f64,
            AcousticMaterial::arbitrary(),
        )
            .prop_map(|((x, z), (angle, length), height, material)| {
                let start = Point2::new(x, z);
                Wall {
                    start,
                    end: Point2::new(x + length * angle.cos(), z + length * angle.sin()),
                    height: Length::new::<meter>(height),
                    base_elevation: Length::new::<meter>(0.0),
                    material: Arc::new(material),
                    condition: Condition::Good,
                }
            })
            .boxed()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpeningKind {
    Window,
    Door,
    Vent,
    Skylight,
    Hatch,
    Other,
}

impl From<String> for OpeningKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "window" => OpeningKind::Window,
            "door" => OpeningKind::Door,
            "vent" => OpeningKind::Vent,
            "skylight" => OpeningKind::Skylight,
            "hatch" => OpeningKind::Hatch,
            _ => OpeningKind::Other,
        }
    }
}

impl fmt::Display for OpeningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpeningKind::Window => "window",
            OpeningKind::Door => "door",
            OpeningKind::Vent => "vent",
            OpeningKind::Skylight => "skylight",
            OpeningKind::Hatch => "hatch",
            OpeningKind::Other => "opening",
        };
        write!(f, "{name}")
    }
}

/// The element an opening punctures, by index into the building lists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpeningParent {
    Wall(usize),
    Floor(usize),
    Ceiling(usize),
}

impl OpeningParent {
    pub fn element_ref(self) -> ElementRef {
        match self {
            OpeningParent::Wall(i) => ElementRef::new(ElementKind::Wall, i),
            OpeningParent::Floor(i) => ElementRef::new(ElementKind::Floor, i),
            OpeningParent::Ceiling(i) => ElementRef::new(ElementKind::Ceiling, i),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Opening {
    pub kind: OpeningKind,
    pub parent: OpeningParent,
    /// Centre of the opening as a fraction of the parent's length
    /// (walls) or bounding box width (floors/ceilings).
    pub position: f64,
    /// Centre as a fraction of the bounding box depth, floors/ceilings only.
    pub depth_position: f64,
    pub width: Length,
    /// Vertical size in a wall, extent along the depth axis in a floor/ceiling.
    pub height: Length,
    pub bottom_offset: Length,
    pub material: Arc<AcousticMaterial>,
    pub condition: Condition,
}

impl Opening {
    pub fn area(&self) -> Area {
        self.width * self.height
    }
}

/// Floor or ceiling slab.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    pub polygon: Vec<Point2<f64>>,
    pub elevation: Length,
    pub material: Arc<AcousticMaterial>,
    pub condition: Condition,
}

impl Surface {
    /// Axis aligned plan bounding box as (min, max), `None` for an empty polygon.
    pub fn bounding_box(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        let first = self.polygon.first()?;
        Some(self.polygon.iter().fold((*first, *first), |(min, max), p| {
            (
                Point2::new(min.x.min(p.x), min.y.min(p.y)),
                Point2::new(max.x.max(p.x), max.y.max(p.y)),
            )
        }))
    }
}

/// Physical state of an element, scaling its sound reduction index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Condition {
    Excellent,
    Good,
    Fair,
    Poor,
    Damaged,
    ClosedSealed,
    ClosedUnsealed,
    PartiallyOpen,
    FullyOpen,
    Unknown,
}

impl Condition {
    /// Multiplier applied to every band value, always in (0, 1].
    pub fn factor(self) -> f64 {
        match self {
            Condition::Excellent => 1.0,
            Condition::Good => 0.9,
            Condition::Fair => 0.75,
            Condition::Poor => 0.6,
            Condition::Damaged => 0.5,
            Condition::ClosedSealed => 1.0,
            Condition::ClosedUnsealed => 0.7,
            Condition::PartiallyOpen => 0.3,
            Condition::FullyOpen => 0.1,
            Condition::Unknown => 0.8,
        }
    }
}

impl From<String> for Condition {
    fn from(value: String) -> Self {
        match value.as_str() {
            "excellent" => Condition::Excellent,
            "good" => Condition::Good,
            "fair" => Condition::Fair,
            "poor" => Condition::Poor,
            "damaged" => Condition::Damaged,
            "closed_sealed" => Condition::ClosedSealed,
            "closed_unsealed" => Condition::ClosedUnsealed,
            "partially_open" => Condition::PartiallyOpen,
            "fully_open" => Condition::FullyOpen,
            _ => Condition::Unknown,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Condition::Excellent => "excellent",
            Condition::Good => "good",
            Condition::Fair => "fair",
            Condition::Poor => "poor",
            Condition::Damaged => "damaged",
            Condition::ClosedSealed => "closed_sealed",
            Condition::ClosedUnsealed => "closed_unsealed",
            Condition::PartiallyOpen => "partially_open",
            Condition::FullyOpen => "fully_open",
            Condition::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

/// Single number rating per ISO 717-1.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct WeightedRating {
    pub rw: f64,
    #[serde(default)]
    pub c: f64,
    #[serde(default)]
    pub ctr: f64,
}

/// Sound reduction data of an assembly.
///
/// Octave bands are either given or derived once from the third-octave data
/// and cached, see `bands::determine_frequency_bands`.
#[derive(Clone, Debug, PartialEq)]
pub struct AcousticMaterial {
    pub name: String,
    pub third_octave: Bands,
    octave: OnceLock<Bands>,
    pub rating: Option<WeightedRating>,
}

impl AcousticMaterial {
    pub fn new(
        name: String,
        third_octave: Bands,
        octave: Option<Bands>,
        rating: Option<WeightedRating>,
    ) -> Self {
        let cell = OnceLock::new();
        if let Some(octave) = octave {
            let _ = cell.set(octave);
        }
        AcousticMaterial {
            name,
            third_octave,
            octave: cell,
            rating,
        }
    }

    pub fn octave(&self) -> Option<&Bands> {
        self.octave.get()
    }

    /// Store derived octave bands unless some are already present.
    pub fn cache_octave(&self, bands: Bands) -> &Bands {
        self.octave.get_or_init(|| bands)
    }
}

#[cfg(test)]
impl Arbitrary for AcousticMaterial {
    type Parameters = ();
    type Strategy = BoxedStrategy<AcousticMaterial>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        ("[a-z]*", 1f64..80f64)
            .prop_map(|(name, r)| {
                AcousticMaterial::new(
                    name,
                    Bands::flat(crate::bands::BandType::ThirdOctave, r),
                    None,
                    None,
                )
            })
            .boxed()
    }
}

pub(crate) fn square_meters(area: Area) -> f64 {
    area.get::<square_meter>()
}

pub(crate) fn meters(length: Length) -> f64 {
    length.get::<meter>()
}

fn get<V>(h: &HashMap<String, Arc<V>>, key: &str, label: &str) -> anyhow::Result<Arc<V>> {
    Ok(Arc::clone(h.get(key).ok_or_else(|| {
        anyhow::anyhow!("Could not find {} {:?}", label, key)
    })?))
}

impl TryFrom<as_loaded::Building> for Building {
    type Error = anyhow::Error;
    fn try_from(value: as_loaded::Building) -> Result<Self, Self::Error> {
        let materials = value
            .materials
            .into_iter()
            .map(|(name, material)| Ok((name.clone(), Arc::new(material.convert(name)?))))
            .collect::<anyhow::Result<HashMap<_, _>>>()?;

        let walls = value
            .walls
            .into_iter()
            .map(|wall| wall.convert(&materials))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let openings = value
            .openings
            .into_iter()
            .enumerate()
            .map(|(index, opening)| opening.convert(index, &materials))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let floors = value
            .floors
            .into_iter()
            .map(|floor| floor.convert(&materials))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let ceilings = value
            .ceilings
            .into_iter()
            .map(|ceiling| ceiling.convert(&materials))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Building {
            materials,
            walls,
            openings,
            floors,
            ceilings,
        })
    }
}

mod as_loaded {
    use std::collections::HashMap;
    use std::sync::Arc;

    use nalgebra::Point2;
    use serde::Deserialize;
    use uom::si::{f64::Length, length::meter};

    use super::{get, Condition, OpeningKind, OpeningParent, WeightedRating};
    use crate::bands::{BandType, Bands};

    #[derive(Clone, Debug, Deserialize)]
    pub struct Building {
        pub materials: HashMap<String, Material>,
        #[serde(default)]
        pub walls: Vec<Wall>,
        #[serde(default)]
        pub openings: Vec<Opening>,
        #[serde(default)]
        pub floors: Vec<Surface>,
        #[serde(default)]
        pub ceilings: Vec<Surface>,
    }

    #[derive(Clone, Debug, Deserialize, PartialEq)]
    pub struct Material {
        #[serde(default)]
        pub third_octave: HashMap<String, f64>,
        #[serde(default)]
        pub octave: Option<HashMap<String, f64>>,
        #[serde(default)]
        pub rating: Option<WeightedRating>,
    }

    impl Material {
        pub fn convert(self, name: String) -> anyhow::Result<super::AcousticMaterial> {
            let third_octave = parse_bands(&name, BandType::ThirdOctave, self.third_octave)?;
            let octave = self
                .octave
                .map(|octave| parse_bands(&name, BandType::Octave, octave))
                .transpose()?;
            Ok(super::AcousticMaterial::new(
                name,
                third_octave,
                octave,
                self.rating,
            ))
        }
    }

    fn parse_bands(
        name: &str,
        band_type: BandType,
        raw: HashMap<String, f64>,
    ) -> anyhow::Result<Bands> {
        let pairs = raw
            .into_iter()
            .map(|(frequency, value)| {
                let frequency = frequency.trim().parse::<u32>().map_err(|_| {
                    anyhow::anyhow!("Material {:?} has non-numeric band {:?}", name, frequency)
                })?;
                Ok((frequency, value))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Bands::from_pairs(band_type, pairs)
            .map_err(|e| anyhow::anyhow!("Material {:?}: {}", name, e))
    }

    #[derive(Clone, Debug, Deserialize, PartialEq)]
    pub struct Wall {
        pub start: [f64; 2],
        pub end: [f64; 2],
        pub height: Length,
        #[serde(default = "zero")]
        pub base_elevation: Length,
        pub material: String,
        #[serde(default)]
        pub condition: Option<Condition>,
    }

    impl Wall {
        pub fn convert(
            self,
            materials: &HashMap<String, Arc<super::AcousticMaterial>>,
        ) -> anyhow::Result<super::Wall> {
            Ok(super::Wall {
                start: Point2::from(self.start),
                end: Point2::from(self.end),
                height: self.height,
                base_elevation: self.base_elevation,
                material: get(materials, &self.material, "material")?,
                condition: self.condition.unwrap_or(Condition::Good),
            })
        }
    }

    #[derive(Clone, Debug, Deserialize, PartialEq)]
    pub struct Opening {
        #[serde(rename = "type", default = "default_opening_kind")]
        pub kind: OpeningKind,
        #[serde(default)]
        pub wall_index: Option<usize>,
        #[serde(default)]
        pub floor_index: Option<usize>,
        #[serde(default)]
        pub ceiling_index: Option<usize>,
        #[serde(default = "centre")]
        pub position: f64,
        #[serde(default = "centre")]
        pub depth_position: f64,
        pub width: Length,
        pub height: Length,
        #[serde(default = "zero")]
        pub bottom_offset: Length,
        pub material: String,
        #[serde(default)]
        pub condition: Option<Condition>,
    }

    fn default_opening_kind() -> OpeningKind {
        OpeningKind::Window
    }

    fn centre() -> f64 {
        0.5
    }

    fn zero() -> Length {
        Length::new::<meter>(0.0)
    }

    impl Opening {
        pub fn convert(
            self,
            index: usize,
            materials: &HashMap<String, Arc<super::AcousticMaterial>>,
        ) -> anyhow::Result<super::Opening> {
            let parent = match (self.wall_index, self.floor_index, self.ceiling_index) {
                (Some(i), None, None) => OpeningParent::Wall(i),
                (None, Some(i), None) => OpeningParent::Floor(i),
                (None, None, Some(i)) => OpeningParent::Ceiling(i),
                _ => anyhow::bail!(
                    "Opening {} needs exactly one of wall_index, floor_index, ceiling_index",
                    index
                ),
            };
            Ok(super::Opening {
                kind: self.kind,
                parent,
                position: self.position,
                depth_position: self.depth_position,
                width: self.width,
                height: self.height,
                bottom_offset: self.bottom_offset,
                material: get(materials, &self.material, "material")?,
                condition: self.condition.unwrap_or(Condition::ClosedSealed),
            })
        }
    }

    impl<'de> Deserialize<'de> for OpeningKind {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            String::deserialize(deserializer).map(OpeningKind::from)
        }
    }

    #[derive(Clone, Debug, Deserialize, PartialEq)]
    pub struct Surface {
        pub polygon: Vec<[f64; 2]>,
        #[serde(default = "zero")]
        pub elevation: Length,
        pub material: String,
        #[serde(default)]
        pub condition: Option<Condition>,
    }

    impl Surface {
        pub fn convert(
            self,
            materials: &HashMap<String, Arc<super::AcousticMaterial>>,
        ) -> anyhow::Result<super::Surface> {
            Ok(super::Surface {
                polygon: self.polygon.into_iter().map(Point2::from).collect(),
                elevation: self.elevation,
                material: get(materials, &self.material, "material")?,
                condition: self.condition.unwrap_or(Condition::Good),
            })
        }
    }
}
