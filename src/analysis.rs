use std::fmt;

use uom::si::{area::square_meter, f64::Area};

use crate::bands::BandType;
use crate::model::{AcousticMaterial, Building, Condition, ElementKind, ElementRef};
use crate::transmission::{
    calc_area_reduction, calc_average_transmission_loss, calc_effective_transmission_loss,
    element_bands,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Remediation cost per m² of affected element.
    pub fn cost_rate(self) -> f64 {
        match self {
            Severity::Low => 15.0,
            Severity::Medium => 45.0,
            Severity::High => 120.0,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Issue {
    pub severity: Severity,
    pub description: String,
    pub remediation: String,
}

impl Issue {
    fn new(severity: Severity, description: &str, remediation: &str) -> Self {
        Issue {
            severity,
            description: description.into(),
            remediation: remediation.into(),
        }
    }
}

/// Single-number summary of one wall or opening.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementAnalysis {
    pub element: ElementRef,
    /// Net area: walls exclude their openings.
    pub area: Area,
    pub condition: Condition,
    pub average_loss: f64,
    pub area_reduction: f64,
    pub openings_penalty: f64,
    pub effective_loss: f64,
    pub issues: Vec<Issue>,
    pub estimated_cost: f64,
}

/// Extra loss of insulation caused by the state of an opening, in dB.
pub fn opening_penalty(condition: Condition) -> f64 {
    match condition {
        Condition::ClosedUnsealed => 3.0,
        Condition::PartiallyOpen => 8.0,
        Condition::FullyOpen => 15.0,
        Condition::Damaged => 6.0,
        Condition::Unknown => 2.0,
        _ => 0.0,
    }
}

fn condition_issue(kind: ElementKind, condition: Condition) -> Option<Issue> {
    match (kind, condition) {
        (_, Condition::Unknown) => Some(Issue::new(
            Severity::Low,
            "Condition is unknown",
            "Inspect the element",
        )),
        (ElementKind::Opening, Condition::ClosedUnsealed) => Some(Issue::new(
            Severity::Medium,
            "Seals are missing or worn",
            "Replace seals and gaskets",
        )),
        (ElementKind::Opening, Condition::PartiallyOpen) => Some(Issue::new(
            Severity::Medium,
            "Opening is left partially open",
            "Keep closed during noisy periods or fit a restrictor",
        )),
        (ElementKind::Opening, Condition::FullyOpen) => Some(Issue::new(
            Severity::High,
            "Opening is fully open",
            "Close it or fit an acoustic vent",
        )),
        (ElementKind::Opening, Condition::Damaged) => Some(Issue::new(
            Severity::High,
            "Opening is damaged",
            "Replace with an acoustically rated unit",
        )),
        (_, Condition::Fair) => Some(Issue::new(
            Severity::Low,
            "Wear is starting to show",
            "Monitor and maintain joints",
        )),
        (_, Condition::Poor) => Some(Issue::new(
            Severity::Medium,
            "Element is in poor condition",
            "Repair cracks and seal joints",
        )),
        (_, Condition::Damaged) => Some(Issue::new(
            Severity::High,
            "Element is damaged",
            "Rebuild or add an insulating lining",
        )),
        _ => None,
    }
}

/// Average loss of a material in a given condition, falling back to the
/// weighted rating Rw + C when there is no band data.
fn average_loss(
    material: &AcousticMaterial,
    condition: Condition,
    band_type: BandType,
    representative_bands: &[u32],
    issues: &mut Vec<Issue>,
) -> f64 {
    if let Some(bands) = element_bands(material, condition, band_type) {
        return calc_average_transmission_loss(&bands, representative_bands);
    }
    match material.rating {
        Some(rating) => {
            issues.push(Issue::new(
                Severity::Low,
                "Only a single-number rating is available",
                "Obtain frequency band test data",
            ));
            (rating.rw + rating.c) * condition.factor()
        }
        None => {
            issues.push(Issue::new(
                Severity::High,
                "No acoustic data, counted as fully transmitting",
                "Obtain test data for the material",
            ));
            0.0
        }
    }
}

fn finish(
    element: ElementRef,
    area: Area,
    condition: Condition,
    average_loss: f64,
    area_reduction: f64,
    openings_penalty: f64,
    mut issues: Vec<Issue>,
) -> ElementAnalysis {
    let effective_loss =
        calc_effective_transmission_loss(average_loss, area_reduction, openings_penalty);
    if effective_loss < 20.0 {
        issues.push(Issue::new(
            Severity::High,
            "Very low effective sound insulation",
            "Upgrade the assembly or add secondary glazing/lining",
        ));
    } else if effective_loss < 30.0 {
        issues.push(Issue::new(
            Severity::Medium,
            "Low effective sound insulation",
            "Consider upgrading the assembly",
        ));
    }
    let estimated_cost = issues
        .iter()
        .map(|issue| issue.severity.cost_rate() * area.get::<square_meter>())
        .sum();

    ElementAnalysis {
        element,
        area,
        condition,
        average_loss,
        area_reduction,
        openings_penalty,
        effective_loss,
        issues,
        estimated_cost,
    }
}

/// Analysis records for every wall and every opening with a valid parent.
pub fn analyze_elements(
    building: &Building,
    band_type: BandType,
    representative_bands: &[u32],
) -> Vec<ElementAnalysis> {
    let by_parent = building.openings_by_parent();

    let walls = building.walls.iter().enumerate().map(|(index, wall)| {
        let element = ElementRef::new(ElementKind::Wall, index);
        let wall_openings = by_parent.get_vec(&element).map_or(&[][..], Vec::as_slice);
        let opening_area = Area::new::<square_meter>(
            wall_openings
                .iter()
                .map(|o| o.area().get::<square_meter>())
                .sum::<f64>(),
        );
        let net_area = Area::new::<square_meter>(
            (wall.gross_area() - opening_area)
                .get::<square_meter>()
                .max(0.0),
        );

        let mut issues: Vec<Issue> = condition_issue(ElementKind::Wall, wall.condition)
            .into_iter()
            .collect();
        let average = average_loss(
            &wall.material,
            wall.condition,
            band_type,
            representative_bands,
            &mut issues,
        );
        finish(
            element,
            net_area,
            wall.condition,
            average,
            calc_area_reduction(opening_area),
            wall_openings.iter().map(|o| opening_penalty(o.condition)).sum(),
            issues,
        )
    });

    let openings = building
        .openings
        .iter()
        .enumerate()
        .filter(|(_, opening)| building.has_element(opening.parent.element_ref()))
        .map(|(index, opening)| {
            let mut issues: Vec<Issue> = condition_issue(ElementKind::Opening, opening.condition)
                .into_iter()
                .collect();
            let average = average_loss(
                &opening.material,
                opening.condition,
                band_type,
                representative_bands,
                &mut issues,
            );
            finish(
                ElementRef::new(ElementKind::Opening, index),
                opening.area(),
                opening.condition,
                average,
                calc_area_reduction(opening.area()),
                opening_penalty(opening.condition),
                issues,
            )
        });

    walls.chain(openings).collect()
}
