use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use uom::si::{area::square_meter, f64::Length, length::meter};

use facade_acoustics::config::AnalysisConfig;
use facade_acoustics::facade::analyze_building;
use facade_acoustics::model::Building;

/// Sound transmission through a building envelope
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Building model (JSON5)
    #[arg(short, long, default_value = "model.json5")]
    model: PathBuf,

    /// Analysis configuration (JSON5), defaults are used if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Receiver distance in m, overrides the configuration
    #[arg(short, long)]
    distance: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let building = Building::load(&args.model)
        .with_context(|| format!("Failed to load model {:?}", args.model))?;
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("Failed to load configuration {:?}", path))?,
        None => AnalysisConfig::default(),
    };
    if let Some(distance) = args.distance {
        config.receiver_distance = Some(Length::new::<meter>(distance));
    }
    log::info!(
        "Loaded {} elements, {} materials",
        building.element_count(),
        building.materials.len()
    );

    let analysis = analyze_building(&building, &config)?;

    println!(
        "Band resolution: {} ({} elements missing data)",
        analysis.frequencies.band_type,
        analysis.missing_data_count()
    );
    println!("{:>8} {:>10} {:>10}", "Hz", "Lw [dB]", "Lp [dB]");
    for &frequency in &analysis.frequencies.frequencies {
        let lw = analysis.lw.get(frequency).unwrap_or(f64::NEG_INFINITY);
        let lp = analysis
            .lp_exterior
            .as_ref()
            .and_then(|lp| lp.get(frequency))
            .map_or_else(|| "-".to_string(), |lp| format!("{lp:.1}"));
        println!("{frequency:>8} {lw:>10.1} {lp:>10}");
    }

    for element in &analysis.elements {
        println!(
            "{}: {:.2} m², {}, effective loss {:.1} dB, cost {:.0}",
            element.element,
            element.area.get::<square_meter>(),
            element.condition,
            element.effective_loss,
            element.estimated_cost
        );
        for issue in &element.issues {
            println!(
                "    [{}] {}: {}",
                issue.severity, issue.description, issue.remediation
            );
        }
    }

    println!(
        "{} heatmap points, {} segment points",
        analysis.heatmap.len(),
        analysis.segment_heatmap.len()
    );

    Ok(())
}
