use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;

use rusty_press::analysis::pipeline::{AnalysisReport, CycleStages};
use rusty_press::data::loader::load_file;
use rusty_press::data::model::{CycleStaticResult, WindowPoint, WindowedModulus};
use rusty_press::{AnalysisConfig, SpecimenGeometry, analyze};

#[derive(Parser)]
#[command(name = "rusty-press", about = "Elastic modulus from cyclic compression recordings")]
struct Cli {
    /// Recording exported by the rig (tab-separated .txt or ;-separated .csv).
    file: PathBuf,

    /// Initial specimen height (mm).
    #[arg(long)]
    height: f64,

    /// Width of a rectangular specimen (mm).
    #[arg(long, requires = "length", conflicts_with = "diameter")]
    width: Option<f64>,

    /// Length of a rectangular specimen (mm).
    #[arg(long, requires = "width")]
    length: Option<f64>,

    /// Diameter of a circular specimen (mm).
    #[arg(long)]
    diameter: Option<f64>,

    /// JSON file with analysis parameters.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn geometry(&self) -> Result<SpecimenGeometry> {
        match (self.width, self.length, self.diameter) {
            (Some(width), Some(length), None) => Ok(SpecimenGeometry::Rectangular {
                width,
                length,
                height: self.height,
            }),
            (None, None, Some(diameter)) => Ok(SpecimenGeometry::Circular {
                diameter,
                height: self.height,
            }),
            _ => bail!("give either --width and --length, or --diameter"),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary – what gets printed
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Summary<'a> {
    file: String,
    geometry: SpecimenGeometry,
    area_mm2: f64,
    form_factor: f64,
    shape_coefficient: f64,
    samples: usize,
    elapsed_s: f64,
    loading_rate_mm_s: Option<f64>,
    cycles: usize,
    loading_peaks: &'a [usize],
    loop_areas_nmm: &'a [f64],
    error: Option<String>,
    windowed: Option<&'a WindowedModulus>,
    strain_levels: Vec<(f64, WindowPoint)>,
    static_moduli: &'a [CycleStaticResult],
    mean_static_modulus: Option<f64>,
}

impl<'a> Summary<'a> {
    fn new(file: String, report: &'a AnalysisReport) -> Self {
        let (error, windowed, static_moduli) = match &report.cycle_stages {
            Ok(CycleStages {
                windowed,
                static_moduli,
            }) => match windowed {
                Ok(w) => (None, Some(w), static_moduli.as_slice()),
                Err(err) => (Some(err.to_string()), None, static_moduli.as_slice()),
            },
            Err(err) => (Some(err.to_string()), None, &[][..]),
        };

        Summary {
            file,
            geometry: report.geometry,
            area_mm2: report.geometry.area(),
            form_factor: report.geometry.form_factor(),
            shape_coefficient: report.geometry.shape_coefficient(),
            samples: report.series.len(),
            elapsed_s: report.series.elapsed(),
            loading_rate_mm_s: report.loading_rate,
            cycles: report.cycles.len(),
            loading_peaks: &report.loading_peaks,
            loop_areas_nmm: &report.loop_areas,
            error,
            windowed,
            strain_levels: report.strain_level_points(),
            static_moduli,
            mean_static_modulus: report.mean_static_modulus(),
        }
    }

    fn print_text(&self) {
        println!("{}", self.file);
        println!(
            "  specimen {}  A = {:.2} mm²  q = {:.2}  shape = {:.4}",
            self.geometry, self.area_mm2, self.form_factor, self.shape_coefficient
        );
        println!("  {} samples over {:.2} s", self.samples, self.elapsed_s);
        if let Some(rate) = self.loading_rate_mm_s {
            println!("  loading rate {rate:.4} mm/s");
        }
        println!("  {} cycles, loading peaks at {:?}", self.cycles, self.loading_peaks);
        for (i, area) in self.loop_areas_nmm.iter().enumerate() {
            println!("    cycle {}: loop area {area:.2} N·mm", i + 1);
        }

        if let Some(err) = &self.error {
            println!("  per-cycle analysis: {err}");
        }
        if let Some(w) = self.windowed {
            println!("  windowed modulus: {} windows", w.len());
            println!("    {:>12} {:>12} {:>12}", "stress MPa", "strain %", "E MPa");
            for i in 0..w.len() {
                println!(
                    "    {:>12.4} {:>12.4} {:>12.2}",
                    w.stress[i], w.strain_pct[i], w.modulus[i]
                );
            }
        }
        for (level, p) in &self.strain_levels {
            println!(
                "  E at {level}% strain: {:.2} MPa (nearest window {:.2}%)",
                p.modulus, p.strain_pct
            );
        }
        for r in self.static_moduli {
            match r.modulus {
                Some(v) => println!("  cycle {}: C_stat = {v:.4} N/mm³", r.cycle),
                None => println!("  cycle {}: C_stat missing (threshold not reached)", r.cycle),
            }
        }
        if let Some(mean) = self.mean_static_modulus {
            println!("  mean C_stat = {mean:.4} N/mm³");
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let geometry = cli.geometry()?;
    let config = match &cli.config {
        Some(path) => AnalysisConfig::from_json_path(path)?,
        None => AnalysisConfig::default(),
    };

    let recording = load_file(&cli.file)?;
    log::info!("loaded {} samples from {}", recording.len(), cli.file.display());

    let report = analyze(&recording, &geometry, &config)
        .with_context(|| format!("analysing {}", cli.file.display()))?;

    let summary = Summary::new(cli.file.display().to_string(), &report);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        summary.print_text();
    }
    Ok(())
}
