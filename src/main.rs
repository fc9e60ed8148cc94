use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use rs_rpr_kinematics::mechanism::Rpr;
use rs_rpr_kinematics::parameters::rpr_kinematics::Parameters;
use rs_rpr_kinematics::precision::Precision;
use rs_rpr_kinematics::record::CsvSink;
use rs_rpr_kinematics::target::TargetGenerator;
use rs_rpr_kinematics::utils::{dump_joints, format_fixed};
use rs_rpr_kinematics::visualization::SvgCanvas;

/// Drives a 3-RPR mechanism through random reachable target poses, appending every
/// accepted pose to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "rpr", version)]
struct Args {
    /// YAML file with mechanism parameters. Command line values override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Circumradius of the ground joints (R)
    #[arg(long)]
    ground_radius: Option<f64>,

    /// Circumradius of the platform joints (r)
    #[arg(long)]
    platform_radius: Option<f64>,

    /// Shortest allowed leg
    #[arg(long)]
    lmin: Option<f64>,

    /// Longest allowed leg
    #[arg(long)]
    lmax: Option<f64>,

    /// f16, f32 or f64
    #[arg(long)]
    precision: Option<Precision>,

    /// CSV file receiving the records
    #[arg(long)]
    output: Option<String>,

    /// Number of targets to visit
    #[arg(long, default_value_t = 1)]
    count: usize,

    /// Radius of the disk targets are drawn from
    #[arg(long)]
    radius: Option<f64>,

    #[arg(long)]
    yaw_min: Option<f64>,

    #[arg(long)]
    yaw_max: Option<f64>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many rejected candidates in a row
    #[arg(long)]
    max_attempts: Option<usize>,

    /// Write an SVG drawing of the final pose here
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Do not print progress lines
    #[arg(long)]
    quiet: bool,
}

impl Args {
    fn parameters(&self) -> Result<Parameters> {
        let mut parameters = match &self.config {
            Some(path) => Parameters::from_yaml_file(path)
                .with_context(|| format!("Reading parameters from {}", path.display()))?,
            None => Parameters::default(),
        };
        if let Some(v) = self.ground_radius { parameters.ground_radius = v; }
        if let Some(v) = self.platform_radius { parameters.platform_radius = v; }
        if let Some(v) = self.lmin { parameters.min_length = v; }
        if let Some(v) = self.lmax { parameters.max_length = v; }
        if let Some(v) = self.precision { parameters.precision = v; }
        if let Some(v) = &self.output { parameters.output = v.clone(); }
        if let Some(v) = self.radius { parameters.sampling.radius = v; }
        if let Some(v) = self.yaw_min { parameters.sampling.yaw_limits[0] = v; }
        if let Some(v) = self.yaw_max { parameters.sampling.yaw_limits[1] = v; }
        if self.max_attempts.is_some() { parameters.sampling.max_attempts = self.max_attempts; }
        Ok(parameters)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let parameters = args.parameters()?;
    if !args.quiet {
        println!("Parameters:\n{}", parameters.to_yaml());
    }

    let sink = CsvSink::open(&parameters.output)
        .with_context(|| format!("Opening {}", parameters.output))?;
    let mut rpr = Rpr::from_parameters(&parameters)?.with_sink(Box::new(sink));
    rpr.export()?;

    let singularity = parameters.singularity_check();
    let sampling = parameters.sampling.clone();
    {
        let mut generator = match args.seed {
            Some(seed) => TargetGenerator::with_seed(&mut rpr, sampling, singularity, seed)?,
            None => TargetGenerator::from_entropy(&mut rpr, sampling, singularity)?,
        };
        for idx in 0..args.count {
            let Some(target) = generator.next() else {
                println!("Target search stalled after {} targets", idx);
                break;
            };
            let target = target?;
            if !args.quiet {
                println!("{:>5}: Coord: {} | Angle: {}", idx + 1,
                         format_fixed(&target.position), format_fixed(&target.orientation));
                println!("{}", generator.mover().progress_line());
            }
        }
    }

    if !args.quiet {
        println!("Final platform joints:");
        dump_joints(rpr.platform().joints());
    }

    if let Some(path) = &args.svg {
        let mut canvas = SvgCanvas::new();
        rpr.plot(&mut canvas);
        std::fs::write(path, canvas.to_svg(0.25))
            .with_context(|| format!("Writing {}", path.display()))?;
    }
    Ok(())
}
