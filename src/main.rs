use clap::{Parser, Subcommand};
use image::ImageReader;
use std::path::{Path, PathBuf};

use tcg_grader::grading::{calculate_all_grades, calculate_grade};
use tcg_grader::measurement::{
    calculate_border_wear, calculate_centering, corners_to_initial_boundaries, CardDimensions,
};
use tcg_grader::{
    BorderBoundaries, CardDetector, CardSide, CenteringMeasurements, Company, DetectorConfig,
    GradingResult, Rect,
};

#[derive(Parser)]
#[command(name = "tcg-grader")]
#[command(about = "Estimate trading card grades from border centering")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the card outline in a photo
    Detect {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Detector settings (JSON)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Save debug outputs to directory (must be empty)
        #[arg(long, value_name = "DIR")]
        debug_out: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Grade centering from boundary coordinates given as TOP,BOTTOM,LEFT,RIGHT
    Grade {
        #[arg(long, value_parser = parse_rect, allow_hyphen_values = true)]
        outer: Rect,

        #[arg(long, value_parser = parse_rect, allow_hyphen_values = true)]
        inner: Rect,

        #[arg(long, default_value = "front")]
        side: CardSide,

        /// Only grade for this company (PSA, BGS or CGC)
        #[arg(long)]
        company: Option<Company>,

        #[arg(long)]
        json: bool,
    },

    /// Detect the card, derive starting boundaries and grade them
    Analyze {
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        #[arg(long, default_value = "front")]
        side: CardSide,

        #[arg(long)]
        json: bool,
    },
}

fn parse_rect(s: &str) -> Result<Rect, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid coordinate: {e}"))?;
    match values.as_slice() {
        [top, bottom, left, right] => Ok(Rect::new(*top, *bottom, *left, *right)),
        _ => Err(format!("expected TOP,BOTTOM,LEFT,RIGHT, got {} values", values.len())),
    }
}

fn load_config(path: Option<&Path>, verbose: bool) -> anyhow::Result<DetectorConfig> {
    let config = match path {
        Some(path) => DetectorConfig::from_json_file(path)?,
        None => DetectorConfig::default(),
    };
    Ok(config.with_verbose(verbose))
}

fn load_image(path: &Path, verbose: bool) -> anyhow::Result<image::DynamicImage> {
    if verbose {
        println!("Loading image: {:?}", path);
    }
    let img = ImageReader::open(path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    if verbose {
        println!("Image loaded: {}x{}\n", img.width(), img.height());
    }
    Ok(img)
}

fn print_centering(centering: &CenteringMeasurements) {
    println!(
        "Left/Right: {:.1}/{:.1}  (deviation {:.1})",
        centering.left_right.left,
        centering.left_right.right,
        centering.left_right_deviation()
    );
    println!(
        "Top/Bottom: {:.1}/{:.1}  (deviation {:.1})",
        centering.top_bottom.top,
        centering.top_bottom.bottom,
        centering.top_bottom_deviation()
    );
}

fn print_grades(grades: &[GradingResult]) {
    for grade in grades {
        println!(
            "  {:<4} {:>4} {}",
            grade.company.as_str(),
            grade.score,
            grade.grade_name
        );
    }
}

fn grade_boundaries(
    boundaries: &BorderBoundaries,
    side: CardSide,
    company: Option<Company>,
) -> (CenteringMeasurements, Vec<GradingResult>) {
    let centering = calculate_centering(boundaries);
    let grades = match company {
        Some(company) => vec![calculate_grade(&centering, side, company)],
        None => calculate_all_grades(&centering, side).into_values().collect(),
    };
    (centering, grades)
}

fn run_detect(
    image_path: &Path,
    config: Option<&Path>,
    debug_out: Option<PathBuf>,
    json: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    let img = load_image(image_path, verbose)?;
    let mut config = load_config(config, verbose)?;
    if let Some(dir) = debug_out {
        config = config.with_debug_dir(dir);
    }

    let detector = CardDetector::new(config)?;
    let candidate = detector.detect(&img)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&candidate)?);
        return Ok(());
    }

    println!("\n=== Card Detection Results ===");
    match candidate {
        Some(candidate) => {
            println!("Score: {:.3}", candidate.score);
            let c = candidate.corners;
            for (name, p) in [
                ("top-left", c.top_left),
                ("top-right", c.top_right),
                ("bottom-right", c.bottom_right),
                ("bottom-left", c.bottom_left),
            ] {
                println!("  {:<12} ({:.4}, {:.4})", name, p.x, p.y);
            }
        }
        None => println!("No card detected."),
    }
    Ok(())
}

fn run_analyze(
    image_path: &Path,
    config: Option<&Path>,
    side: CardSide,
    json: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    let img = load_image(image_path, verbose)?;
    let detector = CardDetector::new(load_config(config, verbose)?)?;

    let Some(candidate) = detector.detect(&img)? else {
        if json {
            println!("null");
        } else {
            println!("No card detected.");
        }
        return Ok(());
    };

    let (boundaries, dimensions): (BorderBoundaries, CardDimensions) = corners_to_initial_boundaries(
        &candidate.corners,
        img.width() as f64,
        img.height() as f64,
    )?;
    let (centering, grades) = grade_boundaries(&boundaries, side, None);
    let border_wear = calculate_border_wear(&boundaries, &dimensions);

    if json {
        let report = serde_json::json!({
            "detection": candidate,
            "boundaries": boundaries,
            "centering": centering,
            "border_wear": border_wear,
            "grades": grades,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n=== Card Analysis ({side}) ===");
    println!("Detection score: {:.3}", candidate.score);
    let outer = boundaries.outer();
    let inner = boundaries.inner();
    println!(
        "Outer: top {:.0}, bottom {:.0}, left {:.0}, right {:.0}",
        outer.top, outer.bottom, outer.left, outer.right
    );
    println!(
        "Inner: top {:.0}, bottom {:.0}, left {:.0}, right {:.0}",
        inner.top, inner.bottom, inner.left, inner.right
    );
    print_centering(&centering);
    println!("Border wear: {:.1}%", border_wear);
    println!("\nEstimated grades:");
    print_grades(&grades);
    Ok(())
}

fn run_grade(
    outer: Rect,
    inner: Rect,
    side: CardSide,
    company: Option<Company>,
    json: bool,
) -> anyhow::Result<()> {
    let boundaries = BorderBoundaries::new(outer, inner)?;
    let (centering, grades) = grade_boundaries(&boundaries, side, company);

    if json {
        let report = serde_json::json!({
            "centering": centering,
            "grades": grades,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("=== Centering ({side}) ===");
    print_centering(&centering);
    println!("\nEstimated grades:");
    print_grades(&grades);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match args.command {
        Command::Detect {
            image_path,
            config,
            debug_out,
            json,
        } => run_detect(&image_path, config.as_deref(), debug_out, json, args.verbose),
        Command::Grade {
            outer,
            inner,
            side,
            company,
            json,
        } => run_grade(outer, inner, side, company, json),
        Command::Analyze {
            image_path,
            config,
            side,
            json,
        } => run_analyze(&image_path, config.as_deref(), side, json, args.verbose),
    }
}
