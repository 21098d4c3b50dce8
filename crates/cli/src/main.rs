use anyhow::{anyhow, Context};
use config::{Config, File};
use hexnav::{
    timed, visibility_polygon, NavConfig, NavMesh, ObstacleBox, Occluder,
    PathFollower, Point2, SearchTrace,
};
use log::{info, warn, LevelFilter};
use serde::{Deserialize, Serialize};
use simple_logger::SimpleLogger;
use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::{Path, PathBuf},
    process,
};
use structopt::StructOpt;
use strum::{Display, EnumString};

/// CLI for running navigation and visibility queries against a scene.
#[derive(Debug, StructOpt)]
#[structopt(name = "hexnav")]
struct Opt {
    /// Path to a scene file that defines the nav mesh, its obstacles, and
    /// the queries to run against them. Supported formats: JSON, TOML
    scene: PathBuf,

    /// If given, results will be written to this file. Otherwise they're
    /// printed to stdout
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// The format to write results in. Supported formats:
    ///
    /// json - Compact JSON, one line
    ///
    /// pretty_json - Indented JSON, for humans
    #[structopt(short = "f", long, default_value = "pretty_json")]
    output_format: OutputFormat,

    /// For each path query, include every cell the search tested. Useful
    /// for debugging, but makes the output much larger
    #[structopt(long)]
    trace: bool,

    /// If given, each found path is walked by a follower at this speed
    /// (world units per second), and the simulated travel time is included
    /// in the output
    #[structopt(long)]
    follow_speed: Option<f64>,

    /// The logging level to use. See
    /// https://docs.rs/log/0.4.11/log/enum.LevelFilter.html for options
    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Copy, Clone, Debug, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
enum OutputFormat {
    // If you change this, make sure to update the help text for
    // `--output-format`!
    Json,
    PrettyJson,
}

/// Everything needed to build a nav mesh and query it. Every field is
/// optional, so an empty file is a valid (if boring) scene.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
struct Scene {
    nav: NavConfig,
    obstacles: Vec<ObstacleBox>,
    paths: Vec<PathQuery>,
    lights: Vec<LightQuery>,
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
struct PathQuery {
    start: Point2,
    destination: Point2,
}

#[derive(Clone, Debug, Deserialize)]
struct LightQuery {
    origin: Point2,
    radius: f64,
    #[serde(default)]
    occluders: Vec<Occluder>,
}

#[derive(Debug, Serialize)]
struct PathResult {
    #[serde(flatten)]
    query: PathQuery,
    /// `None` if the destination is unreachable
    path: Option<Vec<Point2>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tested: Option<Vec<Point2>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    travel_time: Option<f64>,
}

#[derive(Debug, Serialize)]
struct LightResult {
    origin: Point2,
    radius: f64,
    polygon: Vec<Point2>,
}

#[derive(Debug, Serialize)]
struct SceneResult {
    cells: usize,
    blocked: usize,
    paths: Vec<PathResult>,
    lights: Vec<LightResult>,
}

/// Upper bound on simulated follower steps, so a tiny speed can't hang us
const MAX_FOLLOW_STEPS: usize = 1_000_000;
/// Simulated time per follower step, in seconds
const FOLLOW_STEP: f64 = 1.0 / 60.0;

fn load_scene(scene_path: &Path) -> anyhow::Result<Scene> {
    let mut settings = Config::new();
    let scene_path = scene_path.to_str().ok_or_else(|| {
        anyhow!("invalid character in path {:?}", scene_path)
    })?;
    settings
        .merge(File::with_name(scene_path))
        .context("error reading scene file")?;
    settings.try_into().context("error reading scene")
}

/// Walk a path from end to end, returning how long it took. `None` if the
/// follower never arrives.
fn simulate_follow(path: &[Point2], speed: f64) -> Option<f64> {
    let (&start, rest) = path.split_first()?;
    let mut follower = PathFollower::new(start, speed);
    follower.set_path(rest.iter().copied());
    for step in 0..MAX_FOLLOW_STEPS {
        if follower.is_idle() {
            return Some(step as f64 * FOLLOW_STEP);
        }
        follower.step(FOLLOW_STEP);
    }
    warn!(
        "Follower at speed {} didn't finish path within {} steps",
        speed, MAX_FOLLOW_STEPS
    );
    None
}

fn run_scene(opt: &Opt, scene: Scene) -> anyhow::Result<SceneResult> {
    let mut mesh = NavMesh::new(scene.nav)?;
    timed!("Adding obstacles", log::Level::Info, {
        for obstacle in &scene.obstacles {
            mesh.add_obstacle(obstacle);
        }
    });

    let paths = timed!("Path queries", log::Level::Info, {
        scene
            .paths
            .iter()
            .map(|&query| {
                let layout = mesh.map().layout();
                let (path, tested) = if opt.trace {
                    let mut trace = SearchTrace::default();
                    let path = mesh.find_path_traced(
                        query.start,
                        query.destination,
                        &mut trace,
                    );
                    let tested = trace
                        .tested
                        .iter()
                        .map(|&hex| layout.hex_to_pixel(hex))
                        .collect();
                    (path, Some(tested))
                } else {
                    (mesh.find_path(query.start, query.destination), None)
                };

                match &path {
                    Some(path) => info!(
                        "Path {} -> {}: {} waypoints",
                        query.start,
                        query.destination,
                        path.len()
                    ),
                    None => info!(
                        "Path {} -> {}: unreachable",
                        query.start, query.destination
                    ),
                }

                let travel_time = match (&path, opt.follow_speed) {
                    (Some(path), Some(speed)) => simulate_follow(path, speed),
                    _ => None,
                };
                PathResult {
                    query,
                    path,
                    tested,
                    travel_time,
                }
            })
            .collect()
    });

    let lights = timed!("Light queries", log::Level::Info, {
        scene
            .lights
            .iter()
            .map(|light| LightResult {
                origin: light.origin,
                radius: light.radius,
                polygon: visibility_polygon(
                    light.origin,
                    light.radius,
                    &light.occluders,
                ),
            })
            .collect()
    });

    Ok(SceneResult {
        cells: mesh.map().len(),
        blocked: mesh.blocked().len(),
        paths,
        lights,
    })
}

fn write_output(
    opt: &Opt,
    result: &SceneResult,
    writer: impl Write,
) -> anyhow::Result<()> {
    match opt.output_format {
        OutputFormat::Json => serde_json::to_writer(writer, result)?,
        OutputFormat::PrettyJson => {
            serde_json::to_writer_pretty(writer, result)?
        }
    }
    Ok(())
}

/// Run the CLI with some options
fn run(opt: Opt) -> anyhow::Result<()> {
    SimpleLogger::new().with_level(opt.log_level).init()?;

    let scene = load_scene(&opt.scene)?;
    info!(
        "Loaded scene from {:?} ({} obstacles, {} paths, {} lights)",
        &opt.scene,
        scene.obstacles.len(),
        scene.paths.len(),
        scene.lights.len()
    );
    let result = run_scene(&opt, scene)?;

    match &opt.output {
        Some(output_path) => {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(output_path)
                .with_context(|| {
                    format!("error opening output file {:?}", output_path)
                })?;
            write_output(&opt, &result, file).with_context(|| {
                format!("error writing to file {:?}", output_path)
            })?;
            info!("Wrote {} output to {:?}", opt.output_format, output_path);
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_output(&opt, &result, &mut lock)?;
            writeln!(lock)?;
        }
    }

    Ok(())
}

fn main() {
    let exit_code = match run(Opt::from_args()) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    };
    process::exit(exit_code);
}
