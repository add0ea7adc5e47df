//! Knotwork CLI - weave strands over polygon meshes.
//!
//! Usage: knotwork <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `knotwork --help` for available commands. Set `RUST_LOG=debug` for
//! per-phase summaries from the library.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use nalgebra::Point3;

use knotwork::algo::remesh::RemeshType;
use knotwork::algo::strand::{StrandAnalyzer, StrandBuilder, StrandStep};
use knotwork::algo::weave::{weave_with_progress, WeaveOptions, WeaveType};
use knotwork::algo::Progress;
use knotwork::io;
use knotwork::mesh::HalfEdgeMesh;

#[derive(Parser)]
#[command(name = "knotwork")]
#[command(author, version, about = "Knot and weave strands over polygon meshes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Apply a remesh transform
    Remesh {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Remesh transform
        #[arg(short, long, value_enum, default_value = "medial")]
        method: RemeshMethod,
    },

    /// Weave a mesh and write its strands as OBJ polylines
    Weave {
        /// Input mesh file
        input: PathBuf,

        /// Output OBJ file
        output: PathBuf,

        /// Edge labeling
        #[arg(short, long, value_enum, default_value = "plain")]
        weave: WeaveMethod,

        /// Chance that a plain-weave edge crosses (0.0 to 1.0)
        #[arg(short, long, default_value = "1.0")]
        probability: f64,

        /// Remesh applied before labeling
        #[arg(short, long, value_enum, default_value = "none")]
        remesh: RemeshMethod,

        /// Random seed
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Distance to shift strands along the normal where they pass over
        #[arg(long, default_value = "0.1", allow_hyphen_values = true)]
        weave_up: f64,

        /// Distance to shift strands along the normal where they pass under
        #[arg(long, default_value = "-0.1", allow_hyphen_values = true)]
        weave_down: f64,

        /// Inset of straight pass-throughs toward the face
        #[arg(long, default_value = "0.1")]
        inset: f64,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum RemeshMethod {
    /// Leave the mesh as it is
    None,
    /// Insert a vertex at every edge midpoint
    EdgeSubdivide,
    /// Build the medial mesh
    Medial,
}

impl From<RemeshMethod> for RemeshType {
    fn from(method: RemeshMethod) -> Self {
        match method {
            RemeshMethod::None => RemeshType::None,
            RemeshMethod::EdgeSubdivide => RemeshType::EdgeSubdivide,
            RemeshMethod::Medial => RemeshType::Medial,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum WeaveMethod {
    /// Random crossings and straight pass-throughs
    Plain,
    /// Heuristic twill on any mesh
    Twill,
    /// Exact twill on the medial mesh
    MedialTwill,
}

impl From<WeaveMethod> for WeaveType {
    fn from(method: WeaveMethod) -> Self {
        match method {
            WeaveMethod::Plain => WeaveType::Plain,
            WeaveMethod::Twill => WeaveType::Twill,
            WeaveMethod::MedialTwill => WeaveType::MedialTwill,
        }
    }
}

/// Signed offsets applied to strand points.
#[derive(Clone, Copy)]
struct Offsets {
    weave_up: f64,
    weave_down: f64,
    inset: f64,
}

/// Collects one offset point per strand step.
struct PolylineBuilder {
    offsets: Offsets,
    open: bool,
    polylines: Vec<Vec<Point3<f64>>>,
}

impl PolylineBuilder {
    fn new(offsets: Offsets) -> Self {
        Self {
            offsets,
            open: false,
            polylines: Vec::new(),
        }
    }
}

impl StrandBuilder for PolylineBuilder {
    fn start_strand(&mut self) {
        self.polylines.push(Vec::new());
        self.open = true;
    }

    fn add_loop(&mut self, step: &StrandStep) {
        debug_assert!(self.open, "add_loop called outside a strand");
        if !self.open {
            return;
        }
        let Offsets {
            weave_up,
            weave_down,
            inset,
        } = self.offsets;
        if let Some(line) = self.polylines.last_mut() {
            line.push(step.offset_point(weave_up, weave_down, inset));
        }
    }

    fn end_strand(&mut self) {
        self.open = false;
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Remesh {
            input,
            output,
            method,
        } => {
            cmd_remesh(&input, &output, method)?;
        }

        Commands::Weave {
            input,
            output,
            weave,
            probability,
            remesh,
            seed,
            weave_up,
            weave_down,
            inset,
        } => {
            let options = WeaveOptions::new(weave.into())
                .with_probability(probability)
                .with_remesh(remesh.into())
                .with_seed(seed);
            let offsets = Offsets {
                weave_up,
                weave_down,
                inset,
            };
            cmd_weave(&input, &output, &options, offsets)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Only ever move the bar forward
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous && raw_percent != 100 {
            return;
        }
        let percent = raw_percent.max(previous);

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: HalfEdgeMesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Edges: {}", mesh.num_edges());
    println!("Faces: {}", mesh.num_faces());
    println!("Loops: {}", mesh.num_loops());

    let boundary_edges = mesh.edge_ids().filter(|&e| mesh.is_boundary_edge(e)).count();
    if boundary_edges == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary edges)", boundary_edges);
    }

    let max_degree = mesh.face_ids().map(|f| mesh.face_degree(f)).max().unwrap_or(0);
    let min_degree = mesh.face_ids().map(|f| mesh.face_degree(f)).min().unwrap_or(0);
    println!("Face degree range: [{}, {}]", min_degree, max_degree);

    Ok(())
}

fn cmd_remesh(
    input: &PathBuf,
    output: &PathBuf,
    method: RemeshMethod,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: HalfEdgeMesh = io::load(input)?;
    log::info!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());

    let start = Instant::now();
    let result = RemeshType::from(method).apply(&mesh)?;
    let elapsed = start.elapsed();

    println!(
        "Result: {} vertices, {} edges, {} faces",
        result.num_vertices(),
        result.num_edges(),
        result.num_faces()
    );
    io::save(&result, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_weave(
    input: &PathBuf,
    output: &PathBuf,
    options: &WeaveOptions,
    offsets: Offsets,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: HalfEdgeMesh = io::load(input)?;
    log::info!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());
    log::info!(
        "Weaving ({:?}, remesh {:?}, seed {})...",
        options.weave_type,
        options.remesh,
        options.seed
    );

    let progress = create_progress();

    let start = Instant::now();
    let woven = weave_with_progress(&mesh, options, &progress)?;

    let mut builders = (StrandAnalyzer::<u32>::new(), PolylineBuilder::new(offsets));
    woven.trace(&mut builders)?;
    let (analyzer, polylines) = builders;
    let elapsed = start.elapsed();

    println!(
        "Strands: {} ({} braids, {} steps)",
        analyzer.num_strands(),
        analyzer.num_braids(),
        analyzer.strand_sizes().iter().sum::<usize>()
    );
    io::obj::save_polylines(&polylines.polylines, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use knotwork::algo::strand::{trace_strands, StrandEvent};
    use knotwork::algo::twist::{EdgeTwists, Twist};
    use knotwork::mesh::shapes;

    fn offsets() -> Offsets {
        Offsets {
            weave_up: 0.3,
            weave_down: -0.1,
            inset: 0.0,
        }
    }

    #[test]
    fn test_polylines_use_separate_up_and_down() {
        let grid: HalfEdgeMesh = shapes::quad_grid(2, 1).unwrap();
        let twists = EdgeTwists::uniform(&grid, Twist::ClockwiseOver);
        let mut builder = PolylineBuilder::new(offsets());
        trace_strands(&grid, &twists, &mut builder).unwrap();

        assert_eq!(builder.polylines.len(), 1);
        let mut heights: Vec<f64> = builder.polylines[0].iter().map(|p| p.z).collect();
        heights.sort_by(f64::total_cmp);
        assert!((heights[0] + 0.1).abs() < 1e-12);
        assert!((heights[1] - 0.3).abs() < 1e-12);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside a strand")]
    fn test_step_without_start_is_rejected() {
        let grid: HalfEdgeMesh = shapes::quad_grid(2, 1).unwrap();
        let twists = EdgeTwists::uniform(&grid, Twist::ClockwiseOver);
        let mut steps: Vec<StrandEvent> = Vec::new();
        trace_strands(&grid, &twists, &mut steps).unwrap();

        let mut builder = PolylineBuilder::new(offsets());
        for event in &steps {
            if let StrandEvent::Part(step) = event {
                builder.add_loop(step);
            }
        }
    }

    #[test]
    fn test_cli_accepts_negative_weave_down() {
        let cli = Cli::try_parse_from([
            "knotwork",
            "weave",
            "in.ply",
            "out.obj",
            "--weave-up",
            "0.2",
            "--weave-down",
            "-0.05",
        ])
        .unwrap();
        match cli.command {
            Commands::Weave {
                weave_up,
                weave_down,
                ..
            } => {
                assert_eq!(weave_up, 0.2);
                assert_eq!(weave_down, -0.05);
            }
            _ => panic!("expected the weave command"),
        }
    }
}
