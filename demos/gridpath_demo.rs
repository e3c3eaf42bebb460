//! Terminal demo: builds a grid, runs A*, Lazy Theta* and a flow field on
//! it, and prints each result as ASCII.
//!
//! Run: cargo run --bin gridpath-demo -- --width 30 --height 15 --seed 7

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::{EnvFilter, fmt};

use gridpath_core::{Grid, NavConfig, Point, Vec3};
use gridpath_mapgen::{Layout, ObstacleGen};
use gridpath_paths::{Pathfinder, bresenham, path_cost};

#[derive(Parser)]
#[command(name = "gridpath-demo")]
#[command(about = "Compare A*, Lazy Theta* and a flow field on one grid", version)]
struct Cli {
    /// Load the grid from a text layout instead of generating one
    #[arg(short, long)]
    layout: Option<PathBuf>,

    /// Grid width when generating
    #[arg(long, default_value_t = 32)]
    width: i32,

    /// Grid height when generating
    #[arg(long, default_value_t = 16)]
    height: i32,

    /// Obstacle probability when generating
    #[arg(long, default_value_t = 0.2)]
    obstacles: f64,

    /// Seed for the generator
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Cost of a diagonal step, clamped to [1, 2]
    #[arg(long, default_value_t = std::f32::consts::SQRT_2)]
    diagonal_cost: f32,

    /// Only move in the four cardinal directions
    #[arg(long)]
    cardinal: bool,

    /// Allow diagonal steps that squeeze between two blocked cells
    #[arg(long)]
    cut_corners: bool,

    /// Flow-field penalty for bearings off the eight axes
    #[arg(long, default_value_t = 0.0)]
    angle_penalty: f32,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    fmt().with_env_filter(filter).with_target(false).init();

    let grid = build_grid(&cli)?;
    let start = Point::new(0, 0);
    let goal = Point::new(grid.width() - 1, grid.height() - 1);
    let config = NavConfig::default()
        .with_diagonal(!cli.cardinal)
        .with_corner_cutting_prevented(!cli.cut_corners)
        .with_diagonal_cost(cli.diagonal_cost)
        .with_angle_penalty(cli.angle_penalty);
    let mut pf = Pathfinder::new(grid, config);

    let grid = pf.grid();
    println!("grid {}x{}, {} blocked", grid.width(), grid.height(), grid.blocked_count());
    println!("{}\n", Layout::render(grid, |_| None));

    let astar = pf.astar_cells(start, goal);
    report("A*", &pf, &astar);
    let marks = trace(&astar);
    println!("{}\n", Layout::render(pf.grid(), |p| mark(p, start, goal, &marks)));

    let theta = pf.theta_star_cells(start, goal);
    report("Lazy Theta*", &pf, &theta);
    let marks = trace(&theta);
    println!("{}\n", Layout::render(pf.grid(), |p| mark(p, start, goal, &marks)));

    let target = pf.grid().cell_to_world(goal);
    let reached = pf.recompute_flow_field(target);
    println!("flow field toward {goal}: {reached} cells reached");
    println!("{}", Layout::render(pf.grid(), |p| arrow(pf.grid(), p, goal)));
    Ok(())
}

fn build_grid(cli: &Cli) -> Result<Grid> {
    if let Some(path) = &cli.layout {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading layout {}", path.display()))?;
        let layout = Layout::parse(&text).with_context(|| format!("parsing {}", path.display()))?;
        let grid = layout.to_grid(1.0, Vec3::ZERO)?;
        log::info!("loaded {}x{} layout from {}", grid.width(), grid.height(), path.display());
        return Ok(grid);
    }
    if cli.width < 2 || cli.height < 2 {
        bail!("grid must be at least 2x2, got {}x{}", cli.width, cli.height);
    }
    let grid = Grid::new(cli.width, cli.height, 1.0, Vec3::ZERO)?;
    let mut mg = ObstacleGen::with_grid(grid, StdRng::seed_from_u64(cli.seed));
    let blocked = mg.scatter_obstacles(cli.obstacles);
    log::info!("generated {}x{} grid, seed {}, {blocked} obstacles", cli.width, cli.height, cli.seed);
    let corner = Point::new(cli.width - 1, cli.height - 1);
    mg.keep_clear(&[Point::new(0, 0), corner]);
    Ok(mg.into_grid())
}

fn report(name: &str, pf: &Pathfinder, path: &[Point]) {
    let stats = pf.last_stats();
    if path.is_empty() {
        println!("{name}: no path ({} nodes expanded)", stats.expanded);
        return;
    }
    let cost = path_cost(pf.grid(), pf.config().diagonal_cost, path);
    println!(
        "{name}: {} points, cost {cost:.3}, {} nodes expanded",
        path.len(),
        stats.expanded
    );
}

/// Every cell crossed by the path, waypoints joined by straight lines.
fn trace(path: &[Point]) -> Vec<Point> {
    let mut cells: Vec<Point> = path.first().copied().into_iter().collect();
    for w in path.windows(2) {
        cells.extend(bresenham(w[0], w[1]).skip(1));
    }
    cells
}

fn mark(p: Point, start: Point, goal: Point, path: &[Point]) -> Option<char> {
    if p == start {
        Some('S')
    } else if p == goal {
        Some('G')
    } else if path.contains(&p) {
        Some('*')
    } else {
        None
    }
}

fn arrow(grid: &Grid, p: Point, goal: Point) -> Option<char> {
    if p == goal {
        return Some('G');
    }
    let cell = grid.cell(p)?;
    if !cell.is_walkable() {
        return None;
    }
    let flow = cell.flow();
    if flow.is_zero() {
        return Some(' ');
    }
    // y grows downwards, so north is -y.
    let angle = flow.y.atan2(flow.x).to_degrees();
    let octant = ((angle + 360.0 + 22.5) / 45.0) as usize % 8;
    Some(['→', '↘', '↓', '↙', '←', '↖', '↑', '↗'][octant])
}
