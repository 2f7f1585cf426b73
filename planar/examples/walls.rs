//! Plans through three walls and dumps the result as CSV files in the working directory.
//!
//! Usage: `walls [SAMPLES] [--map FILE] [--seed SEED] [--plot]`

use std::env;
use std::fs::{self, File};
use std::io::BufWriter;
use std::time::Instant;

use log::{info, warn};
use plotters::prelude::*;

use planar::{io, PlanarEnvironment, Point, Rectangle};
use rrt_star::{Planner, PlannerBuilder};

const SCALE: f32 = 20.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut samples = 5000;
    let mut map = None;
    let mut seed = None;
    let mut plot = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--map" => map = Some(args.next().ok_or("--map needs a file")?),
            "--seed" => seed = Some(args.next().ok_or("--seed needs a value")?.parse::<u64>()?),
            "--plot" => plot = true,
            other => samples = other.parse()?,
        }
    }

    let obstacles = match map {
        Some(file) => io::parse_obstacles(&fs::read_to_string(file)?)?,
        None => vec![
            Rectangle::from_top_left(10.0, 50.0, 2.0, 45.0),
            Rectangle::from_top_left(20.0, 40.0, 2.0, 45.0),
            Rectangle::from_top_left(30.0, 50.0, 2.0, 45.0),
        ],
    };

    let env = PlanarEnvironment::new(50.0, 50.0).with_obstacles(obstacles);
    let start = Point::new(1.0, 48.0);
    let goal = Rectangle::from_top_left(43.0, 49.0, 7.0, 2.0);

    let mut builder = PlannerBuilder::<_, _, _, 2>::new(start, env, goal)
        .with_samples(samples)
        .with_step_size(0.5)
        .with_radius(4.0);
    if let Some(seed) = seed {
        builder = builder.with_seed(seed);
    }

    let now = Instant::now();
    let planner = builder.solve()?;
    info!("planning took {:.3}s", now.elapsed().as_secs_f32());

    match planner.best_path() {
        Ok(path) => {
            println!("Cost: {}", path.cost);
            io::write_path(&mut BufWriter::new(File::create("optimalPath_RRTstar.csv")?), &path)?;
        }
        Err(err) => warn!("{}", err),
    }

    io::write_nodes(&mut BufWriter::new(File::create("nodesSampled_RRTstar.csv")?), planner.tree())?;
    io::write_environment(
        &mut BufWriter::new(File::create("environment.csv")?),
        planner.environment(),
        planner.start(),
        planner.goal(),
    )?;
    io::write_obstacles(&mut BufWriter::new(File::create("obstacles.csv")?), planner.environment())?;

    if plot {
        draw(&planner, "walls.png")?;
    }

    Ok(())
}

fn to_pixel(env: &PlanarEnvironment, x: f32, y: f32) -> (i32, i32) {
    ((x * SCALE) as i32, ((env.height() - y) * SCALE) as i32)
}

fn draw(
    planner: &Planner<Point, PlanarEnvironment, Rectangle, 2>,
    file: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let env = planner.environment();
    let size = ((env.width() * SCALE) as u32, (env.height() * SCALE) as u32);
    let root = BitMapBackend::new(file, size).into_drawing_area();
    root.fill(&WHITE)?;

    let soft_red = RGBColor(200, 50, 50);
    let rect = |r: &Rectangle| {
        let top_left = r.top_left();
        [
            to_pixel(env, top_left.x, top_left.y),
            to_pixel(env, top_left.x + r.size.x, top_left.y - r.size.y),
        ]
    };

    for obstacle in env.obstacles() {
        root.draw(&plotters::element::Rectangle::new(
            rect(obstacle),
            ShapeStyle::from(&soft_red).filled(),
        ))?;
    }
    root.draw(&plotters::element::Rectangle::new(
        rect(planner.goal()),
        ShapeStyle::from(&GREEN.mix(0.5)).filled(),
    ))?;

    let tree = planner.tree();
    let edge_color = RGBColor(0, 0, 0).mix(0.3);
    for node in tree.iter() {
        if let Some(parent) = node.parent() {
            let (a, b) = (tree[parent].state(), node.state());
            root.draw(&PathElement::new(
                vec![to_pixel(env, a.x(), a.y()), to_pixel(env, b.x(), b.y())],
                ShapeStyle::from(&edge_color),
            ))?;
        }
    }

    if let Ok(path) = planner.best_path() {
        let series: Vec<_> = path.waypoints.iter().map(|p| to_pixel(env, p.x(), p.y())).collect();
        root.draw(&PathElement::new(series, ShapeStyle::from(&BLUE).stroke_width(3)))?;
    }

    let start = planner.start();
    root.draw(&Circle::new(
        to_pixel(env, start.x(), start.y()),
        6,
        ShapeStyle::from(&MAGENTA).filled(),
    ))?;

    root.present()?;
    Ok(())
}
