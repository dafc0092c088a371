//! Write an animated two-panel figure to SVG.
//!
//! Run: RUST_LOG=motion_viz=debug cargo run --example animated_svg [output.svg]

use motion_viz::prelude::*;
use tracing_subscriber::EnvFilter;

const FRAMES: usize = 8;
const POINTS: usize = 40;

fn wave(phase: f32) -> Result<DataWithAesthetic> {
    let step = std::f32::consts::TAU / (POINTS - 1) as f32;
    let x: Vec<f32> = (0..POINTS).map(|i| i as f32 * step).collect();
    let y: Vec<f32> = x.iter().map(|x| (x + phase).sin()).collect();
    create_data().x(&x)?.y(&y)
}

fn cloud(phase: f32) -> Result<DataWithAesthetic> {
    let x: Vec<f32> = (0..POINTS).map(|i| (i as f32 * 0.37 + phase).sin() * 2.0).collect();
    let y: Vec<f32> = (0..POINTS).map(|i| (i as f32 * 0.61 + phase).cos() * 2.0).collect();
    let size: Vec<f32> = (0..POINTS).map(|i| (i % 5) as f32).collect();
    let color: Vec<f32> = (0..POINTS).map(|i| i as f32).collect();
    create_data().x(&x)?.y(&y)?.size(&size)?.color(&color)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let output = std::env::args().nth(1).unwrap_or_else(|| "animated.svg".to_string());
    let mut session = Session::new();
    let mut fig = session.figure_with_config(FigureConfig::new().size(960.0, 420.0));

    {
        let mut axis = fig.axis(0, 0);
        axis.title("Travelling wave").xlabel("x").ylabel("sin(x + t)");
        let mut line = axis.line(wave(0.0)?)?;
        line.label("wave");
        for frame in 1..FRAMES {
            line.add_frame(wave(frame as f32 * 0.4)?, frame as f32 * 0.5)?;
        }
    }
    {
        let mut axis = fig.axis(0, 1);
        axis.title("Orbiting points");
        let mut points = axis.points(cloud(0.0)?)?;
        for frame in 1..FRAMES {
            points.add_frame(cloud(frame as f32 * 0.2)?, frame as f32 * 0.5)?;
        }
    }

    fig.save_svg(&output)?;
    println!("wrote {output} ({:.1}s loop)", fig.time_span());
    Ok(())
}
