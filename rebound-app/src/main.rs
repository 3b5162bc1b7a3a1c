use std::path::PathBuf;

use anyhow::Context;
use log::info;
use rebound::{Command, PhysicsConfig, Scene, SceneConfig, Simulator};

/// Seconds simulated per scripted segment.
const SEGMENT_SECONDS: f64 = 4.0;
/// Wall-clock frame length fed to the fixed-step driver.
const FRAME_SECONDS: f64 = 1.0 / 30.0;

fn build_simulator() -> anyhow::Result<Simulator> {
    let physics = PhysicsConfig::default();
    match std::env::args().nth(1) {
        Some(arg) if arg == "--procedural" => {
            Scene::procedural(physics).context("Failed to build procedural scene")
        }
        arg => {
            let dir = arg.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("assets"));
            let scene = SceneConfig::new().asset_dir(&dir);
            Scene::load(&scene, physics)
                .with_context(|| format!("Failed to load scene from {}", dir.display()))
        }
    }
}

/// Run frames for one segment and report where the body ended up.
fn run_segment(sim: &mut Simulator, label: &str) -> anyhow::Result<()> {
    let frames = (SEGMENT_SECONDS / FRAME_SECONDS).round() as u32;
    let mut ticks = 0;
    for _ in 0..frames {
        ticks += sim.advance(FRAME_SECONDS)?;
    }

    let p = sim.position();
    let ground = sim.terrain_height(p.x, p.y)?;
    println!(
        "{label:<28} {:>10} on {:<12} ticks {:>4}  pos ({:>7.2}, {:>7.2}, {:>6.2})  clearance {:>5.2}  |w| {:.2}",
        format!("{:?}", sim.variant()),
        sim.active_terrain().name,
        ticks,
        p.x,
        p.y,
        p.z,
        p.z - ground,
        sim.angular_velocity().length(),
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut sim = build_simulator()?;
    info!("Simulating {} terrains", sim.terrains().len());

    // Drop the sphere on every terrain, then repeat with the polyhedron.
    for round in 0..2 {
        for index in 0..sim.terrains().len() {
            sim.apply(Command::SelectTerrain(index))?;
            sim.apply(Command::Reset)?;
            let label = format!("drop #{}", round * sim.terrains().len() + index + 1);
            run_segment(&mut sim, &label)?;
        }
        sim.apply(Command::SwitchVariant)?;
    }

    // Relaunch at an angle on the last terrain.
    sim.apply(Command::RotateLaunch(45.0))?;
    sim.apply(Command::Reset)?;
    run_segment(&mut sim, "angled launch")?;

    Ok(())
}
