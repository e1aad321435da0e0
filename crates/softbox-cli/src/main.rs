//! Softbox command-line driver
//!
//! Usage: `softbox [CONFIG.ron] [OUTPUT_DIR]`
//!
//! Builds the configured box, presses its top face for a while, lets it
//! settle, and writes the rest and the most deformed shapes as STL.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glam::Vec3;
use softbox_core::mesh::save_stl;
use softbox_core::primitive::VertexPlacement;
use softbox_core::{
    BoxMesh, ProgressiveBoxMesh, RevealProgress, SoftboxConfig, SpringDeformer, SurfaceHit,
};

type BoxError = Box<dyn std::error::Error>;

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "softbox_cli=info,softbox_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let output_dir = args.next().map(PathBuf::from).unwrap_or_else(|| ".".into());

    match run(config_path.as_deref(), &output_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: Option<&Path>, output_dir: &Path) -> Result<(), BoxError> {
    let config = match config_path {
        Some(path) => {
            tracing::info!("Loading config from {}", path.display());
            SoftboxConfig::load(path)?
        }
        None => SoftboxConfig::default(),
    };

    let mesh = build_mesh(&config)?;
    tracing::info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "Built {}box",
        if mesh.is_grouped() { "rounded " } else { "" }
    );
    for submesh in &mesh.submeshes {
        if let Some(axis) = submesh.axis {
            tracing::info!(triangles = submesh.indices.len() / 3, "{}-facing group", axis.name());
        }
    }

    let indices = mesh.indices();
    std::fs::create_dir_all(output_dir)?;
    save_stl(output_dir.join("box_rest.stl"), &mesh.vertices, &indices)?;

    simulate(&config, &mesh, &indices, output_dir)
}

fn build_mesh(config: &SoftboxConfig) -> Result<BoxMesh, BoxError> {
    let batch = config.simulation.reveal_batch as usize;
    if batch == 0 {
        return Ok(config.mesh.build()?);
    }

    let dims = config.mesh.dimensions()?;
    Ok(match config.mesh.roundness {
        Some(roundness) => reveal(ProgressiveBoxMesh::rounded(dims, roundness)?, batch),
        None => reveal(ProgressiveBoxMesh::plain(dims), batch),
    })
}

/// Drive a progressive build to completion, one batch per step
fn reveal<P: VertexPlacement>(mut build: ProgressiveBoxMesh<P>, batch: usize) -> BoxMesh {
    loop {
        match build.into_mesh() {
            Ok(mesh) => return mesh,
            Err(mut pending) => {
                if let RevealProgress::Pending { written, total } = pending.step(batch) {
                    tracing::debug!("Revealed {written}/{total} vertices");
                }
                build = pending;
            }
        }
    }
}

fn simulate(
    config: &SoftboxConfig,
    mesh: &BoxMesh,
    indices: &[u32],
    output_dir: &Path,
) -> Result<(), BoxError> {
    let sim = &config.simulation;
    let mut deformer = SpringDeformer::from_mesh(mesh, config.deformer)?;

    let (min, max) = mesh.bounds();
    let hit = SurfaceHit {
        point: Vec3::new((min.x + max.x) / 2.0, max.y, (min.z + max.z) / 2.0),
        normal: Vec3::Y,
    };

    let mut peak = 0.0f32;
    let mut peak_shape = deformer.displaced().to_vec();
    for _ in 0..sim.press_ticks {
        config.input.press(&mut deformer, hit, sim.time_step);
        deformer.integrate(sim.time_step)?;
        let displacement = deformer.max_displacement();
        if displacement > peak {
            peak = displacement;
            peak_shape.copy_from_slice(deformer.displaced());
        }
    }
    tracing::info!(
        peak_displacement = peak,
        energy = deformer.kinetic_energy(),
        "Press released after {} ticks",
        sim.press_ticks
    );

    for tick in 0..sim.settle_ticks {
        deformer.integrate(sim.time_step)?;
        if tick % 60 == 59 {
            tracing::debug!(
                tick,
                displacement = deformer.max_displacement(),
                "Settling"
            );
        }
    }
    tracing::info!(
        displacement = deformer.max_displacement(),
        energy = deformer.kinetic_energy(),
        "Settled after {} ticks",
        sim.settle_ticks
    );

    save_stl(output_dir.join("box_deformed.stl"), &peak_shape, indices)?;
    Ok(())
}
