/// WF3D Terminal Demo - Wireframe Shapes and Curves
///
/// Renders a rotating wireframe shape with an editable spline overlay.
/// Controls:
///   - 1-6: Cube, pyramid, cylinder, sphere, torus, loaded mesh
///   - WASD / E/R: Rotate the shape
///   - HJKL: Move the shape, +/-: Scale, 0: Reset
///   - Tab / Arrow keys / Mouse drag: Edit the curve handles
///   - Q/ESC: Quit
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wf3d_core::{MeshData, SceneConfig};
use wf3d_terminal::TerminalApp;

#[derive(Debug, Parser)]
#[command(name = "wf3d-terminal", about = "Wireframe shapes and splines in the terminal")]
struct Args {
    /// Scene configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Mesh to show, as JSON `{"vertices": [[x, y, z], ...], "edges": [[a, b], ...]}`
    #[arg(long)]
    mesh: Option<PathBuf>,

    /// Initial shape: cube, pyramid, cylinder, sphere or torus
    #[arg(long)]
    shape: Option<String>,

    /// Override the ring resolution of curved shapes
    #[arg(long)]
    resolution: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they stay out of the alternate screen
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(resolution) = args.resolution {
        config.shape_resolution = resolution;
        config.validate()?;
    }

    let mesh = match &args.mesh {
        Some(path) => {
            let data = MeshData::load(path)
                .with_context(|| format!("loading mesh {}", path.display()))?;
            tracing::info!(
                vertices = data.vertices.len(),
                edges = data.edges.len(),
                "loaded mesh"
            );
            Some(data)
        }
        None => None,
    };

    let mut app = TerminalApp::new(config, mesh)?;
    if let Some(name) = &args.shape {
        if !app.scene_mut().select_shape_by_name(name) {
            anyhow::bail!("unknown shape '{}'", name);
        }
    }

    app.run()?;

    println!("Thank you for using WF3D Terminal Renderer!");
    Ok(())
}
