/// Example: Render one frame of a shape or mesh to stdout
///
/// Usage: cargo run --example render_frame -- [shape-name | path/to/mesh.json]

use std::env;
use wf3d_core::{MeshData, SceneConfig};
use wf3d_terminal::{render_to_text, Scene};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = SceneConfig::default();

    let mut scene = match args.get(1) {
        Some(arg) if arg.ends_with(".json") => {
            println!("Loading mesh file: {}", arg);
            let mesh = MeshData::load(arg)?;
            println!("Loaded {} vertices, {} edges", mesh.vertices.len(), mesh.edges.len());
            Scene::new(config, Some(mesh))?
        }
        Some(name) => {
            let mut scene = Scene::new(config, None)?;
            if !scene.select_shape_by_name(name) {
                anyhow::bail!("unknown shape '{}'", name);
            }
            scene
        }
        None => {
            eprintln!("Usage: {} [shape-name | mesh.json]", args[0]);
            eprintln!("\nNo shape given, using default cube...");
            Scene::new(config, None)?
        }
    };

    print!("{}", render_to_text(&mut scene, 80, 24)?);
    Ok(())
}
