/// wireview - Terminal Wireframe Viewer
///
/// Shows an OBJ mesh (file path or http(s) URL) as a slowly turning
/// wireframe. Without a source, a cube is shown.
/// Controls:
///   - Left-drag: Rotate the model
///   - R: Reload the mesh source
///   - Q/ESC: Quit
///
/// Logging goes to stderr and is off unless RUST_LOG is set; redirect it
/// (`2>wireview.log`) to keep it off the screen.
use clap::Parser;
use wireview_core::Mesh;
use wireview_terminal::{config::Args, TerminalApp};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.viewer_config()?;

    let mut app = TerminalApp::new(config, args.fps)?;
    match &args.source {
        Some(source) => app.open(source),
        None => app.show_mesh(Mesh::cube(2.0)),
    }

    app.run()?;
    Ok(())
}
