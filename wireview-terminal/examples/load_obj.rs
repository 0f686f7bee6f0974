/// Example: Render a single frame of an OBJ file to stdout
///
/// Usage: cargo run --example load_obj -- path/to/file.obj [columns rows]

use std::env;
use std::io::{self, Write};
use wireview_core::{parse_obj_with_report, Mesh, Viewer, ViewerConfig};
use wireview_terminal::{fetch_source, CellSurface};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut viewer = Viewer::new(ViewerConfig {
        auto_rotate: false,
        ..ViewerConfig::default()
    });

    match args.get(1) {
        Some(source) => {
            println!("Loading OBJ source: {}", source);
            let text = fetch_source(source)?;
            let (mesh, report) = parse_obj_with_report(&text);
            println!(
                "Parsed {} vertices and {} faces ({} lines ignored, {} skipped)",
                mesh.vertices.len(),
                mesh.faces.len(),
                report.ignored_lines,
                report.skipped_lines.len()
            );
            viewer.show_mesh(mesh);
        }
        None => {
            eprintln!("Usage: {} <obj-file> [columns rows]", args[0]);
            eprintln!("\nNo OBJ file provided, using default cube...");
            viewer.show_mesh(Mesh::cube(2.0));
        }
    }

    let columns = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(60);
    let rows = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(24);

    let mut surface = CellSurface::new(columns, rows);
    let stats = viewer.frame(&mut surface);

    let mut stdout = io::stdout();
    surface.print(&mut stdout)?;
    stdout.flush()?;
    println!(
        "Drew {} faces ({} skipped) on a {}x{} pixel grid",
        stats.faces_drawn,
        stats.faces_skipped,
        columns,
        rows * 2
    );
    Ok(())
}
