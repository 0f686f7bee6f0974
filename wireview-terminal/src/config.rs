/// Command line and config file handling
use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use wireview_core::{Background, Rgb, ViewerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "wireview",
    version,
    about = "Rotatable wireframe preview of OBJ meshes in the terminal"
)]
pub struct Args {
    /// OBJ file path or http(s) URL. A cube is shown when omitted.
    pub source: Option<String>,

    /// TOML file with `wireColor`, `backgroundColor` and `autoRotate` keys
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Edge color as #rgb or #rrggbb
    #[arg(long)]
    pub wire_color: Option<Rgb>,

    /// Fill color as #rgb or #rrggbb, or "transparent"
    #[arg(long)]
    pub background: Option<Background>,

    /// Only rotate while dragging
    #[arg(long)]
    pub no_auto_rotate: bool,

    /// Target frames per second
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,
}

impl Args {
    /// The config file (if any) with command line flags layered on top
    pub fn viewer_config(&self) -> anyhow::Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_file(path)?,
            None => ViewerConfig::default(),
        };

        if let Some(wire_color) = self.wire_color {
            config.wire_color = wire_color;
        }
        if let Some(background) = self.background {
            config.background_color = background;
        }
        if self.no_auto_rotate {
            config.auto_rotate = false;
        }

        Ok(config)
    }
}

pub fn load_config_file(path: &Path) -> anyhow::Result<ViewerConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = toml::from_str(&text)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    log::info!("loaded viewer config from {}", path.display());
    Ok(config)
}
