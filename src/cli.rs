use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::layout::ViewportGeometry;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(subcommand_value_name = "SUBCOMMAND")]
#[command(subcommand_help_heading = "Subcommands")]
pub struct Cli {
    /// Path to config file (default: `$XDG_CONFIG_HOME/lightbox/config.kdl`).
    ///
    /// This can also be set with the `LIGHTBOX_CONFIG` environment variable. If both are set,
    /// the command line argument takes precedence.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub subcommand: Sub,
}

#[derive(Subcommand)]
pub enum Sub {
    /// Lay out a catalog and print the renderer events as JSON lines.
    Layout(LayoutArgs),
    /// Print how one photo would be shown in the overlay.
    View(ViewArgs),
    /// Validate the config file.
    Validate,
}

#[derive(Args)]
pub struct LayoutArgs {
    /// Path to the catalog JSON file.
    #[arg(long)]
    pub catalog: PathBuf,

    #[command(flatten)]
    pub viewport: ViewportArgs,

    /// Scroll to the bottom of the grid this many times after loading.
    #[arg(long, default_value_t = 0)]
    pub scrolls: usize,

    /// Resize the viewport after scrolling, e.g. `--resize 1920x1080`. Can be repeated.
    #[arg(long, value_name = "WxH", value_parser = parse_size)]
    pub resize: Vec<(u32, u32)>,

    /// Fire all resizes within one debounce interval, as a window drag would.
    #[arg(long)]
    pub burst: bool,

    /// Open this photo in the overlay after loading.
    #[arg(long, value_name = "HANDLE")]
    pub select: Option<usize>,
}

#[derive(Args)]
pub struct ViewArgs {
    /// Path to the catalog JSON file.
    #[arg(long)]
    pub catalog: PathBuf,

    /// Position of the photo in the catalog.
    #[arg(long)]
    pub handle: usize,

    #[command(flatten)]
    pub viewport: ViewportArgs,
}

#[derive(Args, Clone, Copy)]
pub struct ViewportArgs {
    /// Viewport width in logical pixels.
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Viewport height in logical pixels.
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.)]
    pub dpr: f64,
}

impl ViewportArgs {
    pub fn geometry(&self) -> ViewportGeometry {
        ViewportGeometry::new(self.width, self.height, self.dpr)
    }
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w = w.parse::<u32>().map_err(|err| format!("invalid width {w:?}: {err}"))?;
    let h = h.parse::<u32>().map_err(|err| format!("invalid height {h:?}: {err}"))?;
    Ok((w, h))
}
