//! Command-line arguments for the viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;

/// Procedural planet viewer.
///
/// CLI values override settings loaded from the config file.
#[derive(Parser, Debug, Default)]
#[command(name = "planetgen", about = "Procedural planet viewer")]
pub struct CliArgs {
    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Window width
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height
    #[arg(long)]
    pub height: Option<u32>,

    /// Square internal render resolution
    #[arg(long)]
    pub render_size: Option<u32>,

    /// Planet seed (decimal or 0x-prefixed hex)
    #[arg(long, value_parser = parse_seed)]
    pub seed: Option<u32>,

    /// Uncapped frame rate
    #[arg(long)]
    pub no_vsync: bool,
}

fn parse_seed(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    };
    parsed.map_err(|e| format!("invalid seed '{}': {}", s, e))
}

impl AppConfig {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window_width = w;
        }
        if let Some(h) = args.height {
            self.window_height = h;
        }
        if let Some(n) = args.render_size {
            self.render_width = n;
            self.render_height = n;
        }
        if let Some(seed) = args.seed {
            self.traits.seed = seed;
        }
        if args.no_vsync {
            self.vsync = false;
        }
    }
}
