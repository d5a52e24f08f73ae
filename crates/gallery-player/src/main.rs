//! Shooting gallery
//!
//! Usage:
//!   gallery [--config <gallery.toml>] [--log <filter>]

use anyhow::{Context, Result};
use clap::Parser;
use gallery_player::{GalleryConfig, PlayerApp};
use std::path::PathBuf;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use winit::event_loop::{ControlFlow, EventLoop};

const GALLERY_CRATES: [&str; 6] = [
    "gallery",
    "gallery_player",
    "gallery_render",
    "gallery_scene",
    "gallery_particles",
    "gallery_runtime",
];

#[derive(Parser)]
#[command(name = "gallery")]
#[command(about = "Shoot the oscillating targets before the bullets run out")]
struct Args {
    /// Configuration file (defaults to ./gallery.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extra log directive applied last (e.g. "gallery_scene=debug")
    #[arg(long)]
    log: Option<String>,
}

/// `RUST_LOG` replaces the defaults when set; `--log` is layered on top
fn log_filter(env: Option<&str>, extra: Option<&str>) -> Result<EnvFilter> {
    let mut filter = match env {
        Some(directives) => EnvFilter::try_new(directives).context("Invalid RUST_LOG")?,
        None => {
            let defaults: Vec<String> = GALLERY_CRATES.iter().map(|krate| format!("{krate}=info")).collect();
            EnvFilter::try_new(format!("warn,{}", defaults.join(",")))?
        }
    };
    if let Some(directive) = extra {
        filter = filter.add_directive(directive.parse::<Directive>().context("Invalid --log directive")?);
    }
    Ok(filter)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(env.as_deref(), args.log.as_deref())?;
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = GalleryConfig::resolve(args.config.as_deref()).context("Failed to load configuration")?;

    tracing::info!("controls: WASD move, mouse look, left click fire, Escape quit");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = PlayerApp::new(config);
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.take_error() {
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_rust_log_unset() {
        let filter = log_filter(None, None).unwrap().to_string().to_lowercase();
        assert!(filter.contains("gallery_scene=info"));
        assert!(filter.contains("warn"));
    }

    #[test]
    fn test_rust_log_is_not_overridden() {
        let filter = log_filter(Some("gallery_scene=debug"), None).unwrap().to_string().to_lowercase();
        assert!(filter.contains("gallery_scene=debug"));
        assert!(!filter.contains("gallery_scene=info"));
    }

    #[test]
    fn test_log_flag_layers_on_top() {
        let filter = log_filter(Some("warn"), Some("gallery_render=trace")).unwrap().to_string().to_lowercase();
        assert!(filter.contains("gallery_render=trace"));
        assert!(log_filter(None, Some("gallery=loud")).is_err());
    }
}
