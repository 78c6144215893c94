use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use positioner_rs::layout::Positioner;
use positioner_rs::render::{self, StyleSurface};
use positioner_rs::scene::Scene;

/// Command line: `positioner-rs [scene.json] [--seed N] [--columns N]`
struct CliArgs {
    scene_path: Option<PathBuf>,
    seed: Option<u64>,
    columns: usize,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut parsed = CliArgs {
            scene_path: None,
            seed: None,
            columns: 96,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = args.next().context("--seed needs a value")?;
                    parsed.seed = Some(value.parse().context("--seed must be an integer")?);
                }
                "--columns" => {
                    let value = args.next().context("--columns needs a value")?;
                    parsed.columns = value.parse().context("--columns must be an integer")?;
                }
                flag if flag.starts_with("--") => bail!("Unknown option '{}'", flag),
                path => {
                    if parsed.scene_path.is_some() {
                        bail!("Only one scene file may be given");
                    }
                    parsed.scene_path = Some(PathBuf::from(path));
                }
            }
        }
        Ok(parsed)
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("positioner_rs=info".parse()?),
        )
        .init();

    let args = CliArgs::parse(std::env::args().skip(1))?;

    let scene = match &args.scene_path {
        Some(path) => Scene::load(path)?,
        None => {
            tracing::info!("No scene file given, using the built-in demo scene");
            Scene::demo()
        }
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!("Laying out {} items with seed {}", scene.items.len(), seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let (items, container, config) = scene.into_parts();
    let mut positioner = Positioner::with_observer(items, container, config, StyleSurface::new())?;
    let layout = positioner
        .position_all(&mut rng)
        .context("Layout failed")?
        .clone();

    let container = positioner.container();
    let stats = &layout.stats;
    println!(
        "Container: {}x{} usable ({}x{} outer)",
        container.width(),
        container.height(),
        container.outer_width(),
        container.outer_height()
    );
    println!(
        "Passes: {}  restarts: {}  growths: {}  attempts: {}  retries: {}",
        stats.passes, stats.restarts, stats.growths, stats.attempts, stats.retries
    );
    let usable_area = container.width() as u64 * container.height() as u64;
    println!(
        "Required area: {} px² ({:.1}% of container)",
        stats.required_area,
        stats.required_area as f64 / usable_area.max(1) as f64 * 100.0
    );
    println!();
    print!(
        "{}",
        render::render_ascii(positioner.items(), &layout, container, args.columns)
    );

    let overlaps = layout.collisions(positioner.config().collision_test);
    if !overlaps.is_empty() {
        tracing::warn!("{} overlapping pairs in final layout", overlaps.len());
    }
    tracing::debug!(
        "Surface received {} events",
        positioner.observer().events().len()
    );

    Ok(())
}
