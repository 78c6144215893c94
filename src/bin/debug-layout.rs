//! Diagnostic tool: runs many seeded layouts of one scene and checks each result
use positioner_rs::layout::{compute_layout, Escalation, GrowthCause};
use positioner_rs::scene::Scene;
use positioner_rs::LayoutError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;

/// Outcome of one seeded trial.
struct Trial {
    seed: u64,
    result: Result<TrialStats, LayoutError>,
}

struct TrialStats {
    passes: u32,
    growths: u32,
    starved_growths: u32,
    attempts: u64,
    final_width: u32,
    final_height: u32,
    overlaps: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("positioner_rs=warn".parse()?),
        )
        .init();

    let scene_path = std::env::args().nth(1).map(PathBuf::from);
    let trials: u64 = match std::env::args().nth(2) {
        Some(n) => n.parse()?,
        None => 1_000,
    };

    let scene = match &scene_path {
        Some(path) => Scene::load(path)?,
        None => Scene::demo(),
    };

    println!("=== DIAGNOSTIC: Randomized Layout ===");
    println!(
        "Scene: {} ({} items, container {}x{})",
        scene_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(demo)".to_string()),
        scene.items.len(),
        scene.container.width,
        scene.container.height
    );
    println!("Trials: {}", trials);

    // Run trials
    let start = Instant::now();
    let results: Vec<Trial> = (0..trials)
        .into_par_iter()
        .map(|seed| {
            let (items, mut container, config) = scene.clone().into_parts();
            let mut rng = StdRng::seed_from_u64(seed);
            let result = compute_layout(&items, &mut container, &config, &mut rng).map(|layout| {
                let starved_growths = layout
                    .stats
                    .escalations
                    .iter()
                    .filter(|e| {
                        matches!(
                            e,
                            Escalation::Grow {
                                cause: GrowthCause::NoUsableSpace,
                                ..
                            }
                        )
                    })
                    .count() as u32;
                TrialStats {
                    passes: layout.stats.passes,
                    growths: layout.stats.growths,
                    starved_growths,
                    attempts: layout.stats.attempts,
                    final_width: container.width(),
                    final_height: container.height(),
                    overlaps: layout.collisions(config.collision_test).len(),
                }
            });
            Trial { seed, result }
        })
        .collect();
    let elapsed = start.elapsed();

    println!("\n[1] Completed in {:.2}s", elapsed.as_secs_f64());

    let ok: Vec<&TrialStats> = results.iter().filter_map(|t| t.result.as_ref().ok()).collect();
    let failed: Vec<&Trial> = results.iter().filter(|t| t.result.is_err()).collect();
    println!("    Succeeded:  {}", ok.len());
    println!("    Failed:     {}", failed.len());
    for trial in failed.iter().take(5) {
        if let Err(e) = &trial.result {
            println!("      seed {}: {}", trial.seed, e);
        }
    }

    if ok.is_empty() {
        println!("\n✗ No trial produced a layout");
        return Ok(());
    }

    // Escalation statistics
    let n = ok.len() as f64;
    let mean = |f: fn(&TrialStats) -> f64| ok.iter().map(|s| f(s)).sum::<f64>() / n;
    println!("\n[2] Escalation (mean per successful trial):");
    println!("    Passes:   {:.2}", mean(|s| s.passes as f64));
    println!("    Growths:  {:.2}", mean(|s| s.growths as f64));
    println!("    (no room: {:.2})", mean(|s| s.starved_growths as f64));
    println!("    Attempts: {:.1}", mean(|s| s.attempts as f64));
    let no_escalation = ok.iter().filter(|s| s.growths == 0).count();
    println!(
        "    Placed without growth: {} ({:.1}%)",
        no_escalation,
        no_escalation as f64 / n * 100.0
    );

    println!("\n[3] Final container size:");
    let max_w = ok.iter().map(|s| s.final_width).max().unwrap_or(0);
    let max_h = ok.iter().map(|s| s.final_height).max().unwrap_or(0);
    println!("    Mean: {:.0}x{:.0}", mean(|s| s.final_width as f64), mean(|s| s.final_height as f64));
    println!("    Max:  {}x{}", max_w, max_h);

    // Check the no-collision property
    println!("\n[4] Checking for overlaps:");
    let bad: Vec<(u64, usize)> = results
        .iter()
        .filter_map(|t| match &t.result {
            Ok(s) if s.overlaps > 0 => Some((t.seed, s.overlaps)),
            _ => None,
        })
        .collect();
    if bad.is_empty() {
        println!("    ✓ No overlapping placements in any trial");
    } else {
        for (seed, overlaps) in bad.iter().take(10) {
            println!("    ✗ seed {}: {} overlapping pairs", seed, overlaps);
        }
    }

    Ok(())
}
