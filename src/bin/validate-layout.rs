/// Layout validation tool
/// Runs both algorithms over a fixed suite of inputs and checks every
/// geometric invariant: bijection, containment, overlap and coverage.
use anyhow::bail;
use compact_str::{format_compact, CompactString};
use treemap_engine::layout::audit::audit;
use treemap_engine::layout::nested::{layout_nested, Nested};
use treemap_engine::{
    compute_layout, compute_layouts, Algorithm, Bounds, Element, LayoutConfig, LayoutJob, RoundingPolicy,
};

fn suite() -> Vec<(&'static str, Vec<f64>)> {
    vec![
        ("reference", vec![24.0, 45.0, 32.0, 87.0, 34.0, 58.0, 10.0, 4.0, 5.0, 9.0, 52.0, 34.0]),
        ("single", vec![1.0]),
        ("equal x4", vec![1.0; 4]),
        ("equal x9", vec![1.0; 9]),
        ("equal x16", vec![1.0; 16]),
        ("geometric", (0..24).map(|i| 0.8_f64.powi(i)).collect()),
        ("heavy tail", vec![1.0, 1.0, 1.0, 50.0]),
    ]
}

fn labelled(weights: &[f64]) -> Vec<Element<CompactString>> {
    weights
        .iter()
        .enumerate()
        .map(|(i, &w)| Element::new(format_compact!("e{}", i), w))
        .collect()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("treemap_engine=warn".parse()?),
        )
        .init();

    let bounds = Bounds::new(400.0, 300.0);
    let configs = [
        ("slice-and-dice", LayoutConfig::default(), 0.0),
        (
            "slice-and-dice (cumulative)",
            LayoutConfig {
                rounding: RoundingPolicy::Cumulative,
                ..LayoutConfig::default()
            },
            0.0,
        ),
        ("squarified", LayoutConfig::squarified(), 1e-6),
    ];

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              TREEMAP LAYOUT VALIDATION TOOL                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut failures = 0usize;

    for (name, config, epsilon) in &configs {
        println!("┌─ {} ", name);
        for (case, weights) in suite() {
            let elements = labelled(&weights);
            let start = std::time::Instant::now();
            let rects = compute_layout(&elements, bounds, config)?;
            let duration = start.elapsed();

            let mut ids: Vec<&CompactString> = rects.iter().map(|r| &r.id).collect();
            ids.sort();
            ids.dedup();
            let bijective = ids.len() == elements.len() && rects.len() == elements.len();

            let report = audit(&rects, bounds, *epsilon);
            // Interior rounding drift is tolerated for per-child rounding
            let strict = config.algorithm == Algorithm::Squarified || config.rounding == RoundingPolicy::Cumulative;
            let ok = bijective && report.out_of_bounds.is_empty() && (!strict || report.overlaps.is_empty());

            println!(
                "│  {} {:<12} {:>3} rects  coverage {:>7.3}%  overlaps {:>2}  ({:.2}ms)",
                if ok { "✓" } else { "✗" },
                case,
                rects.len(),
                report.coverage * 100.0,
                report.overlaps.len(),
                duration.as_secs_f64() * 1000.0
            );
            if !ok {
                failures += 1;
            }
        }
        println!("└────────────────────────────────────────────────────────────");
        println!();
    }

    // === Nested ===
    println!("┌─ nested squarified ");
    let nested = vec![
        Nested::group(labelled(&[6.0, 2.0]).into_iter().map(Nested::Leaf).collect()),
        Nested::leaf(format_compact!("b"), 4.0),
        Nested::group(labelled(&[1.0, 2.0, 1.0]).into_iter().map(Nested::Leaf).collect()),
    ];
    let rects = layout_nested(&nested, bounds, &LayoutConfig::squarified())?;
    let report = audit(&rects, bounds, 1e-6);
    println!(
        "│  {} {} leaves, coverage {:.3}%",
        if report.is_clean() { "✓" } else { "✗" },
        rects.len(),
        report.coverage * 100.0
    );
    if !report.is_clean() {
        failures += 1;
    }
    println!("└────────────────────────────────────────────────────────────");
    println!();

    // === Batch ===
    println!("┌─ parallel batch ");
    let jobs: Vec<LayoutJob<CompactString>> = suite()
        .into_iter()
        .map(|(_, weights)| LayoutJob {
            elements: labelled(&weights),
            bounds,
        })
        .collect();
    let start = std::time::Instant::now();
    let results = compute_layouts(&jobs, &LayoutConfig::default());
    let batch_ok = results
        .iter()
        .zip(&jobs)
        .all(|(result, job)| matches!(result, Ok(rects) if rects.len() == job.elements.len()));
    println!(
        "│  {} {} jobs in {:.2}ms",
        if batch_ok { "✓" } else { "✗" },
        jobs.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    if !batch_ok {
        failures += 1;
    }
    println!("└────────────────────────────────────────────────────────────");
    println!();

    if failures > 0 {
        bail!("{} validation cases failed", failures);
    }

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                    ✓ ALL CHECKS PASSED                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    Ok(())
}
