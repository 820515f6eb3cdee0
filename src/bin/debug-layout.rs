/// Diagnostic tool to inspect the element → layout pipeline
///
/// Usage: debug-layout [--squarify] [--sort] [--cumulative] [--width W] [--height H]
///                     [--ratio R] [label=weight | weight]...
use anyhow::{bail, Context};
use compact_str::{format_compact, CompactString};
use treemap_engine::layout::audit::audit;
use treemap_engine::{
    compute_layout, Algorithm, Bounds, Element, ElementOrder, LayoutConfig, RoundingPolicy,
};

const REFERENCE: [f64; 12] = [24.0, 45.0, 32.0, 87.0, 34.0, 58.0, 10.0, 4.0, 5.0, 9.0, 52.0, 34.0];

fn parse_element(arg: &str, index: usize) -> anyhow::Result<Element<CompactString>> {
    let (label, weight) = match arg.split_once('=') {
        Some((label, weight)) => (CompactString::new(label), weight),
        None => (format_compact!("#{}", index), arg),
    };
    let weight: f64 = weight
        .parse()
        .with_context(|| format!("invalid weight in '{}'", arg))?;
    Ok(Element::new(label, weight))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("treemap_engine=debug".parse()?),
        )
        .init();

    let mut config = LayoutConfig::default();
    let mut bounds = Bounds::new(400.0, 300.0);
    let mut elements = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--squarify" => config.algorithm = Algorithm::Squarified,
            "--sort" => config.order = ElementOrder::Descending,
            "--cumulative" => config.rounding = RoundingPolicy::Cumulative,
            "--width" | "--height" | "--ratio" => {
                let value: f64 = args
                    .next()
                    .with_context(|| format!("{} needs a value", arg))?
                    .parse()
                    .with_context(|| format!("invalid value for {}", arg))?;
                match arg.as_str() {
                    "--width" => bounds.width = value,
                    "--height" => bounds.height = value,
                    _ => config.min_slice_ratio = value,
                }
            }
            flag if flag.starts_with("--") => bail!("unknown flag {}", flag),
            _ => elements.push(parse_element(&arg, elements.len())?),
        }
    }

    if elements.is_empty() {
        elements = REFERENCE
            .iter()
            .map(|&w| Element::new(format_compact!("{}", w), w))
            .collect();
    }

    println!("=== DIAGNOSTIC: Elements → Layout ===");
    println!(
        "Algorithm: {:?}, order: {:?}, rounding: {:?}, ratio: {}",
        config.algorithm, config.order, config.rounding, config.min_slice_ratio
    );
    println!("Bounds: {}x{}", bounds.width, bounds.height);

    let total: f64 = elements.iter().map(|e| e.weight).sum();
    println!("\n[1] {} elements, total weight {:.2}", elements.len(), total);

    let rects = compute_layout(&elements, bounds, &config)?;
    println!("\n[2] Layout computed: {} rectangles", rects.len());

    println!("\n[3] Rectangles in placement order:");
    for (i, rect) in rects.iter().enumerate() {
        let weight = elements
            .iter()
            .find(|e| e.id == rect.id)
            .map(|e| e.weight)
            .unwrap_or(0.0);
        let expected = weight / total * bounds.area();
        println!(
            "    [{:>2}] '{}' - {:.1}x{:.1} at ({:.1}, {:.1}) - area {:.0} (ideal {:.0})",
            i,
            rect.id,
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            rect.area(),
            expected
        );
    }

    println!("\n[4] Checking for anomalies:");
    let report = audit(&rects, bounds, 1e-6);
    println!("    Total rect area: {:.0}", report.total_area);
    println!("    Bounds area:     {:.0}", bounds.area());
    println!("    Coverage: {:.2}%", report.coverage * 100.0);
    println!("    Overlapping pairs: {}", report.overlaps.len());
    for (a, b) in report.overlaps.iter().take(10) {
        println!("      '{}' x '{}'", rects[*a].id, rects[*b].id);
    }
    println!("    Out of bounds: {}", report.out_of_bounds.len());

    Ok(())
}
