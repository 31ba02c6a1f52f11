use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use obliq::{Oscillator, Plot, PlotSession, Scene, Viewport};

#[derive(Parser, Debug)]
#[command(name = "obliq", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose one frame and write it as an SVG.
    Frame(FrameArgs),
    /// Compose one frame and print the scene as JSON.
    Dump(FrameArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input plot JSON. Defaults to the built-in reference plot.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Elapsed animation time in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Viewport width in surface units.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Viewport height in surface units.
    #[arg(long, default_value_t = 400)]
    height: u32,

    /// Output SVG path (`frame` only; `dump` writes to stdout).
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Dump(args) => cmd_dump(args),
    }
}

fn read_plot_json(path: &Path) -> anyhow::Result<Plot> {
    let f = File::open(path).with_context(|| format!("open plot '{}'", path.display()))?;
    let r = BufReader::new(f);
    let plot: Plot = serde_json::from_reader(r).with_context(|| "parse plot JSON")?;
    Ok(plot)
}

fn compose(args: &FrameArgs) -> anyhow::Result<Scene> {
    let plot = match &args.in_path {
        Some(path) => read_plot_json(path)?,
        None => Plot::reference(),
    };
    plot.validate()?;

    let oscillators = Oscillator::bank(plot.basis.len());
    let mut session = PlotSession::new(plot, oscillators, 0.0)?;
    session.resize(Viewport::new(args.width, args.height));
    session.advance(args.time)?;

    let scene = session
        .scene()
        .context("no scene composed for the given viewport")?;
    Ok(scene.clone())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let out = args
        .out
        .clone()
        .context("--out is required for `obliq frame`")?;
    let scene = compose(&args)?;
    let svg = scene_to_svg(&scene);

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&out, svg).with_context(|| format!("write svg '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_dump(args: FrameArgs) -> anyhow::Result<()> {
    let scene = compose(&args)?;
    let json = serde_json::to_string_pretty(&scene).context("serialize scene JSON")?;
    println!("{json}");
    Ok(())
}

const BACKGROUND: &str = "#10141c";
const GRID_STROKE: &str = "#3a4152";
const GUIDE_STROKE: &str = "#8494a8";

fn scene_to_svg(scene: &Scene) -> String {
    let w = scene.viewport.width;
    let h = scene.viewport.height;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
         viewBox=\"0 0 {w} {h}\">\n"
    ));
    svg.push_str(&format!(
        "  <rect width=\"{w}\" height=\"{h}\" fill=\"{BACKGROUND}\"/>\n"
    ));

    stroke_path(&mut svg, &scene.floor.minor.to_svg(), GRID_STROKE, 0.5, 1.0);
    stroke_path(&mut svg, &scene.floor.major.to_svg(), GRID_STROKE, 1.2, 1.0);

    for g in &scene.guides {
        svg.push_str(&format!(
            "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{GUIDE_STROKE}\" \
             stroke-width=\"0.75\" stroke-opacity=\"0.5\"/>\n",
            g.top.x, g.top.y, g.foot.x, g.foot.y
        ));
    }

    for layer in &scene.layers {
        let color = format!(
            "rgb({},{},{})",
            layer.color.r, layer.color.g, layer.color.b
        );
        stroke_path(
            &mut svg,
            &layer.shadow.to_svg(),
            &color,
            layer.stroke_width,
            layer.shadow_opacity,
        );
        stroke_path(
            &mut svg,
            &layer.curve.to_svg(),
            &color,
            layer.stroke_width,
            layer.opacity,
        );
    }

    for label in &scene.labels {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" fill=\"rgb({},{},{})\" font-family=\"monospace\" \
             font-size=\"13\">{}</text>\n",
            label.anchor.x,
            label.anchor.y,
            label.color.r,
            label.color.g,
            label.color.b,
            escape_text(&label.text)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn stroke_path(svg: &mut String, d: &str, stroke: &str, width: f64, opacity: f64) {
    if d.is_empty() {
        return;
    }
    svg.push_str(&format!(
        "  <path d=\"{d}\" fill=\"none\" stroke=\"{stroke}\" stroke-width=\"{width}\" \
         stroke-opacity=\"{opacity}\"/>\n"
    ));
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
