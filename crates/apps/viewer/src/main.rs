use std::env;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use foundation::math::{Vec2, Vec3, fibonacci_sphere};
use formats::{load_isoline_set, read_isoline_file, write_isoline_file};
use runtime::frame::{Frame, FrameRect, Viewport};
use runtime::input::InputEvent;
use scene::IsolineSet;
use scene::distance;
use tracing::info;
use tracing_subscriber::EnvFilter;
use viewer::{View, ViewerConfig};

/// Frame step used by the scripted commands (60 Hz).
const FRAME_DT_S: f64 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless isoline globe navigator")]
struct Args {
    /// Isoline JSON file (default: $ISOVIEW_ISOLINES)
    #[arg(long)]
    isolines: Option<PathBuf>,

    /// Fail instead of falling back to an empty set when the isoline file is bad
    #[arg(long)]
    strict: bool,

    /// Viewer config JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `viewer=trace` (default: $RUST_LOG)
    #[arg(long)]
    log: Option<String>,

    #[arg(long, default_value_t = 800.0)]
    width: f64,

    #[arg(long, default_value_t = 600.0)]
    height: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print isoline and mesh statistics
    Stats,

    /// Signed distance from a surface point (degrees) to the isolines
    Probe {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },

    /// Estimate the fraction of the sphere inside the isolines
    Coverage {
        /// Number of Fibonacci samples
        #[arg(long, default_value_t = 10_000)]
        samples: usize,
    },

    /// Drag from one pixel to another and report the camera and the node
    /// under the release point
    Orbit {
        /// Press position `x,y` in pixels (y up)
        #[arg(long, value_parser = parse_point)]
        from: Vec2,

        /// Release position `x,y` in pixels (y up)
        #[arg(long, value_parser = parse_point)]
        to: Vec2,

        /// Drag steps between the two positions
        #[arg(long, default_value_t = 10)]
        steps: u32,
    },

    /// Write the loaded isolines back out as pretty-printed JSON
    Export {
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() {
    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();

    let filter = match &args.log {
        Some(directives) => {
            EnvFilter::try_new(directives).map_err(|e| format!("invalid --log filter: {e}"))?
        }
        None => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &args.config {
        Some(path) => ViewerConfig::load(path).map_err(|e| e.to_string())?,
        None => ViewerConfig::default(),
    };
    let isolines = load_isolines(&args)?;

    let viewport = Viewport::new(args.width, args.height);
    let frame_rect = FrameRect::full(viewport);
    let view = View::new(config, isolines, viewport, frame_rect);
    let frame = Frame::first(viewport, frame_rect);

    match args.command {
        Command::Stats => cmd_stats(&view),
        Command::Probe { lat, lon } => cmd_probe(&view, lat, lon),
        Command::Coverage { samples } => cmd_coverage(&view, samples),
        Command::Orbit { from, to, steps } => cmd_orbit(view, frame, from, to, steps),
        Command::Export { out } => {
            write_isoline_file(&out, view.isolines()).map_err(|e| e.to_string())?;
            info!("wrote {}", out.display());
            Ok(())
        }
    }
}

fn load_isolines(args: &Args) -> Result<IsolineSet, String> {
    let path = args
        .isolines
        .clone()
        .or_else(|| env::var_os("ISOVIEW_ISOLINES").map(PathBuf::from));
    let Some(path) = path else {
        info!("no isoline file given; starting with an empty set");
        return Ok(IsolineSet::default());
    };

    if args.strict {
        read_isoline_file(&path).map_err(|e| e.to_string())
    } else {
        Ok(load_isoline_set(&path))
    }
}

fn cmd_stats(view: &View) -> Result<(), String> {
    let set = view.isolines();
    println!("background: {}", set.background);
    println!("isolines:   {}", set.isolines.len());
    println!("nodes:      {}", set.node_count());
    println!("visible:    {}", view.hit_tester().visible_count());
    println!("vertices:   {}", view.mesh().vertices.len());
    println!("segments:   {}", view.mesh().segment_count());
    Ok(())
}

fn cmd_probe(view: &View, lat_deg: f64, lon_deg: f64) -> Result<(), String> {
    let (lat, lon) = (lat_deg.to_radians(), lon_deg.to_radians());
    let x = Vec3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin());

    let Some(hit) = distance::nearest_isoline(view.isolines(), x) else {
        println!("no isolines");
        return Ok(());
    };
    let isoline = &view.isolines().isolines[hit.row];
    println!(
        "nearest: {} (group {}, height {})",
        isoline.name, isoline.group, isoline.height
    );
    println!("distance: {:.6} rad ({:.3} deg)", hit.distance, hit.distance.to_degrees());
    println!("inside:   {}", hit.distance < 0.0);
    Ok(())
}

fn cmd_coverage(view: &View, samples: usize) -> Result<(), String> {
    if samples == 0 {
        return Err("--samples must be positive".to_string());
    }
    let inside = fibonacci_sphere(samples)
        .into_iter()
        .filter(|p| distance::contains(view.isolines(), *p))
        .count();
    let fraction = inside as f64 / samples as f64;
    println!("inside: {inside}/{samples} ({:.2}% of the sphere)", fraction * 100.0);
    Ok(())
}

fn cmd_orbit(
    mut view: View,
    mut frame: Frame,
    from: Vec2,
    to: Vec2,
    steps: u32,
) -> Result<(), String> {
    let steps = steps.max(1);
    view.handle_event(InputEvent::Press(from));
    if !view.trackball().is_some_and(|t| t.is_orbiting()) {
        return Err(format!("press at {},{} did not start an orbit", from.x, from.y));
    }

    for i in 1..=steps {
        let t = f64::from(i) / f64::from(steps);
        view.handle_event(InputEvent::Drag(from + (to - from) * t));
        frame = frame.next(FRAME_DT_S);
        view.update(&frame);
    }
    view.handle_event(InputEvent::Release);
    while view.is_animating() {
        frame = frame.next(FRAME_DT_S);
        view.update(&frame);
    }
    view.handle_event(InputEvent::Hover(to));

    let q = view.rig().orientation;
    println!("frames:      {}", frame.index);
    println!("orientation: w={:.6} x={:.6} y={:.6} z={:.6}", q.w, q.x, q.y, q.z);
    println!("rotation:    {:.3} deg", q.angle().to_degrees());
    match view.selection().preselected() {
        Some(node) => println!("hover:       row {} column {}", node.row, node.column),
        None => println!("hover:       none"),
    }
    Ok(())
}

fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in `{s}`: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in `{s}`: {e}"))?;
    Ok(Vec2::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::{Args, parse_point};
    use clap::Parser;
    use foundation::math::Vec2;

    #[test]
    fn parses_points() {
        assert_eq!(parse_point("10, 20.5"), Ok(Vec2::new(10.0, 20.5)));
        assert!(parse_point("10").is_err());
        assert!(parse_point("a,1").is_err());
    }

    #[test]
    fn parses_orbit_command() {
        let args = Args::try_parse_from([
            "isoview",
            "--isolines",
            "lines.json",
            "orbit",
            "--from",
            "1,2",
            "--to",
            "3,4",
        ])
        .expect("parse");
        assert_eq!(args.width, 800.0);
        assert!(!args.strict);
        assert!(args.isolines.is_some());
    }

    #[test]
    fn negative_coordinates_are_values() {
        let args = Args::try_parse_from(["isoview", "probe", "--lat", "-12.5", "--lon", "-70"])
            .expect("parse");
        assert!(format!("{:?}", args.command).contains("-12.5"));
    }
}
