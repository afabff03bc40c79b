use std::{path::PathBuf, rc::Rc};

use clap::{Args, Parser, Subcommand};
use fractal_tree_core::{
    AppConfig, FractalError, FractalStore, FractalSubject, LineRenderer, LineSegment,
    ObserverHandle, RawSettings, RenderObserver, Rgb, SvgCanvas,
};
use tracing_subscriber::EnvFilter;

fn main() -> fractal_tree_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render { source, output } => run_render(&source, output),
        Commands::Segments { source, pretty } => run_segments(&source, pretty),
        Commands::Defaults => run_defaults(),
    }
}

fn run_render(source: &SourceArgs, output: PathBuf) -> fractal_tree_core::Result<()> {
    let config = source.load_config()?;
    let tree = source.apply_overrides(config.tree.clone());
    tracing::info!(?output, depth = tree.depth, "rendering fractal");

    let mut store = FractalStore::new(config.anchor(), &tree)?;
    let canvas = SvgCanvas::new(
        config.canvas.width,
        config.canvas.height,
        config.canvas.background,
    );
    let drawing = Rc::new(RenderObserver::new(SvgFile::new(canvas, output)));
    let handle: ObserverHandle = drawing.clone();
    store.register(handle);

    store.apply_settings(&tree)?;

    if drawing.last_generation() != Some(store.snapshot().generation()) {
        return Err(FractalError::msg("drawing was not written, see log for details"));
    }
    Ok(())
}

fn run_segments(source: &SourceArgs, pretty: bool) -> fractal_tree_core::Result<()> {
    let config = source.load_config()?;
    let tree = source.apply_overrides(config.tree.clone());

    let store = FractalStore::new(config.anchor(), &tree)?;
    let snapshot = store.snapshot();
    tracing::info!(segments = snapshot.len(), "generated fractal");

    let json = if pretty {
        serde_json::to_string_pretty(&*snapshot)?
    } else {
        serde_json::to_string(&*snapshot)?
    };
    println!("{json}");
    Ok(())
}

fn run_defaults() -> fractal_tree_core::Result<()> {
    println!("{}", AppConfig::default().to_json_pretty()?);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

/// SVG canvas that is written to disk at the end of every frame.
struct SvgFile {
    canvas: SvgCanvas,
    path: PathBuf,
}

impl SvgFile {
    fn new(canvas: SvgCanvas, path: PathBuf) -> Self {
        Self { canvas, path }
    }
}

impl LineRenderer for SvgFile {
    fn begin(&mut self) -> fractal_tree_core::Result<()> {
        self.canvas.begin()
    }

    fn draw_line(&mut self, segment: &LineSegment) -> fractal_tree_core::Result<()> {
        self.canvas.draw_line(segment)
    }

    fn finish(&mut self) -> fractal_tree_core::Result<()> {
        std::fs::write(&self.path, self.canvas.to_svg())?;
        tracing::info!(path = ?self.path, lines = self.canvas.line_count(), "wrote drawing");
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Binary tree fractal generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the tree and draw it to an SVG file.
    Render {
        #[command(flatten)]
        source: SourceArgs,
        /// Where to write the drawing.
        #[arg(short, long, default_value = "fractal.svg")]
        output: PathBuf,
    },
    /// Generate the tree and print its segments as JSON.
    Segments {
        #[command(flatten)]
        source: SourceArgs,
        /// Indent the JSON output.
        #[arg(long)]
        pretty: bool,
    },
    /// Print the default configuration as JSON.
    Defaults,
}

/// Configuration file plus per-parameter overrides.
#[derive(Args, Debug)]
struct SourceArgs {
    /// JSON configuration file; missing fields take their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Recursion depth.
    #[arg(long, allow_negative_numbers = true)]
    depth: Option<i32>,
    /// Child to parent size ratio, in percent.
    #[arg(long, allow_negative_numbers = true)]
    ratio: Option<i32>,
    /// Left branch angle, in degrees.
    #[arg(long, allow_negative_numbers = true)]
    left_angle: Option<f64>,
    /// Right branch angle, in degrees.
    #[arg(long, allow_negative_numbers = true)]
    right_angle: Option<f64>,
    /// Trunk length, in pixels.
    #[arg(long)]
    trunk_length: Option<f64>,
    /// Trunk width, in pixels.
    #[arg(long)]
    trunk_width: Option<i32>,
    /// Trunk color as `#rrggbb` or `r,g,b`.
    #[arg(long)]
    trunk_color: Option<Rgb>,
    /// Leaf color as `#rrggbb` or `r,g,b`.
    #[arg(long)]
    leaf_color: Option<Rgb>,
}

impl SourceArgs {
    fn load_config(&self) -> fractal_tree_core::Result<AppConfig> {
        match &self.config {
            Some(path) => {
                tracing::debug!(?path, "loading configuration");
                AppConfig::from_path(path)
            }
            None => Ok(AppConfig::default()),
        }
    }

    fn apply_overrides(&self, mut tree: RawSettings) -> RawSettings {
        if let Some(depth) = self.depth {
            tree.depth = depth;
        }
        if let Some(ratio) = self.ratio {
            tree.ratio_percent = ratio;
        }
        if let Some(angle) = self.left_angle {
            tree.left_angle_deg = angle;
        }
        if let Some(angle) = self.right_angle {
            tree.right_angle_deg = angle;
        }
        if let Some(length) = self.trunk_length {
            tree.trunk_length = length;
        }
        if let Some(width) = self.trunk_width {
            tree.trunk_width = width;
        }
        if let Some(color) = self.trunk_color {
            tree.trunk_color = color;
        }
        if let Some(color) = self.leaf_color {
            tree.leaf_color = color;
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_fields() {
        let cli = Cli::parse_from([
            "fractal-tree",
            "segments",
            "--depth",
            "3",
            "--leaf-color",
            "#ff0000",
        ]);
        let Commands::Segments { source, pretty } = cli.command else {
            panic!("expected segments command");
        };
        assert!(!pretty);

        let tree = source.apply_overrides(RawSettings::default());
        assert_eq!(tree.depth, 3);
        assert_eq!(tree.leaf_color, Rgb::new(255, 0, 0));
        assert_eq!(tree.trunk_color, RawSettings::default().trunk_color);
    }

    #[test]
    fn rejects_bad_color_arguments() {
        let result = Cli::try_parse_from(["fractal-tree", "render", "--trunk-color", "blue"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
