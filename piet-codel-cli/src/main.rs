use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use serde::Serialize;

use piet_codel::{CodelImage, CodelSize, GridConfig, GridStore, LoadReport};

/// Piet codel grid tool — inspect, query and normalize Piet program images
#[derive(Parser)]
#[command(name = "piet-codel", version)]
struct Cli {
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every command that loads an image.
#[derive(Args)]
struct LoadArgs {
    /// Codel size in pixels, or "auto" to guess it from the image
    #[arg(short, long)]
    codel_size: Option<CodelSize>,

    /// TOML grid config (codel_size, pixel_size)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Report codel size and grid dimensions as JSON
    Inspect {
        /// Input image files
        #[arg(required = true)]
        images: Vec<PathBuf>,

        #[command(flatten)]
        load: LoadArgs,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the status line for one codel
    Status {
        image: PathBuf,

        /// Codel column
        #[arg(short, long)]
        x: u32,

        /// Codel row
        #[arg(short, long)]
        y: u32,

        /// Also list every codel of the contiguous block
        #[arg(long)]
        cells: bool,

        #[command(flatten)]
        load: LoadArgs,
    },
    /// Recolor one codel and write the result as PNG
    Set {
        image: PathBuf,

        /// Codel column
        #[arg(short, long)]
        x: u32,

        /// Codel row
        #[arg(short, long)]
        y: u32,

        /// New color, e.g. "#ffc0c0"
        #[arg(long)]
        color: String,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Pixels per codel in the output
        #[arg(long, default_value = "1")]
        scale: u32,

        #[command(flatten)]
        load: LoadArgs,
    },
    /// Write the codel grid as PNG, one codel per `scale`×`scale` pixels
    Export {
        image: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Pixels per codel in the output
        #[arg(long, default_value = "1")]
        scale: u32,

        #[command(flatten)]
        load: LoadArgs,
    },
}

#[derive(Serialize)]
struct InspectResult {
    file: String,
    #[serde(flatten)]
    load: LoadReport,
    distinct_colors: usize,
}

fn load_image(path: &Path) -> Result<CodelImage> {
    let img = image::open(path)
        .with_context(|| format!("failed to open image: {}", path.display()))?
        .into_rgba8();

    let width = img.width();
    let height = img.height();
    CodelImage::from_rgba_bytes(width, height, img.as_raw())
        .with_context(|| format!("unexpected pixel layout in {}", path.display()))
}

fn write_png(img: &CodelImage, scale: u32, path: &Path) -> Result<()> {
    let img = img
        .upscale(scale)
        .with_context(|| format!("cannot scale codel grid by {scale}"))?;
    let out = image::RgbaImage::from_raw(img.width, img.height, img.to_rgba_bytes())
        .context("pixel buffer does not match image size")?;
    out.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Block members as `(x, y)` pairs on one line.
fn format_cells(cells: &[(u32, u32)]) -> String {
    cells
        .iter()
        .map(|(x, y)| format!("({x}, {y})"))
        .collect::<Vec<_>>()
        .join(" ")
}

impl LoadArgs {
    /// Resolve the grid config: file first, then the command-line override.
    fn grid_config(&self) -> Result<GridConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config: {}", path.display()))?;
                GridConfig::from_toml(&text)?
            }
            None => GridConfig::default(),
        };
        if let Some(codel_size) = self.codel_size {
            config.codel_size = codel_size;
        }
        Ok(config)
    }

    fn load_store(&self, path: &Path) -> Result<(GridStore, LoadReport)> {
        let config = self.grid_config()?;
        let source = load_image(path)?;
        let mut store = GridStore::new();
        let report = store.load_with_config(&source, &config);
        info!(
            "{}: {}x{} pixels, codel size {}{}, {}x{} codels",
            path.display(),
            report.source_width,
            report.source_height,
            report.codel_size,
            if report.estimated { " (estimated)" } else { "" },
            report.columns,
            report.rows,
        );
        Ok((store, report))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.quiet { "error" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Command::Inspect {
            images,
            load,
            pretty,
        } => {
            for path in &images {
                let (store, report) = load.load_store(path)?;
                let distinct_colors = store.image().buf.iter().collect::<HashSet<_>>().len();
                let result = InspectResult {
                    file: path.display().to_string(),
                    load: report,
                    distinct_colors,
                };
                let json = if pretty {
                    serde_json::to_string_pretty(&result)?
                } else {
                    serde_json::to_string(&result)?
                };
                println!("{json}");
            }
        }
        Command::Status {
            image,
            x,
            y,
            cells,
            load,
        } => {
            let (store, _) = load.load_store(&image)?;
            let color = store.cell_color(x, y)?;
            println!("{}", store.cell_status_text(x, y)?);
            if cells {
                println!("{}", format_cells(&store.contiguous_cells(x, y)?));
            }
            debug!("codel ({x}, {y}) is {color}");
        }
        Command::Set {
            image,
            x,
            y,
            color,
            output,
            scale,
            load,
        } => {
            let (mut store, _) = load.load_store(&image)?;
            store.set_on_change(|change| {
                info!(
                    "codel ({}, {}) recolored to {}",
                    change.col, change.row, change.color
                );
            });
            store
                .set_cell_value(x, y, &color)
                .with_context(|| format!("cannot set codel ({x}, {y})"))?;
            println!("{}", store.cell_status_text(x, y)?);
            write_png(store.image(), scale, &output)?;
        }
        Command::Export {
            image,
            output,
            scale,
            load,
        } => {
            let (store, _) = load.load_store(&image)?;
            write_png(store.image(), scale, &output)?;
            info!("wrote {}", output.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use piet_codel::Color;

    #[test]
    fn status_accepts_long_coordinates() {
        let cli = Cli::try_parse_from([
            "piet-codel", "status", "hi.png", "--x", "3", "--y", "4", "--cells",
        ])
        .unwrap();
        match cli.command {
            Command::Status { x, y, cells, .. } => {
                assert_eq!((x, y), (3, 4));
                assert!(cells);
            }
            _ => panic!("expected status command"),
        }
    }

    #[test]
    fn status_accepts_short_coordinates() {
        let cli = Cli::try_parse_from(["piet-codel", "status", "hi.png", "-x", "1", "-y", "2"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Status {
                x: 1,
                y: 2,
                cells: false,
                ..
            }
        ));
    }

    #[test]
    fn set_accepts_long_coordinates() {
        let cli = Cli::try_parse_from([
            "piet-codel", "set", "hi.png", "--x", "0", "--y", "5", "--color", "#ff0000", "-o",
            "out.png",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Set { x: 0, y: 5, .. }));
    }

    #[test]
    fn block_cells_are_listed() {
        #[rustfmt::skip]
        let store = GridStore::from_image(CodelImage::from_buf(3, 2, vec![
            Color::BLACK, Color::WHITE, Color::WHITE,
            Color::BLACK, Color::BLACK, Color::WHITE,
        ]).unwrap());
        let cells = store.contiguous_cells(1, 1).unwrap();
        assert_eq!(format_cells(&cells), "(0, 0) (0, 1) (1, 1)");
        assert_eq!(format_cells(&[]), "");
    }

    #[test]
    fn oversized_export_scale_is_an_error() {
        let img = CodelImage::new(70_000, 1, Color::BLACK);
        let path = std::env::temp_dir().join("piet-codel-never-written.png");
        let err = write_png(&img, 70_000, &path).unwrap_err();
        assert!(err.to_string().contains("cannot scale codel grid by 70000"));
        assert!(!path.exists());
    }
}
