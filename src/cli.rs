//! Command-line interface implementation

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, CrayolaConfig};
use crate::container::Element;
use crate::gif::render_gif;
use crate::models::{Dimension, ScreenSize, Sprite, Warning};
use crate::output::{default_output_path, is_gif_path, save_png, scale_image, tick_output_path};
use crate::parser::{load_scene, LoadedScene};
use crate::scene::{SceneOptions, SceneRenderer};
use crate::signal::ResizeSignal;
use crate::surface::Canvas;

/// Exit codes
const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_INVALID_ARGS: u8 = 2;

/// Crayola - play back animated pixel-sprite scenes to PNG or GIF
#[derive(Parser)]
#[command(name = "cyl")]
#[command(about = "Crayola - play back animated pixel-sprite scenes to PNG or GIF")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scene for a number of ticks and write the rendered frames
    Render {
        /// Scene document (JSON5)
        input: PathBuf,

        /// Output file or directory.
        /// If omitted: {input}.png, or {input}.gif for several ticks
        /// If .gif: one animated GIF
        /// If file (single tick): output.png
        /// If file (multiple): output_{tick}.png
        /// If directory (ends with /): dir/{tick}.png
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of updates to run
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        ticks: Option<u32>,

        /// Host viewport size as WIDTHxHEIGHT
        #[arg(long, value_parser = parse_viewport)]
        viewport: Option<(u32, u32)>,

        /// Logical screen size as WIDTHxHEIGHT, e.g. 50%x120px.
        /// Overrides the scene document
        #[arg(long, value_parser = parse_screen)]
        screen: Option<ScreenSize>,

        /// Pixel size, overrides the scene document
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        pixel_size: Option<u32>,

        /// Scale output by integer factor (1-16)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=16))]
        scale: Option<u32>,

        /// GIF delay per tick in milliseconds
        #[arg(long)]
        frame_duration: Option<u32>,

        /// Strict mode: treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Path to crayola.toml (default: search upwards from cwd)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Describe the sprites in a scene document
    Info {
        /// Scene document (JSON5)
        input: PathBuf,

        /// Strict mode: treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

/// Parse `WIDTHxHEIGHT` into a pair of positive integers.
pub fn parse_viewport(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;
    let parse = |part: &str| -> Result<u32, String> {
        match part.trim().parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(format!("invalid viewport dimension '{}'", part)),
        }
    };
    Ok((parse(w)?, parse(h)?))
}

/// Parse `WIDTHxHEIGHT` where each side is a dimension like `50%`, `120px`
/// or `120`.
pub fn parse_screen(value: &str) -> Result<ScreenSize, String> {
    // `px` contains an `x`, so try every separator position
    value
        .char_indices()
        .filter(|(_, c)| matches!(c, 'x' | 'X'))
        .find_map(|(i, _)| {
            let width = value[..i].parse::<Dimension>().ok()?;
            let height = value[i + 1..].parse::<Dimension>().ok()?;
            Some(ScreenSize::new(width, height))
        })
        .ok_or_else(|| format!("expected WIDTHxHEIGHT like 50%x120px, got '{}'", value))
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            output,
            ticks,
            viewport,
            screen,
            pixel_size,
            scale,
            frame_duration,
            strict,
            config,
        } => {
            let overrides = CliOverrides {
                pixel_size,
                screen_size: screen,
                viewport,
                ticks,
                frame_duration_ms: frame_duration,
                scale,
                strict: strict.then_some(true),
            };
            run_render(&input, output.as_deref(), config.as_deref(), &overrides)
        }
        Commands::Info { input, strict } => run_info(&input, strict),
    }
}

/// Load a scene and print its warnings. On failure, returns the exit code.
fn load_reporting(input: &Path, strict: bool) -> Result<LoadedScene, ExitCode> {
    if !input.exists() {
        eprintln!("Error: Cannot open input file '{}'", input.display());
        return Err(ExitCode::from(EXIT_INVALID_ARGS));
    }

    let scene = match load_scene(input, strict) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };
    print_warnings(&scene.warnings);
    Ok(scene)
}

fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
}

/// Execute the render command
fn run_render(
    input: &Path,
    output: Option<&Path>,
    config_path: Option<&Path>,
    overrides: &CliOverrides,
) -> ExitCode {
    let config = match load_config(config_path).and_then(|c| merge_cli_overrides(c, overrides)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let scene = match load_reporting(input, config.render.strict) {
        Ok(scene) => scene,
        Err(code) => return code,
    };

    let options = scene_options(&config, &scene, overrides);
    let element = Element::new(config.viewport.width, config.viewport.height);
    let signal = ResizeSignal::new();

    let mut renderer = match SceneRenderer::new(scene.sprites, options, Canvas::default(), &element, &signal)
    {
        Ok(renderer) => renderer,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let ticks = config.render.ticks as usize;
    let mut captured = Vec::with_capacity(ticks);
    for _ in 0..ticks {
        renderer.update();
        captured.push(scale_image(renderer.surface().image().clone(), config.render.scale));
    }
    renderer.dispose();

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input, ticks > 1));

    if is_gif_path(&output) {
        if let Err(e) = render_gif(
            &captured,
            config.render.frame_duration_ms,
            config.render.loop_anim,
            &output,
        ) {
            eprintln!("Error: Failed to save '{}': {}", output.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
        println!("Saved: {}", output.display());
        return ExitCode::from(EXIT_SUCCESS);
    }

    let is_single_tick = captured.len() == 1;
    for (tick, image) in captured.iter().enumerate() {
        let path = tick_output_path(&output, tick, is_single_tick);
        if let Err(e) = save_png(image, &path) {
            eprintln!("Error: Failed to save '{}': {}", path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
        println!("Saved: {}", path.display());
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// CLI flags win over the scene document, which wins over crayola.toml.
fn scene_options(config: &CrayolaConfig, scene: &LoadedScene, overrides: &CliOverrides) -> SceneOptions {
    SceneOptions {
        pixel_size: overrides
            .pixel_size
            .or(scene.pixel_size)
            .unwrap_or(config.scene.pixel_size),
        screen_size: overrides
            .screen_size
            .or(scene.screen_size)
            .unwrap_or_else(|| config.scene.screen_size()),
    }
}

/// Execute the info command
fn run_info(input: &Path, strict: bool) -> ExitCode {
    let scene = match load_reporting(input, strict) {
        Ok(scene) => scene,
        Err(code) => return code,
    };

    println!("sprites: {}", scene.sprites.len());
    if let Some(pixel_size) = scene.pixel_size {
        println!("pixel_size: {}", pixel_size);
    }
    if let Some(screen) = scene.screen_size {
        println!("screen: {} x {}", screen.width, screen.height);
    }
    for (index, sprite) in scene.sprites.iter().enumerate() {
        println!("  [{}] {}", index, describe(sprite));
    }

    ExitCode::from(EXIT_SUCCESS)
}

fn describe(sprite: &Sprite) -> String {
    let (x, y) = sprite.position();
    match sprite {
        Sprite::Shape(shape) => format!(
            "shape at ({}, {}), {} frames, tick {}",
            x,
            y,
            shape.frame_count(),
            shape.tick()
        ),
        Sprite::Bitmap(bitmap) => {
            let b = bitmap.bitmap();
            format!("bitmap at ({}, {}), {}x{}", x, y, b.width, b.height)
        }
    }
}
