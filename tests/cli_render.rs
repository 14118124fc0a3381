//! CLI integration tests for `cyl render` and `cyl info`
//!
//! These run the binary against scene documents written to a temp dir and
//! check the images it leaves behind.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const BLINK_SCENE: &str = r##"{
    // One 2x2 block alternating red and white every update
    pixel_size: 2,
    screen: { width: "8px", height: "6px" },
    sprites: [
        { kind: "shape", x: 1, y: 1, tick: 0, frames: [
            [{ x: 0, y: 0, color: "#ff0000" }],
            [{ x: 0, y: 0, color: "white" }],
        ]},
    ],
}"##;

fn cyl() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cyl"))
}

fn write_scene(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write scene");
    path
}

fn run(command: &mut Command) -> Output {
    command.output().expect("Failed to execute cyl")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "cyl failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn open_rgba(path: &Path) -> image::RgbaImage {
    image::open(path).expect("Failed to open output image").to_rgba8()
}

#[test]
fn test_render_single_tick_png() {
    let dir = TempDir::new().unwrap();
    let scene = write_scene(dir.path(), "blink.json5", BLINK_SCENE);
    let out = dir.path().join("out.png");

    let output = run(cyl().arg("render").arg(&scene).arg("-o").arg(&out));
    assert_success(&output);

    let image = open_rgba(&out);
    assert_eq!(image.dimensions(), (8, 6));
    assert_eq!(image.get_pixel(1, 1).0, [255, 0, 0, 255]);
    assert_eq!(image.get_pixel(2, 2).0, [255, 0, 0, 255]);
    assert_eq!(image.get_pixel(3, 3).0[3], 0);
}

#[test]
fn test_render_png_sequence() {
    let dir = TempDir::new().unwrap();
    let scene = write_scene(dir.path(), "blink.json5", BLINK_SCENE);
    let out = dir.path().join("frames/blink.png");

    let output = run(cyl().arg("render").arg(&scene).arg("-o").arg(&out).args(["--ticks", "3"]));
    assert_success(&output);

    let frames = dir.path().join("frames");
    assert_eq!(open_rgba(&frames.join("blink_0.png")).get_pixel(1, 1).0, [255, 0, 0, 255]);
    assert_eq!(open_rgba(&frames.join("blink_1.png")).get_pixel(1, 1).0, [255, 255, 255, 255]);
    assert_eq!(open_rgba(&frames.join("blink_2.png")).get_pixel(1, 1).0, [255, 0, 0, 255]);
    assert!(!frames.join("blink_3.png").exists());
}

#[test]
fn test_render_gif() {
    let dir = TempDir::new().unwrap();
    let scene = write_scene(dir.path(), "blink.json5", BLINK_SCENE);
    let out = dir.path().join("blink.gif");

    let output = run(cyl().arg("render").arg(&scene).arg("-o").arg(&out).args(["--ticks", "4"]));
    assert_success(&output);

    let bytes = fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"GIF8"));
}

#[test]
fn test_render_default_output_path() {
    let dir = TempDir::new().unwrap();
    let scene = write_scene(dir.path(), "walk.json5", BLINK_SCENE);

    assert_success(&run(cyl().arg("render").arg(&scene)));
    assert!(dir.path().join("walk.png").exists());

    assert_success(&run(cyl().arg("render").arg(&scene).args(["--ticks", "2"])));
    assert!(dir.path().join("walk.gif").exists());
}

#[test]
fn test_render_scale_and_pixel_size_flags() {
    let dir = TempDir::new().unwrap();
    let scene = write_scene(dir.path(), "blink.json5", BLINK_SCENE);
    let out = dir.path().join("big.png");

    let output = run(cyl()
        .arg("render")
        .arg(&scene)
        .arg("-o")
        .arg(&out)
        .args(["--scale", "2", "--pixel-size", "3"]));
    assert_success(&output);

    let image = open_rgba(&out);
    assert_eq!(image.dimensions(), (16, 12));
    // Block spans device pixels 1..4, so 2..8 after scaling
    assert_eq!(image.get_pixel(7, 7).0, [255, 0, 0, 255]);
    assert_eq!(image.get_pixel(8, 8).0[3], 0);
}

#[test]
fn test_render_viewport_with_percent_screen() {
    let dir = TempDir::new().unwrap();
    let scene = write_scene(
        dir.path(),
        "half.json5",
        r##"{ screen: { width: "50%", height: "25%" },
             sprites: [{ kind: "shape", frames: [[{ x: 0, y: 0, color: "#000" }]] }] }"##,
    );
    let out = dir.path().join("half.png");

    let output = run(cyl().arg("render").arg(&scene).arg("-o").arg(&out).args(["--viewport", "40x40"]));
    assert_success(&output);
    assert_eq!(open_rgba(&out).dimensions(), (20, 10));
}

#[test]
fn test_render_screen_flag_overrides_document() {
    let dir = TempDir::new().unwrap();
    let scene = write_scene(dir.path(), "blink.json5", BLINK_SCENE);
    let out = dir.path().join("screen.png");

    let output = run(cyl()
        .arg("render")
        .arg(&scene)
        .arg("-o")
        .arg(&out)
        .args(["--viewport", "40x20", "--screen", "50%x12px"]));
    assert_success(&output);
    assert_eq!(open_rgba(&out).dimensions(), (20, 12));

    let output = run(cyl().arg("render").arg(&scene).args(["--screen", "wide"]));
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_render_reads_config_file() {
    let dir = TempDir::new().unwrap();
    let scene = write_scene(
        dir.path(),
        "plain.json5",
        r##"{ sprites: [{ kind: "shape", frames: [[{ x: 0, y: 0, color: "#000" }]] }] }"##,
    );
    let config = write_scene(dir.path(), "crayola.toml", "[viewport]\nwidth = 12\nheight = 9\n");
    let out = dir.path().join("plain.png");

    let output = run(cyl().arg("render").arg(&scene).arg("-o").arg(&out).arg("--config").arg(&config));
    assert_success(&output);
    assert_eq!(open_rgba(&out).dimensions(), (12, 9));
}

#[test]
fn test_render_unknown_kind_warns_in_lenient_mode() {
    let dir = TempDir::new().unwrap();
    let scene = write_scene(
        dir.path(),
        "mixed.json5",
        r##"{ sprites: [
            { kind: "sparkle" },
            { kind: "shape", frames: [[{ x: 0, y: 0, color: "#000" }]] },
        ] }"##,
    );
    let out = dir.path().join("mixed.png");

    let output = run(cyl().arg("render").arg(&scene).arg("-o").arg(&out));
    assert_success(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Warning: sprite 0"), "stderr: {}", stderr);
    assert!(out.exists());

    let output = run(cyl().arg("render").arg(&scene).arg("-o").arg(&out).arg("--strict"));
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_render_empty_scene_fails() {
    let dir = TempDir::new().unwrap();
    let scene = write_scene(dir.path(), "empty.json5", "{ sprites: [] }");

    let output = run(cyl().arg("render").arg(&scene));
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("at least one sprite"));
}

#[test]
fn test_render_missing_input() {
    let dir = TempDir::new().unwrap();
    let output = run(cyl().arg("render").arg(dir.path().join("nope.json5")));
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_info_lists_sprites() {
    let dir = TempDir::new().unwrap();
    let scene = write_scene(dir.path(), "blink.json5", BLINK_SCENE);

    let output = run(cyl().arg("info").arg(&scene));
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sprites: 1"), "stdout: {}", stdout);
    assert!(stdout.contains("pixel_size: 2"));
    assert!(stdout.contains("screen: 8px x 6px"));
    assert!(stdout.contains("[0] shape at (1, 1), 2 frames, tick 0"));
}
