//! Scene playback tests against the in-memory canvas
//!
//! These drive a `SceneRenderer` the way a host would: an `Element` standing
//! in for the layout box, a `ResizeSignal` for viewport changes, and a
//! `Canvas` whose pixels are checked after each tick.

use crayola::models::{Bitmap, BitmapSprite, Dimension, Pixel, ScreenSize, ShapeSprite, Sprite};
use crayola::parser::parse_scene;
use crayola::{Canvas, Element, ResizeSignal, SceneError, SceneOptions, SceneRenderer};
use image::{Rgba, RgbaImage};
use std::path::Path;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// The white/black pair at (10, 10) with 5px blocks
fn two_pixel_sprite(tick: u32) -> ShapeSprite {
    ShapeSprite::new(vec![vec![Pixel::new(0, 0, WHITE), Pixel::new(5, 0, BLACK)]], tick)
        .unwrap()
        .at(10, 10)
}

/// A one-pixel sprite that alternates between red and white
fn blinking_sprite(tick: u32) -> ShapeSprite {
    ShapeSprite::new(vec![vec![Pixel::new(0, 0, RED)], vec![Pixel::new(0, 0, WHITE)]], tick).unwrap()
}

fn options() -> SceneOptions {
    SceneOptions::default()
}

fn current_frame(renderer: &SceneRenderer<Canvas, &Element>, index: usize) -> usize {
    renderer.assets().sprites[index]
        .as_shape()
        .expect("shape sprite")
        .current_frame()
}

#[test]
fn test_empty_sprite_list_is_rejected() {
    let element = Element::new(100, 100);
    let signal = ResizeSignal::new();
    let result = SceneRenderer::new(Vec::new(), options(), Canvas::default(), &element, &signal);

    assert_eq!(result.err(), Some(SceneError::EmptySpriteList));
    assert_eq!(signal.listener_count(), 0);
}

#[test]
fn test_zero_pixel_size_is_rejected() {
    let element = Element::new(100, 100);
    let signal = ResizeSignal::new();
    let opts = SceneOptions {
        pixel_size: 0,
        ..options()
    };
    let result = SceneRenderer::new(
        vec![two_pixel_sprite(0).into()],
        opts,
        Canvas::default(),
        &element,
        &signal,
    );

    assert!(matches!(result, Err(SceneError::InvalidPixelSize(_))));
}

#[test]
fn test_construction_sizes_canvas_from_screen_size() {
    let element = Element::new(200, 100);
    let signal = ResizeSignal::new();
    let opts = SceneOptions {
        pixel_size: 5,
        screen_size: ScreenSize::new(Dimension::Percent(50.0), Dimension::Pixels(30)),
    };
    let renderer =
        SceneRenderer::new(vec![two_pixel_sprite(0).into()], opts, Canvas::default(), &element, &signal)
            .unwrap();

    let frame = renderer.frame();
    assert_eq!((frame.width, frame.height), (100, 30));
    assert_eq!(renderer.surface().image().dimensions(), (100, 30));
    assert_eq!(element.style(), opts.screen_size);
    assert_eq!(renderer.assets().sprite_count, 1);
    assert!(renderer.is_listening());
}

#[test]
fn test_update_paints_pixel_blocks() {
    let element = Element::new(40, 40);
    let signal = ResizeSignal::new();
    let mut renderer =
        SceneRenderer::new(vec![two_pixel_sprite(0).into()], options(), Canvas::default(), &element, &signal)
            .unwrap();

    renderer.update();

    let canvas = renderer.surface();
    assert_eq!(canvas.pixel(10, 10), Some(WHITE));
    assert_eq!(canvas.pixel(14, 14), Some(WHITE));
    assert_eq!(canvas.pixel(15, 10), Some(BLACK));
    assert_eq!(canvas.pixel(19, 14), Some(BLACK));
    assert_eq!(canvas.pixel(20, 10), Some(CLEAR));
    assert_eq!(canvas.pixel(10, 15), Some(CLEAR));

    let track = renderer.assets().sprites[0].track();
    assert_eq!(track.rendered_x(), &[10, 15]);
    assert_eq!(track.rendered_y(), &[10, 10]);
    assert!(track.hit(12, 12, renderer.pixel_size()));
    assert!(!track.hit(30, 30, renderer.pixel_size()));
}

#[test]
fn test_tracking_resets_each_tick() {
    let element = Element::new(40, 40);
    let signal = ResizeSignal::new();
    let mut renderer =
        SceneRenderer::new(vec![two_pixel_sprite(0).into()], options(), Canvas::default(), &element, &signal)
            .unwrap();

    for _ in 0..3 {
        renderer.update();
    }
    assert_eq!(renderer.assets().sprites[0].track().len(), 2);

    renderer.clear();
    assert!(renderer.assets().sprites[0].track().is_empty());
    assert_eq!(renderer.surface().pixel(10, 10), Some(CLEAR));
}

#[test]
fn test_frames_advance_after_tick_plus_one_updates() {
    let element = Element::new(20, 20);
    let signal = ResizeSignal::new();
    let mut renderer =
        SceneRenderer::new(vec![blinking_sprite(2).into()], options(), Canvas::default(), &element, &signal)
            .unwrap();

    // The counter must exceed the tick, so the first change lands on update 4
    let mut seen = Vec::new();
    for _ in 0..8 {
        renderer.update();
        seen.push(current_frame(&renderer, 0));
    }
    assert_eq!(seen, vec![0, 0, 0, 1, 1, 1, 0, 0]);
}

#[test]
fn test_canvas_shows_current_frame() {
    let element = Element::new(20, 20);
    let signal = ResizeSignal::new();
    let mut renderer =
        SceneRenderer::new(vec![blinking_sprite(0).into()], options(), Canvas::default(), &element, &signal)
            .unwrap();

    renderer.update();
    assert_eq!(renderer.surface().pixel(0, 0), Some(RED));
    renderer.update();
    assert_eq!(renderer.surface().pixel(0, 0), Some(WHITE));
    renderer.update();
    assert_eq!(renderer.surface().pixel(0, 0), Some(RED));
}

#[test]
fn test_sprites_paint_in_order() {
    let element = Element::new(20, 20);
    let signal = ResizeSignal::new();
    let under = ShapeSprite::new(vec![vec![Pixel::new(0, 0, RED)]], 0).unwrap();
    let over = ShapeSprite::new(vec![vec![Pixel::new(0, 0, BLACK)]], 0).unwrap();
    let mut renderer = SceneRenderer::new(
        vec![under.into(), over.into()],
        options(),
        Canvas::default(),
        &element,
        &signal,
    )
    .unwrap();

    renderer.update();
    assert_eq!(renderer.surface().pixel(2, 2), Some(BLACK));
}

#[test]
fn test_bitmap_sprite_draws_scaled_image() {
    let element = Element::new(20, 20);
    let signal = ResizeSignal::new();
    let bitmap = Bitmap::new(RgbaImage::from_pixel(2, 2, RED)).at(4, 4).sized(6, 6);
    let sprites: Vec<Sprite> = vec![BitmapSprite::from_bitmap(bitmap).into()];
    let mut renderer = SceneRenderer::new(sprites, options(), Canvas::default(), &element, &signal).unwrap();

    renderer.update();
    renderer.update();

    let canvas = renderer.surface();
    assert_eq!(canvas.pixel(4, 4), Some(RED));
    assert_eq!(canvas.pixel(9, 9), Some(RED));
    assert_eq!(canvas.pixel(10, 10), Some(CLEAR));
    assert!(renderer.assets().sprites[0].track().is_empty());
}

#[test]
fn test_set_sprites() {
    let element = Element::new(20, 20);
    let signal = ResizeSignal::new();
    let mut renderer =
        SceneRenderer::new(vec![two_pixel_sprite(0).into()], options(), Canvas::default(), &element, &signal)
            .unwrap();

    assert_eq!(renderer.set_sprites(Vec::new()), Err(SceneError::EmptySpriteList));
    assert_eq!(renderer.assets().sprite_count, 1);

    renderer
        .set_sprites(vec![blinking_sprite(0).into(), blinking_sprite(1).into()])
        .unwrap();
    assert_eq!(renderer.assets().sprite_count, 2);
}

#[test]
fn test_host_moves_sprite_between_ticks() {
    let element = Element::new(40, 40);
    let signal = ResizeSignal::new();
    let mut renderer =
        SceneRenderer::new(vec![two_pixel_sprite(0).into()], options(), Canvas::default(), &element, &signal)
            .unwrap();

    renderer.update();
    renderer.sprite_mut(0).unwrap().set_position(0, 20);
    renderer.update();

    assert_eq!(renderer.surface().pixel(10, 10), Some(CLEAR));
    assert_eq!(renderer.surface().pixel(0, 20), Some(WHITE));
    assert_eq!(renderer.assets().sprites[0].track().rendered_y(), &[20, 20]);
    assert!(renderer.sprite_mut(1).is_none());
}

#[test]
fn test_viewport_resize_applies_on_next_update() {
    let element = Element::new(40, 40);
    let signal = ResizeSignal::new();
    let mut renderer =
        SceneRenderer::new(vec![two_pixel_sprite(0).into()], options(), Canvas::default(), &element, &signal)
            .unwrap();
    renderer.update();

    element.set_viewport(60, 30);
    signal.emit();
    let frame = renderer.frame();
    assert_eq!((frame.width, frame.height), (40, 40));

    renderer.update();
    let frame = renderer.frame();
    assert_eq!((frame.width, frame.height), (60, 30));
    assert_eq!(renderer.surface().image().dimensions(), (60, 30));
    assert_eq!(renderer.surface().pixel(10, 10), Some(WHITE));
    assert_eq!(renderer.surface().pixel(59, 29), Some(CLEAR));
}

#[test]
fn test_dispose_ignores_later_resizes() {
    let element = Element::new(40, 40);
    let signal = ResizeSignal::new();
    let mut renderer =
        SceneRenderer::new(vec![two_pixel_sprite(0).into()], options(), Canvas::default(), &element, &signal)
            .unwrap();

    renderer.dispose();
    assert_eq!(signal.listener_count(), 0);

    element.set_viewport(10, 10);
    signal.emit();
    renderer.update();
    assert_eq!(renderer.frame().width, 40);

    // A direct call still re-measures
    renderer.on_resize();
    assert_eq!(renderer.frame().width, 10);
}

#[test]
fn test_dropping_renderer_unsubscribes() {
    let element = Element::new(40, 40);
    let signal = ResizeSignal::new();
    {
        let _renderer = SceneRenderer::new(
            vec![two_pixel_sprite(0).into()],
            options(),
            Canvas::default(),
            &element,
            &signal,
        )
        .unwrap();
        assert_eq!(signal.listener_count(), 1);
    }
    assert_eq!(signal.listener_count(), 0);
}

#[test]
fn test_into_surface_keeps_last_frame() {
    let element = Element::new(20, 20);
    let signal = ResizeSignal::new();
    let mut renderer =
        SceneRenderer::new(vec![blinking_sprite(0).into()], options(), Canvas::default(), &element, &signal)
            .unwrap();
    renderer.update();

    let image = renderer.into_surface().into_image();
    assert_eq!(*image.get_pixel(0, 0), RED);
}

#[test]
fn test_parsed_sprite_at_coordinate_limit_updates_without_panicking() {
    let text = r##"{ sprites: [
        { kind: "shape", x: 2147483647, y: 0, frames: [[{ x: 5, y: 0, color: "#fff" }]] },
    ] }"##;
    let document = parse_scene(text, true).unwrap().document;
    let sprites = document
        .sprites
        .into_iter()
        .map(|spec| spec.build(Path::new("")))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    let element = Element::new(20, 20);
    let signal = ResizeSignal::new();
    let mut renderer = SceneRenderer::new(sprites, options(), Canvas::default(), &element, &signal).unwrap();
    renderer.update();
    renderer.update();

    assert_eq!(renderer.assets().sprites[0].track().rendered_x(), &[i32::MAX]);
    assert!(renderer.surface().image().pixels().all(|p| *p == CLEAR));
}

#[test]
fn test_clear_uses_resized_region() {
    let element = Element::new(40, 40);
    let signal = ResizeSignal::new();
    let mut renderer =
        SceneRenderer::new(vec![two_pixel_sprite(0).into()], options(), Canvas::default(), &element, &signal)
            .unwrap();
    renderer.update();

    element.set_viewport(24, 16);
    signal.emit();
    renderer.clear();

    assert_eq!(renderer.surface().image().dimensions(), (24, 16));
    assert!(renderer.assets().sprites[0].track().is_empty());
}
