use std::time::{Duration, Instant};

use clap::Parser;
use planetgen::cli::CliArgs;
use planetgen::config::AppConfig;
use planetgen::display::{Display, InputEvent, MouseButtonKind, PixelBuffer, RenderTarget};
use planetgen::logging::init_logging;
use planetgen::orbit::OrbitControl;
use planetgen::planet::Planet;
use planetgen::render::Camera;
use planetgen::traits::{TraitEdit, TraitField, Traits};
use planetgen::util::FpsCounter;
use sdl2::keyboard::Keycode;
use tracing::{debug, info, warn};

const FPS_REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Validate `edit` against the current traits and rebuild on success
fn apply_edit(planet: &mut Planet, edit: TraitEdit) {
    match planet.traits().apply(edit) {
        Ok(traits) => {
            info!(?edit, "traits updated");
            planet.set_traits(traits);
        },
        Err(e) => warn!(?edit, "edit rejected: {}", e),
    }
}

/// Digit keys 1..7 pick the editable trait; the seed is driven by N instead
fn field_for_key(key: Keycode) -> Option<TraitField> {
    let index = match key {
        Keycode::Num1 => 1,
        Keycode::Num2 => 2,
        Keycode::Num3 => 3,
        Keycode::Num4 => 4,
        Keycode::Num5 => 5,
        Keycode::Num6 => 6,
        Keycode::Num7 => 7,
        _ => return None,
    };
    TraitField::ALL.get(index).copied()
}

fn load_config(args: &CliArgs) -> Result<AppConfig, String> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path).map_err(|e| e.to_string())?,
        None => AppConfig::default(),
    };
    config.apply_cli_overrides(args);
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn main() -> Result<(), String> {
    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(Some(&config.log_filter));

    let (mut display, texture_creator) = Display::with_options(
        "planetgen",
        config.window_width,
        config.window_height,
        config.vsync,
        config.background,
    )?;
    let mut target =
        RenderTarget::with_size(&texture_creator, config.render_width, config.render_height)?;
    let mut buffer = PixelBuffer::with_size(config.render_width, config.render_height);

    // Render pixels per window pixel
    let scale_x = config.render_width as f64 / display.width() as f64;
    let scale_y = config.render_height as f64 / display.height() as f64;

    let mut planet = Planet::new(config.traits);
    let mut orbit = OrbitControl::new(&config.orbit);
    let mut fps_counter = FpsCounter::new(60);
    let mut selected = TraitField::Size;
    let start = Instant::now();

    info!(
        seed = config.traits.seed,
        render = %format!("{}x{}", config.render_width, config.render_height),
        window = %format!("{}x{}", display.width(), display.height()),
        vsync = config.vsync,
        "planetgen started"
    );
    info!("keys: R randomize, N next seed, 1-7 select trait, Up/Down adjust, +/- terrains, Esc quit");

    'main: loop {
        let (dt, avg_fps) = fps_counter.tick();

        for event in display.poll_events() {
            match event {
                InputEvent::Quit => break 'main,
                InputEvent::KeyDown(key) => match key {
                    Keycode::Escape => break 'main,
                    Keycode::R => {
                        let traits = Traits::randomized(&mut rand::thread_rng());
                        info!(seed = traits.seed, "randomized traits");
                        planet.set_traits(traits);
                    },
                    Keycode::N => {
                        let edit = planet.traits().nudge(TraitField::Seed, 1);
                        apply_edit(&mut planet, edit);
                    },
                    Keycode::Up => {
                        let edit = planet.traits().nudge(selected, 1);
                        apply_edit(&mut planet, edit);
                    },
                    Keycode::Down => {
                        let edit = planet.traits().nudge(selected, -1);
                        apply_edit(&mut planet, edit);
                    },
                    Keycode::Equals | Keycode::Plus | Keycode::KpPlus => {
                        let edit = planet.traits().nudge(TraitField::NumTerrains, 1);
                        apply_edit(&mut planet, edit);
                    },
                    Keycode::Minus | Keycode::KpMinus => {
                        let edit = planet.traits().nudge(TraitField::NumTerrains, -1);
                        apply_edit(&mut planet, edit);
                    },
                    other => {
                        if let Some(field) = field_for_key(other) {
                            selected = field;
                            info!(field = field.name(), "selected trait");
                        }
                    },
                },
                InputEvent::MouseDown {
                    x,
                    y,
                    button: MouseButtonKind::Left,
                } => {
                    let inside = x >= 0
                        && y >= 0
                        && (x as u32) < display.width()
                        && (y as u32) < display.height();
                    orbit.pointer_down(x as f64 * scale_x, y as f64 * scale_y, inside);
                },
                InputEvent::MouseMove { x, y } => {
                    orbit.pointer_move(x as f64 * scale_x, y as f64 * scale_y);
                },
                InputEvent::MouseUp {
                    button: MouseButtonKind::Left,
                    ..
                } => orbit.pointer_up(),
                _ => {},
            }
        }

        orbit.update(dt);
        let camera = Camera::from_orbit(
            &orbit,
            start.elapsed().as_secs_f64(),
            config.spin_rate,
            buffer.width(),
            buffer.height(),
        );
        planet.render(&camera, &mut buffer);
        display.present(&mut target, &buffer)?;

        if fps_counter.should_report(FPS_REPORT_INTERVAL) {
            debug!(
                fps = avg_fps,
                frame_ms = fps_counter.avg_frame_time_ms(),
                "frame timing"
            );
        }
    }

    info!("shutting down");
    Ok(())
}
