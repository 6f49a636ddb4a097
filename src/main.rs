use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use tilestrike::engine::assets::AssetLoader;
use tilestrike::engine::game_loop::FrameClock;
use tilestrike::engine::input::{Action, InputManager};
use tilestrike::game::{GameSession, GameSettings};
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::{Fullscreen, Window, WindowBuilder},
};

#[derive(Parser)]
#[command(version, about = "2D side-scrolling action platformer")]
struct Cli {
    /// Asset directory that level, character and image paths are relative to
    #[arg(long, value_name = "DIR", default_value = "assets")]
    assets: PathBuf,

    /// Settings file, created with defaults when missing
    #[arg(long, value_name = "FILE", default_value = "settings.json")]
    settings: PathBuf,

    /// Player character config
    #[arg(long, value_name = "FILE", default_value = "characters/player.json")]
    player: String,

    /// Level index
    #[arg(long, value_name = "FILE", default_value = "levels/levelPaths.json")]
    levels: String,

    /// Level to start in (defaults to the index's default level)
    #[arg(long, value_name = "NAME")]
    level: Option<String>,
}

fn set_fullscreen(window: &Window, fullscreen: bool) {
    window.set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    info!("Starting Tilestrike...");

    let settings = GameSettings::load_or_init(&cli.settings);
    let mut input = InputManager::new(settings.to_input_config());
    let video = settings.video;

    let mut session = GameSession::new(AssetLoader::new(&cli.assets), settings, &cli.player, &cli.levels)?;
    session.start(cli.level.as_deref())?;

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Tilestrike")
        .with_inner_size(winit::dpi::LogicalSize::new(
            video.resolution_width,
            video.resolution_height,
        ))
        .with_resizable(true)
        .build(&event_loop)?;
    set_fullscreen(&window, video.fullscreen);

    info!("Window created successfully");

    let mut clock = FrameClock::new();
    let settings_path = cli.settings;

    // Main event loop
    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::Resized(physical_size),
                ..
            } => {
                info!("Window resized to {:?}", physical_size);
                session.resize(physical_size.width as f32, physical_size.height as f32);
            }
            Event::WindowEvent {
                event: WindowEvent::Focused(focused),
                ..
            } => {
                if focused {
                    clock.resume();
                } else {
                    input.reset();
                    clock.pause();
                }
            }
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { event, .. },
                ..
            } => {
                input.process_keyboard_event(&event);
            }
            Event::WindowEvent {
                event: WindowEvent::RedrawRequested,
                ..
            } => {
                if input.just_pressed(Action::Quit) {
                    elwt.exit();
                    return;
                }
                if input.just_pressed(Action::ToggleDebug) {
                    session.toggle_debug();
                }
                if input.just_pressed(Action::ToggleFullscreen) {
                    let settings = session.settings_mut();
                    settings.video.fullscreen = !settings.video.fullscreen;
                    set_fullscreen(&window, settings.video.fullscreen);
                }

                let steps = clock.begin_frame();
                let snapshot = input.snapshot();
                for _ in 0..steps {
                    session.update(clock.timestep(), &snapshot);
                }

                // Rasterizing the draw list belongs to the graphics backend
                session.draw_list();
                input.end_frame();
            }
            Event::AboutToWait => {
                // Request redraw on next frame
                window.request_redraw();
            }
            Event::LoopExiting => {
                if let Err(err) = session.settings().save(&settings_path) {
                    log::warn!("{}", err);
                }
            }
            _ => {}
        }
    }).map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
