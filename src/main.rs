//! Flappy entry point
//!
//! Loads settings and sprites, then runs the fixed-rate game loop in the
//! terminal. Logs go to stderr (`RUST_LOG=info flappy 2>flappy.log`).

use std::error::Error;

use flappy::assets::{AssetProvider, ProceduralAssets};
use flappy::platform::{FrameGovernor, InputSource, TerminalGuard, TerminalInput};
use flappy::renderer::{Compositor, Renderer, Scene, TerminalRenderer};
use flappy::{Control, FileHighScoreStore, GameStateMachine, HighScoreStore, Settings};

/// Poll, step, render, at a fixed rate until the player quits
fn run<S, I, R>(
    machine: &mut GameStateMachine<S>,
    input: &mut I,
    renderer: &mut R,
    show_hud: bool,
) -> Result<(), Box<dyn Error>>
where
    S: HighScoreStore,
    I: InputSource,
    R: Renderer,
{
    let mut governor = FrameGovernor::new(machine.tuning().ticks_per_second);
    loop {
        governor.wait();
        let frame = input.poll();
        let control = machine.step(&frame);
        renderer.render(&Scene::of(machine, show_hud))?;
        if control == Control::Quit {
            return Ok(());
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    log::info!("Flappy starting");

    let settings = Settings::load_or_create();
    let sprites = ProceduralAssets.load()?;
    let masks = sprites.masks();
    settings.tuning.validate(masks.ground_width)?;

    let store = FileHighScoreStore::in_data_dir(&settings.high_score_file).unwrap_or_else(|e| {
        log::warn!("{}; keeping high score in the working directory", e);
        FileHighScoreStore::new(&settings.high_score_file)
    });
    log::info!("High score file: {}", store.path().display());

    let mut machine =
        GameStateMachine::new(settings.tuning.clone(), masks.shared(), store, settings.seed);
    let compositor = Compositor::new(sprites, &settings.tuning);

    let result = {
        let guard = TerminalGuard::enter()?;
        let mut renderer = TerminalRenderer::stdout(compositor)?;
        let mut input = TerminalInput::new(guard.reports_key_release());
        run(&mut machine, &mut input, &mut renderer, settings.show_hud)
    };

    match machine.best() {
        Some(best) => log::info!("Flappy exiting (best {})", best),
        None => log::info!("Flappy exiting"),
    }
    result
}
