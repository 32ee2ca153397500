//! Headless simulation command

use super::{load_game, OutputFormat};
use anyhow::{bail, Result};
use serde::Serialize;
use skyhop_core::{ControllerId, Handle};
use skyhop_input::Action;
use skyhop_runtime::{DrawCall, EntitySnapshot, GameState, RecordingRenderer};
use skyhop_sim::SkillEventKind;
use std::collections::BTreeSet;
use tracing::info;

pub struct SimulateArgs {
    pub map: String,
    pub config: Option<String>,
    pub frames: u64,
    pub dt: f32,
    pub hold: Vec<(Action, usize)>,
    pub tap: Vec<(Action, u64, usize)>,
    pub render: bool,
    pub format: OutputFormat,
}

/// One skill event, tagged with the frame it happened in
#[derive(Serialize)]
struct EventRecord {
    frame: u64,
    entity: u32,
    slot: usize,
    skill: String,
    kind: &'static str,
}

#[derive(Serialize)]
struct SimulationOutput {
    frames: u64,
    total_time: f64,
    particles: usize,
    events: Vec<EventRecord>,
    entities: Vec<EntitySnapshot>,
}

/// Scripted button state for one frame
fn apply_script(game: &mut GameState, args: &SimulateArgs, frame: u64) {
    let mut touched = BTreeSet::new();
    for &(action, ctrl) in &args.hold {
        touched.insert((ctrl, action.index()));
    }
    for &(action, _, ctrl) in &args.tap {
        touched.insert((ctrl, action.index()));
    }

    for (ctrl, action_index) in touched {
        let action = Action::ALL[action_index];
        let pressed = args.hold.contains(&(action, ctrl))
            || args
                .tap
                .iter()
                .any(|&(a, f, c)| a == action && c == ctrl && f == frame);
        game.input
            .set_action(ControllerId::from_index(ctrl), action, pressed);
    }
}

pub fn run(args: SimulateArgs) -> Result<()> {
    if !(args.dt.is_finite() && args.dt >= 0.0) {
        bail!("--dt must be a non-negative number, got {}", args.dt);
    }
    let (mut game, _) = load_game(&args.map, args.config.as_deref())?;

    let controllers = game.input.controller_count();
    let scripted = args
        .hold
        .iter()
        .map(|&(_, c)| c)
        .chain(args.tap.iter().map(|&(_, _, c)| c));
    for ctrl in scripted {
        if ctrl >= controllers {
            bail!(
                "controller {} does not exist ({} configured)",
                ctrl,
                controllers
            );
        }
    }

    info!(map = %args.map, frames = args.frames, dt = args.dt, "starting simulation");
    let mut events = Vec::new();
    for frame in 0..args.frames {
        apply_script(&mut game, &args, frame);
        let report = game.update(args.dt);
        events.extend(report.skill_events.iter().map(|e| EventRecord {
            frame,
            entity: e.entity.raw(),
            slot: e.slot,
            skill: e.skill.to_string(),
            kind: match e.kind {
                SkillEventKind::Triggered => "triggered",
                SkillEventKind::Finished => "finished",
            },
        }));
    }

    let output = SimulationOutput {
        frames: game.clock.frame,
        total_time: game.clock.total_time,
        particles: game.particles.particle_count(),
        events,
        entities: game.snapshot(),
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Text => print_text(&output),
    }

    if args.render {
        let mut renderer = RecordingRenderer::default();
        game.render(&mut renderer);
        print_draw_calls(&renderer.calls);
    }

    Ok(())
}

fn print_text(output: &SimulationOutput) {
    println!(
        "Simulated {} frame(s), {:.3}s, {} live particle(s)",
        output.frames, output.total_time, output.particles
    );

    if !output.events.is_empty() {
        println!("\nSkill events:");
        for e in &output.events {
            println!(
                "  frame {:>5}  entity {}  slot {}  {} {}",
                e.frame, e.entity, e.slot, e.skill, e.kind
            );
        }
    }

    println!("\nEntities:");
    for entity in &output.entities {
        println!(
            "  #{} {:<10} pos ({:.3}, {:.3})  vel ({:.3}, {:.3})  [{}]",
            entity.id,
            entity.kind,
            entity.position[0],
            entity.position[1],
            entity.velocity[0],
            entity.velocity[1],
            entity.flags.join(", ")
        );
        if let Some(player) = &entity.player {
            let skills: Vec<String> = player.active_skills.iter().map(|s| s.to_string()).collect();
            println!(
                "      controller {}  health {:.1}  mana {:.1}  jumps {}  status [{}]  active [{}]",
                player.controller,
                player.health,
                player.mana,
                player.jumps,
                player.status.join(", "),
                skills.join(", ")
            );
        }
    }
}

fn print_draw_calls(calls: &[DrawCall]) {
    println!("\nDraw calls:");
    for call in calls {
        match call {
            DrawCall::Bitmap { path, bounds } => println!(
                "  bitmap  {}  min {}  max {}",
                path,
                bounds.min(),
                bounds.max()
            ),
            DrawCall::Pattern { bitmaps, bounds } => println!(
                "  pattern [{}]  min {}  max {}",
                bitmaps.join(", "),
                bounds.min(),
                bounds.max()
            ),
            DrawCall::Text { text, position } => println!("  text    \"{}\" at {}", text, position),
        }
    }
}
