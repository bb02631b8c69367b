//! Blendkit demo: builds a small scene, replays a scripted input session
//! against it and prints what happened.
//!
//! ```text
//! RUST_LOG=info blendkit-demo --script scripts/demo.json
//! ```

mod widgets;

use std::path::PathBuf;

use anyhow::{Context, Result};
use blendkit::{
    EventPump, FrameKind, LinearLayout, Rect, Size, UiConfig, ViewId, WidgetCategory,
    Window,
};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::widgets::{Button, Panel};

const DEFAULT_SCRIPT: &str = include_str!("../scripts/demo.json");

#[derive(Debug, Parser)]
#[command(name = "blendkit-demo", about = "Replay scripted input against a demo scene")]
struct Args {
    /// JSON array of input events. Defaults to the bundled script.
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// JSON UI config overriding the defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 640)]
    width: i32,

    #[arg(long, default_value_t = 480)]
    height: i32,
}

/// The ids the summary reports on.
struct Scene {
    workspace: ViewId,
    dialog: ViewId,
    buttons: Vec<(&'static str, ViewId)>,
}

#[derive(Debug, Serialize)]
struct ButtonSummary {
    label: &'static str,
    clicks: u32,
    typed: String,
    focused: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    events: usize,
    accepted: usize,
    focused_frame: Option<&'static str>,
    dialog_rect: Option<Rect>,
    draw_commands: usize,
    vertices: usize,
    buttons: Vec<ButtonSummary>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => UiConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => UiConfig::default(),
    };
    let script = match &args.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?,
        None => DEFAULT_SCRIPT.to_string(),
    };

    let mut window = Window::new(Size::new(args.width, args.height), config);
    let scene = build_scene(&mut window)?;
    tracing::info!("Scene ready: {} frames", window.frames().len());

    let mut pump = EventPump::from_json_str(&script).context("parsing input script")?;
    let report = pump.dispatch_all(&mut window);

    let list = window.draw();
    let summary = Summary {
        events: report.processed,
        accepted: report.accepted,
        focused_frame: window.focused_frame().map(|f| {
            if f == scene.dialog {
                "dialog"
            } else if f == scene.workspace {
                "workspace"
            } else {
                "other"
            }
        }),
        dialog_rect: window.tree().rect(scene.dialog),
        draw_commands: list.len(),
        vertices: list.commands().iter().map(|c| c.vertex_count()).sum(),
        buttons: scene
            .buttons
            .iter()
            .filter_map(|(label, id)| {
                let button = window.tree().view::<Button>(*id)?;
                Some(ButtonSummary {
                    label: *label,
                    clicks: button.clicks,
                    typed: button.typed.clone(),
                    focused: window.tree().is_focused(*id),
                })
            })
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// A full-window workspace with buttons A and B, and a floating dialog
/// holding a column of two buttons.
fn build_scene(window: &mut Window) -> Result<Scene> {
    let size = window.size();
    let workspace = window.add_frame(
        Panel {
            name: "workspace",
            category: WidgetCategory::Regular,
        },
        FrameKind::Regular,
        Rect::new(0, 0, size.width, size.height),
    )?;
    let dialog = window.add_frame(
        Panel {
            name: "dialog",
            category: WidgetCategory::Menu,
        },
        FrameKind::Floating,
        Rect::new(300, 200, 200, 120),
    )?;

    let mut buttons = Vec::new();
    let tree = window.tree_mut();
    for (label, rect) in [
        ("A", Rect::new(0, 0, 100, 100)),
        ("B", Rect::new(100, 0, 100, 100)),
    ] {
        let id = tree.insert(Button::new(label));
        tree.set_initial_geometry(id, rect.origin(), rect.size())?;
        tree.push_back_subview(workspace, id)?;
        buttons.push((label, id));
    }

    let column = tree.insert(LinearLayout::vertical().spacing(4).padding(8));
    tree.set_initial_geometry(column, Default::default(), Size::new(200, 120))?;
    for label in ["OK", "Cancel"] {
        let id = tree.insert(Button::new(label));
        tree.push_back_subview(column, id)?;
        buttons.push((label, id));
    }
    tree.push_back_subview(dialog, column)?;
    Ok(Scene {
        workspace,
        dialog,
        buttons,
    })
}
