//! `navdeck simulate`: replays scripted interaction against a live controller.

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use navdeck_engine::{EventBus, FlatIndex, NavigationController, RecordingEventBus, RenderSurface};
use navdeck_types::{BusEvent, MenuNode, NavigationSource, NavigatorSettings, UiEvent};
use serde::Deserialize;
use tracing::debug;

/// One scripted step: `{"ui": {...}}` or `{"bus": {...}}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    Ui(UiEvent),
    Bus(BusEvent),
}

pub async fn read_script(path: &Path) -> Result<Vec<Step>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid simulation script {}", path.display()))
}

pub fn run(index: FlatIndex, steps: Vec<Step>, settings: NavigatorSettings, follow: bool) -> Result<()> {
    let bus = Arc::new(RecordingEventBus::new());
    let mut controller = NavigationController::new(Arc::new(index), bus.clone(), Box::new(TextSurface), settings);

    for (position, step) in steps.into_iter().enumerate() {
        println!("step {}: {}", position + 1, describe(&step));
        match step {
            Step::Ui(event) => controller.dispatch(event).context("ui event rejected")?,
            Step::Bus(event) => bus.publish(event),
        }
        controller.drain_external().context("external event rejected")?;

        for event in bus.take() {
            println!("  bus {}", serde_json::to_string(&event)?);
            if follow
                && let BusEvent::NavigateRequest(request) = event
                && request.source != NavigationSource::External
            {
                debug!(path = %request.path, "following navigation");
                controller
                    .dispatch(UiEvent::PageChanged { path: request.path })
                    .context("followed navigation rejected")?;
            }
        }
        for event in bus.take() {
            println!("  bus {}", serde_json::to_string(&event)?);
        }
    }

    println!("{}", serde_json::to_string_pretty(&controller.snapshot())?);
    Ok(())
}

fn describe(step: &Step) -> String {
    let value = match step {
        Step::Ui(event) => serde_json::to_string(event),
        Step::Bus(event) => serde_json::to_string(event),
    };
    value.unwrap_or_else(|_| format!("{step:?}"))
}

/// Prints every surface call as an indented line.
struct TextSurface;

impl RenderSurface for TextSurface {
    fn show_container(&mut self, depth: u8) {
        println!("  show drawer {depth}");
    }

    fn hide_container(&mut self, depth: u8) {
        println!("  hide drawer {depth}");
    }

    fn render_items(&mut self, depth: u8, nodes: &[&MenuNode]) {
        let titles: Vec<_> = nodes.iter().map(|node| node.title.as_str()).collect();
        println!("  drawer {depth}: {}", titles.join(", "));
    }

    fn mark_current(&mut self, path: Option<&str>) {
        println!("  current: {}", path.unwrap_or("-"));
    }

    fn mark_ancestor_folder(&mut self, path: &str) {
        println!("  ancestor: {path}");
    }

    fn mark_top_level(&mut self, id: Option<&str>) {
        println!("  section: {}", id.unwrap_or("-"));
    }

    fn clear_marks(&mut self) {}
}
