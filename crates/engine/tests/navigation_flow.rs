use std::sync::Arc;

use navdeck_engine::{
    ActivePathResolver, ConfigDefect, DrawerStateMachine, EventBus, FlatIndex, NavigationController, RecordingEventBus, RecordingSurface, SurfaceCall,
    build_index,
};
use navdeck_types::{
    BusEvent, FolderFocusRequest, MenuConfig, MenuEntryConfig, NavigateRequest, NavigationSource, NavigatorSettings, Topic, UiEvent,
};

const REPORTS: &str = "_internal_folder_1_reports";
const OPS: &str = "_internal_folder_1_ops";

fn load_fixture() -> MenuConfig {
    let menu = include_str!("data/console_menu.json");
    serde_json::from_str(menu).expect("load menu from fixture")
}

fn settings() -> NavigatorSettings {
    NavigatorSettings {
        strict_invariants: true,
        ..NavigatorSettings::default()
    }
}

struct Harness {
    controller: NavigationController,
    bus: Arc<RecordingEventBus>,
    surface: RecordingSurface,
}

impl Harness {
    fn new() -> Self {
        let bus = Arc::new(RecordingEventBus::new());
        let surface = RecordingSurface::new();
        let controller = NavigationController::new(Arc::new(build_index(&load_fixture())), bus.clone(), Box::new(surface.clone()), settings());
        Self { controller, bus, surface }
    }

    fn send(&mut self, event: UiEvent) {
        self.controller.dispatch(event).expect("dispatch ui event");
    }

    fn navigations(&self) -> Vec<NavigateRequest> {
        self.bus
            .events_on(Topic::NavigateRequest)
            .into_iter()
            .filter_map(|event| match event {
                BusEvent::NavigateRequest(request) => Some(request),
                _ => None,
            })
            .collect()
    }
}

fn page(path: &str) -> UiEvent {
    UiEvent::PageChanged { path: path.into() }
}

fn click(path: &str) -> UiEvent {
    UiEvent::ItemClicked { path: path.into() }
}

fn top(id: &str) -> UiEvent {
    UiEvent::TopLevelClicked { id: id.into() }
}

#[test]
fn fixture_builds_without_defects() {
    let index = build_index(&load_fixture());
    assert!(index.ensure_clean().is_ok(), "defects: {:?}", index.diagnostics());
    assert_eq!(index.top_level_nodes().len(), 4);
    assert_eq!(index.get("/ops/clusters/eu/nodes/b").map(|node| node.depth), Some(5));
}

#[test]
fn reports_archive_scenario_opens_both_drawers() {
    let index = build_index(&load_fixture());
    let active = ActivePathResolver::default().resolve("archive/2023-q1", &index).expect("resolved");
    assert_eq!(active.top_level.id, "reports");
    assert_eq!(active.folder_chain_paths(), vec!["archive"]);
    assert!(!active.is_folder);

    let mut harness = Harness::new();
    harness.send(page("archive/2023-q1"));

    assert_eq!(harness.controller.drawers().open_drawers(), vec![(2, REPORTS), (3, "archive")]);
    assert_eq!(harness.surface.rendered_at(2), Some(vec!["archive".to_string(), "/reports/summary".to_string()]));
    assert_eq!(harness.surface.rendered_at(3), Some(vec!["archive/2023-q1".to_string(), "archive/2023-q2".to_string()]));
    let calls = harness.surface.calls();
    assert!(calls.contains(&SurfaceCall::Current(Some("archive/2023-q1".into()))));
    assert!(calls.contains(&SurfaceCall::Ancestor("archive".into())));
    assert!(calls.contains(&SurfaceCall::TopLevel(Some("reports".into()))));
}

#[test]
fn latch_round_trip_restores_deep_target() {
    let mut harness = Harness::new();
    harness.send(page("archive/2023-q1"));
    harness.send(top("ops"));
    assert_eq!(harness.controller.drawers().open_drawers(), vec![(2, OPS)]);
    assert_eq!(harness.controller.latch().map(|latch| latch.target_path.as_str()), Some("archive/2023-q1"));

    harness.send(top("reports"));

    let last = harness.navigations().pop().expect("navigate request");
    assert_eq!(last.path, "archive/2023-q1");
    assert_eq!(last.source, NavigationSource::Latch);
    assert_eq!(harness.controller.drawers().open_drawers(), vec![(2, REPORTS), (3, "archive")]);
}

#[test]
fn changing_section_clears_then_relatches() {
    let mut harness = Harness::new();
    harness.send(page("archive/2023-q1"));
    harness.send(page("/boards"));

    let latches: Vec<_> = harness
        .bus
        .events_on(Topic::LatchUpdated)
        .into_iter()
        .map(|event| match event {
            BusEvent::LatchUpdated(record) => record.map(|record| record.top_level_id),
            _ => unreachable!("filtered by topic"),
        })
        .collect();
    assert_eq!(latches, vec![Some("reports".to_string()), None, Some("boards".to_string())]);
    assert!(harness.controller.drawers().all_closed());
}

#[test]
fn toggling_same_folder_closes_then_reopens() {
    let mut harness = Harness::new();

    harness.send(click("archive"));
    assert_eq!(harness.controller.drawers().open_drawers(), vec![(2, REPORTS), (3, "archive")]);

    harness.send(click("archive"));
    assert_eq!(harness.controller.drawers().open_drawers(), vec![(2, REPORTS)]);

    harness.send(click("archive"));
    assert_eq!(harness.controller.drawers().open_drawers(), vec![(2, REPORTS), (3, "archive")]);
    assert!(harness.navigations().is_empty());
}

#[test]
fn replacing_shallow_drawer_closes_every_deeper_one() {
    let index = build_index(&load_fixture());
    let mut drawers = DrawerStateMachine::new(true);
    drawers.open_at_depth(5, "/ops/clusters/eu/nodes", &index).expect("open deep chain");
    assert_eq!(drawers.open_drawers().len(), 4);

    let transition = drawers.open_at_depth(2, REPORTS, &index).expect("switch section");
    assert_eq!(drawers.open_drawers(), vec![(2, REPORTS)]);
    assert_eq!(transition.closed, vec![3, 4, 5]);
}

#[test]
fn deepest_page_opens_all_four_drawers() {
    let mut harness = Harness::new();
    harness.send(page("/ops/clusters/eu/nodes/a/"));

    assert_eq!(
        harness.controller.drawers().open_drawers(),
        vec![(2, OPS), (3, "/ops/clusters"), (4, "/ops/clusters/eu"), (5, "/ops/clusters/eu/nodes")]
    );
    let chain: Vec<_> = harness
        .controller
        .latch()
        .expect("latched")
        .folder_chain
        .iter()
        .map(|folder| folder.title.clone())
        .collect();
    assert_eq!(chain, vec!["Clusters", "Europe", "Nodes"]);
}

#[test]
fn colliding_paths_keep_last_entry() {
    let mut config = load_fixture();
    config
        .groups
        .at_depth_mut(2)
        .and_then(|groups| groups.get_mut("ops"))
        .expect("ops group")
        .push(MenuEntryConfig::leaf("summary-copy", "Ops summary", "/reports/summary/"));

    let index: FlatIndex = build_index(&config);
    let node = index.get("/reports/summary").expect("one node at the colliding path");
    assert_eq!(node.top_level_id, "ops");
    assert_eq!(index.iter().filter(|node| node.path == "/reports/summary").count(), 1);
    assert!(
        index
            .diagnostics()
            .iter()
            .any(|defect| matches!(defect, ConfigDefect::DuplicatePath { path, .. } if path == "/reports/summary"))
    );
    assert!(index.ensure_clean().is_err());
}

#[test]
fn breadcrumb_focus_runs_after_direct_events() {
    let mut harness = Harness::new();
    harness.send(page("/boards"));

    harness.bus.publish(BusEvent::FolderFocusRequest(FolderFocusRequest {
        folder_path: "/ops/clusters/eu".into(),
        top_level_id: "ops".into(),
        context: None,
    }));
    harness.send(UiEvent::OutsideInteraction { gesture_id: 1 });
    assert!(harness.controller.drawers().all_closed());

    assert_eq!(harness.controller.drain_external().expect("drain"), 1);
    assert_eq!(
        harness.controller.drawers().open_drawers(),
        vec![(2, OPS), (3, "/ops/clusters"), (4, "/ops/clusters/eu")]
    );
    assert_eq!(harness.navigations().len(), 0);
    assert_eq!(harness.controller.current(), Some("/boards"));
    assert_eq!(harness.controller.latch().map(|latch| latch.top_level_id.as_str()), Some("boards"));
}

#[test]
fn external_top_level_link_leaves_state_alone() {
    let mut harness = Harness::new();
    harness.send(page("/reports/summary"));
    let before = harness.controller.snapshot();

    harness.send(top("docs"));

    let request = harness.navigations().pop().expect("navigate request");
    assert_eq!(request.source, NavigationSource::External);
    assert_eq!(request.path, "https://docs.example.com/console");
    assert_eq!(harness.controller.snapshot(), before);
}

#[test]
fn unknown_page_resets_navigation() {
    let mut harness = Harness::new();
    harness.send(page("/ops/incidents"));
    harness.send(page("/settings/profile"));

    let snapshot = harness.controller.snapshot();
    assert!(snapshot.current.is_none());
    assert!(snapshot.active_top_level.is_none());
    assert!(snapshot.latch.is_none());
    assert!(snapshot.drawers.iter().all(|drawer| drawer.open_key.is_none()));
}
