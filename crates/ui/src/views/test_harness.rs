use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};

use backend::{InMemoryBackend, InMemoryPrefs};
use lingo_core::time::fixed_clock;
use services::{DashboardService, HeartsService, LessonFlowService};

use crate::context::{UiApp, build_app_context};
use crate::views::{DashboardView, LessonView};

#[derive(Clone)]
struct TestApp {
    dashboard_service: Arc<DashboardService>,
    lesson_flow: Arc<LessonFlowService>,
    hearts: Arc<HeartsService>,
}

impl UiApp for TestApp {
    fn dashboard_service(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard_service)
    }

    fn lesson_flow(&self) -> Arc<LessonFlowService> {
        Arc::clone(&self.lesson_flow)
    }

    fn hearts(&self) -> Arc<HeartsService> {
        Arc::clone(&self.hearts)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Dashboard,
    Lesson(u32),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::Lesson(lesson_id) => rsx! { LessonView { lesson_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub backend: InMemoryBackend,
    pub hearts: Arc<HeartsService>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, backend: InMemoryBackend) -> ViewHarness {
    let backend_arc: Arc<dyn backend::LingoBackend> = Arc::new(backend.clone());
    let prefs: Arc<dyn backend::PrefsStore> = Arc::new(InMemoryPrefs::new());
    let hearts = Arc::new(HeartsService::new(
        Arc::clone(&backend_arc),
        Arc::clone(&prefs),
        fixed_clock(),
    ));
    let app = TestApp {
        dashboard_service: Arc::new(DashboardService::new(
            Arc::clone(&backend_arc),
            Arc::clone(&prefs),
        )),
        lesson_flow: Arc::new(LessonFlowService::new(
            Arc::clone(&backend_arc),
            Arc::clone(&hearts),
        )),
        hearts: Arc::clone(&hearts),
    };

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app: Arc::new(app),
            view,
        },
    );

    ViewHarness {
        dom,
        backend,
        hearts,
    }
}
