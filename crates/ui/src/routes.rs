use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{DashboardView, LessonView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", DashboardView)] Dashboard {},
        #[route("/lesson/:lesson_id", LessonView)] Lesson { lesson_id: u32 },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            header { class: "topbar",
                Link { class: "brand", to: Route::Dashboard {}, "Lingo" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
