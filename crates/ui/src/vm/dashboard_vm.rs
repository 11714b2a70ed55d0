use services::Dashboard;

/// One lesson card, ready to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardLessonVm {
    pub id: u32,
    pub title: String,
    pub xp_label: String,
    pub completed: bool,
}

#[must_use]
pub fn map_dashboard_lessons(dashboard: &Dashboard) -> Vec<DashboardLessonVm> {
    dashboard
        .lessons
        .iter()
        .map(|lesson| DashboardLessonVm {
            id: lesson.meta.id().value(),
            title: lesson.meta.title().to_string(),
            xp_label: format!("{} XP", lesson.meta.xp()),
            completed: lesson.completed,
        })
        .collect()
}

/// Heart counter label next to the heart icon.
#[must_use]
pub fn hearts_label(count: u8) -> String {
    format!("x{count}")
}
