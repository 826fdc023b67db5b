use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum ActivityKind {
    Unit,
    SubUnit,
    Lesson,
    Exercise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ActivityAction {
    Updated,
    Published,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContentStats {
    pub(crate) units: usize,
    pub(crate) sub_units: usize,
    pub(crate) lessons: usize,
    pub(crate) exercises: usize,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub(crate) struct ContentStatus {
    pub(crate) published: usize,
    pub(crate) draft: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct RecentActivity {
    pub(crate) id: String,
    pub(crate) title: String,
    #[serde(rename = "type")]
    pub(crate) kind: ActivityKind,
    pub(crate) action: ActivityAction,
    pub(crate) timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DashboardResponse {
    pub(crate) stats: ContentStats,
    pub(crate) status: ContentStatus,
    pub(crate) recent_activity: Vec<RecentActivity>,
}
