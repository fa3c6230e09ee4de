use crate::command::ActionId;

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: String,
    pub last_action_id: Option<ActionId>,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub debug_status_visible: bool,
    pub status: StatusState,
}
