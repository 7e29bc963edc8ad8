//! App state persistence: JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::{AppState, Focus, Overlay};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub last_area: Option<String>,
    pub focus: Focus,
    pub welcome_dismissed: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            last_area: None,
            focus: Focus::Areas,
            welcome_dismissed: false,
        }
    }
}

/// Load persisted state from disk. Returns defaults if the file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt state file");
            PersistedState::default()
        }),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        last_area: app.selected_area().map(str::to_string),
        focus: app.focus,
        welcome_dismissed: app.overlay != Overlay::Welcome,
    }
}

/// Apply persisted state. The last area is re-selected only if the dataset still has it.
pub fn apply(app: &mut AppState, state: PersistedState) {
    if let Some(area) = &state.last_area {
        app.restore_area(area);
    }
    app.focus = state.focus;
    if !state.welcome_dismissed {
        app.overlay = Overlay::Welcome;
    }
}
