// src/config/state.rs
use super::options::AppOptions;

#[derive(Clone, Debug)]
pub struct GuiState {
    pub window_w: u32,
    pub window_h: u32,

    /// Which pair is highlighted in the left panel
    pub selected_key: Option<String>,

    /// Show the source text next to parsed numbers in the table
    pub show_raw_text: bool,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            window_w: 1000,
            window_h: 560,
            selected_key: None,
            show_raw_text: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: AppOptions,
    pub gui: GuiState,
}
