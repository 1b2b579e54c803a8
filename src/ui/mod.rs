//! Presentation: egui panels and egui_plot charts over [`crate::state::AppState`].

pub mod panels;
pub mod plot;
