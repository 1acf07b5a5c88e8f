mod curve_plot;
mod document;
mod status_bar;

pub use curve_plot::CurvePlotWidget;
pub use document::DocumentWidget;
pub use status_bar::StatusBarWidget;
