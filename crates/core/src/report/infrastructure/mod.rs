pub mod json_report;
pub mod label_font;
pub mod overlay_renderer;
pub mod text_report;
