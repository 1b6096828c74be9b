pub mod report_renderer;
