pub mod app;
pub mod card;
pub mod left_panel;
pub mod settings;
pub mod settings_io;
