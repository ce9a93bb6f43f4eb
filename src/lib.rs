pub mod config;
pub mod document;
pub mod error;
pub mod generation;
pub mod input;
pub mod live;
pub mod logging;
pub mod persistence;
pub mod render;
pub mod sections;
pub mod session;
pub mod store;
pub mod text_edit;
pub mod theme;
pub mod timer;
