//! Input processing module
//! Handles file detection, text extraction, and project lists

pub mod file_detector;
pub mod manager;
pub mod projects;
pub mod text_extractor;

pub use manager::InputManager;
pub use projects::load_projects;
