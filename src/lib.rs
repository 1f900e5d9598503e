pub mod catalog;
pub mod cli;
pub mod gallery;
pub mod image_service;
pub mod layout;
pub mod renderer;
pub mod utils;
