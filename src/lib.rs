pub mod analysis;
pub mod bands;
pub mod config;
pub mod facade;
pub mod heatmap;
pub mod model;
pub mod segmentation;
pub mod sound_power;
pub mod tools;
pub mod transmission;
