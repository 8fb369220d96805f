//! TacMap Settings Crate
//!
//! Handles measurement-engine configuration: the initial style, circle
//! generation, label units and glyph sizing, and annotation text sizes.

pub mod config;
pub mod error;

pub use config::{AnnotationSettings, CircleSettings, Config, LabelSettings};
pub use error::{SettingsError, SettingsResult};
