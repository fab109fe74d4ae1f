mod r#impl;
mod settings;
mod structs;

pub use r#impl::{get_config, init_config};
pub use settings::SurveySettings;
pub use structs::*;
