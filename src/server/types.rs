use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::generator::CaptionGenerator;

/// Shared Application State
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn CaptionGenerator>,
    pub upload_dir: PathBuf,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CaptionResponse {
    pub caption: String,
}
