pub mod manager;
pub mod model;

pub use manager::{Project, CONFIG_FILE, EULA_FILE, EULA_URL, PROPERTIES_FILE};
pub use model::{MemoryBounds, ServerConfig};
