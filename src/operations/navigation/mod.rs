mod find_path;
mod generate_trail;

pub use find_path::{FindPath, Path};
pub use generate_trail::{GenerateTrail, Trail};
