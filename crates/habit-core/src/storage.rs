pub mod directory;
/// Markdown serialization for habits.
pub mod habit_file;

pub use directory::{
    config_path, DeleteHabitError, Directory, DirectoryLoadError, FindError, MarkCompleteError,
    SaveAllError, METADATA_DIR,
};
pub use habit_file::{HabitFile, LoadError};
