//! A filesystem backed store of habits
//!
//! Each habit is a markdown file somewhere under the store root. Store
//! configuration lives in `.habits/config.toml`.

use std::{
    collections::HashMap,
    ffi::OsStr,
    fmt, io,
    path::{Path, PathBuf},
};

use nonempty::NonEmpty;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use walkdir::WalkDir;

use crate::{
    domain::{CompletionDate, Config, Frequency, HabitId, HabitName, HabitRecord},
    storage::habit_file::{HabitFile, LoadError},
    streak::{aggregate, AggregateStreakResult},
};

/// Name of the directory holding store metadata.
pub const METADATA_DIR: &str = ".habits";

/// Shortest id prefix accepted by [`Directory::find`].
const MIN_PREFIX_LEN: usize = 4;

/// The path of the configuration file for the store at `root`.
#[must_use]
pub fn config_path(root: &Path) -> PathBuf {
    root.join(METADATA_DIR).join("config.toml")
}

/// A filesystem backed store of habits.
///
/// Habits are held in a stable order: oldest first, with ties broken by id.
#[derive(Debug)]
pub struct Directory {
    /// The root of the directory habits are stored in.
    root: PathBuf,
    config: Config,
    habits: Vec<HabitRecord>,
    paths: HashMap<HabitId, PathBuf>,
}

impl Directory {
    /// Open the store at `root` and load every habit in it.
    ///
    /// A missing root is treated as an empty store.
    ///
    /// # Errors
    ///
    /// If `allow_unrecognised` is `false` in the store configuration (the
    /// default), any markdown file that cannot be parsed as a habit is an
    /// error. Otherwise such files are skipped. Two files claiming the same
    /// habit id is always an error.
    pub fn open(root: PathBuf) -> Result<Self, DirectoryLoadError> {
        let config = Config::load_or_default(&config_path(&root));
        let md_paths = collect_markdown_paths(&root);

        let (loaded, unrecognised): (Vec<_>, Vec<_>) = md_paths
            .par_iter()
            .map(|path| try_load_habit(path))
            .partition_map(|result| match result {
                Ok(loaded) => rayon::iter::Either::Left(loaded),
                Err(path) => rayon::iter::Either::Right(path),
            });

        if !config.allow_unrecognised && !unrecognised.is_empty() {
            return Err(DirectoryLoadError::UnrecognisedFiles(unrecognised));
        }

        let mut habits = Vec::with_capacity(loaded.len());
        let mut paths = HashMap::with_capacity(loaded.len());
        for (habit, path) in loaded {
            if let Some(existing) = paths.insert(habit.id(), path.clone()) {
                return Err(DirectoryLoadError::DuplicateId {
                    id: habit.id(),
                    first: existing,
                    second: path,
                });
            }
            habits.push(habit);
        }
        habits.sort_by(|a, b| a.created().cmp(&b.created()).then(a.id().cmp(&b.id())));

        tracing::debug!("Loaded {} habits from {}", habits.len(), root.display());

        Ok(Self {
            root,
            config,
            habits,
            paths,
        })
    }

    /// The root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The store configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// All habits, oldest first.
    #[must_use]
    pub fn habits(&self) -> &[HabitRecord] {
        &self.habits
    }

    /// Look up a habit by id.
    #[must_use]
    pub fn get(&self, id: HabitId) -> Option<&HabitRecord> {
        self.habits.iter().find(|habit| habit.id() == id)
    }

    /// Resolve a habit from user input.
    ///
    /// The query is matched, in order, against:
    ///
    /// 1. the full habit id
    /// 2. the habit name, ignoring case
    /// 3. a prefix of the id, at least four characters long
    ///
    /// A name always wins over an id prefix, so a habit called "Beef" cannot be
    /// shadowed by another habit whose id happens to start with `beef`.
    ///
    /// # Errors
    ///
    /// Returns [`FindError::NotFound`] if nothing matches, or
    /// [`FindError::Ambiguous`] if a name or prefix matches several habits.
    pub fn find(&self, query: &str) -> Result<&HabitRecord, FindError> {
        let query = query.trim();

        if let Some(habit) = query.parse().ok().and_then(|id| self.get(id)) {
            return Ok(habit);
        }

        let needle = query.to_lowercase();

        let by_name: Vec<_> = self
            .habits
            .iter()
            .filter(|habit| habit.name().to_lowercase() == needle)
            .collect();
        if let Some(habit) = single(query, by_name)? {
            return Ok(habit);
        }

        let by_prefix: Vec<_> = if query.len() >= MIN_PREFIX_LEN {
            self.habits
                .iter()
                .filter(|habit| habit.id().to_string().starts_with(&needle))
                .collect()
        } else {
            Vec::new()
        };
        single(query, by_prefix)?.ok_or_else(|| FindError::NotFound(query.to_string()))
    }

    /// Create a new habit and save it to disk.
    ///
    /// If `frequency` is `None`, the store's configured default is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the habit file cannot be written.
    pub fn create_habit(
        &mut self,
        name: HabitName,
        description: Option<String>,
        frequency: Option<Frequency>,
    ) -> io::Result<HabitRecord> {
        let frequency = frequency.unwrap_or(self.config.default_frequency);
        let habit = HabitRecord::new(name, description, frequency);

        let path = self.root.join(format!("{}.md", habit.id()));
        HabitFile::from(habit.clone()).save(&path)?;

        self.paths.insert(habit.id(), path);
        let key = (habit.created(), habit.id());
        let index = self
            .habits
            .partition_point(|existing| (existing.created(), existing.id()) <= key);
        self.habits.insert(index, habit.clone());

        tracing::info!("Created habit: {} ({})", habit.name(), habit.id());

        Ok(habit)
    }

    /// Record that the habit `id` was completed on `date`.
    ///
    /// Returns `true` if the completion was recorded, or `false` if the habit
    /// was already completed on that day (the file is not rewritten).
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - the habit does not exist
    /// - `date` is later than `today`
    /// - the habit file cannot be written to
    pub fn mark_complete(
        &mut self,
        id: HabitId,
        date: CompletionDate,
        today: CompletionDate,
    ) -> Result<bool, MarkCompleteError> {
        if date > today {
            return Err(MarkCompleteError::FutureDate { date, today });
        }

        let habit = self
            .habits
            .iter_mut()
            .find(|habit| habit.id() == id)
            .ok_or(MarkCompleteError::NotFound(id))?;

        if !habit.mark_complete(date) {
            tracing::debug!("{} already completed on {date}", habit.name());
            return Ok(false);
        }

        let path = self
            .paths
            .get(&id)
            .cloned()
            .unwrap_or_else(|| self.root.join(format!("{id}.md")));
        if let Err(e) = HabitFile::from(habit.clone()).save(&path) {
            habit.completions.remove(&date);
            return Err(e.into());
        }

        tracing::info!("Marked {} complete on {date}", habit.name());

        Ok(true)
    }

    /// Delete the habit `id`, removing its file from disk.
    ///
    /// Returns the deleted record.
    ///
    /// # Errors
    ///
    /// This method can fail if the habit does not exist or its file cannot be
    /// removed.
    pub fn delete_habit(&mut self, id: HabitId) -> Result<HabitRecord, DeleteHabitError> {
        let index = self
            .habits
            .iter()
            .position(|habit| habit.id() == id)
            .ok_or(DeleteHabitError::NotFound(id))?;

        if let Some(path) = self.paths.get(&id) {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!("Habit file {} was already gone", path.display());
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.paths.remove(&id);
        let habit = self.habits.remove(index);

        tracing::info!("Deleted habit: {} ({})", habit.name(), habit.id());

        Ok(habit)
    }

    /// Rewrite every habit file in the current format.
    ///
    /// This normalizes hand-edited files (sorting and de-duplicating
    /// completions, upgrading the frontmatter version).
    ///
    /// # Errors
    ///
    /// Returns an error if some of the habits cannot be saved. This method does
    /// *not* fail fast: it attempts to save every habit before returning.
    pub fn save_all(&self) -> Result<usize, SaveAllError> {
        let failures: Vec<_> = self
            .habits
            .iter()
            .filter_map(|habit| {
                let path = self.path_of(habit.id());
                HabitFile::from(habit.clone())
                    .save(&path)
                    .err()
                    .map(|e| (path, e))
            })
            .collect();

        NonEmpty::from_vec(failures).map_or(Ok(self.habits.len()), |failures| {
            Err(SaveAllError { failures })
        })
    }

    fn path_of(&self, id: HabitId) -> PathBuf {
        self.paths
            .get(&id)
            .cloned()
            .unwrap_or_else(|| self.root.join(format!("{id}.md")))
    }

    /// Roll up the streaks of every habit in the store relative to `today`.
    #[must_use]
    pub fn snapshot(&self, today: CompletionDate) -> AggregateStreakResult {
        aggregate(&self.habits, today)
    }
}

fn single<'a>(
    query: &str,
    matches: Vec<&'a HabitRecord>,
) -> Result<Option<&'a HabitRecord>, FindError> {
    match matches.as_slice() {
        [] => Ok(None),
        [habit] => Ok(Some(*habit)),
        _ => Err(FindError::Ambiguous {
            query: query.to_string(),
            candidates: matches
                .iter()
                .map(|habit| format!("{} ({})", habit.name(), habit.id().short()))
                .collect(),
        }),
    }
}

fn collect_markdown_paths(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || entry.file_name() != METADATA_DIR)
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension() == Some(OsStr::new("md")))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn try_load_habit(path: &Path) -> Result<(HabitRecord, PathBuf), PathBuf> {
    let habit = HabitFile::load(path)
        .and_then(|file| HabitRecord::try_from(file).map_err(LoadError::from));

    match habit {
        Ok(habit) => Ok((habit, path.to_path_buf())),
        Err(e) => {
            tracing::debug!("Failed to load habit from {}: {e}", path.display());
            Err(path.to_path_buf())
        }
    }
}

/// Errors that can occur when opening a [`Directory`].
#[derive(Debug, thiserror::Error)]
pub enum DirectoryLoadError {
    /// Markdown files that could not be parsed as habits.
    UnrecognisedFiles(Vec<PathBuf>),
    /// Two files share the same habit id.
    DuplicateId {
        /// The shared id.
        id: HabitId,
        /// The first file found with this id.
        first: PathBuf,
        /// The second file found with this id.
        second: PathBuf,
    },
}

impl fmt::Display for DirectoryLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_DISPLAY: usize = 5;

        match self {
            Self::UnrecognisedFiles(paths) => {
                write!(f, "Unrecognised files: ")?;
                let shown: Vec<_> = paths
                    .iter()
                    .take(MAX_DISPLAY)
                    .map(|p| p.display().to_string())
                    .collect();
                write!(f, "{}", shown.join(", "))?;
                if paths.len() > MAX_DISPLAY {
                    write!(f, "... (and {} more)", paths.len() - MAX_DISPLAY)?;
                }
                Ok(())
            }
            Self::DuplicateId { id, first, second } => write!(
                f,
                "habit {id} is defined twice: {} and {}",
                first.display(),
                second.display()
            ),
        }
    }
}

/// Errors that can occur when resolving a habit from user input.
#[derive(Debug, thiserror::Error)]
pub enum FindError {
    /// No habit matched.
    #[error("no habit matches '{0}'")]
    NotFound(String),
    /// Several habits matched.
    #[error("'{query}' matches several habits: {}", candidates.join(", "))]
    Ambiguous {
        /// The user input.
        query: String,
        /// Descriptions of the matching habits.
        candidates: Vec<String>,
    },
}

/// Errors that can occur when marking a habit complete.
#[derive(Debug, thiserror::Error)]
pub enum MarkCompleteError {
    /// The habit does not exist.
    #[error("habit {0} not found")]
    NotFound(HabitId),
    /// The completion date is in the future.
    #[error("cannot complete a habit on {date}, which is after today ({today})")]
    FutureDate {
        /// The requested completion date.
        date: CompletionDate,
        /// The reference day.
        today: CompletionDate,
    },
    /// The habit file could not be written.
    #[error("failed to save habit: {0}")]
    Io(#[from] io::Error),
}

/// Errors that can occur when deleting a habit.
#[derive(Debug, thiserror::Error)]
pub enum DeleteHabitError {
    /// The habit does not exist.
    #[error("habit {0} not found")]
    NotFound(HabitId),
    /// The habit file could not be removed.
    #[error("failed to remove habit file: {0}")]
    Io(#[from] io::Error),
}

/// Failures writing several habit files.
///
/// Returned by bulk operations which attempt every write before reporting.
#[derive(Debug, thiserror::Error)]
pub struct SaveAllError {
    failures: NonEmpty<(PathBuf, io::Error)>,
}

impl SaveAllError {
    /// The files that could not be written, and why.
    pub fn failures(&self) -> impl Iterator<Item = &(PathBuf, io::Error)> {
        self.failures.iter()
    }
}

impl fmt::Display for SaveAllError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_DISPLAY: usize = 5;

        write!(f, "failed to save habits: ")?;

        let total = self.failures.len();
        let displayed_paths: Vec<String> = self
            .failures
            .iter()
            .take(MAX_DISPLAY)
            .map(|(p, _e)| p.display().to_string())
            .collect();
        let msg = displayed_paths.join(", ");

        if total <= MAX_DISPLAY {
            write!(f, "{msg}")
        } else {
            write!(f, "{msg}... (and {} more)", total - MAX_DISPLAY)
        }
    }
}
