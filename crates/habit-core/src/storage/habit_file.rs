use std::{
    collections::BTreeSet,
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CompletionDate, Frequency, HabitId, HabitName, HabitRecord, InvalidNameError};

/// A habit serialized in markdown format with YAML frontmatter.
///
/// ```text
/// ---
/// _version: '1'
/// id: 12b3f5c5-b1a8-4aa8-a882-20ff1c2aab53
/// frequency: daily
/// created: 2025-07-14T07:15:00Z
/// completions:
/// - 2025-07-14
/// ---
/// # Drink water
///
/// Optional description.
/// ```
#[derive(Debug, Clone)]
pub struct HabitFile {
    frontmatter: FrontMatter,
    name: String,
    description: String,
}

impl HabitFile {
    fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let frontmatter = serde_yaml::to_string(&self.frontmatter)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let heading = format!("# {}", self.name);

        let result = if self.description.is_empty() {
            format!("---\n{frontmatter}---\n{heading}\n")
        } else {
            format!("---\n{frontmatter}---\n{heading}\n\n{}\n", self.description)
        };

        writer.write_all(result.as_bytes())
    }

    pub(crate) fn read<R: BufRead>(reader: &mut R) -> Result<Self, LoadError> {
        let mut lines = reader.lines();

        let first_line = lines
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "Empty input"))??;

        if first_line.trim() != "---" {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Expected frontmatter starting with '---'",
            )
            .into());
        }

        let mut closed = false;
        let frontmatter = lines
            .by_ref()
            .map_while(|line| match line {
                Ok(content) if content.trim() == "---" => {
                    closed = true;
                    None
                }
                Ok(content) => Some(Ok(content)),
                Err(e) => Some(Err(e)),
            })
            .collect::<Result<Vec<_>, _>>()?
            .join("\n");

        if !closed {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Frontmatter is not terminated by '---'",
            )
            .into());
        }

        let content = lines.collect::<Result<Vec<_>, _>>()?.join("\n");

        let front: FrontMatter = serde_yaml::from_str(&frontmatter)?;
        let (name, description) = parse_content(&content)?;

        Ok(Self {
            frontmatter: front,
            name,
            description,
        })
    }

    /// Writes the habit to a specific file path.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written to.
    pub fn save(&self, file_path: &Path) -> io::Result<()> {
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(file_path)?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)?;
        writer.flush()
    }

    /// Reads a habit from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(file_path: &Path) -> Result<Self, LoadError> {
        let file = File::open(file_path).map_err(|io_error| match io_error.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound,
            _ => LoadError::Io(io_error),
        })?;

        let mut reader = BufReader::new(file);
        Self::read(&mut reader)
    }

    /// The identifier recorded in the frontmatter.
    #[must_use]
    pub const fn id(&self) -> HabitId {
        self.frontmatter.id
    }
}

/// Splits markdown content into the habit name and description.
///
/// The name is the text of the first heading. The description is everything
/// after it.
fn parse_content(content: &str) -> Result<(String, String), LoadError> {
    let (heading_line_idx, line) = content
        .lines()
        .enumerate()
        .find(|(_, line)| line.trim().starts_with('#'))
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "No heading found in content - the habit name must be the first heading",
            )
        })?;

    let name = line.trim().trim_start_matches('#').trim().to_string();

    let description = content
        .lines()
        .skip(heading_line_idx + 1)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    Ok((name, description))
}

/// Errors that can occur when loading a habit from markdown.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The habit file was not found.
    #[error("habit file not found")]
    NotFound,
    /// An I/O error occurred.
    #[error("failed to read habit file: {0}")]
    Io(#[from] io::Error),
    /// The YAML frontmatter could not be parsed.
    ///
    /// This includes completion dates that are not valid `YYYY-MM-DD` dates.
    #[error("invalid frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The heading does not contain a habit name.
    #[error("invalid habit name: {0}")]
    Name(#[from] InvalidNameError),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(from = "FrontMatterVersion")]
#[serde(into = "FrontMatterVersion")]
struct FrontMatter {
    id: HabitId,
    frequency: Frequency,
    created: DateTime<Utc>,
    completions: BTreeSet<CompletionDate>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum FrontMatterVersion {
    #[serde(rename = "1")]
    V1 {
        id: HabitId,
        #[serde(default)]
        frequency: Frequency,
        created: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
        completions: BTreeSet<CompletionDate>,
    },
}

impl From<FrontMatterVersion> for FrontMatter {
    fn from(version: FrontMatterVersion) -> Self {
        match version {
            FrontMatterVersion::V1 {
                id,
                frequency,
                created,
                completions,
            } => Self {
                id,
                frequency,
                created,
                completions,
            },
        }
    }
}

impl From<FrontMatter> for FrontMatterVersion {
    fn from(front_matter: FrontMatter) -> Self {
        let FrontMatter {
            id,
            frequency,
            created,
            completions,
        } = front_matter;
        Self::V1 {
            id,
            frequency,
            created,
            completions,
        }
    }
}

impl From<HabitRecord> for HabitFile {
    fn from(habit: HabitRecord) -> Self {
        let HabitRecord {
            id,
            name,
            description,
            frequency,
            created,
            completions,
        } = habit;

        Self {
            frontmatter: FrontMatter {
                id,
                frequency,
                created,
                completions,
            },
            name: name.to_string(),
            description: description.unwrap_or_default(),
        }
    }
}

impl TryFrom<HabitFile> for HabitRecord {
    type Error = InvalidNameError;

    fn try_from(file: HabitFile) -> Result<Self, Self::Error> {
        let HabitFile {
            frontmatter:
                FrontMatter {
                    id,
                    frequency,
                    created,
                    completions,
                },
            name,
            description,
        } = file;

        let name = HabitName::new(name)?;
        let description = Some(description).filter(|d| !d.is_empty());

        Ok(Self::with_id(id, name, description, frequency, created).with_completions(completions))
    }
}
