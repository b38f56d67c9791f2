//! Skill import from spreadsheet rows.
//!
//! Fetching the sheet happens elsewhere; this module takes the raw cell
//! rows it returns. The first row is a header naming the columns:
//!
//! | column       | required | meaning                    |
//! |--------------|----------|----------------------------|
//! | `skills`     | yes      | skill name                 |
//! | `roll`       | yes      | integer rating             |
//! | `notes`      | no       | free-text note             |
//! | `difficulty` | no       | see [`Difficulty`]         |
//!
//! Header matching is case-insensitive. Rows may be shorter than the
//! header; missing optional cells are treated as empty.

use crate::skill::{Difficulty, Skill, SkillError};
use thiserror::Error;

/// Errors that make a whole sheet unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    #[error("Sheet has no header row")]
    Empty,

    #[error("Sheet header is missing the {0:?} column")]
    MissingColumn(&'static str),
}

/// A row that could not be turned into a skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// Index into the input rows (the header is row 0).
    pub row: usize,
    pub error: SkillError,
}

/// Result of importing a sheet.
#[derive(Debug, Clone, Default)]
pub struct SheetImport {
    pub skills: Vec<Skill>,
    pub rejected: Vec<RejectedRow>,
}

struct Columns {
    name: usize,
    roll: usize,
    notes: Option<usize>,
    difficulty: Option<usize>,
}

impl Columns {
    fn from_header(header: &[String]) -> Result<Self, SheetError> {
        let find = |label: &str| {
            header
                .iter()
                .position(|cell| cell.trim().to_lowercase() == label)
        };

        Ok(Self {
            name: find("skills").ok_or(SheetError::MissingColumn("skills"))?,
            roll: find("roll").ok_or(SheetError::MissingColumn("roll"))?,
            notes: find("notes"),
            difficulty: find("difficulty"),
        })
    }
}

fn cell(row: &[String], index: usize) -> Option<&str> {
    row.get(index)
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
}

/// Parse skill rows. Blank rows are skipped; bad rows are collected.
pub fn import_skills(rows: &[Vec<String>]) -> Result<SheetImport, SheetError> {
    let (header, body) = rows.split_first().ok_or(SheetError::Empty)?;
    let columns = Columns::from_header(header)?;
    let mut import = SheetImport::default();

    for (offset, row) in body.iter().enumerate() {
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        match parse_row(row, &columns) {
            Ok(skill) => import.skills.push(skill),
            Err(error) => import.rejected.push(RejectedRow {
                row: offset + 1,
                error,
            }),
        }
    }

    Ok(import)
}

fn parse_row(row: &[String], columns: &Columns) -> Result<Skill, SkillError> {
    let name = cell(row, columns.name).unwrap_or_default();
    let value = row.get(columns.roll).map(String::as_str).unwrap_or_default();
    let mut skill = Skill::parse(name, value)?;

    if let Some(note) = columns.notes.and_then(|i| cell(row, i)) {
        skill = skill.with_note(note);
    }
    if let Some(text) = columns.difficulty.and_then(|i| cell(row, i)) {
        skill = skill.with_difficulty(text.parse::<Difficulty>()?);
    }

    Ok(skill)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_basic_import() {
        let sheet = rows(&[
            &["Skills", "Roll", "Notes"],
            &["Stealth", "12", "sneaky"],
            &["Brawling", "10"],
            &["Guns", " 9 ", ""],
        ]);
        let import = import_skills(&sheet).unwrap();

        assert!(import.rejected.is_empty());
        assert_eq!(import.skills.len(), 3);
        assert_eq!(import.skills[0].name(), "Stealth");
        assert_eq!(import.skills[0].note.as_deref(), Some("sneaky"));
        assert_eq!(import.skills[1].note, None);
        assert_eq!(import.skills[2].value, 9);
        assert_eq!(import.skills[2].note, None);
    }

    #[test]
    fn test_column_order_and_case() {
        let sheet = rows(&[&["ROLL", "misc", "skills"], &["14", "x", "Lore"]]);
        let import = import_skills(&sheet).unwrap();
        assert_eq!(import.skills[0].name(), "Lore");
        assert_eq!(import.skills[0].value, 14);
    }

    #[test]
    fn test_missing_required_column() {
        let sheet = rows(&[&["Skills", "Notes"], &["Stealth", "x"]]);
        assert_eq!(
            import_skills(&sheet).unwrap_err(),
            SheetError::MissingColumn("roll")
        );

        let sheet = rows(&[&["Name", "Roll"]]);
        assert_eq!(
            import_skills(&sheet).unwrap_err(),
            SheetError::MissingColumn("skills")
        );
    }

    #[test]
    fn test_empty_sheet() {
        assert_eq!(import_skills(&[]).unwrap_err(), SheetError::Empty);
    }

    #[test]
    fn test_bad_rows_are_collected() {
        let sheet = rows(&[
            &["Skills", "Roll"],
            &["Stealth", "twelve"],
            &[],
            &["", "10"],
            &["Climbing", "11"],
            &["Swimming"],
        ]);
        let import = import_skills(&sheet).unwrap();

        assert_eq!(import.skills.len(), 1);
        assert_eq!(import.skills[0].name(), "Climbing");

        let rejected: Vec<_> = import.rejected.iter().map(|r| r.row).collect();
        assert_eq!(rejected, vec![1, 3, 5]);
        assert!(matches!(
            import.rejected[0].error,
            SkillError::InvalidValue { .. }
        ));
        assert_eq!(import.rejected[1].error, SkillError::EmptyName);
    }

    #[test]
    fn test_difficulty_column() {
        let sheet = rows(&[
            &["Skills", "Roll", "Difficulty"],
            &["Physics", "10", "VH"],
            &["Running", "12", ""],
            &["Dancing", "9", "trivial"],
        ]);
        let import = import_skills(&sheet).unwrap();

        assert_eq!(import.skills[0].difficulty, Some(Difficulty::VeryHard));
        assert_eq!(import.skills[1].difficulty, None);
        assert_eq!(import.rejected.len(), 1);
        assert!(matches!(
            import.rejected[0].error,
            SkillError::UnknownDifficulty(_)
        ));
    }
}
