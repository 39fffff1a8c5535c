use std::path::Path;

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::models::{Dimension, RawResponse};

pub const TEAM_COLUMN: &str = "Your Team";

/// Static mapping of survey items to the three dimensions. Declared once and
/// consumed only by the aggregator; every question listed here must appear as
/// a column in the survey file.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionGroups {
    pub conflict: Vec<String>,
    pub collaboration: Vec<String>,
    pub commitment: Vec<String>,
    /// Likert ceiling of the instrument; polarity correction maps a raw mean m
    /// to (max_scale + 1) - m.
    pub max_scale: f64,
}

impl QuestionGroups {
    /// The project-course survey instrument this tool was built for.
    pub fn default_survey() -> Self {
        let own = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        QuestionGroups {
            conflict: own(&[
                "How frequently do you have disagreements within your work group about the task of the project you are working on?",
                "How often do people in your work group have conflicting opinions about the project you are working on?",
                "How much emotional conflict is there in your work group?",
                "How often do people get angry while working in your group?",
                "How much conflict of ideas is there in your work group?",
                "How often do you disagree about resource allocation in your work group?",
                "How much relationship tension is there in your work group?",
                "How often are there disagreements about who should do what in your work group?",
                "How much conflict is there in your group about task responsibilities?",
            ]),
            collaboration: own(&[
                "Team members get to participate in enjoyable activities",
                "Team members enjoy spending time together",
                "Team members get along well",
                "Team members like each other",
                "Team members like the work that the group does",
                "Being part of the team allows team members to do enjoyable work",
            ]),
            commitment: own(&[
                "I'm unhappy with my team's level of commitment to the task",
                "Our team is united in trying to reach its goals for performance",
                "Our team members have conflicting aspirations for the team's performance",
            ]),
            max_scale: 5.0,
        }
    }

    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read question groups from {}", path.display()))?;
        let groups: QuestionGroups = serde_json::from_str(&raw)
            .with_context(|| format!("invalid question groups JSON in {}", path.display()))?;
        groups.validate()?;
        Ok(groups)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for dimension in Dimension::ALL {
            if self.questions(dimension).is_empty() {
                bail!("question group '{dimension}' is empty");
            }
        }
        if self.max_scale <= 1.0 {
            bail!("max_scale must exceed 1 (got {})", self.max_scale);
        }
        Ok(())
    }

    pub fn questions(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Conflict => &self.conflict,
            Dimension::Collaboration => &self.collaboration,
            Dimension::Commitment => &self.commitment,
        }
    }

    pub fn all_questions(&self) -> impl Iterator<Item = &String> {
        self.conflict
            .iter()
            .chain(self.collaboration.iter())
            .chain(self.commitment.iter())
    }
}

/// Load respondent rows from the survey CSV. Every configured question must
/// match a column header exactly; any mismatch is a configuration error and
/// aborts before any rows are read. Blank or non-numeric cells become None and
/// are excluded later, per value, by the aggregator.
pub fn load_survey(path: &Path, groups: &QuestionGroups) -> anyhow::Result<Vec<RawResponse>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open survey file {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let team_index = headers
        .iter()
        .position(|h| h == TEAM_COLUMN)
        .with_context(|| format!("survey file has no '{TEAM_COLUMN}' column"))?;

    let mut question_indices = Vec::new();
    let mut missing = Vec::new();
    for question in groups.all_questions() {
        match headers.iter().position(|h| h == question) {
            Some(index) => question_indices.push((question.clone(), index)),
            None => missing.push(question.as_str()),
        }
    }
    if !missing.is_empty() {
        bail!(
            "survey file is missing {} configured question column(s): {}",
            missing.len(),
            missing.join("; ")
        );
    }

    let mut responses = Vec::new();
    for (row_number, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("bad CSV record at row {}", row_number + 2))?;
        let team = record
            .get(team_index)
            .unwrap_or_default()
            .trim()
            .to_string();
        if team.is_empty() {
            continue;
        }

        let answers = question_indices
            .iter()
            .map(|(question, index)| {
                let value = record
                    .get(*index)
                    .map(str::trim)
                    .filter(|cell| !cell.is_empty())
                    .and_then(|cell| cell.parse::<f64>().ok());
                (question.clone(), value)
            })
            .collect();

        responses.push(RawResponse { team, answers });
    }

    Ok(responses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(tag: &str, contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("team-classify-{tag}-{}.csv", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn tiny_groups() -> QuestionGroups {
        QuestionGroups {
            conflict: vec!["q-conflict".to_string()],
            collaboration: vec!["q-collab".to_string()],
            commitment: vec!["q-commit".to_string()],
            max_scale: 5.0,
        }
    }

    #[test]
    fn missing_question_column_is_fatal_and_named() {
        let path = write_temp_csv("missing-col", "Your Team,q-conflict,q-collab\nAlpha,3,4\n");
        let error = load_survey(&path, &tiny_groups()).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(error.to_string().contains("q-commit"));
    }

    #[test]
    fn blank_and_non_numeric_cells_become_none() {
        let path = write_temp_csv(
            "blank-cells",
            "Your Team,q-conflict,q-collab,q-commit\nAlpha,3,,n/a\n",
        );
        let responses = load_survey(&path, &tiny_groups()).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].answers["q-conflict"], Some(3.0));
        assert_eq!(responses[0].answers["q-collab"], None);
        assert_eq!(responses[0].answers["q-commit"], None);
    }

    #[test]
    fn default_survey_passes_validation() {
        QuestionGroups::default_survey().validate().unwrap();
    }

    #[test]
    fn empty_group_fails_validation() {
        let mut groups = tiny_groups();
        groups.commitment.clear();
        assert!(groups.validate().is_err());
    }
}
