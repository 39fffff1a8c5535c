use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub team: String,
    /// Answer per question text; None marks a missing or unparseable cell.
    pub answers: HashMap<String, Option<f64>>,
}

#[derive(Debug, Clone)]
pub struct TeamScore {
    pub team: String,
    pub conflict: f64,
    pub collaboration: f64,
    pub commitment: f64,
}

impl TeamScore {
    pub fn dimension(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Conflict => self.conflict,
            Dimension::Collaboration => self.collaboration,
            Dimension::Commitment => self.commitment,
        }
    }

    pub fn as_vector(&self) -> [f64; 3] {
        [self.conflict, self.collaboration, self.commitment]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Conflict,
    Collaboration,
    Commitment,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [
        Dimension::Conflict,
        Dimension::Collaboration,
        Dimension::Commitment,
    ];
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Conflict => "conflict",
            Dimension::Collaboration => "collaboration",
            Dimension::Commitment => "commitment",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamLabel {
    HighPerforming,
    Struggling,
    Isolated,
    Balanced,
}

impl fmt::Display for TeamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TeamLabel::HighPerforming => "High-performing",
            TeamLabel::Struggling => "Struggling",
            TeamLabel::Isolated => "Isolated",
            TeamLabel::Balanced => "Balanced",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone)]
pub struct ClusterAssignment {
    pub team: String,
    pub cluster: usize,
}

#[derive(Debug, Clone)]
pub struct ClassifiedTeam {
    pub score: TeamScore,
    pub cluster: usize,
    pub label: TeamLabel,
}

#[derive(Debug, Clone)]
pub struct SummaryStat {
    pub label: TeamLabel,
    pub dimension: Dimension,
    pub mean: f64,
    pub std_dev: f64,
    /// None when the group's values sum to zero and the index is undefined.
    pub gini: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectedTeam {
    pub team: String,
    pub pc1: f64,
    pub pc2: f64,
    pub label: String,
}
