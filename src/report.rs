use std::fmt::Write;
use std::path::Path;

use anyhow::Context;

use crate::aggregate::AggregateOutcome;
use crate::models::{ClassifiedTeam, ProjectedTeam, SummaryStat};
use crate::stats;

pub fn write_classifications(path: &Path, classified: &[ClassifiedTeam]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record(["team", "label"])?;
    for team in classified {
        writer.write_record([team.score.team.clone(), team.label.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_summary(path: &Path, stats: &[SummaryStat]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record(["label", "dimension", "mean", "std", "gini"])?;
    for stat in stats {
        let gini = match stat.gini {
            Some(value) => format!("{value:.4}"),
            None => "undefined".to_string(),
        };
        writer.write_record([
            stat.label.to_string(),
            stat.dimension.to_string(),
            format!("{:.4}", stat.mean),
            format!("{:.4}", stat.std_dev),
            gini,
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_projection(path: &Path, projected: &[ProjectedTeam]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for point in projected {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn build_report(classified: &[ClassifiedTeam], outcome: &AggregateOutcome) -> String {
    let summary = stats::summarize(classified);
    let mut output = String::new();

    let _ = writeln!(output, "# Team Classification Report");
    let _ = writeln!(
        output,
        "Generated {} over {} team(s).",
        chrono::Utc::now().date_naive(),
        classified.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Coverage");
    let _ = writeln!(
        output,
        "- {} blank or unparseable answer cell(s) excluded",
        outcome.missing_values
    );
    let _ = writeln!(
        output,
        "- {} team(s) dropped for lacking dimension data",
        outcome.dropped_teams
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Classifications");
    if classified.is_empty() {
        let _ = writeln!(output, "No teams to classify.");
    } else {
        for team in classified {
            let _ = writeln!(
                output,
                "- {}: {} (conflict {:.2}, collaboration {:.2}, commitment {:.2})",
                team.score.team,
                team.label,
                team.score.conflict,
                team.score.collaboration,
                team.score.commitment
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Within-label Dispersion");
    if summary.is_empty() {
        let _ = writeln!(output, "No statistics available.");
    } else {
        for stat in &summary {
            let gini = match stat.gini {
                Some(value) => format!("{value:.3}"),
                None => "undefined".to_string(),
            };
            let _ = writeln!(
                output,
                "- {} / {}: mean {:.2}, std {:.2}, gini {}",
                stat.label, stat.dimension, stat.mean, stat.std_dev, gini
            );
        }
    }

    output
}
