use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

mod aggregate;
mod cluster;
mod label;
mod models;
mod project;
mod report;
mod stats;
mod survey;

use aggregate::AggregateOutcome;
use models::ClassifiedTeam;

#[derive(Parser)]
#[command(name = "team-classify")]
#[command(about = "Classify work-teams from survey responses on conflict, collaboration, and commitment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PipelineOpts {
    /// Survey CSV with one row per respondent
    #[arg(long)]
    survey: PathBuf,
    /// Optional JSON file overriding the built-in question groups
    #[arg(long)]
    questions: Option<PathBuf>,
    /// Cluster count; 3 and 4 are the supported deployments
    #[arg(long, default_value_t = 4)]
    clusters: usize,
    /// Seed for reproducible clustering
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify teams and write the team-to-label table
    Classify {
        #[command(flatten)]
        opts: PipelineOpts,
        #[arg(long, default_value = "team_classifications.csv")]
        out: PathBuf,
    },
    /// Write per-label dispersion statistics
    Summarize {
        #[command(flatten)]
        opts: PipelineOpts,
        #[arg(long, default_value = "label_summary.csv")]
        out: PathBuf,
    },
    /// Write the 2-D principal-component projection for plotting
    Project {
        #[command(flatten)]
        opts: PipelineOpts,
        #[arg(long, default_value = "team_projection.csv")]
        out: PathBuf,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        opts: PipelineOpts,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn run_pipeline(opts: &PipelineOpts) -> anyhow::Result<(Vec<ClassifiedTeam>, AggregateOutcome)> {
    let groups = match &opts.questions {
        Some(path) => survey::QuestionGroups::from_json_file(path)?,
        None => survey::QuestionGroups::default_survey(),
    };
    let scheme = label::ClusterScheme::from_cluster_count(opts.clusters)?;

    let responses = survey::load_survey(&opts.survey, &groups)?;
    let outcome = aggregate::aggregate(&responses, &groups);

    if outcome.missing_values > 0 {
        println!(
            "Excluded {} blank or unparseable answer cell(s).",
            outcome.missing_values
        );
    }
    if outcome.dropped_teams > 0 {
        println!(
            "Dropped {} team(s) lacking data for a whole dimension.",
            outcome.dropped_teams
        );
    }

    let standardization = cluster::Standardization::fit(&outcome.scores);
    let assignments = cluster::assign_clusters(
        &outcome.scores,
        &standardization,
        scheme.cluster_count(),
        opts.seed,
    );
    let classified = label::classify(&outcome.scores, &assignments, scheme);

    Ok((classified, outcome))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify { opts, out } => {
            let (classified, _) = run_pipeline(&opts)?;
            if classified.is_empty() {
                println!("No teams found in the survey file.");
                return Ok(());
            }
            report::write_classifications(&out, &classified)?;
            println!("Classified {} team(s):", classified.len());
            for team in &classified {
                println!("- {}: {}", team.score.team, team.label);
            }
            println!("Classifications written to {}.", out.display());
        }
        Commands::Summarize { opts, out } => {
            let (classified, _) = run_pipeline(&opts)?;
            let summary = stats::summarize(&classified);
            report::write_summary(&out, &summary)?;
            println!(
                "Summary statistics for {} label group(s) written to {}.",
                summary.len() / models::Dimension::ALL.len().max(1),
                out.display()
            );
        }
        Commands::Project { opts, out } => {
            let (classified, _) = run_pipeline(&opts)?;
            let projected = project::project(&classified);
            report::write_projection(&out, &projected)?;
            println!(
                "Projected {} team(s) onto two components; written to {}.",
                projected.len(),
                out.display()
            );
        }
        Commands::Report { opts, out } => {
            let (classified, outcome) = run_pipeline(&opts)?;
            let rendered = report::build_report(&classified, &outcome);
            std::fs::write(&out, rendered)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::RawResponse;
    use std::collections::HashSet;

    fn response(team: &str, cells: &[(&str, f64)]) -> RawResponse {
        RawResponse {
            team: team.to_string(),
            answers: cells
                .iter()
                .map(|(q, v)| (q.to_string(), Some(*v)))
                .collect(),
        }
    }

    #[test]
    fn pipeline_classifies_every_aggregated_team_exactly_once() {
        let groups = survey::QuestionGroups {
            conflict: vec!["c1".to_string()],
            collaboration: vec!["b1".to_string()],
            commitment: vec!["m1".to_string()],
            max_scale: 5.0,
        };
        let responses = vec![
            response("Alpha", &[("c1", 4.0), ("b1", 2.0), ("m1", 4.0)]),
            response("Beta", &[("c1", 1.0), ("b1", 5.0), ("m1", 1.0)]),
            response("Gamma", &[("c1", 3.0), ("b1", 3.0), ("m1", 2.0)]),
            response("Delta", &[("c1", 2.0), ("b1", 4.0), ("m1", 3.0)]),
        ];

        let outcome = aggregate::aggregate(&responses, &groups);
        let scheme = label::ClusterScheme::from_cluster_count(3).unwrap();
        let standardization = cluster::Standardization::fit(&outcome.scores);
        let assignments = cluster::assign_clusters(
            &outcome.scores,
            &standardization,
            scheme.cluster_count(),
            42,
        );
        let classified = label::classify(&outcome.scores, &assignments, scheme);

        let aggregated: HashSet<&str> =
            outcome.scores.iter().map(|s| s.team.as_str()).collect();
        let labeled: HashSet<&str> =
            classified.iter().map(|c| c.score.team.as_str()).collect();
        assert_eq!(classified.len(), outcome.scores.len());
        assert_eq!(aggregated, labeled);

        // Teams sharing a cluster share a label.
        for a in &classified {
            for b in &classified {
                if a.cluster == b.cluster {
                    assert_eq!(a.label, b.label);
                }
            }
        }
    }
}
