use std::path::Path;

use crate::error::Result;
use crate::sweep::evaluation::{ScenarioOutcome, SweepSummary};

/// Write every scenario outcome to a CSV file.
pub fn write_csv(outcomes: &[ScenarioOutcome], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "scenario",
        "items",
        "locked",
        "success",
        "reason",
        "iterations",
        "score",
    ])?;

    for outcome in outcomes {
        wtr.write_record([
            outcome.index.to_string(),
            outcome.items.to_string(),
            outcome.locked.to_string(),
            outcome.success.to_string(),
            outcome.reason.map(|r| r.to_string()).unwrap_or_default(),
            outcome.iterations.to_string(),
            format!("{:.3}", outcome.score),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Print the sweep summary to stdout.
pub fn print_summary(summary: &SweepSummary) {
    println!();
    println!("=== Sweep Summary ===");
    println!(
        "Runs: {}  Successes: {}  Success rate: {:.1}%",
        summary.runs,
        summary.successes,
        summary.success_rate * 100.0
    );
    println!("Mean iterations: {:.1}", summary.mean_iterations);
    println!("Mean score (successes): {:.3}", summary.mean_score);

    if !summary.failures_by_reason.is_empty() {
        println!();
        println!("--- Failures ---");
        for (reason, count) in &summary.failures_by_reason {
            println!("  {:<28} {}", reason.as_str(), count);
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FailureReason;
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_csv() {
        let outcomes = vec![
            ScenarioOutcome {
                index: 0,
                items: 3,
                locked: 1,
                success: true,
                reason: None,
                iterations: 12,
                score: 1.25,
            },
            ScenarioOutcome {
                index: 1,
                items: 2,
                locked: 0,
                success: false,
                reason: Some(FailureReason::MaxIterationsExceeded),
                iterations: 1500,
                score: 40.0,
            },
        ];
        let file = NamedTempFile::new().unwrap();
        write_csv(&outcomes, file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "0,3,1,true,,12,1.250");
        assert_eq!(lines[2], "1,2,0,false,max_iterations_exceeded,1500,40.000");
    }
}
