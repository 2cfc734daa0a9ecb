use anyhow::Result;
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use crate::runner::{GameReport, ReportOutcome};

pub struct CsvLogger {
    log_path: String,
}

impl CsvLogger {
    pub fn new(log_path: String) -> Result<Self> {
        // Create CSV file with headers if it doesn't exist
        if !std::path::Path::new(&log_path).exists() {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .open(&log_path)?;

            writeln!(
                file,
                "timestamp,game_id,league,home_team,away_team,home_score,away_score,elapsed_min,mode,base,referee,comeback,close_game,projected,line,edge,signal"
            )?;
        }

        Ok(Self { log_path })
    }

    /// Log a projected game; games without a projection are skipped.
    pub fn log_report(&self, report: &GameReport) -> Result<bool> {
        let ReportOutcome::Projected {
            projection,
            line,
            edge,
            lean,
        } = &report.outcome
        else {
            return Ok(false);
        };

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.log_path)?;

        let line_str = line.map(|l| format!("{:.1}", l.total)).unwrap_or_default();
        let edge_str = edge.value().map(|e| format!("{:.1}", e)).unwrap_or_default();
        let signal_str = lean.map(|l| l.to_string()).unwrap_or_default();
        let c = &projection.components;

        writeln!(
            file,
            "{},{},{},{},{},{},{},{:.2},{},{:.2},{:.2},{:.2},{:.2},{:.2},{},{},{}",
            Utc::now().to_rfc3339(),
            csv_field(&report.game_id),
            csv_field(&report.league),
            csv_field(&report.home_team),
            csv_field(&report.away_team),
            report.home_score,
            report.away_score,
            projection.elapsed_minutes,
            projection.mode,
            c.base,
            c.referee_adjustment,
            c.comeback_adjustment,
            c.close_game_adjustment,
            projection.projected_total,
            line_str,
            edge_str,
            signal_str
        )?;

        Ok(true)
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
