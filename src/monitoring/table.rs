use std::fmt::Write;
use crate::data::cache::LineSource;
use crate::runner::{GameReport, ReportOutcome};

const MISSING: &str = "—";

/// Plain text table of a pass, one row per game.
pub fn render_table(reports: &[GameReport]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<34} {:<6} {:>9} {:>9} {:>7} {:>8} {:>7} {:<18}",
        "GAME", "LEAGUE", "SCORE", "ELAPSED", "PROJ", "LINE", "EDGE", "SIGNAL"
    );

    for report in reports {
        let game = format!("{} @ {}", report.away_team, report.home_team);
        let score = format!("{}-{}", report.away_score, report.home_score);

        let (elapsed, proj, line, edge, signal) = match &report.outcome {
            ReportOutcome::Projected {
                projection,
                line,
                edge,
                lean,
            } => {
                let line = match line {
                    Some(l) if l.source == LineSource::Manual => format!("{:.1}*", l.total),
                    Some(l) => format!("{:.1}", l.total),
                    None => MISSING.to_string(),
                };
                let mut signal = lean.map(|l| l.to_string()).unwrap_or_default();
                if projection.low_confidence {
                    signal.push_str(" (low conf)");
                }
                (
                    format!("{:.1}m", projection.elapsed_minutes),
                    format!("{:.1}", projection.projected_total),
                    line,
                    edge.to_string(),
                    signal.trim().to_string(),
                )
            }
            ReportOutcome::InsufficientSample { elapsed_minutes } => (
                format!("{:.1}m", elapsed_minutes),
                MISSING.to_string(),
                MISSING.to_string(),
                MISSING.to_string(),
                "insufficient sample".to_string(),
            ),
            ReportOutcome::UnknownLeague => (
                MISSING.to_string(),
                MISSING.to_string(),
                MISSING.to_string(),
                MISSING.to_string(),
                "unknown league".to_string(),
            ),
        };

        let _ = writeln!(
            out,
            "{:<34} {:<6} {:>9} {:>9} {:>7} {:>8} {:>7} {:<18}",
            truncate(&game, 34),
            truncate(&report.league, 6),
            score,
            elapsed,
            proj,
            line,
            edge,
            signal
        );
    }

    out
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
