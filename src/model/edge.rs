use crate::model::types::Lean;

/// Projection minus bookmaker total, or an explicit "no line" outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeResult {
    Edge(f64),
    NoLine,
}

impl EdgeResult {
    pub fn value(&self) -> Option<f64> {
        match self {
            EdgeResult::Edge(edge) => Some(*edge),
            EdgeResult::NoLine => None,
        }
    }

    /// Over/under signal once the edge reaches `min_edge` points either way.
    pub fn lean(&self, min_edge: f64) -> Option<Lean> {
        let edge = self.value()?;
        if edge.abs() < min_edge {
            return None;
        }

        if edge > 0.0 {
            Some(Lean::Over)
        } else {
            Some(Lean::Under)
        }
    }
}

impl std::fmt::Display for EdgeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeResult::Edge(edge) => write!(f, "{:+.1}", edge),
            EdgeResult::NoLine => write!(f, "N/A"),
        }
    }
}

/// Compare a projection with a betting total.
///
/// A missing, zero, negative or non-finite total is "no line", never an
/// edge of 0.
pub fn compute_edge(projected_total: f64, betting_total: Option<f64>) -> EdgeResult {
    match betting_total {
        Some(total) if total.is_finite() && total > 0.0 => {
            EdgeResult::Edge(round_tenth(projected_total - total))
        }
        _ => EdgeResult::NoLine,
    }
}

pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
