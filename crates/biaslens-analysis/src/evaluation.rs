//! Classifier evaluation against a labelled dataset: per-class precision,
//! recall, F1, support, and a confusion matrix.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub labels: Vec<String>,
    /// `confusion[expected][predicted]`, indexed like `labels`. Predictions
    /// outside `labels` are counted in `unmatched_predictions` only.
    pub confusion: Vec<Vec<usize>>,
    pub per_class: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_f1: f64,
    pub total: usize,
    pub unmatched_predictions: usize,
}

/// Score `(expected, predicted)` pairs against `labels`.
///
/// Labels are compared case-insensitively. Pairs whose expected label is not
/// in `labels` are skipped.
#[must_use]
pub fn evaluate<S: AsRef<str>>(labels: &[S], pairs: &[(String, String)]) -> EvaluationReport {
    let labels: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
    let index_of = |raw: &str| labels.iter().position(|l| l.eq_ignore_ascii_case(raw.trim()));

    let n = labels.len();
    let mut confusion = vec![vec![0usize; n]; n];
    let mut total = 0usize;
    let mut correct = 0usize;
    let mut unmatched_predictions = 0usize;

    for (expected, predicted) in pairs {
        let Some(e) = index_of(expected) else {
            continue;
        };
        total += 1;
        match index_of(predicted) {
            Some(p) => {
                confusion[e][p] += 1;
                if e == p {
                    correct += 1;
                }
            }
            None => unmatched_predictions += 1,
        }
    }

    let per_class: Vec<ClassMetrics> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let tp = confusion[i][i];
            let predicted: usize = confusion.iter().map(|row| row[i]).sum();
            let support = pairs
                .iter()
                .filter(|(expected, _)| index_of(expected) == Some(i))
                .count();
            let precision = ratio(tp, predicted);
            let recall = ratio(tp, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassMetrics {
                label: label.clone(),
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let macro_f1 = if per_class.is_empty() {
        0.0
    } else {
        per_class.iter().map(|m| m.f1).sum::<f64>() / per_class.len() as f64
    };

    EvaluationReport {
        labels,
        confusion,
        per_class,
        accuracy: ratio(correct, total),
        macro_f1,
        total,
        unmatched_predictions,
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .labels
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(8);

        writeln!(
            f,
            "{:>width$}  {:>9}  {:>9}  {:>9}  {:>7}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for m in &self.per_class {
            writeln!(
                f,
                "{:>width$}  {:>9.2}  {:>9.2}  {:>9.2}  {:>7}",
                m.label, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$}  {:>9}  {:>9}  {:>9.2}  {:>7}",
            "accuracy", "", "", self.accuracy, self.total
        )?;
        writeln!(
            f,
            "{:>width$}  {:>9}  {:>9}  {:>9.2}  {:>7}",
            "macro f1", "", "", self.macro_f1, self.total
        )?;
        if self.unmatched_predictions > 0 {
            writeln!(f, "unmatched predictions: {}", self.unmatched_predictions)?;
        }

        writeln!(f)?;
        writeln!(f, "confusion matrix (rows = expected, columns = predicted)")?;
        write!(f, "{:>width$}", "")?;
        for label in &self.labels {
            write!(f, "  {label:>width$}")?;
        }
        writeln!(f)?;
        for (label, row) in self.labels.iter().zip(&self.confusion) {
            write!(f, "{label:>width$}")?;
            for count in row {
                write!(f, "  {count:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
