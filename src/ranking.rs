// 🏆 Top-N Ranker - filter, sort, truncate into chart-ready series

use serde::{Deserialize, Serialize};

/// Chart series plus the ranked records they came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopN<T> {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub entities: Vec<T>,
}

impl<T> TopN<T> {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<T> Default for TopN<T> {
    fn default() -> Self {
        TopN {
            labels: Vec::new(),
            values: Vec::new(),
            entities: Vec::new(),
        }
    }
}

/// Top `n` entities by `metric`.
///
/// Entities with a metric ≤ 0 (or NaN) are dropped. The sort is stable, so
/// entities with equal metrics stay in input order.
pub fn top_n<T, M, L>(entities: Vec<T>, metric: M, n: usize, label: L) -> TopN<T>
where
    M: Fn(&T) -> f64,
    L: Fn(&T) -> String,
{
    let mut ranked: Vec<(f64, T)> = entities
        .into_iter()
        .map(|e| (metric(&e), e))
        .filter(|(m, _)| *m > 0.0)
        .collect();

    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked.truncate(n);

    let mut top = TopN::default();
    for (value, entity) in ranked {
        top.labels.push(label(&entity));
        top.values.push(value);
        top.entities.push(entity);
    }

    top
}

// ============================================================================
// TESTS
// ============================================================================
