use crate::config::SolveOptions;
use crate::models::{Blocker, BlockerKind, Macro, MacroTarget, Macros, PortionableItem};

/// Smallest and largest achievable totals under the current constraints.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Envelope {
    pub min_totals: Macros,
    pub max_totals: Macros,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeasibilityReport {
    pub envelope: Envelope,
    pub blockers: Vec<Blocker>,
}

impl FeasibilityReport {
    pub fn is_feasible(&self) -> bool {
        self.blockers.is_empty()
    }
}

/// Sum every counting item's contribution at its interval extremes.
pub fn envelope(items: &[PortionableItem], seasonings_count_macros: bool) -> Envelope {
    let mut env = Envelope::default();
    for item in items
        .iter()
        .filter(|item| item.counts(seasonings_count_macros))
    {
        let (lo, hi) = item.interval();
        env.min_totals.add_scaled(&item.per_gram(), lo as f64);
        env.max_totals.add_scaled(&item.per_gram(), hi as f64);
    }
    env
}

fn fmt_amount(m: Macro, value: f64) -> String {
    match m {
        Macro::Calories => format!("{:.0} kcal", value),
        _ => format!("{:.1}g {}", value, m),
    }
}

/// Check whether the target can fall inside the envelope, within tolerance.
///
/// Each violated macro yields a total-level blocker followed by blockers for
/// the items pinned at the binding extreme.
pub fn analyze(
    items: &[PortionableItem],
    target: &MacroTarget,
    options: &SolveOptions,
) -> FeasibilityReport {
    let envelope = envelope(items, options.seasonings_count_macros);
    let counting: Vec<&PortionableItem> = items
        .iter()
        .filter(|item| item.counts(options.seasonings_count_macros))
        .collect();
    let mut blockers = Vec::new();

    for m in Macro::ALL {
        let tol = options.tolerances.get(m);
        let wanted = target.get(m);
        let max = envelope.max_totals.get(m);
        let min = envelope.min_totals.get(m);

        if tol.out_of_reach(wanted, max) {
            let providers: Vec<&&PortionableItem> =
                counting.iter().filter(|item| item.density.get(m) > 0.0).collect();
            let detail = if providers.is_empty() {
                format!("no item provides {}; target is {}", m, fmt_amount(m, wanted))
            } else {
                format!(
                    "at most {} achievable; target is {}",
                    fmt_amount(m, max),
                    fmt_amount(m, wanted)
                )
            };
            blockers.push(Blocker::new("total", BlockerKind::MaxAchievable(m), max, detail));

            for item in providers.into_iter().filter(|item| item.is_adjustable()) {
                let (_, hi) = item.interval();
                blockers.push(Blocker::new(
                    &item.name,
                    BlockerKind::AtMaximum,
                    hi as f64,
                    format!("{} at maximum {}g, cannot add more {}", item.name, hi, m),
                ));
            }
        } else if tol.overshot(wanted, min) {
            blockers.push(Blocker::new(
                "total",
                BlockerKind::MinAchievable(m),
                min,
                format!(
                    "at least {} unavoidable; target is {}",
                    fmt_amount(m, min),
                    fmt_amount(m, wanted)
                ),
            ));

            for item in &counting {
                let (lo, _) = item.interval();
                let contributed = item.per_gram().get(m) * lo as f64;
                if contributed <= 0.0 {
                    continue;
                }
                let (kind, what) = if item.is_adjustable() {
                    (BlockerKind::AtMinimum, "at minimum")
                } else {
                    (BlockerKind::LockedContribution, "locked at")
                };
                blockers.push(Blocker::new(
                    &item.name,
                    kind,
                    contributed,
                    format!(
                        "{} {} {}g, contributes {}",
                        item.name,
                        what,
                        lo,
                        fmt_amount(m, contributed)
                    ),
                ));
            }
        }
    }

    FeasibilityReport { envelope, blockers }
}
