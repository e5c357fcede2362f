//! Side-effect-free forecast of upcoming turns.

use crate::state::{Combatant, CombatantId};

#[derive(Clone, Copy, Debug)]
struct Simulated {
    id: CombatantId,
    gauge: f64,
    threshold: f64,
    rate: f64,
}

impl Simulated {
    fn time_to_ready(&self) -> f64 {
        ((self.threshold - self.gauge) / self.rate).max(0.0)
    }
}

/// Predicts the next `count` turns from a snapshot of the given combatants.
///
/// Only combatants alive at snapshot time take part, for the whole horizon:
/// deaths inside the forecast are not modeled. Combatants whose rate is not
/// positive never act and are left out. On equal time-to-ready the combatant
/// that comes first in iteration order is chosen.
///
/// The real gauges are never touched.
pub fn predict_order<'a, I>(combatants: I, count: usize) -> Vec<CombatantId>
where
    I: IntoIterator<Item = &'a Combatant>,
{
    let mut snapshot: Vec<Simulated> = combatants
        .into_iter()
        .filter(|c| c.is_alive() && c.gauge().rate() > 0.0)
        .map(|c| Simulated {
            id: c.id(),
            gauge: c.gauge().current(),
            threshold: c.gauge().threshold(),
            rate: c.gauge().rate(),
        })
        .collect();

    let mut order = Vec::new();
    while order.len() < count && !snapshot.is_empty() {
        let mut next = 0;
        let mut min_time = f64::INFINITY;
        for (index, entry) in snapshot.iter().enumerate() {
            let time = entry.time_to_ready();
            if time < min_time {
                min_time = time;
                next = index;
            }
        }

        for entry in &mut snapshot {
            entry.gauge = (entry.gauge + entry.rate * min_time).min(entry.threshold);
        }
        snapshot[next].gauge = 0.0;
        order.push(snapshot[next].id);
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GaugeConfig;
    use crate::state::Attributes;

    fn unit(id: u32, rate: f64) -> Combatant {
        Combatant::new(
            CombatantId(id),
            format!("unit-{id}"),
            Attributes::default(),
            &GaugeConfig::default(),
        )
        .with_rate(rate)
    }

    #[test]
    fn matches_closed_form_time_to_ready() {
        let slow = unit(1, 40.0);
        let fast = unit(2, 81.0);

        // fast: 100/81 ≈ 1.23; slow: 2.5. After fast acts, slow sits at ~49.4
        // and needs ~1.27 more, while fast needs 1.23 again.
        let order = predict_order([&slow, &fast], 3);
        assert_eq!(order, vec![CombatantId(2), CombatantId(2), CombatantId(1)]);
    }

    #[test]
    fn ties_follow_iteration_order() {
        let a = unit(5, 50.0);
        let b = unit(3, 50.0);
        assert_eq!(
            predict_order([&a, &b], 4),
            vec![CombatantId(5), CombatantId(3), CombatantId(5), CombatantId(3)]
        );
    }

    #[test]
    fn dead_and_stalled_combatants_are_excluded() {
        let alive = unit(1, 30.0);
        let dead = unit(2, 90.0).with_hp(0);
        let stalled = unit(3, 0.0);

        let order = predict_order([&alive, &dead, &stalled], 3);
        assert_eq!(order, vec![CombatantId(1); 3]);
    }

    #[test]
    fn empty_snapshot_yields_nothing() {
        let stalled = unit(1, -1.0);
        assert!(predict_order([&stalled], 5).is_empty());
        assert!(predict_order(std::iter::empty::<&Combatant>(), 5).is_empty());
    }

    #[test]
    fn unbounded_count_does_not_preallocate() {
        assert!(predict_order(std::iter::empty::<&Combatant>(), usize::MAX).is_empty());
        let stalled = unit(1, 0.0);
        assert!(predict_order([&stalled], usize::MAX).is_empty());
    }

    #[test]
    fn does_not_mutate_real_gauges() {
        let mut fast = unit(1, 60.0);
        fast.advance_gauge(1.0);
        let before = fast.gauge().current();
        let _ = predict_order([&fast], 5);
        assert_eq!(fast.gauge().current(), before);
    }
}
