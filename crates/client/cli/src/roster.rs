//! Sample party and encounter for headless runs.
use atb_core::{Attributes, Combatant, CombatantId, Control, GaugeConfig};

use crate::config::CliConfig;

/// Two allies against two enemies.
pub fn sample(config: &CliConfig) -> (Vec<Combatant>, Vec<Combatant>) {
    let gauge = &config.runtime.battle.gauge;
    let control = if config.human_allies {
        Control::Human
    } else {
        Control::Ai
    };

    let allies = vec![
        fighter(1, "Knight", Attributes::new(16, 10, 8), gauge).with_control(control),
        fighter(2, "Ranger", Attributes::new(12, 16, 10), gauge).with_control(control),
    ];
    let enemies = vec![
        fighter(3, "Goblin", Attributes::new(10, 14, 6), gauge),
        fighter(4, "Orc", Attributes::new(17, 8, 6), gauge),
    ];
    (allies, enemies)
}

fn fighter(id: u32, name: &str, attributes: Attributes, gauge: &GaugeConfig) -> Combatant {
    Combatant::new(CombatantId(id), name, attributes, gauge)
}
