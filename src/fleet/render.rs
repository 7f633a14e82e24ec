use crate::types::{Battery, Unit, UnitId, UnitStatus};

use super::status::targets;

pub const EMPTY_FLEET_MESSAGE: &str = "No units yet. Add one with the \"New unit\" button to get started.";

/// Aggregates over one snapshot. Always recomputed, never patched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FleetStats {
    pub total: usize,
    pub active: usize,
    pub idle: usize,
    pub average_battery: u8,
}

impl FleetStats {
    pub fn from_units(units: &[Unit]) -> Self {
        let count = |status| units.iter().filter(|unit| unit.status == status).count();

        Self {
            total: units.len(),
            active: count(UnitStatus::Active),
            idle: count(UnitStatus::Idle),
            average_battery: average_battery(units),
        }
    }
}

// Rounds half up, 0 for an empty fleet.
fn average_battery(units: &[Unit]) -> u8 {
    if units.is_empty() {
        return 0;
    }

    let sum: u64 = units
        .iter()
        .map(|unit| u64::from(unit.battery.percent()))
        .sum();
    let count = units.len() as u64;
    let average = (2 * sum + count) / (2 * count);

    u8::try_from(average).unwrap_or(100)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub total: String,
    pub active: String,
    pub idle: String,
    pub average_battery: String,
}

impl From<FleetStats> for StatsView {
    fn from(stats: FleetStats) -> Self {
        Self {
            total: stats.total.to_string(),
            active: stats.active.to_string(),
            idle: stats.idle.to_string(),
            average_battery: format!("{}%", stats.average_battery),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitCard {
    pub id: UnitId,
    pub name: String,
    pub model: String,
    pub status: UnitStatus,
    pub status_label: &'static str,
    pub battery: Battery,
    pub battery_label: String,
    pub created_at: String,
    pub transitions: [UnitStatus; 2],
}

impl From<&Unit> for UnitCard {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id,
            name: unit.name.clone(),
            model: unit.model.clone(),
            status: unit.status,
            status_label: unit.status.label(),
            battery: unit.battery,
            battery_label: format!("Battery: {}", unit.battery),
            created_at: unit.created_at.clone(),
            transitions: targets(unit.status),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Empty { message: &'static str },
    Cards(Vec<UnitCard>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetView {
    pub stats: StatsView,
    pub list: ListView,
}

/// Rebuilds the whole view from the snapshot, nothing is carried over from a previous render.
pub fn render(units: &[Unit]) -> FleetView {
    let stats = FleetStats::from_units(units).into();
    let list = if units.is_empty() {
        ListView::Empty {
            message: EMPTY_FLEET_MESSAGE,
        }
    } else {
        ListView::Cards(units.iter().map(UnitCard::from).collect())
    };

    FleetView { stats, list }
}

/// Receives every rendered view. Each call replaces the previous one.
pub trait RenderSink {
    fn render(&self, view: FleetView);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::unit;

    #[test]
    fn empty_snapshot_renders_empty_state() {
        let view = render(&[]);

        assert_eq!(view.stats.total, "0");
        assert_eq!(view.stats.average_battery, "0%");
        assert_eq!(
            view.list,
            ListView::Empty {
                message: EMPTY_FLEET_MESSAGE
            }
        );
    }

    #[test]
    fn average_battery_of_two_units() {
        let units = [
            unit(1, UnitStatus::Active, 80),
            unit(2, UnitStatus::Idle, 40),
        ];

        let view = render(&units);
        assert_eq!(view.stats.average_battery, "60%");
    }

    #[test]
    fn average_battery_rounds_half_up() {
        let units = [
            unit(1, UnitStatus::Active, 50),
            unit(2, UnitStatus::Active, 51),
        ];
        assert_eq!(FleetStats::from_units(&units).average_battery, 51);

        let units = [
            unit(1, UnitStatus::Active, 10),
            unit(2, UnitStatus::Active, 10),
            unit(3, UnitStatus::Active, 11),
        ];
        assert_eq!(FleetStats::from_units(&units).average_battery, 10);
    }

    #[test]
    fn totals_follow_snapshot_size() {
        for size in 0..6 {
            let units = (0..size)
                .map(|id| unit(id, UnitStatus::ALL[id as usize % 3], 100))
                .collect::<Vec<_>>();
            let stats = FleetStats::from_units(&units);

            assert_eq!(stats.total, units.len());
            assert_eq!(
                stats.active + stats.idle,
                units
                    .iter()
                    .filter(|unit| unit.status != UnitStatus::Maintenance)
                    .count()
            );
        }
    }

    #[test]
    fn cards_keep_snapshot_order_and_offer_other_statuses() {
        let units = [
            unit(7, UnitStatus::Maintenance, 12),
            unit(3, UnitStatus::Active, 99),
        ];

        let ListView::Cards(cards) = render(&units).list else {
            panic!("expected cards");
        };

        assert_eq!(cards.iter().map(|card| card.id).collect::<Vec<_>>(), [7, 3]);
        assert_eq!(cards[0].battery_label, "Battery: 12%");
        assert_eq!(cards[0].status_label, "Maintenance");
        assert!(!cards[0].transitions.contains(&UnitStatus::Maintenance));
    }

    #[test]
    fn rendering_is_stateless() {
        let first = [unit(1, UnitStatus::Active, 20)];
        let second = [unit(2, UnitStatus::Idle, 90)];

        let _ = render(&first);
        assert_eq!(render(&second), render(&second));
        assert_eq!(render(&second).stats.active, "0");
    }
}
