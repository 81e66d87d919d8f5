//! Landing phase state machine.
//!
//! Pure functions over plain data: phase transitions from target geometry,
//! and best-site selection. No vehicle or scanner dependency.

use glam::Vec3;

use touchdown_core::enums::AutopilotPhase;
use touchdown_core::types::LandingSite;

use crate::config::AutopilotConfig;

/// Vehicle position relative to the pursued site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetGeometry {
    /// 3D distance to the site center.
    pub distance: f32,
    /// Absolute height difference.
    pub vertical: f32,
}

impl TargetGeometry {
    pub fn between(vehicle: Vec3, site: &LandingSite) -> Self {
        Self {
            distance: vehicle.distance(site.position),
            vertical: (vehicle.y - site.position.y).abs(),
        }
    }
}

/// Outcome of one FSM evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseUpdate {
    pub new_phase: AutopilotPhase,
    pub phase_changed: bool,
    /// The vehicle reached the site; cut thrust and disarm.
    pub touchdown: bool,
}

impl PhaseUpdate {
    fn stay(phase: AutopilotPhase) -> Self {
        Self {
            new_phase: phase,
            phase_changed: false,
            touchdown: false,
        }
    }

    fn enter(phase: AutopilotPhase) -> Self {
        Self {
            new_phase: phase,
            phase_changed: true,
            touchdown: false,
        }
    }
}

/// Evaluate one transition. `target` is `None` when no site is pursued.
pub fn evaluate(
    phase: AutopilotPhase,
    target: Option<TargetGeometry>,
    config: &AutopilotConfig,
) -> PhaseUpdate {
    if phase == AutopilotPhase::Idle {
        return PhaseUpdate::stay(phase);
    }

    let Some(target) = target else {
        // Active phases need a target; fall back to waiting for one
        return if phase == AutopilotPhase::WaitingForSite {
            PhaseUpdate::stay(phase)
        } else {
            PhaseUpdate::enter(AutopilotPhase::WaitingForSite)
        };
    };

    match phase {
        AutopilotPhase::WaitingForSite => PhaseUpdate::enter(AutopilotPhase::Approaching),
        AutopilotPhase::Approaching if target.distance < config.braking_distance => {
            PhaseUpdate::enter(AutopilotPhase::Braking)
        }
        AutopilotPhase::Braking
            if target.distance < config.landing_entry_distance
                && target.vertical < config.landing_entry_vertical =>
        {
            PhaseUpdate::enter(AutopilotPhase::Landing)
        }
        AutopilotPhase::Landing
            if target.distance < config.touchdown_distance
                || target.vertical < config.touchdown_vertical =>
        {
            PhaseUpdate {
                new_phase: AutopilotPhase::Idle,
                phase_changed: true,
                touchdown: true,
            }
        }
        _ => PhaseUpdate::stay(phase),
    }
}

/// Highest score wins; scores within `tie_epsilon` go to the site nearest
/// `vehicle`.
pub fn select_best_site(
    sites: &[LandingSite],
    vehicle: Vec3,
    tie_epsilon: f32,
) -> Option<LandingSite> {
    sites
        .iter()
        .filter(|s| s.suitability_score.is_finite() && s.position.is_finite())
        .fold(None::<&LandingSite>, |best, site| match best {
            None => Some(site),
            Some(b) => {
                let diff = site.suitability_score - b.suitability_score;
                let closer = site.position.distance(vehicle) < b.position.distance(vehicle);
                if diff > tie_epsilon || (diff.abs() <= tie_epsilon && closer) {
                    Some(site)
                } else {
                    Some(b)
                }
            }
        })
        .copied()
}

/// Find `target` in the live list by position.
pub fn find_matching<'a>(
    sites: &'a [LandingSite],
    target: &LandingSite,
    tolerance: f32,
) -> Option<&'a LandingSite> {
    sites.iter().find(|s| s.matches(target, tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(distance: f32, vertical: f32) -> Option<TargetGeometry> {
        Some(TargetGeometry { distance, vertical })
    }

    fn site(x: f32, score: f32) -> LandingSite {
        LandingSite {
            position: Vec3::new(x, 0.0, 0.0),
            suitability_score: score,
            ..Default::default()
        }
    }

    #[test]
    fn test_idle_never_moves() {
        let config = AutopilotConfig::default();
        let update = evaluate(AutopilotPhase::Idle, geometry(0.0, 0.0), &config);
        assert_eq!(update.new_phase, AutopilotPhase::Idle);
        assert!(!update.phase_changed && !update.touchdown);
    }

    #[test]
    fn test_waiting_to_approaching_needs_target() {
        let config = AutopilotConfig::default();
        let update = evaluate(AutopilotPhase::WaitingForSite, None, &config);
        assert!(!update.phase_changed);
        let update = evaluate(AutopilotPhase::WaitingForSite, geometry(400.0, 300.0), &config);
        assert_eq!(update.new_phase, AutopilotPhase::Approaching);
    }

    #[test]
    fn test_approach_brake_land_sequence() {
        let config = AutopilotConfig::default();
        let far = evaluate(AutopilotPhase::Approaching, geometry(80.0, 60.0), &config);
        assert!(!far.phase_changed);
        let near = evaluate(AutopilotPhase::Approaching, geometry(49.0, 40.0), &config);
        assert_eq!(near.new_phase, AutopilotPhase::Braking);

        // Close but still too high
        let high = evaluate(AutopilotPhase::Braking, geometry(4.5, 4.0), &config);
        assert!(!high.phase_changed);
        let land = evaluate(AutopilotPhase::Braking, geometry(4.5, 2.5), &config);
        assert_eq!(land.new_phase, AutopilotPhase::Landing);

        let hover = evaluate(AutopilotPhase::Landing, geometry(2.0, 1.0), &config);
        assert!(!hover.touchdown);
        let down = evaluate(AutopilotPhase::Landing, geometry(2.0, 0.1), &config);
        assert!(down.touchdown);
        assert_eq!(down.new_phase, AutopilotPhase::Idle);
    }

    #[test]
    fn test_lost_target_returns_to_waiting() {
        let config = AutopilotConfig::default();
        for phase in [
            AutopilotPhase::Approaching,
            AutopilotPhase::Braking,
            AutopilotPhase::Landing,
        ] {
            let update = evaluate(phase, None, &config);
            assert_eq!(update.new_phase, AutopilotPhase::WaitingForSite);
            assert!(update.phase_changed);
        }
    }

    #[test]
    fn test_selection_prefers_score_then_distance() {
        let sites = [site(50.0, 0.8), site(-20.0, 0.95), site(30.0, 0.95)];
        let best = select_best_site(&sites, Vec3::new(-5.0, 100.0, 0.0), 1e-4).unwrap();
        assert_eq!(best.position.x, -20.0);

        let best = select_best_site(&sites, Vec3::new(25.0, 100.0, 0.0), 1e-4).unwrap();
        assert_eq!(best.position.x, 30.0);

        assert!(select_best_site(&[], Vec3::ZERO, 1e-4).is_none());
    }

    #[test]
    fn test_match_by_proximity() {
        let sites = [site(0.0, 0.9), site(40.0, 0.8)];
        let moved = site(40.3, 0.7);
        assert_eq!(find_matching(&sites, &moved, 1.0).map(|s| s.position.x), Some(40.0));
        assert!(find_matching(&sites, &site(42.0, 0.8), 1.0).is_none());
    }
}
