//! Engine mixing: base thrust plus differential attitude offsets.

use glam::Vec2;

use crate::attitude::AttitudeSignal;
use crate::descent::rate_limit;

/// Lateral (x) and longitudinal (z) sign of engines 0..4: front-left,
/// front-right, back-left, back-right. Further engines get base thrust only.
pub const ENGINE_LAYOUT: [Vec2; 4] = [
    Vec2::new(-1.0, 1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(-1.0, -1.0),
    Vec2::new(1.0, -1.0),
];

/// Per-engine offsets producing the requested torque.
///
/// An engine at (x, z) pushing along +Y yields torque (-z·F, 0, x·F), so
/// roll follows the lateral sign and pitch the negated longitudinal sign.
/// Yaw comes from the diagonal pairs.
pub fn engine_offsets(signal: &AttitudeSignal) -> [f32; 4] {
    ENGINE_LAYOUT.map(|s| {
        let diagonal = -s.x * s.y;
        s.x * signal.roll - s.y * signal.pitch + diagonal * signal.yaw
    })
}

/// Desired thrust per engine in [0, 1].
///
/// Offsets apply only on top of a base above `min_base_thrust` and only
/// with at least four engines; a zero base leaves every engine at zero.
pub fn mix(
    base: f32,
    signal: Option<&AttitudeSignal>,
    engine_count: usize,
    min_base_thrust: f32,
) -> Vec<f32> {
    if !(base > min_base_thrust) {
        return vec![0.0; engine_count];
    }
    let base = base.min(1.0);
    let mut thrust = vec![base; engine_count];
    if let Some(signal) = signal.filter(|_| engine_count >= ENGINE_LAYOUT.len()) {
        for (engine, offset) in thrust.iter_mut().zip(engine_offsets(signal)) {
            *engine = (base + offset).clamp(0.0, 1.0);
        }
    }
    thrust
}

/// Step `current` toward `desired`, each engine by at most `max_step`.
pub fn rate_limit_engines(current: &mut Vec<f32>, desired: &[f32], max_step: f32) {
    current.resize(desired.len(), 0.0);
    for (engine, target) in current.iter_mut().zip(desired) {
        *engine = rate_limit(*engine, *target, max_step);
    }
}
