//! Snapshot system: assembles the per-tick `SimSnapshot`.
//!
//! Read-only with respect to the simulation; events are passed in already
//! drained.

use touchdown_autopilot::LandingAutopilot;
use touchdown_core::events::{AutopilotEvent, ScanEvent};
use touchdown_core::state::{SimSnapshot, VehicleView};
use touchdown_core::traits::Vehicle;
use touchdown_core::types::SimTime;
use touchdown_radar::LandingSiteScanner;

use crate::vehicle::PointMassVehicle;

pub fn build_snapshot(
    time: &SimTime,
    vehicle: &PointMassVehicle,
    autopilot: &LandingAutopilot,
    scanner: &LandingSiteScanner,
    autopilot_events: Vec<AutopilotEvent>,
    scan_events: Vec<ScanEvent>,
) -> SimSnapshot {
    SimSnapshot {
        time: *time,
        vehicle: build_vehicle(vehicle),
        autopilot: autopilot.snapshot(),
        scanner: scanner.snapshot(),
        autopilot_events,
        scan_events,
    }
}

fn build_vehicle(vehicle: &PointMassVehicle) -> VehicleView {
    VehicleView {
        position: vehicle.position,
        velocity: vehicle.velocity,
        angular_velocity: vehicle.angular_velocity,
        up: vehicle.up(),
    }
}
