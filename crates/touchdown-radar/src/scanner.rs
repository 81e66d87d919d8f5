//! Time-sliced landing-site scanner.
//!
//! `LandingSiteScanner` owns the scan session, the published ranked sites
//! and the presentation flag. The caller drives it with [`update`] once per
//! tick; each call evaluates at most `max_points_per_frame` points.
//!
//! [`update`]: LandingSiteScanner::update

use glam::{Vec2, Vec3};

use touchdown_core::enums::{RejectReason, SamplingStrategyKind, ScanState};
use touchdown_core::events::ScanEvent;
use touchdown_core::state::ScannerSnapshot;
use touchdown_core::traits::SiteProvider;
use touchdown_core::types::LandingSite;

use crate::clustering::{cluster_sites, rank_sites};
use crate::config::ScannerConfig;
use crate::evaluation::{evaluate_site, ScanContext};
use crate::sampling::Sampler;

/// What a single update did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanTick {
    /// Points evaluated this call.
    pub processed: usize,
    /// A new session began this call.
    pub started: bool,
    /// The session finished and its results were published this call.
    pub completed: bool,
}

/// One scan pass over a fixed, distance-ordered point list.
#[derive(Debug, Clone)]
struct ScanSession {
    points: Vec<Vec2>,
    cursor: usize,
    results: Vec<LandingSite>,
    accepted_since_group: usize,
    reject_counts: [u32; 6],
}

impl ScanSession {
    fn new(points: Vec<Vec2>) -> Self {
        Self {
            points,
            cursor: 0,
            results: Vec::new(),
            accepted_since_group: 0,
            reject_counts: [0; 6],
        }
    }

    fn is_finished(&self) -> bool {
        self.cursor >= self.points.len()
    }
}

/// Radar-style landing-site scanner.
#[derive(Debug, Clone)]
pub struct LandingSiteScanner {
    config: ScannerConfig,
    sampler: Sampler,
    state: ScanState,
    session: Option<ScanSession>,
    sites: Vec<LandingSite>,
    presented: bool,
    presented_at: Option<Vec3>,
    has_completed_scan: bool,
    time_since_scan: f32,
    ground_below: f32,
    last_reject_counts: [u32; 6],
    events: Vec<ScanEvent>,
}

impl Default for LandingSiteScanner {
    fn default() -> Self {
        Self::new(ScannerConfig::default())
    }
}

impl LandingSiteScanner {
    /// Create a scanner; the sampling strategy is fixed from `config`.
    pub fn new(config: ScannerConfig) -> Self {
        let config = config.sanitized();
        let sampler = Sampler::from_config(&config);
        Self {
            config,
            sampler,
            state: ScanState::Idle,
            session: None,
            sites: Vec::new(),
            presented: false,
            presented_at: None,
            has_completed_scan: false,
            time_since_scan: 0.0,
            ground_below: 0.0,
            last_reject_counts: [0; 6],
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn strategy(&self) -> SamplingStrategyKind {
        self.sampler.kind()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Live ranked sites, best first.
    pub fn sites(&self) -> &[LandingSite] {
        &self.sites
    }

    pub fn is_presented(&self) -> bool {
        self.presented
    }

    /// Where the current result set was first presented.
    pub fn presented_at(&self) -> Option<Vec3> {
        self.presented_at
    }

    /// Fraction of the current session evaluated; 1 when idle.
    pub fn progress(&self) -> f32 {
        match &self.session {
            Some(session) if !session.points.is_empty() => {
                session.cursor as f32 / session.points.len() as f32
            }
            _ => 1.0,
        }
    }

    /// Cursor and point count of the running session.
    pub fn session_cursor(&self) -> Option<(usize, usize)> {
        self.session
            .as_ref()
            .map(|session| (session.cursor, session.points.len()))
    }

    /// Rejections of the running session, or of the last finished one.
    pub fn reject_counts(&self) -> [u32; 6] {
        self.session
            .as_ref()
            .map_or(self.last_reject_counts, |session| session.reject_counts)
    }

    /// Drain pending events.
    pub fn take_events(&mut self) -> Vec<ScanEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            state: self.state,
            progress: self.progress(),
            sites: self.sites.clone(),
            presented: self.presented,
            reject_counts: self.reject_counts(),
        }
    }

    /// Drop all results and any running session.
    pub fn reset(&mut self) {
        self.state = ScanState::Idle;
        self.session = None;
        self.sites.clear();
        self.presented = false;
        self.presented_at = None;
        self.has_completed_scan = false;
        self.time_since_scan = 0.0;
        self.last_reject_counts = [0; 6];
    }

    /// Advance scanning by one tick.
    pub fn update(&mut self, ctx: &ScanContext, dt: f32) -> ScanTick {
        let mut tick = ScanTick::default();
        let center = ctx.ground_center();
        self.ground_below = ctx.terrain.height_at(center.x, center.y);

        if self.moved_beyond_rescan_distance(ctx.vehicle_position) {
            self.presented = false;
            self.presented_at = None;
            if let Some(session) = self.session.take() {
                log::debug!("scan cancelled after {} points", session.cursor);
                self.events.push(ScanEvent::ScanCancelled {
                    processed: session.cursor,
                });
            }
            self.state = ScanState::Idle;
            self.begin_session(ctx);
            tick.started = true;
        } else if self.state == ScanState::Idle {
            if dt.is_finite() && dt > 0.0 {
                self.time_since_scan += dt;
            }
            if !self.has_completed_scan || self.time_since_scan >= self.config.scan_interval {
                self.begin_session(ctx);
                tick.started = true;
            }
        }

        let Some(mut session) = self.session.take() else {
            return tick;
        };

        let budget = self.config.max_points_per_frame;
        while tick.processed < budget && !session.is_finished() {
            let point = session.points[session.cursor];
            session.cursor += 1;
            tick.processed += 1;

            match evaluate_site(point, ctx, &self.config) {
                Ok(site) => {
                    session.results.push(site);
                    session.accepted_since_group += 1;
                    if session.accepted_since_group >= self.config.group_sites_every {
                        let results = std::mem::take(&mut session.results);
                        session.results =
                            cluster_sites(results, self.config.min_distance_between_sites);
                        session.accepted_since_group = 0;
                    }
                }
                Err(reason) => session.reject_counts[reason.index()] += 1,
            }
        }

        if session.is_finished() {
            self.finish_session(session, ctx.vehicle_position);
            tick.completed = true;
        } else {
            self.session = Some(session);
        }
        tick
    }

    fn moved_beyond_rescan_distance(&self, vehicle: Vec3) -> bool {
        self.presented_at.is_some_and(|at| {
            Vec2::new(vehicle.x - at.x, vehicle.z - at.z).length() > self.config.rescan_distance
        })
    }

    fn begin_session(&mut self, ctx: &ScanContext) {
        let points = self.sampler.generate(ctx, &self.config);
        log::debug!(
            "scan started: {} {:?} points around ({:.1}, {:.1})",
            points.len(),
            self.sampler.kind(),
            ctx.vehicle_position.x,
            ctx.vehicle_position.z,
        );
        self.events.push(ScanEvent::ScanStarted {
            points: points.len(),
        });
        self.session = Some(ScanSession::new(points));
        self.state = ScanState::Scanning;
    }

    fn finish_session(&mut self, session: ScanSession, vehicle: Vec3) {
        let mut sites = cluster_sites(session.results, self.config.min_distance_between_sites);
        rank_sites(&mut sites, self.config.max_results);

        log::debug!(
            "scan completed: {} sites from {} points, rejected {}",
            sites.len(),
            session.points.len(),
            format_rejects(&session.reject_counts),
        );

        self.events.push(ScanEvent::ScanCompleted { sites: sites.len() });
        self.sites = sites;
        self.last_reject_counts = session.reject_counts;
        self.state = ScanState::Idle;
        self.has_completed_scan = true;
        self.time_since_scan = 0.0;

        if !self.presented {
            self.presented = true;
            self.presented_at = Some(vehicle);
            self.events.push(ScanEvent::ResultsPresented {
                position: vehicle,
                sites: self.sites.len(),
            });
        }
    }
}

fn format_rejects(counts: &[u32; 6]) -> String {
    RejectReason::ALL
        .iter()
        .map(|reason| format!("{reason:?}={}", counts[reason.index()]))
        .collect::<Vec<_>>()
        .join(" ")
}

impl SiteProvider for LandingSiteScanner {
    fn ranked_sites(&self) -> &[LandingSite] {
        &self.sites
    }

    fn results_presented(&self) -> bool {
        self.presented
    }

    fn ground_height_below(&self) -> f32 {
        self.ground_below
    }
}
