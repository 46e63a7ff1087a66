// This file is part of motion_hub.
//
// See the COPYRIGHT file at the top-level directory of this distribution
// for details of code ownership.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use log::{debug, info, warn};
use serde::Serialize;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::sleep;
use std::time::Duration;

use crate::config::AppConfig;
use crate::control::frame_smoother::FrameSmoother;
use crate::control::motion_mapper::map;
use crate::enums::LoopState;
use crate::interface::actuator_link::ActuatorLink;
use crate::profile::actuator_profile::RigProfile;
use crate::telemetry::telemetry_source::TelemetrySource;

#[derive(Serialize, Clone, Copy, PartialEq, Debug, Default)]
pub struct LoopStatistics {
    // Number of the frames mapped into the targets.
    pub frames_mapped: u64,
    // Number of the target lines written to the rig.
    pub lines_sent: u64,
    // Number of the target lines failed to write.
    pub send_failures: u64,
    // Number of the polls without the telemetry.
    pub idle_polls: u64,
}

pub struct ControlLoop {
    _source: Box<dyn TelemetrySource + Send>,
    _profile: RigProfile,
    _link: ActuatorLink,
    _smoother: FrameSmoother,
    // Sleep when there is no telemetry.
    _idle_backoff: Duration,
    // Tick of the next target line.
    _tick: u64,
    _failure_warning_threshold: u64,
    _consecutive_failures: u64,
    _is_link_healthy: bool,
    // State of the latest iteration.
    pub state: LoopState,
    pub statistics: LoopStatistics,
    // Stop the loop.
    _stop: Arc<AtomicBool>,
}

impl ControlLoop {
    /// Create a new control loop.
    ///
    /// # Arguments
    /// * `source` - Telemetry source.
    /// * `profile` - Rig profile.
    /// * `link` - Actuator link. It should be opened already.
    /// * `config` - Application configuration.
    /// * `stop` - An Arc instance that holds the AtomicBool instance to stop
    /// the loop.
    ///
    /// # Returns
    /// A new control loop.
    pub fn new(
        source: Box<dyn TelemetrySource + Send>,
        profile: RigProfile,
        link: ActuatorLink,
        config: &AppConfig,
        stop: &Arc<AtomicBool>,
    ) -> Self {
        Self {
            _source: source,
            _profile: profile,
            _link: link,
            _smoother: FrameSmoother::new(config.smoothing, config.smoothing_history),

            _idle_backoff: Duration::from_millis(config.idle_backoff_ms),

            _tick: 0,

            _failure_warning_threshold: config.failure_warning_threshold.max(1),
            _consecutive_failures: 0,
            _is_link_healthy: true,

            state: LoopState::Idle,
            statistics: LoopStatistics::default(),

            _stop: stop.clone(),
        }
    }

    /// Tick of the next target line.
    pub fn tick(&self) -> u64 {
        self._tick
    }

    /// The link is healthy or not. It is unhealthy after the consecutive send
    /// failures reach the warning threshold, until the next success.
    pub fn is_link_healthy(&self) -> bool {
        self._is_link_healthy
    }

    /// Run one iteration: poll the source, map the frame, and send the
    /// targets. If there is no telemetry, sleep for the idle backoff.
    ///
    /// # Returns
    /// State at the end of the iteration.
    pub fn step(&mut self) -> LoopState {
        self.state = LoopState::Idle;

        let frame = match self._source.poll() {
            Some(frame) if frame.is_finite() => frame,
            Some(_) => {
                debug!("{} drops a non-finite frame.", self._source.name());
                self.idle();

                return self.state;
            }
            None => {
                self.idle();

                return self.state;
            }
        };

        let frame_filter = self._smoother.filter(&frame);
        let targets = map(&self._profile, &frame_filter);
        self.state = LoopState::Mapped;
        self.statistics.frames_mapped += 1;

        let tick = self._tick;
        self._tick += 1;

        if self._link.send_targets(tick, &targets) {
            self.state = LoopState::Sent;
            self.statistics.lines_sent += 1;

            self.update_link_health(true);
        } else {
            self.state = LoopState::SendFailed;
            self.statistics.send_failures += 1;

            self.update_link_health(false);
        }

        self.state
    }

    /// Wait for the telemetry. The smoothing history is reset so that the
    /// frames before the gap are not averaged with the later ones.
    fn idle(&mut self) {
        self.statistics.idle_polls += 1;
        self._smoother.reset();

        sleep(self._idle_backoff);
    }

    /// Update the health of the link.
    ///
    /// # Arguments
    /// * `is_sent` - The latest target line is sent or not.
    fn update_link_health(&mut self, is_sent: bool) {
        if is_sent {
            if !self._is_link_healthy {
                info!(
                    "Actuator link recovers after {} failures.",
                    self._consecutive_failures
                );
                self._is_link_healthy = true;
            }

            self._consecutive_failures = 0;
        } else {
            self._consecutive_failures += 1;

            if self._is_link_healthy
                && (self._consecutive_failures >= self._failure_warning_threshold)
            {
                warn!(
                    "Actuator link fails {} times in a row. The rig is not following the telemetry.",
                    self._consecutive_failures
                );
                self._is_link_healthy = false;
            }
        }
    }

    /// Run the loop until the stop is requested, and close the link.
    ///
    /// # Returns
    /// Statistics of the loop.
    pub fn run(&mut self) -> LoopStatistics {
        info!(
            "Control loop is running with {} for {} actuators.",
            self._source.name(),
            self._profile.num_actuator()
        );

        while !self._stop.load(Ordering::Relaxed) {
            self.step();
        }

        self.state = LoopState::Stopped;
        self._link.close();

        info!(
            "Control loop is stopped: {}.",
            serde_json::to_string(&self.statistics).unwrap_or_default()
        );

        self.statistics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::thread::spawn;
    use std::time::Instant;

    use crate::constants::MOCK_RIG_CAPACITY;
    use crate::mock::mock_rig::MockRig;
    use crate::mock::mock_telemetry_source::MockTelemetrySource;
    use crate::telemetry::telemetry_frame::TelemetryFrame;

    fn create_control_loop(
        script: Vec<Option<TelemetryFrame>>,
        config: &AppConfig,
    ) -> (ControlLoop, MockRig, Arc<AtomicBool>) {
        let rig = MockRig::new(MOCK_RIG_CAPACITY);
        let mut link = ActuatorLink::new("link", Duration::from_millis(10));
        link.attach(Box::new(rig.clone()));

        let stop = Arc::new(AtomicBool::new(false));

        (
            ControlLoop::new(
                Box::new(MockTelemetrySource::new(script)),
                RigProfile::default(),
                link,
                config,
                &stop,
            ),
            rig,
            stop,
        )
    }

    fn create_frame(heave: f64) -> TelemetryFrame {
        TelemetryFrame {
            heave: heave,
            ..Default::default()
        }
    }

    #[test]
    fn test_new() {
        let (control_loop, _, stop) = create_control_loop(Vec::new(), &AppConfig::default());

        assert_eq!(Arc::strong_count(&stop), 2);
        assert_eq!(control_loop.state, LoopState::Idle);
        assert_eq!(control_loop.tick(), 0);
        assert!(control_loop.is_link_healthy());
    }

    #[test]
    fn test_step() {
        let (mut control_loop, rig, _) = create_control_loop(
            vec![Some(create_frame(100.0)), None, Some(create_frame(-5.0))],
            &AppConfig::default(),
        );

        assert_eq!(control_loop.step(), LoopState::Sent);
        assert_eq!(control_loop.step(), LoopState::Idle);
        assert_eq!(control_loop.step(), LoopState::Sent);

        // The heave is clamped at the minimum height 0 of the default profile.
        assert_eq!(rig.lines(), vec!["0,110,110,110,110", "1,5,5,5,5"]);
        assert_eq!(control_loop.tick(), 2);

        assert_eq!(
            control_loop.statistics,
            LoopStatistics {
                frames_mapped: 2,
                lines_sent: 2,
                send_failures: 0,
                idle_polls: 1,
            }
        );
    }

    #[test]
    fn test_step_send_failed() {
        let (mut control_loop, rig, _) = create_control_loop(
            vec![Some(create_frame(0.0)); 3],
            &AppConfig::default(),
        );

        rig.set_broken(true);
        assert_eq!(control_loop.step(), LoopState::SendFailed);

        // The tick keeps increasing so that the rig can detect the drop.
        rig.set_broken(false);
        assert_eq!(control_loop.step(), LoopState::Sent);
        assert_eq!(rig.lines(), vec!["1,10,10,10,10"]);

        assert_eq!(control_loop.statistics.send_failures, 1);
        assert_eq!(control_loop.statistics.lines_sent, 1);
    }

    #[test]
    fn test_step_closed_link() {
        let stop = Arc::new(AtomicBool::new(false));
        let mut control_loop = ControlLoop::new(
            Box::new(MockTelemetrySource::new(vec![Some(create_frame(0.0))])),
            RigProfile::default(),
            ActuatorLink::new("link", Duration::from_millis(10)),
            &AppConfig::default(),
            &stop,
        );

        assert_eq!(control_loop.step(), LoopState::SendFailed);
    }

    #[test]
    fn test_step_smoothing() {
        let mut config = AppConfig::default();
        config.smoothing = 1.0;
        config.smoothing_history = 2;

        let (mut control_loop, rig, _) = create_control_loop(
            vec![
                Some(create_frame(10.0)),
                Some(create_frame(30.0)),
                Some(create_frame(50.0)),
            ],
            &config,
        );

        for _ in 0..3 {
            control_loop.step();
        }

        assert_eq!(
            rig.lines(),
            vec!["0,20,20,20,20", "1,30,30,30,30", "2,50,50,50,50"]
        );
    }

    #[test]
    fn test_step_smoothing_reset_after_gap() {
        let mut config = AppConfig::default();
        config.smoothing = 1.0;
        config.smoothing_history = 3;

        let (mut control_loop, rig, _) = create_control_loop(
            vec![Some(create_frame(10.0)), None, Some(create_frame(30.0))],
            &config,
        );

        for _ in 0..3 {
            control_loop.step();
        }

        // The frame after the gap is not averaged with the older one.
        assert_eq!(rig.lines(), vec!["0,20,20,20,20", "1,40,40,40,40"]);
    }

    #[test]
    fn test_step_non_finite_frame() {
        let (mut control_loop, rig, _) = create_control_loop(
            vec![Some(create_frame(f64::NAN)), Some(create_frame(f64::INFINITY))],
            &AppConfig::default(),
        );

        assert_eq!(control_loop.step(), LoopState::Idle);
        assert_eq!(control_loop.step(), LoopState::Idle);

        assert!(rig.written().is_empty());
        assert_eq!(control_loop.tick(), 0);
        assert_eq!(control_loop.statistics.idle_polls, 2);
        assert_eq!(control_loop.statistics.frames_mapped, 0);
    }

    #[test]
    fn test_link_health() {
        let mut config = AppConfig::default();
        config.failure_warning_threshold = 3;

        let (mut control_loop, rig, _) =
            create_control_loop(vec![Some(create_frame(0.0)); 10], &config);

        rig.set_broken(true);
        for _ in 0..2 {
            control_loop.step();
        }
        assert!(control_loop.is_link_healthy());

        control_loop.step();
        assert!(!control_loop.is_link_healthy());

        control_loop.step();
        assert!(!control_loop.is_link_healthy());

        rig.set_broken(false);
        control_loop.step();
        assert!(control_loop.is_link_healthy());
        assert_eq!(control_loop._consecutive_failures, 0);
    }

    #[test]
    fn test_run() {
        let (mut control_loop, rig, stop) = create_control_loop(
            vec![Some(create_frame(1.0)), Some(create_frame(2.0))],
            &AppConfig::default(),
        );

        let handle = spawn(move || control_loop.run());

        sleep(Duration::from_millis(200));
        stop.store(true, Ordering::Relaxed);

        let statistics = handle.join().unwrap();

        assert_eq!(statistics.lines_sent, 2);
        assert!(statistics.idle_polls > 0);
        assert_eq!(rig.lines(), vec!["0,11,11,11,11", "1,12,12,12,12"]);
    }

    #[test]
    fn test_run_stop_without_telemetry() {
        let mut config = AppConfig::default();
        config.idle_backoff_ms = 5;

        let (mut control_loop, rig, stop) = create_control_loop(Vec::new(), &config);

        let handle = spawn(move || {
            let statistics = control_loop.run();
            (statistics, control_loop.state)
        });

        sleep(Duration::from_millis(50));

        let now = Instant::now();
        stop.store(true, Ordering::Relaxed);
        let (statistics, state) = handle.join().unwrap();

        // One iteration is bounded by the idle backoff here.
        assert!(now.elapsed() < Duration::from_millis(100));
        assert_eq!(state, LoopState::Stopped);
        assert_eq!(statistics.frames_mapped, 0);
        assert!(statistics.idle_polls > 0);
        assert!(rig.written().is_empty());
    }

    #[test]
    fn test_run_stopped_before_start() {
        let (mut control_loop, _, stop) =
            create_control_loop(vec![Some(create_frame(0.0))], &AppConfig::default());

        stop.store(true, Ordering::Relaxed);

        assert_eq!(control_loop.run(), LoopStatistics::default());
        assert_eq!(control_loop.state, LoopState::Stopped);
    }
}
