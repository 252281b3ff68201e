use crate::generator::scenario::ScenarioGenerator;
use crate::gui_bridge::bridge::GuiBridge;
use crate::gui_bridge::model::DashboardModel;
use crate::workflow::config::ScenarioConfig;
use crate::workflow::cue::BellCue;
use anyhow::Context;
use log::info;
use sneakercore::alert::AlertCue;
use sneakercore::session::spawn_alert_loop;
use sneakercore::track::{Clock, ManualClock, SystemClock, TrackOptionsUpdate};
use sneakercore::Session;
use std::net::SocketAddr;
use std::sync::{Arc, PoisonError};
use std::time::Duration;
use tokio::signal;

pub struct WorkflowResult {
    pub steps: u32,
    pub passes: usize,
    pub alerts_raised: usize,
    pub alerts_cleared: usize,
    pub threat_cues: usize,
    pub dashboard: DashboardModel,
}

#[derive(Clone)]
pub struct Runner {
    config: ScenarioConfig,
}

impl Runner {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn build_session(&self, clock: Arc<dyn Clock>, cue: Arc<dyn AlertCue>) -> Session {
        let mut session = Session::new(self.config.engine.clone(), clock, cue);
        session.set_profiles(self.config.profiles.iter().cloned());
        session
    }

    /// Applies the scripted labels and explicit radii.
    pub fn configure_entities(&self, session: &mut Session) -> anyhow::Result<()> {
        for entity in &self.config.entities {
            for label in &entity.labels {
                session.push_label(entity.id, label);
            }
            if entity.warning_radius.is_some() || entity.threat_radius.is_some() {
                session
                    .set_track_options(
                        entity.id,
                        &TrackOptionsUpdate::radii(entity.warning_radius, entity.threat_radius),
                    )
                    .with_context(|| format!("configuring radii for entity {}", entity.id))?;
            }
        }
        Ok(())
    }

    /// Replays the scenario against a simulated clock, running the alert
    /// pass on the configured schedule.
    pub fn execute(&self, steps: u32) -> anyhow::Result<WorkflowResult> {
        let clock = Arc::new(ManualClock::new(0));
        let cue = Arc::new(BellCue::new(false));
        let mut session = self.build_session(clock.clone(), cue.clone());
        let mut generator = ScenarioGenerator::new(&self.config);

        session.apply_event(generator.initial_event());
        self.configure_entities(&mut session)?;

        let step_ms = self.config.step_ms.max(1);
        let delay_ms = self.config.engine.alert_startup_delay_ms;
        let interval_ms = self.config.engine.alert_interval_ms.max(1);
        let mut next_pass_ms = delay_ms;

        let mut result = WorkflowResult {
            steps,
            passes: 0,
            alerts_raised: 0,
            alerts_cleared: 0,
            threat_cues: 0,
            dashboard: DashboardModel::default(),
        };

        for _ in 0..steps {
            clock.advance(step_ms as i64);
            session.apply_event(generator.advance());

            let elapsed_ms = u64::from(generator.step()) * step_ms;
            while next_pass_ms <= elapsed_ms {
                let summary = session.run_alert_pass();
                result.passes += 1;
                result.alerts_raised += summary.raised.len();
                result.alerts_cleared += summary.cleared.len();
                next_pass_ms += interval_ms;
            }
        }

        result.threat_cues = cue.count();
        result.dashboard = DashboardModel::from_session(&session);
        Ok(result)
    }

    /// Live mode: the feed runs in real time, the alert loop on its own
    /// schedule, and the dashboard is served over HTTP until Ctrl+C.
    pub async fn serve(&self, addr: SocketAddr) -> anyhow::Result<()> {
        let session = self.build_session(Arc::new(SystemClock), Arc::new(BellCue::new(true)));
        let shared = session.into_shared();
        let mut generator = ScenarioGenerator::new(&self.config);
        {
            let mut guard = shared.write().unwrap_or_else(PoisonError::into_inner);
            guard.apply_event(generator.initial_event());
            self.configure_entities(&mut guard)?;
        }

        let alert_task = spawn_alert_loop(&shared);
        let bridge = GuiBridge::new(shared.clone());
        bridge.publish_status(&format!("serving dashboard on http://{}", addr));
        let server = tokio::spawn(bridge.serve(addr));

        let mut feed = tokio::time::interval(Duration::from_millis(self.config.step_ms.max(1)));
        feed.tick().await;
        let ctrl_c = signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = feed.tick() => {
                    let event = generator.advance();
                    shared
                        .write()
                        .unwrap_or_else(PoisonError::into_inner)
                        .apply_event(event);
                }
                result = &mut ctrl_c => {
                    result.context("awaiting Ctrl+C to exit")?;
                    break;
                }
            }
        }

        info!("shutting down after {} feed steps", generator.step());
        alert_task.stop().await;
        server.abort();
        Ok(())
    }
}
