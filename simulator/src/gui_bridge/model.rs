use serde::Serialize;
use sneakercore::alert::{AlertKind, TriggeredEntities};
use sneakercore::feed::Coalition;
use sneakercore::geo::Braa;
use sneakercore::telemetry::Metrics;
use sneakercore::track::UNKNOWN_RATE;
use sneakercore::{EntityId, Session};

const FEET_PER_METER: f64 = 3.28084;

/// Per-track row of the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct TrackSummary {
    pub entity_id: EntityId,
    pub name: Option<String>,
    pub coalition: Coalition,
    pub pings: usize,
    pub speed_kts: Option<f64>,
    pub vertical_rate_fpm: Option<f64>,
    pub altitude_ft: Option<f64>,
    pub visible: bool,
    pub watching: bool,
    pub warning_radius: Option<f64>,
    pub threat_radius: Option<f64>,
    pub triggered: bool,
}

/// An active alert with the BRAA from its owner to the target.
#[derive(Debug, Clone, Serialize)]
pub struct AlertView {
    pub owner: EntityId,
    pub kind: AlertKind,
    pub target: EntityId,
    pub braa: Option<Braa>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardModel {
    pub offset: f64,
    pub tracks: Vec<TrackSummary>,
    pub alerts: Vec<AlertView>,
    pub triggered_entities: TriggeredEntities,
    pub metrics: Metrics,
}

fn known(rate: f64) -> Option<f64> {
    (rate != UNKNOWN_RATE).then_some(rate)
}

impl DashboardModel {
    pub fn from_session(session: &Session) -> Self {
        let entities = session.entities();
        let tracks = session.tracks();
        let alerts = session.alerts();

        let track_rows = tracks
            .tracks
            .iter()
            .map(|(id, track)| {
                let entity = entities.get(*id);
                let options = tracks.options(*id);
                TrackSummary {
                    entity_id: *id,
                    name: entity.and_then(|e| e.name()).map(str::to_string),
                    coalition: entity.map(|e| e.coalition()).unwrap_or(Coalition::Neutral),
                    pings: track.len(),
                    speed_kts: known(track.estimated_speed()),
                    vertical_rate_fpm: known(track.estimated_altitude_rate())
                        .map(|rate| rate * FEET_PER_METER),
                    altitude_ft: track.newest().map(|p| p.altitude * FEET_PER_METER),
                    visible: track.is_visible(),
                    watching: options.map(|o| o.watching).unwrap_or(false),
                    warning_radius: options.and_then(|o| o.effective_radius(AlertKind::Warning)),
                    threat_radius: options.and_then(|o| o.effective_radius(AlertKind::Threat)),
                    triggered: alerts.triggered_entities.contains(*id),
                }
            })
            .collect();

        let alert_rows = alerts
            .alerts
            .iter()
            .flat_map(|(owner, list)| list.iter().map(move |alert| (*owner, *alert)))
            .map(|(owner, alert)| {
                let braa = entities
                    .get(owner)
                    .zip(entities.get(alert.target_entity_id))
                    .map(|(from, to)| Braa::between(from.position(), to.position(), to.altitude));
                AlertView {
                    owner,
                    kind: alert.kind,
                    target: alert.target_entity_id,
                    braa,
                }
            })
            .collect();

        Self {
            offset: entities.offset(),
            tracks: track_rows,
            alerts: alert_rows,
            triggered_entities: alerts.triggered_entities.clone(),
            metrics: session.metrics().snapshot(),
        }
    }
}
