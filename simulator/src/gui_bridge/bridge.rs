use crate::gui_bridge::model::DashboardModel;
use log::{info, warn};
use serde::Deserialize;
use serde_json::json;
use sneakercore::alert::AlertKind;
use sneakercore::feed::SessionEvent;
use sneakercore::track::TrackOptionsUpdate;
use sneakercore::{EntityId, SharedSession};
use std::net::SocketAddr;
use std::sync::PoisonError;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::Filter;

#[derive(Debug, Deserialize)]
struct DismissRequest {
    owner: EntityId,
    kind: AlertKind,
    target: EntityId,
}

#[derive(Debug, Deserialize)]
struct OptionsRequest {
    entity_id: EntityId,
    #[serde(flatten)]
    update: TrackOptionsUpdate,
}

fn status(code: StatusCode, body: serde_json::Value) -> WithStatus<Json> {
    warp::reply::with_status(warp::reply::json(&body), code)
}

/// HTTP surface over a live session: the dashboard reads snapshots, and
/// the feed and user actions write through the session lock.
#[derive(Clone)]
pub struct GuiBridge {
    session: SharedSession,
}

impl GuiBridge {
    pub fn new(session: SharedSession) -> Self {
        Self { session }
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let session = self.session.clone();
        let session_filter = warp::any().map(move || session.clone());

        let dashboard = warp::path("dashboard")
            .and(warp::path::end())
            .and(warp::get())
            .and(session_filter.clone())
            .map(|session: SharedSession| {
                let guard = session.read().unwrap_or_else(PoisonError::into_inner);
                warp::reply::json(&DashboardModel::from_session(&guard))
            });

        let ingest = warp::path("ingest")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(session_filter.clone())
            .map(|event: SessionEvent, session: SharedSession| {
                let offset = session
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .apply_event(event);
                status(StatusCode::OK, json!({ "status": "ok", "offset": offset }))
            });

        let dismiss = warp::path("dismiss")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(session_filter.clone())
            .map(|request: DismissRequest, session: SharedSession| {
                let removed = session
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .delete_alert(request.owner, request.kind, request.target);
                if removed {
                    status(StatusCode::OK, json!({ "status": "ok" }))
                } else {
                    status(StatusCode::NOT_FOUND, json!({ "status": "no such alert" }))
                }
            });

        let options = warp::path("options")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(session_filter)
            .map(|request: OptionsRequest, session: SharedSession| {
                let result = session
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .set_track_options(request.entity_id, &request.update);
                match result {
                    Ok(()) => status(StatusCode::OK, json!({ "status": "ok" })),
                    Err(err) => {
                        warn!("rejected options for {}: {}", request.entity_id, err);
                        status(StatusCode::BAD_REQUEST, json!({ "status": err.to_string() }))
                    }
                }
            });

        dashboard.or(ingest).or(dismiss).or(options)
    }

    pub async fn serve(self, addr: SocketAddr) {
        let routes = self.routes();
        warp::serve(routes).run(addr).await;
    }

    pub fn publish_status(&self, message: &str) {
        info!("[GUI] {}", message);
    }

    pub fn snapshot(&self) -> DashboardModel {
        let guard = self.session.read().unwrap_or_else(PoisonError::into_inner);
        DashboardModel::from_session(&guard)
    }
}
