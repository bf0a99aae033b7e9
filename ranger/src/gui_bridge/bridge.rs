use crate::gui_bridge::model::VisualizationModel;
use crate::workflow::runner::Runner;
use log::{error, info, warn};
use rangercore::search::SearchRequest;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

type SharedModel = Arc<RwLock<VisualizationModel>>;

fn store(state: &SharedModel, model: VisualizationModel) {
    let mut guard = state
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = model;
}

fn read(state: &SharedModel) -> VisualizationModel {
    match state.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Run one search for the HTTP front end and publish the result.
///
/// The error string is what the visualizer shows to the user.
pub fn handle_search(
    runner: &Runner,
    state: &SharedModel,
    request: SearchRequest,
) -> Result<VisualizationModel, String> {
    match runner.execute(&request) {
        Ok(outcome) => {
            let model = VisualizationModel::from_outcome(&request, &outcome);
            store(state, model.clone());
            info!(
                "bridge search {} -> {} airports within {:.2} nm",
                request.identifier,
                model.airport_count,
                model.distance_nm
            );
            Ok(model)
        }
        Err(err) => {
            warn!("bridge search failed: {:#}", err);
            Err(format!("{:#}", err))
        }
    }
}

/// Bridge that hosts the HTTP endpoint the visualizer polls and posts to.
pub struct GuiBridge {
    state: SharedModel,
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>, bind: SocketAddr) -> Self {
        let state: SharedModel = Arc::new(RwLock::new(VisualizationModel::default()));
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner_filter = warp::any().map(move || runner.clone());

        let payload_route = warp::path("payload")
            .and(warp::path::end())
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: SharedModel| warp::reply::json(&read(&state)));

        let metrics_route = warp::path("metrics")
            .and(warp::path::end())
            .and(warp::get())
            .and(runner_filter.clone())
            .map(|runner: Arc<Runner>| {
                warp::reply::json(&json!({
                    "source": runner.source_description(),
                    "searches": runner.metrics(),
                }))
            });

        let search_route = warp::path("search")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .map(
                |request: SearchRequest, state: SharedModel, runner: Arc<Runner>| {
                    match handle_search(&runner, &state, request) {
                        Ok(model) => {
                            warp::reply::with_status(warp::reply::json(&model), StatusCode::OK)
                        }
                        Err(message) => warp::reply::with_status(
                            warp::reply::json(&json!({"status": "error", "message": message})),
                            StatusCode::BAD_REQUEST,
                        ),
                    }
                },
            );

        thread::spawn(move || {
            let routes = payload_route.or(metrics_route).or(search_route);
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                match warp::serve(routes).try_bind_ephemeral(bind) {
                    Ok((address, server)) => {
                        info!("GUI bridge listening on http://{}", address);
                        server.await;
                    }
                    Err(err) => error!("GUI bridge cannot bind {}: {}", bind, err),
                }
            });
        });

        Self { state }
    }

    pub fn publish(&self, model: &VisualizationModel) {
        store(&self.state, model.clone());
        println!(
            "[GUI] published {} airports within {:.2} nm",
            model.airport_count, model.distance_nm
        );
    }

    pub fn publish_status(&self, message: &str) {
        println!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> VisualizationModel {
        read(&self.state)
    }
}
