use crate::bridge::model::ReportModel;
use anyhow::Context;
use log::info;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, PoisonError, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::Filter;

type SharedModel = Arc<RwLock<ReportModel>>;

/// Holds the latest report and serves it over HTTP.
pub struct ReportBridge {
    state: SharedModel,
}

impl ReportBridge {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(ReportModel::default())),
        }
    }

    pub fn publish(&self, model: ReportModel) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *guard = model;
        info!(
            "[bridge] {} published with {} floors",
            guard.house_name,
            guard.floors.len()
        );
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> ReportModel {
        read_model(&self.state)
    }

    /// Binds `addr` and serves on a background thread with its own runtime.
    ///
    /// Returns the bound address; port 0 picks a free port.
    pub fn serve(&self, addr: SocketAddr) -> anyhow::Result<SocketAddr> {
        let routes = routes(Arc::clone(&self.state));
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for the report bridge")?;

        let (bound, server) = runtime
            .block_on(async move { warp::serve(routes).try_bind_ephemeral(addr) })
            .with_context(|| format!("binding report bridge to {}", addr))?;

        thread::Builder::new()
            .name("report-bridge".to_string())
            .spawn(move || runtime.block_on(server))
            .context("spawning report bridge thread")?;
        info!("[bridge] serving GET /report and /health on {}", bound);
        Ok(bound)
    }
}

impl Default for ReportBridge {
    fn default() -> Self {
        Self::new()
    }
}

fn read_model(state: &SharedModel) -> ReportModel {
    state.read().unwrap_or_else(PoisonError::into_inner).clone()
}

fn routes(
    state: SharedModel,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let state_filter = warp::any().map(move || Arc::clone(&state));

    let report_route = warp::path("report")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter)
        .map(|state: SharedModel| warp::reply::json(&read_model(&state)));

    let health_route = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&json!({"status": "ok"})));

    report_route.or(health_route)
}
