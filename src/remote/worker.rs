//! Remote worker
//!
//! One background thread owns the HTTP clients and the price cache. The UI
//! thread sends requests and drains responses once per loop iteration.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use super::price::{CachedPrices, Quote};
use super::weather::{WeatherReport, WeatherSource};
use crate::error::DashboardResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteRequest {
    Weather,
    Price(String),
}

#[derive(Debug)]
pub enum RemoteResponse {
    Weather(DashboardResult<WeatherReport>),
    Price { asset_id: String, result: DashboardResult<Quote> },
}

pub struct RemoteWorker {
    tx: Option<Sender<RemoteRequest>>,
    rx: Receiver<RemoteResponse>,
    handle: Option<JoinHandle<()>>,
}

impl RemoteWorker {
    pub fn spawn(weather: Box<dyn WeatherSource + Send>, mut prices: CachedPrices) -> std::io::Result<Self> {
        let (req_tx, req_rx) = channel::<RemoteRequest>();
        let (resp_tx, resp_rx) = channel();

        let handle = thread::Builder::new().name("deskboard-remote".into()).spawn(move || {
            tracing::debug!("remote worker started");
            for request in req_rx {
                let response = match request {
                    RemoteRequest::Weather => RemoteResponse::Weather(weather.fetch()),
                    RemoteRequest::Price(asset_id) => {
                        let result = prices.quote(&asset_id, Instant::now());
                        RemoteResponse::Price { asset_id, result }
                    }
                };
                if resp_tx.send(response).is_err() {
                    break;
                }
            }
            tracing::debug!("remote worker stopped");
        })?;

        Ok(Self { tx: Some(req_tx), rx: resp_rx, handle: Some(handle) })
    }

    /// Queues a request. Returns false once the worker is gone.
    pub fn request(&self, request: RemoteRequest) -> bool {
        self.tx.as_ref().is_some_and(|tx| tx.send(request).is_ok())
    }

    pub fn drain(&self) -> Vec<RemoteResponse> {
        self.rx.try_iter().collect()
    }

    pub fn shutdown(&mut self) {
        self.tx = None;
        let Some(handle) = self.handle.take() else { return };
        if handle.join().is_err() {
            tracing::error!("remote worker panicked");
        }
    }
}

impl Drop for RemoteWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
