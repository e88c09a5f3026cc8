//! Autocomplete backend: debounced, cancelable geocoding searches.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use skycast_weather::{GeocodeClient, Location};
use tokio_util::sync::CancellationToken;

use super::DashboardError;

#[derive(Debug)]
pub enum SuggestionServiceMessage {
    SuggestionsDone {
        seq: u64,
        result: Result<Vec<Location>, DashboardError>,
    },
}

/// Parameters of one suggestion request
#[derive(Debug, Clone)]
pub struct SuggestionRequest {
    pub seq: u64,
    pub query: String,
    pub debounce: Duration,
    pub max_results: u8,
}

/// Wait out the debounce, then search.
///
/// Nothing is sent once `token` is cancelled, whether during the debounce
/// or while the request is in flight.
pub fn request_suggestions(
    tx: &Sender<SuggestionServiceMessage>,
    runtime: &tokio::runtime::Handle,
    geocoder: Arc<GeocodeClient>,
    token: CancellationToken,
    request: SuggestionRequest,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let SuggestionRequest {
            seq,
            query,
            debounce,
            max_results,
        } = request;

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!("Suggestion request {} superseded during debounce", seq);
                return;
            }
            _ = tokio::time::sleep(debounce) => {}
        }

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!("Suggestion request {} cancelled in flight", seq);
                return;
            }
            result = geocoder.search(&query, max_results) => result,
        };

        if token.is_cancelled() {
            return;
        }

        let result = result.map_err(|e| {
            tracing::warn!("Suggestion request {} for {:?} failed: {}", seq, query, e);
            DashboardError::from(e)
        });

        let _ = tx.send(SuggestionServiceMessage::SuggestionsDone { seq, result });
    });
}
