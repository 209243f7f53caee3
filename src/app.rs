//! HTTP surface: shared state, routing, and the request handlers.

pub mod chart;
pub mod data;
pub mod geocode;
pub mod render;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use log::{info, warn};
use serde::Deserialize;
use std::sync::Arc;

use election_report::{build_search_result, ReportOptions};

use crate::app::data::ElectionData;
use crate::app::geocode::{GeocodeClient, GeocodeError};

/// Shared application state passed to every handler. The tables are loaded
/// once at startup and never mutated afterwards, so there is no locking.
#[derive(Clone)]
pub struct AppState {
    pub data: Arc<ElectionData>,
    pub geocoder: Arc<GeocodeClient>,
    pub options: ReportOptions,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/search", post(search))
        .with_state(state)
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchForm {
    pub postcode_lookup: String,
}

async fn home() -> Html<String> {
    Html(render::form_page(render::HOME_PROMPT))
}

/// Form submission: geocode the postcode, aggregate the constituency's
/// results, render the report. Failures stay local to the request.
async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SearchForm>,
) -> Response {
    let postcode = form.postcode_lookup;

    let constituency = match state.geocoder.constituency(&postcode).await {
        Ok(name) => name,
        Err(GeocodeError::InvalidPostcode { .. }) => {
            info!("search: {:?} rejected by the postcode service", postcode);
            return Html(render::form_page(render::RETRY_PROMPT)).into_response();
        }
        Err(err) => {
            warn!("search: postcode service failure: {}", err);
            return (
                StatusCode::BAD_GATEWAY,
                Html(render::error_page(
                    "The postcode service is unavailable right now. Please try again in a moment.",
                )),
            )
                .into_response();
        }
    };

    let result = match build_search_result(
        &state.data.records,
        &state.data.profiles,
        &constituency,
        &state.options,
    ) {
        Ok(r) => r,
        Err(err) => {
            // A valid postcode whose constituency is absent from (or unusable
            // in) the static table is a data inconsistency, not a user error.
            warn!("search: {}", err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render::error_page(&format!(
                    "No usable election data was found for {}.",
                    constituency
                ))),
            )
                .into_response();
        }
    };

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());
    let svg = chart::render_svg(&result.series, chart::layout_for_user_agent(user_agent));
    Html(render::results_page(&result, &svg)).into_response()
}
