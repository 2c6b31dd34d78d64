use std::sync::Arc;
use rocket::{State, get, post, http::Status, serde::json::Json};
use tracing::{info, instrument};
use ledger::{CastVoteRequest, KeyValueStore, TallyReport, TallyResult, Vote, VoteLedger};
use crate::error::ApiError;

pub type SharedStore = Arc<dyn KeyValueStore>;

pub struct AppState {
    pub ledger: VoteLedger<SharedStore>,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        Self { ledger: VoteLedger::new(store) }
    }
}

/// Runs a ledger operation on the blocking pool; stores may do file I/O.
async fn run<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&VoteLedger<SharedStore>) -> ledger::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let ledger = state.ledger.clone();
    let outcome = tokio::task::spawn_blocking(move || op(&ledger))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(outcome?)
}

#[post("/init")]
pub async fn init_ledger(state: &State<AppState>) -> Result<Status, ApiError> {
    run(state, |ledger| ledger.init_ledger()).await?;
    Ok(Status::Ok)
}

#[instrument(skip(state, request))]
#[post("/votes", format = "json", data = "<request>")]
pub async fn cast_vote(
    state: &State<AppState>,
    request: Json<CastVoteRequest>,
) -> Result<(Status, Json<Vote>), ApiError> {
    let CastVoteRequest { voter_id, candidate } = request.into_inner();
    let vote = run(state, move |ledger| ledger.cast_vote(&voter_id, &candidate)).await?;
    info!(voter_id = %vote.voter_id, "🗳️ Vote cast");
    Ok((Status::Created, Json(vote)))
}

#[instrument(skip(state))]
#[get("/votes/<voter_id>/exists")]
pub async fn vote_exists(state: &State<AppState>, voter_id: &str) -> Result<Json<bool>, ApiError> {
    let voter_id = voter_id.to_string();
    run(state, move |ledger| ledger.vote_exists(&voter_id)).await.map(Json)
}

#[instrument(skip(state))]
#[get("/votes/<voter_id>")]
pub async fn get_vote(state: &State<AppState>, voter_id: &str) -> Result<Json<Vote>, ApiError> {
    let voter_id = voter_id.to_string();
    run(state, move |ledger| ledger.get_vote(&voter_id)).await.map(Json)
}

#[instrument(skip(state))]
#[get("/tally")]
pub async fn tally_votes(state: &State<AppState>) -> Result<Json<TallyResult>, ApiError> {
    run(state, |ledger| ledger.tally_votes()).await.map(Json)
}

#[instrument(skip(state))]
#[get("/tally/report")]
pub async fn tally_report(state: &State<AppState>) -> Result<Json<TallyReport>, ApiError> {
    run(state, |ledger| ledger.tally_report()).await.map(Json)
}
