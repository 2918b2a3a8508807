use crate::state::ApiContext;
use crate::types::StatsResponse;
use crate::Result;
use axum::{extract::State, Json};

pub async fn get_stats(State(ctx): State<ApiContext>) -> Result<Json<StatsResponse>> {
    let stats = ctx.gateway.stats().await?;
    Ok(Json(StatsResponse::from(stats)))
}
