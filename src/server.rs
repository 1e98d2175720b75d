use crate::aggregate::Breakdown;
use crate::engine::IntensityEngine;
use crate::errors::{ApiError, ErrorBody};
use crate::utilities::Utility;
use chrono::NaiveDate;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

/// The full route tree under /api/v1/carbon_intensity, with CORS, request
/// logging and error recovery attached.
pub fn api(
    engine: Arc<IntensityEngine>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let average = warp::path!("api" / "v1" / "carbon_intensity" / "average" / String)
        .and(warp::get())
        .and(with_engine(engine.clone()))
        .and_then(daily_average);
    let breakdown = warp::path!("api" / "v1" / "carbon_intensity" / "average" / String / String)
        .and(warp::get())
        .and(with_engine(engine.clone()))
        .and_then(breakdown_average);
    let historic_day = warp::path!("api" / "v1" / "carbon_intensity" / "historic" / String / String)
        .and(warp::get())
        .and(with_engine(engine.clone()))
        .and_then(historic_single_day);
    let historic_range =
        warp::path!("api" / "v1" / "carbon_intensity" / "historic" / String / String / String)
            .and(warp::get())
            .and(with_engine(engine))
            .and_then(historic_between);
    let cors = warp::cors().allow_any_origin().allow_method("GET");
    average
        .or(breakdown)
        .or(historic_day)
        .or(historic_range)
        .with(cors)
        .recover(handle_rejection)
        .with(warp::log("gridcarbon"))
}

fn with_engine(
    engine: Arc<IntensityEngine>,
) -> impl Filter<Extract = (Arc<IntensityEngine>,), Error = Infallible> + Clone {
    warp::any().map(move || engine.clone())
}

async fn daily_average(
    utility_name: String,
    engine: Arc<IntensityEngine>,
) -> Result<impl Reply, Rejection> {
    let utility = Utility::from_name(&utility_name).map_err(warp::reject::custom)?;
    let report = engine
        .daily_intensity(utility)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&report))
}

async fn breakdown_average(
    breakdown_name: String,
    utility_name: String,
    engine: Arc<IntensityEngine>,
) -> Result<impl Reply, Rejection> {
    let breakdown = Breakdown::from_name(&breakdown_name).map_err(warp::reject::custom)?;
    let utility = Utility::from_name(&utility_name).map_err(warp::reject::custom)?;
    let report = engine
        .daily_intensity_with_breakdown(utility, breakdown)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&report))
}

async fn historic_single_day(
    utility_name: String,
    from: String,
    engine: Arc<IntensityEngine>,
) -> Result<impl Reply, Rejection> {
    historic_between(utility_name, from.clone(), from, engine).await
}

async fn historic_between(
    utility_name: String,
    from: String,
    to: String,
    engine: Arc<IntensityEngine>,
) -> Result<impl Reply, Rejection> {
    let utility = Utility::from_name(&utility_name).map_err(warp::reject::custom)?;
    let from = parse_date(&from).map_err(warp::reject::custom)?;
    let to = parse_date(&to).map_err(warp::reject::custom)?;
    let report = engine
        .historic_intensity(utility, from, to)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&report))
}

fn parse_date(text: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| {
        ApiError::InvalidDateRange(format!("'{}' is not a valid calendar date", text))
    })
}

/// Turns rejections into the error body every route shares.
async fn handle_rejection(rejection: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(error) = rejection.find::<ApiError>() {
        (error.status(), error.to_string())
    } else if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "resource not found".to_string())
    } else if rejection
        .find::<warp::reject::MethodNotAllowed>()
        .is_some()
    {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "method not allowed".to_string(),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "unhandled internal error".to_string(),
        )
    };
    let body = ErrorBody {
        message,
        code: status.as_u16(),
    };
    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
