pub mod auth;
pub mod dashboard;
pub mod health;
pub mod import;
pub mod reports;

use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::period::Month;

/// `Json` whose rejections come back in the API's error shape.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ReportError))]
pub struct ApiJson<T>(pub T);

impl<T: Serialize> IntoResponse for ApiJson<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// `Query` whose rejections come back in the API's error shape.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ReportError))]
pub struct ApiQuery<T>(pub T);

/// `?month=` as sent by the dashboard; blank counts as absent.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

impl MonthQuery {
    pub fn optional(&self) -> Result<Option<Month>> {
        match self.month.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }

    pub fn required(&self) -> Result<Month> {
        self.optional()?
            .ok_or_else(|| ReportError::validation("month is required (YYYY-MM)"))
    }
}
