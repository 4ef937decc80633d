// SPDX-License-Identifier: MIT

//! Data models for the application.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

/// A poster generation request, as submitted from the form.
///
/// Immutable once read; lives only for the duration of one submission.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PosterRequest {
    #[validate(length(min = 1, max = 64, message = "name1 must be 1-64 characters"))]
    pub name1: String,
    #[validate(length(min = 1, max = 64, message = "name2 must be 1-64 characters"))]
    pub name2: String,
    /// Meeting date, ISO `YYYY-MM-DD` on the wire, rendered as DD/MM/YYYY
    pub meeting_date: NaiveDate,
    #[validate(length(min = 1, max = 200, message = "address must be 1-200 characters"))]
    pub address: String,
}

impl PosterRequest {
    /// Title line drawn on the poster.
    pub fn title(&self) -> String {
        format!("{} & {}", self.name1, self.name2)
    }

    /// Meeting date as displayed on the poster.
    pub fn formatted_date(&self) -> String {
        self.meeting_date.format("%d/%m/%Y").to_string()
    }
}

/// A geocoded position, taken from the first candidate the geocoder returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    /// Subtitle form: latitude first, shortest round-trip float formatting.
    pub fn display_pair(&self) -> String {
        format!("{}, {}", self.latitude, self.longitude)
    }
}
