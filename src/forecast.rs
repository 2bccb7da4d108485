// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Trailing-average forecasting and the human-feedback blend.
//!
//! Both [`compute_forecast`] and [`blend`] are pure: they take an already
//! fetched snapshot and never touch storage. [`forecast_dish`] is the thin
//! orchestration step that pulls the trailing window through a
//! [`SalesSource`] first.

use crate::models::{ForecastResult, SalesRecord};
use crate::store::SalesSource;
use anyhow::Result;
use chrono::{Duration, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

/// Days in the lookback window, ending the day before "today".
pub const WINDOW_DAYS: i64 = 7;

pub const COLD_START_QUANTITY: u32 = 5;
pub const BASE_CONFIDENCE: u8 = 20;
pub const CONFIDENCE_PER_RECORD: u8 = 10;
pub const MAX_CONFIDENCE: u8 = 95;

/// Wastage strictly above this percentage raises the alert.
pub const WASTAGE_ALERT_THRESHOLD: u8 = 15;

/// Share (in percent) given to the algorithmic forecast; the human estimate gets the rest.
pub const FORECAST_WEIGHT_PERCENT: i64 = 70;

/// Inclusive `(start, end)` of the trailing window for `today`.
pub fn trailing_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (
        today - Duration::days(WINDOW_DAYS),
        today - Duration::days(1),
    )
}

/// Confidence for a window holding `record_count` records.
///
/// Non-decreasing in `record_count`, saturating at [`MAX_CONFIDENCE`].
pub fn confidence_for(record_count: usize) -> u8 {
    let grown = (CONFIDENCE_PER_RECORD as usize)
        .saturating_mul(record_count)
        .saturating_add(BASE_CONFIDENCE as usize);
    grown.min(MAX_CONFIDENCE as usize) as u8
}

// round(num / den) with halves rounded up; den must be non-zero.
fn round_div(num: u64, den: u64) -> u64 {
    (2 * num + den) / (2 * den)
}

pub fn compute_forecast(dish_id: i64, records: &[SalesRecord]) -> ForecastResult {
    let usable: Vec<&SalesRecord> = records.iter().filter(|r| r.dish_id == dish_id).collect();

    if usable.is_empty() {
        debug!(dish_id, "no history in window, using cold-start forecast");
        return ForecastResult {
            dish_id,
            predicted_quantity: COLD_START_QUANTITY,
            confidence_percent: BASE_CONFIDENCE,
            wastage_alert: false,
            wastage_percent: 0,
        };
    }

    let count = usable.len() as u64;
    let total_sold: u64 = usable.iter().map(|r| r.quantity_sold as u64).sum();
    let total_wasted: u64 = usable.iter().map(|r| r.quantity_wasted as u64).sum();
    let total_prepared = total_sold + total_wasted;

    let predicted_quantity = round_div(total_sold, count) as u32;
    let confidence_percent = confidence_for(usable.len());
    let wastage_percent = if total_prepared > 0 {
        round_div(100 * total_wasted, total_prepared) as u8
    } else {
        0
    };

    let result = ForecastResult {
        dish_id,
        predicted_quantity,
        confidence_percent,
        wastage_alert: wastage_percent > WASTAGE_ALERT_THRESHOLD,
        wastage_percent,
    };
    debug!(
        dish_id,
        records = usable.len(),
        predicted = result.predicted_quantity,
        confidence = result.confidence_percent,
        wastage = result.wastage_percent,
        "computed forecast"
    );
    result
}

/// Blend a forecast with a manual estimate, 70/30 in favour of the forecast.
pub fn blend(forecast_quantity: u32, human_estimate: u32) -> u32 {
    let forecast_weight = Decimal::new(FORECAST_WEIGHT_PERCENT, 2);
    let estimate_weight = Decimal::ONE - forecast_weight;
    let mixed = forecast_weight * Decimal::from(forecast_quantity)
        + estimate_weight * Decimal::from(human_estimate);
    // The result lies between the two inputs, so it always fits in a u32.
    mixed
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(forecast_quantity)
}

/// Fetch the trailing window for `dish_id` and forecast from it.
pub fn forecast_dish<S: SalesSource + ?Sized>(
    source: &S,
    dish_id: i64,
    today: NaiveDate,
) -> Result<ForecastResult> {
    let (start, end) = trailing_window(today);
    let records = source.fetch_sales_window(dish_id, start, end)?;
    Ok(compute_forecast(dish_id, &records))
}
