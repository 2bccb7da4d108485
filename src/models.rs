// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dish {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
}

/// One day of sales for one dish. At most one exists per (dish, date).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub dish_id: i64,
    pub quantity_sold: u32,
    pub quantity_wasted: u32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub dish_id: i64,
    pub predicted_quantity: u32,
    pub confidence_percent: u8,
    pub wastage_alert: bool,
    pub wastage_percent: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adjustment {
    pub id: i64,
    pub dish_id: i64,
    pub date: NaiveDate,
    pub forecast_quantity: u32,
    pub human_estimate: u32,
    pub adjusted_quantity: u32,
}
