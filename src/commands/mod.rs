// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod dishes;
pub mod sales;
pub mod forecast;
pub mod reports;
pub mod importer;
pub mod exporter;
pub mod settings;
pub mod doctor;
