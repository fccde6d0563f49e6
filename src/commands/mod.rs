// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod transactions;
pub mod investments;
pub mod cards;
pub mod goals;
pub mod notes;
pub mod documents;
pub mod reports;
pub mod settings;
pub mod exporter;
