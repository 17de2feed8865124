// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod data;
pub mod db;
pub mod error;
pub mod export;
pub mod forms;
pub mod local_store;
pub mod mapping;
pub mod modal;
pub mod models;
pub mod utils;
pub mod views;
