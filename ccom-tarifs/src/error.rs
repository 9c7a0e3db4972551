/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

use thiserror::Error;

/// Reasons the pricing widget refuses to mount.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("pricing configuration is missing")]
    Missing,
    #[error("failed to decode pricing configuration: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("pricing configuration declares no plan")]
    NoPlans,
}
