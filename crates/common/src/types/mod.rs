use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

impl Health {
    pub fn ok() -> Self {
        Self { status: "ok", version: env!("CARGO_PKG_VERSION") }
    }
}

/// Body returned by delete endpoints; `reassigned` counts rows moved to a
/// replacement before the delete went through.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DeletedResponse {
    pub message: String,
    pub reassigned: u64,
}

impl DeletedResponse {
    pub fn new(message: impl Into<String>, reassigned: u64) -> Self {
        Self { message: message.into(), reassigned }
    }
}
