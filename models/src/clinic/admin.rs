// models/src/clinic/admin.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Admin identity is the wallet address, not a password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAdmin {
    pub name: Option<String>,
    pub wallet_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    pub id: u64,
    pub name: Option<String>,
    pub wallet_address: String, // unique
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    pub fn from_new(id: u64, new: NewAdmin) -> Self {
        let now = Utc::now();
        Admin {
            id,
            name: new.name,
            wallet_address: new.wallet_address,
            created_at: now,
            updated_at: now,
        }
    }
}
