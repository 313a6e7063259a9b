//! Temple display model

use serde::Serialize;
use tabled::Tabled;

use super::common::{or_dash, truncate_string};
use crate::content::Temple;

/// Temple display model for table output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct TempleDisplay {
    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "CITY")]
    pub city: String,

    #[tabled(rename = "COUNTRY")]
    pub country: String,

    #[tabled(rename = "ADDRESS")]
    pub address: String,

    #[tabled(rename = "TIMINGS")]
    pub timings: String,
}

impl From<&Temple> for TempleDisplay {
    fn from(temple: &Temple) -> Self {
        Self {
            name: temple.name.clone(),
            city: temple.city.clone(),
            country: temple.country.clone(),
            address: truncate_string(&temple.address, 40),
            timings: or_dash(temple.timings.as_deref()),
        }
    }
}
