//! Leela list display model

use serde::Serialize;
use tabled::Tabled;

/// One row per pastime title
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct LeelaDisplay {
    #[tabled(rename = "#")]
    pub index: usize,

    #[tabled(rename = "TITLE")]
    pub title: String,
}

impl LeelaDisplay {
    pub fn list(titles: &[String]) -> Vec<Self> {
        titles
            .iter()
            .enumerate()
            .map(|(i, title)| Self {
                index: i + 1,
                title: title.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_numbers_from_one() {
        let rows = LeelaDisplay::list(&["Damodara Lila".to_string(), "Kaliya Damana".to_string()]);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[1].title, "Kaliya Damana");
    }
}
