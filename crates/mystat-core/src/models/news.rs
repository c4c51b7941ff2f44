use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct NewsEntry {
    pub id_bbs: i64,
    pub theme: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct NewsDetails {
    pub id_bbs: i64,
    pub is_viewed: bool,
    pub text_bbs: String,
    pub theme: String,
    pub time: String,
}

impl NewsDetails {
    /// Body text with markup removed
    pub fn plain_text(&self) -> String {
        crate::utils::strip_html(&self.text_bbs)
    }
}
