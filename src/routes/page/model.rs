use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BatchForm {
    #[serde(default)]
    pub ids: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub user_id: String,
}
