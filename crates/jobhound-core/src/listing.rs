use serde::Serialize;

/// One normalized job listing, ready for export and preview rendering.
///
/// `salary_display` is pre-rendered text because the source range may be
/// partially unknown (`"? - 150000 RUR"`) or absent entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRecord {
    #[serde(rename = "Название")]
    pub title: String,
    #[serde(rename = "Компания")]
    pub company: String,
    #[serde(rename = "Зарплата")]
    pub salary_display: String,
    #[serde(rename = "Описание")]
    pub description: String,
    #[serde(rename = "Ссылка")]
    pub url: String,
}
