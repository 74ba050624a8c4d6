//! User-facing dialogue texts.

use jobhound_core::{Employment, Schedule, SearchCriteria};

pub const GREETING: &str = "👋 Привет! Давай подберем тебе вакансии.\n\n\
    Введите ключевое слово для поиска (например: Python разработчик):";
pub const KEYWORD_RETRY: &str = "❗ Пожалуйста, введите ключевое слово для поиска:";
pub const ASK_SALARY: &str = "💰 Укажите минимальную зарплату в рублях (например: 100000):";
pub const SALARY_RETRY: &str = "❗ Пожалуйста, введите корректное число для зарплаты:";
pub const ASK_EMPLOYMENT: &str = "📄 Выберите тип занятости:";
pub const EMPLOYMENT_RETRY: &str =
    "❗ Пожалуйста, выберите тип занятости из предложенных вариантов:";
pub const ASK_SCHEDULE: &str = "📅 Выберите график работы:";
pub const SCHEDULE_RETRY: &str = "❗ Пожалуйста, выберите график работы из предложенных вариантов:";
pub const ASK_CITY: &str = "📍 Выберите город:";
pub const CANCELLED: &str = "❌ Поиск отменен.";
pub const NOT_STARTED: &str = "Нет активного поиска. Отправьте /start, чтобы начать.";

/// Search summary shown once all criteria are collected.
#[must_use]
pub fn summary(criteria: &SearchCriteria) -> String {
    let salary = criteria
        .salary_from()
        .map_or_else(|| "не указана".to_owned(), |s| format!("{s} руб."));
    let employment = criteria.employment().map_or("любой", Employment::label);
    let schedule = criteria.schedule().map_or("любой", Schedule::label);
    let area = criteria.area();
    let city = area
        .label()
        .map_or_else(|| format!("регион {area}"), str::to_owned);

    format!(
        "🔍 Поиск вакансий:\n\
         Ключевое слово: {keyword}\n\
         Зарплата от: {salary}\n\
         Тип занятости: {employment}\n\
         График работы: {schedule}\n\
         Город: {city}",
        keyword = criteria.keyword(),
    )
}
