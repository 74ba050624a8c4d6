//! Fixed vocabularies for the dialogue choice sets and the free-text extractor.
//!
//! Each table is closed and read-only. `label` is what the user sees on a
//! choice keyboard; `aliases` are additional spellings accepted only by the
//! free-text extractor (the dialogue step matches labels exactly, modulo case).

use crate::criteria::{AreaId, Employment, Schedule};

/// One vocabulary entry: display label, mapped value, extractor aliases.
#[derive(Debug, Clone, Copy)]
pub struct VocabEntry<T> {
    pub label: &'static str,
    pub value: T,
    pub aliases: &'static [&'static str],
}

impl<T> VocabEntry<T> {
    /// Label followed by aliases.
    pub fn spellings(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.label).chain(self.aliases.iter().copied())
    }
}

pub const EMPLOYMENT: &[VocabEntry<Employment>] = &[
    VocabEntry {
        label: "Полная занятость",
        value: Employment::Full,
        aliases: &["полная", "full time", "fulltime"],
    },
    VocabEntry {
        label: "Частичная занятость",
        value: Employment::Part,
        aliases: &["частичная", "подработка", "part time", "parttime"],
    },
    VocabEntry {
        label: "Проектная занятость",
        value: Employment::Project,
        aliases: &["проектная", "проектная работа"],
    },
    VocabEntry {
        label: "Волонтёрство",
        value: Employment::Volunteer,
        aliases: &["волонтер"],
    },
    VocabEntry {
        label: "Стажировка",
        value: Employment::Probation,
        aliases: &["стажер", "стажёр", "internship"],
    },
];

pub const SCHEDULE: &[VocabEntry<Schedule>] = &[
    VocabEntry {
        label: "Полный день",
        value: Schedule::FullDay,
        aliases: &[],
    },
    VocabEntry {
        label: "Сменный график",
        value: Schedule::Shift,
        aliases: &["сменный", "посменно"],
    },
    VocabEntry {
        label: "Гибкий график",
        value: Schedule::Flexible,
        aliases: &["гибкий"],
    },
    VocabEntry {
        label: "Удалённая работа",
        value: Schedule::Remote,
        aliases: &["удалённо", "удаленка", "удалёнка", "remote"],
    },
    VocabEntry {
        label: "Вахтовый метод",
        value: Schedule::FlyInFlyOut,
        aliases: &["вахта", "вахтой"],
    },
];

pub const CITIES: &[VocabEntry<AreaId>] = &[
    VocabEntry {
        label: "Москва",
        value: AreaId(1),
        aliases: &["москве", "мск"],
    },
    VocabEntry {
        label: "Санкт-Петербург",
        value: AreaId(2),
        aliases: &["санкт-петербурге", "петербург", "петербурге", "спб", "питер"],
    },
    VocabEntry {
        label: "Екатеринбург",
        value: AreaId(3),
        aliases: &["екатеринбурге", "екб"],
    },
    VocabEntry {
        label: "Новосибирск",
        value: AreaId(4),
        aliases: &["новосибирске", "нск"],
    },
    VocabEntry {
        label: "Краснодар",
        value: AreaId(53),
        aliases: &["краснодаре"],
    },
    VocabEntry {
        label: "Россия (вся)",
        value: AreaId::NATIONWIDE,
        aliases: &["россия", "по всей россии"],
    },
];

/// Normalizes a label for comparison: trims, lowercases, folds `ё` into `е`,
/// and collapses inner whitespace runs to a single space.
#[must_use]
pub fn normalize_label(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.to_lowercase().replace('ё', "е"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Exact (case-normalized) label lookup. Aliases are not consulted.
#[must_use]
pub fn lookup<T: Copy>(vocab: &[VocabEntry<T>], text: &str) -> Option<T> {
    let needle = normalize_label(text);
    if needle.is_empty() {
        return None;
    }
    vocab
        .iter()
        .find(|entry| normalize_label(entry.label) == needle)
        .map(|entry| entry.value)
}

/// Display label of `value`, if it appears in `vocab`.
#[must_use]
pub fn label_of<T: Copy + PartialEq>(vocab: &[VocabEntry<T>], value: T) -> Option<&'static str> {
    vocab
        .iter()
        .find(|entry| entry.value == value)
        .map(|entry| entry.label)
}

/// Labels in table order, for rendering a choice set.
#[must_use]
pub fn labels<T>(vocab: &[VocabEntry<T>]) -> Vec<String> {
    vocab.iter().map(|entry| entry.label.to_owned()).collect()
}
