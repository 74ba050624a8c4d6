//! Search criteria collected from the user and sent to the listings API.
//!
//! [`SearchCriteria`] is only constructible through [`CriteriaBuilder`], which
//! enforces the non-empty keyword invariant and applies the nationwide region
//! fallback when no city was resolved.

use std::fmt;

use crate::error::CriteriaError;
use crate::vocabulary::{self, CITIES, EMPLOYMENT, SCHEDULE};

/// Region identifier understood by the listings API (`area` query parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AreaId(pub u32);

impl AreaId {
    /// Region code for "all of Russia"; used whenever no city resolves.
    pub const NATIONWIDE: AreaId = AreaId(113);

    /// Human-readable vocabulary label for this region, if it is a known one.
    #[must_use]
    pub fn label(self) -> Option<&'static str> {
        vocabulary::label_of(CITIES, self)
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Employment type filter (`employment` query parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Employment {
    Full,
    Part,
    Project,
    Volunteer,
    Probation,
}

impl Employment {
    /// Wire code sent to the listings API.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Employment::Full => "full",
            Employment::Part => "part",
            Employment::Project => "project",
            Employment::Volunteer => "volunteer",
            Employment::Probation => "probation",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        vocabulary::label_of(EMPLOYMENT, self).unwrap_or_else(|| self.code())
    }

    /// Case-normalized lookup of a user-facing label.
    #[must_use]
    pub fn from_label(text: &str) -> Option<Self> {
        vocabulary::lookup(EMPLOYMENT, text)
    }
}

/// Work schedule filter (`schedule` query parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schedule {
    FullDay,
    Shift,
    Flexible,
    Remote,
    FlyInFlyOut,
}

impl Schedule {
    /// Wire code sent to the listings API.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Schedule::FullDay => "fullDay",
            Schedule::Shift => "shift",
            Schedule::Flexible => "flexible",
            Schedule::Remote => "remote",
            Schedule::FlyInFlyOut => "flyInFlyOut",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        vocabulary::label_of(SCHEDULE, self).unwrap_or_else(|| self.code())
    }

    /// Case-normalized lookup of a user-facing label.
    #[must_use]
    pub fn from_label(text: &str) -> Option<Self> {
        vocabulary::lookup(SCHEDULE, text)
    }
}

/// Resolved, immutable search parameters handed to the aggregation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    keyword: String,
    salary_from: Option<u64>,
    employment: Option<Employment>,
    schedule: Option<Schedule>,
    area: AreaId,
}

impl SearchCriteria {
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    #[must_use]
    pub fn salary_from(&self) -> Option<u64> {
        self.salary_from
    }

    #[must_use]
    pub fn employment(&self) -> Option<Employment> {
        self.employment
    }

    #[must_use]
    pub fn schedule(&self) -> Option<Schedule> {
        self.schedule
    }

    #[must_use]
    pub fn area(&self) -> AreaId {
        self.area
    }
}

/// Incrementally filled criteria. Every setter may be called at most once per
/// dialogue step; later calls overwrite earlier values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaBuilder {
    keyword: Option<String>,
    salary_from: Option<u64>,
    employment: Option<Employment>,
    schedule: Option<Schedule>,
    area: Option<AreaId>,
}

impl CriteriaBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keyword(&mut self, keyword: impl Into<String>) -> &mut Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn salary_from(&mut self, salary: Option<u64>) -> &mut Self {
        self.salary_from = salary;
        self
    }

    pub fn employment(&mut self, employment: Option<Employment>) -> &mut Self {
        self.employment = employment;
        self
    }

    pub fn schedule(&mut self, schedule: Option<Schedule>) -> &mut Self {
        self.schedule = schedule;
        self
    }

    pub fn area(&mut self, area: Option<AreaId>) -> &mut Self {
        self.area = area;
        self
    }

    #[must_use]
    pub fn current_keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// Freezes the builder into [`SearchCriteria`].
    ///
    /// An unset area resolves to [`AreaId::NATIONWIDE`].
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError::EmptyKeyword`] if the keyword is unset or
    /// blank after trimming.
    pub fn build(&self) -> Result<SearchCriteria, CriteriaError> {
        let keyword = self
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(CriteriaError::EmptyKeyword)?;

        Ok(SearchCriteria {
            keyword: keyword.to_owned(),
            salary_from: self.salary_from,
            employment: self.employment,
            schedule: self.schedule,
            area: self.area.unwrap_or(AreaId::NATIONWIDE),
        })
    }
}
