//! Read-only public summary composed from the content tables.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::Date;

use crate::entities::{Experience, User};
use crate::errors::DomainError;
use crate::repos;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalExperience {
    pub months: u32,
    pub years: u32,
    pub remaining_months: u32,
    /// e.g. "3 years 2 months", "1 year", "0 months"
    pub display: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub projects: u64,
    pub experiences: u64,
    pub skills: u64,
    pub educations: u64,
    pub categories: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterData {
    pub profile: Option<User>,
    pub experiences: Vec<Experience>,
    pub total_experience: TotalExperience,
    pub stats: Stats,
}

fn plural(n: u32, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

impl TotalExperience {
    pub fn from_months(months: u32) -> Self {
        let years = months / 12;
        let remaining_months = months % 12;
        let display = match (years, remaining_months) {
            (0, m) => plural(m, "month"),
            (y, 0) => plural(y, "year"),
            (y, m) => format!("{} {}", plural(y, "year"), plural(m, "month")),
        };
        Self {
            months,
            years,
            remaining_months,
            display,
        }
    }
}

/// Whole months between two dates by calendar month, ignoring the day.
pub fn months_between(start: Date, end: Date) -> i64 {
    let years = i64::from(end.year()) - i64::from(start.year());
    let months = i64::from(u8::from(end.month())) - i64::from(u8::from(start.month()));
    years * 12 + months
}

/// Span from the earliest start to the latest end over active experiences.
/// A missing end date counts as `today`. Negative spans clamp to zero.
pub fn total_experience<'a, I>(experiences: I, today: Date) -> TotalExperience
where
    I: IntoIterator<Item = &'a Experience>,
{
    let span = experiences
        .into_iter()
        .filter(|e| e.is_active)
        .map(|e| (e.start_date, e.end_date.unwrap_or(today)))
        .reduce(|(min_start, max_end), (start, end)| (min_start.min(start), max_end.max(end)));

    let months = span
        .map(|(start, end)| months_between(start, end).clamp(0, i64::from(u32::MAX)))
        .unwrap_or(0);

    TotalExperience::from_months(u32::try_from(months).unwrap_or(u32::MAX))
}

pub async fn build<C: ConnectionTrait>(conn: &C, today: Date) -> Result<MasterData, DomainError> {
    let profile = repos::users::find_admin(conn).await?;
    let experiences = repos::experiences::list_active(conn).await?;
    let total_experience = total_experience(&experiences, today);

    let stats = Stats {
        projects: repos::projects::count_active(conn).await?,
        experiences: experiences.len() as u64,
        skills: repos::skills::count_active(conn).await?,
        educations: repos::educations::count_active(conn).await?,
        categories: repos::categories::count_active(conn).await?,
    };

    Ok(MasterData {
        profile,
        experiences,
        total_experience,
        stats,
    })
}
