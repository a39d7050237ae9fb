//! This module stores the column names of the source relation. Note that these
//! must match the headers of the OWID CSV export exactly!

pub const LOCATION: &str = "location";
pub const DATE: &str = "date";
pub const CONTINENT: &str = "continent";

pub const TOTAL_CASES: &str = "total_cases";
pub const NEW_CASES: &str = "new_cases";
pub const TOTAL_DEATHS: &str = "total_deaths";
pub const NEW_DEATHS: &str = "new_deaths";
pub const TOTAL_VACCINATIONS: &str = "total_vaccinations";
pub const PEOPLE_VACCINATED: &str = "people_vaccinated";
pub const PEOPLE_FULLY_VACCINATED: &str = "people_fully_vaccinated";
pub const PEOPLE_FULLY_VACCINATED_PER_HUNDRED: &str = "people_fully_vaccinated_per_hundred";

/// Every column the loader requires in the input header. A header without one
/// of these is a fatal input error, not a silent default.
pub const REQUIRED: &[&str] = &[
    LOCATION,
    DATE,
    CONTINENT,
    TOTAL_CASES,
    NEW_CASES,
    TOTAL_DEATHS,
    NEW_DEATHS,
    TOTAL_VACCINATIONS,
    PEOPLE_VACCINATED,
    PEOPLE_FULLY_VACCINATED,
    PEOPLE_FULLY_VACCINATED_PER_HUNDRED,
];
