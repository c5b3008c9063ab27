//! Fixtures for tests

use crate::entity::{Entity, EntitySet, EventClass};
use crate::input::Sheet;
use crate::period::Period;
use crate::units::Capacity;
use calamine::Data;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// A plant with the given name and event period (`YYYY-MM`)
pub fn entity(name: &str, period: &str) -> Entity {
    let period: Period = period.parse().unwrap();
    Entity {
        name: name.into(),
        latitude: 40.0,
        longitude: -100.0,
        capacity: Capacity(100.0),
        category: "Natural Gas Steam Turbine".into(),
        region: "KS".into(),
        event_date: period.first_day(),
    }
}

/// A set of plants labelled the way the EIA generator inventory labels its sheets
pub fn entity_set(event_class: EventClass, entities: Vec<Entity>) -> EntitySet {
    let source = match event_class {
        EventClass::Retirement => "Operating",
        EventClass::Commissioning => "Planned",
    };

    EntitySet {
        source: source.into(),
        event_class,
        entities,
    }
}

/// Shorthand for a text cell
pub fn text(s: &str) -> Data {
    Data::String(s.into())
}

/// The header row of the generator inventory's "Operating" sheet
pub const OPERATING_HEADERS: [&str; 9] = [
    "Plant Name",
    "Planned Retirement Year",
    "Planned Retirement Month",
    "Technology",
    "Sector",
    "Nameplate Capacity (MW)",
    "Latitude",
    "Longitude",
    "Plant State",
];

/// A generator row in the layout of [`OPERATING_HEADERS`]
pub fn generator_row(name: &str, year: Data, month: Data, capacity: Data, lat: Data) -> Vec<Data> {
    vec![
        text(name),
        year,
        month,
        text("Conventional Steam Coal"),
        text("Electric Utility"),
        capacity,
        lat,
        Data::Float(-87.5),
        text("AL"),
    ]
}

#[fixture]
pub fn operating_sheet() -> Sheet {
    Sheet::new(
        "Operating",
        OPERATING_HEADERS.iter().map(ToString::to_string).collect(),
        vec![
            // Valid
            generator_row(
                "Barry",
                Data::Float(2028.0),
                Data::Float(12.0),
                Data::Float(1300.0),
                Data::Float(31.0),
            ),
            // Numbers stored as text are coerced
            generator_row(
                "Gaston",
                text("2026"),
                text(" 6 "),
                text("880.4"),
                text("33.24"),
            ),
            // Missing retirement year
            generator_row(
                "Gorgas",
                Data::Empty,
                Data::Int(5),
                Data::Float(700.0),
                Data::Float(33.6),
            ),
            // Invalid month
            generator_row(
                "Greene County",
                Data::Int(2027),
                Data::Int(13),
                Data::Float(500.0),
                Data::Float(32.6),
            ),
            // Missing latitude
            generator_row(
                "Miller",
                Data::Int(2030),
                Data::Int(1),
                Data::Float(2800.0),
                Data::Empty,
            ),
            // Unparsable capacity
            generator_row(
                "Widows Creek",
                Data::Int(2030),
                Data::Int(1),
                text("n/a"),
                Data::Float(34.9),
            ),
            // Negative capacity
            generator_row(
                "Colbert",
                Data::Int(2029),
                Data::Int(2),
                Data::Float(-1.0),
                Data::Float(34.7),
            ),
        ],
    )
}
