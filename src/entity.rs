//! Plants and the sets of plants read from each source sheet.
use crate::period::Period;
use crate::units::Capacity;
use chrono::NaiveDate;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::fmt;

/// The kind of status change a plant's event date marks
#[derive(DeserializeLabeledStringEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClass {
    /// The plant is operating until it retires on its event date
    #[string = "retirement"]
    Retirement,
    /// The plant comes into service on its event date
    #[string = "commissioning"]
    Commissioning,
}

impl fmt::Display for EventClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Retirement => "retirement",
            Self::Commissioning => "commissioning",
        };
        write!(f, "{label}")
    }
}

/// A single power plant or generating unit
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Plant name. Not guaranteed to be unique.
    pub name: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Nameplate capacity
    pub capacity: Capacity,
    /// Technology label
    pub category: String,
    /// Region label (e.g. the plant's state)
    pub region: String,
    /// The first day of the month in which the plant's status changes
    pub event_date: NaiveDate,
}

impl Entity {
    /// The month in which the plant's status changes
    pub fn period(&self) -> Period {
        Period::from_date(self.event_date)
    }
}

/// The plants read from a single source sheet
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySet {
    /// Label identifying where the plants came from (the sheet name)
    pub source: String,
    /// What the plants' event dates mean
    pub event_class: EventClass,
    /// The plants, in sheet order
    pub entities: Vec<Entity>,
}

impl EntitySet {
    /// Iterate over the event period of every plant in the set
    pub fn periods(&self) -> impl Iterator<Item = Period> + '_ {
        self.entities.iter().map(Entity::period)
    }

    /// Total capacity of all plants in the set
    pub fn total_capacity(&self) -> Capacity {
        self.entities.iter().map(|e| e.capacity).sum()
    }
}
