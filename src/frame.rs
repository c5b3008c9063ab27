//! Expansion of plant sets into per-month animation frames.
//!
//! Every frame is a complete snapshot: each plant is evaluated against each frame independently,
//! so a plant's status is a pure function of its event date and the frame. Because frames are
//! visited in ascending order and event dates never change, statuses only ever move one way
//! (operating to retired, absent to present).
use crate::entity::{Entity, EntitySet, EventClass};
use crate::period::Period;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use strum::{Display, EnumIter};

/// The status of a plant in a given frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
pub enum Status {
    /// Not yet retired
    Operating,
    /// Retired in or before the frame
    Retired,
    /// Commissioned in or before the frame
    Planned,
}

/// The status of a plant with the given event date in `frame`.
///
/// Returns `None` if the plant is not shown in the frame at all (i.e. a plant which hasn't been
/// commissioned yet). Transitions are inclusive of the event month.
pub fn status_at(event_class: EventClass, event_date: NaiveDate, frame: Period) -> Option<Status> {
    let frame_date = frame.first_day();
    match event_class {
        EventClass::Retirement if event_date > frame_date => Some(Status::Operating),
        EventClass::Retirement => Some(Status::Retired),
        EventClass::Commissioning => (event_date <= frame_date).then_some(Status::Planned),
    }
}

/// The sorted, duplicate-free union of every plant's event period across all sets
pub fn frame_sequence(sets: &[EntitySet]) -> Vec<Period> {
    sets.iter()
        .flat_map(EntitySet::periods)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One plant shown in one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationRow<'a> {
    /// The plant
    pub entity: &'a Entity,
    /// The source sheet the plant came from
    pub source: &'a str,
    /// The plant's status in this frame
    pub status: Status,
    /// The frame
    pub frame: Period,
}

/// All the rows to display in `frame`, in set order then plant order
pub fn frame_rows(sets: &[EntitySet], frame: Period) -> impl Iterator<Item = AnimationRow<'_>> {
    sets.iter().flat_map(move |set| {
        set.entities.iter().filter_map(move |entity| {
            let status = status_at(set.event_class, entity.event_date, frame)?;
            Some(AnimationRow {
                entity,
                source: &set.source,
                status,
                frame,
            })
        })
    })
}

/// Plant sets together with the shared frame sequence they are animated over
pub struct Animation<'a> {
    sets: &'a [EntitySet],
    frames: Vec<Period>,
}

impl<'a> Animation<'a> {
    /// Create an animation over the union of all periods in `sets`.
    ///
    /// All sets are evaluated against the same frames, so that they advance in lockstep.
    pub fn new(sets: &'a [EntitySet]) -> Self {
        Self {
            sets,
            frames: frame_sequence(sets),
        }
    }

    /// The frame sequence, in ascending order
    pub fn frames(&self) -> &[Period] {
        &self.frames
    }

    /// The rows for a single frame
    pub fn frame_rows(&self, frame: Period) -> impl Iterator<Item = AnimationRow<'a>> + use<'a> {
        frame_rows(self.sets, frame)
    }

    /// Every row of the animation, frame by frame
    pub fn rows(&self) -> impl Iterator<Item = AnimationRow<'a>> + '_ {
        self.frames
            .iter()
            .flat_map(|&frame| frame_rows(self.sets, frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{entity, entity_set};
    use itertools::Itertools;
    use rstest::rstest;

    fn frames(periods: &[&str]) -> Vec<Period> {
        periods.iter().map(|p| p.parse().unwrap()).collect()
    }

    const FRAMES: [&str; 4] = ["2025-01", "2025-02", "2025-03", "2025-04"];

    #[test]
    fn test_status_at_retirement() {
        let event_date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let statuses = frames(&FRAMES)
            .into_iter()
            .map(|f| status_at(EventClass::Retirement, event_date, f))
            .collect_vec();
        assert_eq!(
            statuses,
            [
                Some(Status::Operating),
                Some(Status::Operating),
                Some(Status::Retired),
                Some(Status::Retired)
            ]
        );
    }

    #[test]
    fn test_status_at_commissioning() {
        let event_date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let statuses = frames(&FRAMES)
            .into_iter()
            .map(|f| status_at(EventClass::Commissioning, event_date, f))
            .collect_vec();
        assert_eq!(
            statuses,
            [None, None, Some(Status::Planned), Some(Status::Planned)]
        );
    }

    #[rstest]
    #[case(EventClass::Retirement, "2025-02", Some(Status::Operating))]
    #[case(EventClass::Retirement, "2025-03", Some(Status::Retired))]
    #[case(EventClass::Commissioning, "2025-02", None)]
    #[case(EventClass::Commissioning, "2025-03", Some(Status::Planned))]
    fn test_status_at_boundary(
        #[case] event_class: EventClass,
        #[case] frame: &str,
        #[case] expected: Option<Status>,
    ) {
        let event_date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(
            status_at(event_class, event_date, frame.parse().unwrap()),
            expected
        );
    }

    #[test]
    fn test_frame_sequence_union() {
        let sets = [
            entity_set(
                EventClass::Retirement,
                vec![
                    entity("A", "2025-04"),
                    entity("B", "2025-01"),
                    entity("C", "2025-04"),
                ],
            ),
            entity_set(
                EventClass::Commissioning,
                vec![entity("D", "2025-02"), entity("E", "2025-04")],
            ),
        ];
        assert_eq!(
            frame_sequence(&sets),
            frames(&["2025-01", "2025-02", "2025-04"])
        );
    }

    #[test]
    fn test_frame_sequence_empty() {
        assert!(frame_sequence(&[]).is_empty());

        let sets = [entity_set(EventClass::Retirement, Vec::new())];
        assert!(frame_sequence(&sets).is_empty());
        assert_eq!(Animation::new(&sets).rows().count(), 0);
    }

    #[test]
    fn test_empty_set_does_not_affect_frames() {
        let sets = [
            entity_set(EventClass::Commissioning, Vec::new()),
            entity_set(EventClass::Retirement, vec![entity("A", "2025-03")]),
        ];
        assert_eq!(frame_sequence(&sets), frames(&["2025-03"]));
    }

    #[test]
    fn test_rows_ordering() {
        let sets = [
            entity_set(
                EventClass::Retirement,
                vec![entity("A", "2025-02"), entity("B", "2025-01")],
            ),
            entity_set(EventClass::Commissioning, vec![entity("C", "2025-01")]),
        ];
        let animation = Animation::new(&sets);
        let rows = animation
            .rows()
            .map(|row| {
                (
                    row.frame.to_string(),
                    row.entity.name.as_str(),
                    row.status,
                )
            })
            .collect_vec();
        assert_eq!(
            rows,
            [
                ("2025-01".to_string(), "A", Status::Operating),
                ("2025-01".to_string(), "B", Status::Retired),
                ("2025-01".to_string(), "C", Status::Planned),
                ("2025-02".to_string(), "A", Status::Retired),
                ("2025-02".to_string(), "B", Status::Retired),
                ("2025-02".to_string(), "C", Status::Planned),
            ]
        );
    }

    #[test]
    fn test_rows_carry_source() {
        let mut retired = entity_set(EventClass::Retirement, vec![entity("A", "2025-01")]);
        retired.source = "Operating".into();
        let mut planned = entity_set(EventClass::Commissioning, vec![entity("A", "2025-01")]);
        planned.source = "Planned".into();
        let sets = [retired, planned];

        // Plants sharing a name across sheets are kept separate
        let rows = Animation::new(&sets)
            .rows()
            .map(|row| (row.source, row.status))
            .collect_vec();
        assert_eq!(
            rows,
            [("Operating", Status::Retired), ("Planned", Status::Planned)]
        );
    }

    /// A mix of plants with event dates spread over a couple of years
    fn mixed_sets() -> [EntitySet; 2] {
        [
            entity_set(
                EventClass::Retirement,
                vec![
                    entity("R1", "2025-06"),
                    entity("R2", "2024-01"),
                    entity("R3", "2026-11"),
                    entity("R4", "2025-06"),
                ],
            ),
            entity_set(
                EventClass::Commissioning,
                vec![
                    entity("P1", "2024-03"),
                    entity("P2", "2026-01"),
                    entity("P3", "2025-09"),
                ],
            ),
        ]
    }

    #[test]
    fn test_status_monotonic() {
        let sets = mixed_sets();
        let animation = Animation::new(&sets);

        for entity in &sets[0].entities {
            let statuses = animation
                .rows()
                .filter(|row| std::ptr::eq(row.entity, entity))
                .map(|row| row.status)
                .collect_vec();

            // Retiring plants appear in every frame
            assert_eq!(statuses.len(), animation.frames().len());

            // Once retired, always retired
            let first_retired = statuses
                .iter()
                .position(|s| *s == Status::Retired)
                .unwrap();
            assert!(
                statuses[..first_retired]
                    .iter()
                    .all(|s| *s == Status::Operating)
            );
            assert!(
                statuses[first_retired..]
                    .iter()
                    .all(|s| *s == Status::Retired)
            );
        }
    }

    #[test]
    fn test_appearance_monotonic() {
        let sets = mixed_sets();
        let animation = Animation::new(&sets);

        for entity in &sets[1].entities {
            let present = animation
                .frames()
                .iter()
                .map(|&frame| {
                    animation
                        .frame_rows(frame)
                        .filter(|row| std::ptr::eq(row.entity, entity))
                        .count()
                })
                .collect_vec();

            // Never double-counted
            assert!(present.iter().all(|&n| n <= 1));

            // Absent until the event month, then present in every later frame
            let first = present.iter().position(|&n| n == 1).unwrap();
            assert_eq!(animation.frames()[first], entity.period());
            assert!(present[first..].iter().all(|&n| n == 1));
        }
    }

    #[test]
    fn test_every_frame_has_retirement_rows() {
        let sets = mixed_sets();
        let animation = Animation::new(&sets);
        assert_eq!(animation.frames().len(), 6);
        for &frame in animation.frames() {
            assert_eq!(
                animation
                    .frame_rows(frame)
                    .filter(|row| row.source == sets[0].source
                        && matches!(row.status, Status::Operating | Status::Retired))
                    .count(),
                sets[0].entities.len()
            );
        }
    }

    #[test]
    fn test_no_plant_lost() {
        let sets = mixed_sets();
        let animation = Animation::new(&sets);

        // Every plant is shown in the frame of its own event month
        for set in &sets {
            for entity in &set.entities {
                assert!(
                    animation
                        .frame_rows(entity.period())
                        .any(|row| std::ptr::eq(row.entity, entity))
                );
            }
        }
    }
}
