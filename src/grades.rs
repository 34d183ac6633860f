use crate::models::{Grade, Subject};

/// Credit-weighted average over the graded subjects in `subjects`.
///
/// Ungraded subjects add to neither the sum nor the credit total. An empty
/// input or a zero credit total yields 0.0.
pub fn weighted_average<'a, I>(subjects: I) -> f64
where
    I: IntoIterator<Item = &'a Subject>,
{
    let (weighted_sum, total_credits) = subjects
        .into_iter()
        .filter_map(|subject| match subject.grade() {
            Grade::Graded(value) => Some((value, subject.credits())),
            Grade::Ungraded => None,
        })
        .fold((0.0, 0u64), |(sum, credits), (value, subject_credits)| {
            (
                sum + value * f64::from(subject_credits),
                credits + u64::from(subject_credits),
            )
        });

    if total_credits == 0 {
        0.0
    } else {
        weighted_sum / total_credits as f64
    }
}

/// Subjects carrying a grade strictly above zero.
///
/// A recorded grade of exactly 0 counts as "not graded". With
/// `cancellable_only`, uncategorized subjects are dropped as well.
pub fn graded(subjects: &[Subject], cancellable_only: bool) -> Vec<&Subject> {
    subjects
        .iter()
        .filter(|subject| matches!(subject.grade(), Grade::Graded(value) if value > 0.0))
        .filter(|subject| !cancellable_only || !subject.category().is_uncategorized())
        .collect()
}

/// Graded subjects that can never be cancelled.
pub fn fixed(subjects: &[Subject]) -> Vec<&Subject> {
    graded(subjects, false)
        .into_iter()
        .filter(|subject| subject.category().is_uncategorized())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, SubjectIdGenerator};

    fn subject(
        ids: &mut SubjectIdGenerator,
        grade: Option<f64>,
        credits: u32,
        category: Option<&str>,
    ) -> Subject {
        Subject::new(ids, "Subject", Grade::from(grade), credits, Category::from(category))
            .unwrap()
    }

    fn sample() -> Vec<Subject> {
        let mut ids = SubjectIdGenerator::new();
        vec![
            subject(&mut ids, Some(1.7), 8, Some("nawi")),
            subject(&mut ids, Some(3.0), 8, Some("iwi")),
            subject(&mut ids, None, 3, Some("iwi")),
            subject(&mut ids, Some(0.0), 5, Some("wiwi")),
            subject(&mut ids, None, 12, None),
            subject(&mut ids, Some(1.0), 12, None),
        ]
    }

    #[test]
    fn empty_input_averages_to_zero() {
        let none: Vec<Subject> = Vec::new();
        assert_eq!(weighted_average(&none), 0.0);
    }

    #[test]
    fn only_ungraded_input_averages_to_zero() {
        let mut ids = SubjectIdGenerator::new();
        let subjects = vec![
            subject(&mut ids, None, 3, Some("iwi")),
            subject(&mut ids, None, 12, None),
        ];
        assert_eq!(weighted_average(&subjects), 0.0);
    }

    #[test]
    fn weights_by_credits() {
        let mut ids = SubjectIdGenerator::new();
        let subjects = vec![
            subject(&mut ids, Some(2.0), 10, Some("wiwi")),
            subject(&mut ids, Some(5.0), 5, Some("wiwi")),
            subject(&mut ids, Some(1.0), 5, Some("nawi")),
        ];
        assert!((weighted_average(&subjects) - 1.75).abs() < 1e-9);
    }

    #[test]
    fn ungraded_subjects_do_not_dilute_the_average() {
        let mut ids = SubjectIdGenerator::new();
        let subjects = vec![
            subject(&mut ids, Some(2.0), 5, Some("iwi")),
            subject(&mut ids, None, 20, Some("iwi")),
        ];
        assert_eq!(weighted_average(&subjects), 2.0);
    }

    #[test]
    fn average_ignores_input_order() {
        let subjects = sample();
        let mut reversed: Vec<&Subject> = subjects.iter().collect();
        reversed.reverse();
        let forward = weighted_average(&subjects);
        let backward = weighted_average(reversed);
        assert!((forward - backward).abs() < 1e-12);
    }

    #[test]
    fn graded_drops_ungraded_and_zero_grades() {
        let subjects = sample();
        let ids: Vec<u32> = graded(&subjects, false)
            .iter()
            .map(|subject| subject.id().get())
            .collect();
        assert_eq!(ids, vec![1, 2, 6]);
    }

    #[test]
    fn cancellable_only_drops_uncategorized() {
        let subjects = sample();
        let ids: Vec<u32> = graded(&subjects, true)
            .iter()
            .map(|subject| subject.id().get())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn all_graded_is_superset_of_cancellable() {
        let subjects = sample();
        let all = graded(&subjects, false);
        for subject in graded(&subjects, true) {
            assert!(all.iter().any(|candidate| candidate.id() == subject.id()));
        }
    }

    #[test]
    fn fixed_keeps_graded_uncategorized_subjects() {
        let subjects = sample();
        let fixed = fixed(&subjects);
        assert_eq!(fixed.len(), 1);
        assert_eq!(fixed[0].id().get(), 6);
    }
}
