//! Total order over queue entries
//!
//! Real jobs sort by descending priority; a sentinel sorts after every real
//! job so it can never shadow outstanding work. The comparator is used with
//! `Vec::sort_by`, which is stable, so equal-priority jobs keep their
//! arrival order.

use super::queue::QueueEntry;
use std::cmp::Ordering;

pub(crate) fn compare(a: &QueueEntry, b: &QueueEntry) -> Ordering {
    match (a, b) {
        (QueueEntry::Sentinel, QueueEntry::Sentinel) => Ordering::Equal,
        (QueueEntry::Sentinel, QueueEntry::Job(_)) => Ordering::Greater,
        (QueueEntry::Job(_), QueueEntry::Sentinel) => Ordering::Less,
        (QueueEntry::Job(a), QueueEntry::Job(b)) => b.priority().cmp(&a.priority()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::Job;

    fn job(priority: i32) -> QueueEntry {
        QueueEntry::Job(Box::new(
            Job::directory_creation("/tmp/x", true).with_priority(priority),
        ))
    }

    #[test]
    fn test_higher_priority_sorts_first() {
        assert_eq!(compare(&job(5), &job(0)), Ordering::Less);
        assert_eq!(compare(&job(0), &job(5)), Ordering::Greater);
        assert_eq!(compare(&job(3), &job(3)), Ordering::Equal);
    }

    #[test]
    fn test_sentinel_sorts_after_any_job() {
        assert_eq!(compare(&QueueEntry::Sentinel, &job(i32::MIN)), Ordering::Greater);
        assert_eq!(compare(&job(i32::MIN), &QueueEntry::Sentinel), Ordering::Less);
        assert_eq!(
            compare(&QueueEntry::Sentinel, &QueueEntry::Sentinel),
            Ordering::Equal
        );
    }
}
