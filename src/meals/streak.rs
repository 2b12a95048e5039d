use futures_util::{Stream, TryStreamExt};

/// Running state of the longest on-diet run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreakTracker {
    current: u64,
    best: u64,
}

impl StreakTracker {
    pub fn push(&mut self, on_diet: bool) {
        if on_diet {
            self.current += 1;
        } else {
            self.best = self.best.max(self.current);
            self.current = 0;
        }
    }

    pub fn finish(self) -> u64 {
        self.best.max(self.current)
    }
}

/// Longest contiguous run of `true` in a fallible stream of diet flags.
///
/// The first error stops consumption and is returned; no partial count escapes.
pub async fn best_streak_stream<S, E>(flags: S) -> Result<u64, E>
where
    S: Stream<Item = Result<bool, E>>,
{
    let tracker = flags
        .try_fold(StreakTracker::default(), |mut tracker, flag| async move {
            tracker.push(flag);
            Ok(tracker)
        })
        .await?;
    Ok(tracker.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn best_streak(flags: impl IntoIterator<Item = bool>) -> u64 {
        let mut tracker = StreakTracker::default();
        for flag in flags {
            tracker.push(flag);
        }
        tracker.finish()
    }

    fn longest_run_naive(flags: &[bool]) -> u64 {
        flags
            .split(|f| !*f)
            .map(|run| run.len() as u64)
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn empty_sequence_is_zero() {
        assert_eq!(best_streak(Vec::new()), 0);
    }

    #[test]
    fn all_on_diet_counts_everything() {
        assert_eq!(best_streak(vec![true; 7]), 7);
    }

    #[test]
    fn all_off_diet_is_zero() {
        assert_eq!(best_streak(vec![false; 4]), 0);
    }

    #[test]
    fn trailing_run_is_counted() {
        assert_eq!(
            best_streak([true, false, true, true, false, true, true, true]),
            3
        );
    }

    #[test]
    fn earlier_best_survives_reset() {
        assert_eq!(best_streak([true, true, true, false, true]), 3);
    }

    #[test]
    fn matches_longest_run_for_every_short_sequence() {
        for len in 0..=10u32 {
            for bits in 0..(1u32 << len) {
                let flags: Vec<bool> = (0..len).map(|i| bits & (1 << i) != 0).collect();
                assert_eq!(
                    best_streak(flags.iter().copied()),
                    longest_run_naive(&flags),
                    "flags = {flags:?}"
                );
            }
        }
    }

    #[tokio::test]
    async fn stream_matches_iterator() {
        let flags = [false, true, true, false, true, true, true, true, false];
        let items = flags.iter().map(|f| Ok::<_, String>(*f));
        let best = best_streak_stream(stream::iter(items)).await.unwrap();
        assert_eq!(best, best_streak(flags));
    }

    #[tokio::test]
    async fn stream_error_discards_partial_result() {
        let items = vec![Ok(true), Ok(true), Err("cursor closed"), Ok(true)];
        let err = best_streak_stream(stream::iter(items)).await.unwrap_err();
        assert_eq!(err, "cursor closed");
    }

    #[tokio::test]
    async fn empty_stream_is_zero() {
        let items: Vec<Result<bool, String>> = Vec::new();
        assert_eq!(best_streak_stream(stream::iter(items)).await.unwrap(), 0);
    }
}
