//! Majority-vote aggregation of the three sentiment axes.

use crate::SentimentType;

/// Combines fundamental, on-chain and technical sentiment into the overall call.
///
/// The class with the highest count wins. Any tie at the highest count,
/// including the all-distinct 1-1-1 case, resolves to neutral.
pub fn aggregate_overall(
    fundamental: SentimentType,
    onchain: SentimentType,
    technical: SentimentType,
) -> SentimentType {
    let votes = [fundamental, onchain, technical];
    let count = |class: SentimentType| votes.iter().filter(|vote| **vote == class).count();

    let counts = SentimentType::ALL.map(|class| (class, count(class)));
    let max_count = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);

    let mut leaders = counts.iter().filter(|(_, n)| *n == max_count);
    match (leaders.next(), leaders.next()) {
        (Some((class, _)), None) => *class,
        _ => SentimentType::Neutral,
    }
}
