// Suggested debate topics offered by the topic inputs.

/// Example motions for the polling courtroom debate.
pub const COURTROOM_TOPICS: [&str; 4] = [
    "Is social media beneficial for society?",
    "Should artificial intelligence be regulated?",
    "Is remote work better than working in an office?",
    "Should college education be free?",
];

/// Example motions for the timed debate room.
pub const ARENA_TOPICS: [&str; 4] = [
    "Are social media companies responsible for misinformation on their platforms?",
    "Should AI-generated content require mandatory disclosure?",
    "Is complete online privacy a right or a privilege?",
    "Should there be stricter regulation of news media to combat misinformation?",
];

/// The topic after `current` in `topics`, wrapping around. An input that is
/// not one of the suggestions starts the cycle from the first entry.
pub fn next_topic<'a>(topics: &[&'a str], current: &str) -> Option<&'a str> {
    let next = match topics.iter().position(|t| *t == current.trim()) {
        Some(i) => (i + 1) % topics.len(),
        None => 0,
    };
    topics.get(next).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_and_wraps() {
        assert_eq!(next_topic(&COURTROOM_TOPICS, ""), Some(COURTROOM_TOPICS[0]));
        assert_eq!(
            next_topic(&COURTROOM_TOPICS, COURTROOM_TOPICS[0]),
            Some(COURTROOM_TOPICS[1])
        );
        assert_eq!(
            next_topic(&COURTROOM_TOPICS, COURTROOM_TOPICS[3]),
            Some(COURTROOM_TOPICS[0])
        );
    }

    #[test]
    fn custom_text_restarts_cycle() {
        assert_eq!(
            next_topic(&ARENA_TOPICS, "my own motion"),
            Some(ARENA_TOPICS[0])
        );
    }

    #[test]
    fn empty_list_yields_none() {
        assert_eq!(next_topic(&[], "x"), None);
    }
}
