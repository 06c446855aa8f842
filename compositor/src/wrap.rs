/// Greedy word wrap. Words are appended to the current line while the
/// measured width of the candidate line stays within `max_width`; the
/// first word of a line is never split, so a single over-long word still
/// occupies a line of its own.
///
/// The measure closure maps a candidate line to its rendered width, which
/// keeps the wrapping policy independent of any particular font backend.
pub fn wrap_lines(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    // ten units per character, including spaces
    fn char_width(s: &str) -> f32 {
        s.chars().count() as f32 * 10.0
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let lines = wrap_lines("WATCH NOW", 1180.0, char_width);
        assert_eq!(lines, vec!["WATCH NOW"]);
    }

    #[test]
    fn wraps_exactly_where_the_width_runs_out() {
        // each word is 5 chars = 50 units; "aaaaa bbbbb" = 110 units
        let lines = wrap_lines("aaaaa bbbbb ccccc ddddd", 115.0, char_width);
        assert_eq!(lines, vec!["aaaaa bbbbb", "ccccc ddddd"]);
    }

    #[test]
    fn word_count_matches_prediction() {
        // 26 words of 3 chars; a line fits 5 words (5*3 + 4 spaces = 19 chars
        // = 190 units within 200), so 26 words need ceil(26 / 5) = 6 lines
        let text = vec!["abc"; 26].join(" ");
        let lines = wrap_lines(&text, 200.0, char_width);
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn overlong_single_word_is_not_split() {
        let lines = wrap_lines("supercalifragilistic", 50.0, char_width);
        assert_eq!(lines, vec!["supercalifragilistic"]);
    }

    #[test]
    fn empty_and_whitespace_input_yield_no_lines() {
        assert!(wrap_lines("", 100.0, char_width).is_empty());
        assert!(wrap_lines("   \t ", 100.0, char_width).is_empty());
    }
}
