// src/wrap.rs
//
// Minimum-raggedness line breaking.
//
// Words are split on whitespace and never broken. Whitespace inside a quoted
// attribute value of a tag does not split: `<alt name="a b">` is the two words
// `<alt` and `name="a b">`. Paragraphs come from the reflower, where text and
// attribute values are escaped, so a literal '<', '>' or '"' is always markup.
//
// A line holding words [i, j) is as wide as their display widths plus one space
// between each pair. It is feasible when it fits `width`, or when it is a lone
// word (an overlong word overflows on its own line). Among all feasible
// partitions the one minimizing the sum over lines of (width - line_width)^2 is
// chosen, last line included:
//
//   cost[0] = 0
//   cost[j] = min over feasible i < j of cost[i] + (width - line_width(i, j))^2
//
// O(n^2) in the word count, with an early exit once a candidate line overflows.
// Ties go to the latest break, i.e. the shortest last line.

use unicode_width::UnicodeWidthStr;

/// Width of `words` joined by single spaces.
pub fn line_width(words: &[&str]) -> usize {
    let gaps = words.len().saturating_sub(1);
    words.iter().map(|w| w.width()).sum::<usize>() + gaps
}

/// Split on whitespace outside quoted attribute values.
pub fn words(paragraph: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = None;
    let mut in_tag = false;
    let mut in_quote = false;
    for (i, c) in paragraph.char_indices() {
        match c {
            '<' if !in_quote => in_tag = true,
            '>' if !in_quote => in_tag = false,
            '"' if in_tag => in_quote = !in_quote,
            _ => {}
        }
        if c.is_whitespace() && !in_quote {
            if let Some(s) = start.take() {
                out.push(&paragraph[s..i]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        out.push(&paragraph[s..]);
    }
    out
}

pub fn break_lines(paragraph: &str, width: usize) -> Vec<String> {
    let words = words(paragraph);
    if words.is_empty() {
        return Vec::new();
    }
    let width = width.max(1);
    let n = words.len();
    let lens: Vec<usize> = words.iter().map(|w| w.width()).collect();

    let mut cost = vec![u64::MAX; n + 1];
    let mut breaks = vec![0usize; n + 1];
    cost[0] = 0;

    for j in 1..=n {
        let mut line = 0usize;
        for i in (0..j).rev() {
            line = if i + 1 == j { lens[i] } else { line + 1 + lens[i] };
            if i + 1 < j && line > width {
                break;
            }
            let slack = width.abs_diff(line) as u64;
            let candidate = cost[i].saturating_add(slack.saturating_mul(slack));
            if candidate < cost[j] {
                cost[j] = candidate;
                breaks[j] = i;
            }
        }
    }

    let mut lines = Vec::new();
    let mut j = n;
    while j > 0 {
        let i = breaks[j];
        lines.push(words[i..j].join(" "));
        j = i;
    }
    lines.reverse();
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cost(lines: &[String], width: usize) -> u64 {
        lines
            .iter()
            .map(|l| {
                let slack = width.abs_diff(l.width()) as u64;
                slack * slack
            })
            .sum()
    }

    /// Cheapest feasible partition, by trying every set of break points.
    fn brute_force_cost(words: &[&str], width: usize) -> u64 {
        let n = words.len();
        let mut best = u64::MAX;
        for mask in 0u32..(1 << (n - 1)) {
            let mut total = 0u64;
            let mut start = 0;
            let mut feasible = true;
            for end in 1..=n {
                if end == n || mask & (1 << (end - 1)) != 0 {
                    let line = &words[start..end];
                    let w = line_width(line);
                    if line.len() > 1 && w > width {
                        feasible = false;
                        break;
                    }
                    let slack = width.abs_diff(w) as u64;
                    total += slack * slack;
                    start = end;
                }
            }
            if feasible {
                best = best.min(total);
            }
        }
        best
    }

    #[test]
    fn balances_instead_of_packing() {
        assert_eq!(
            break_lines("alpha beta gamma delta", 11),
            ["alpha beta", "gamma delta"]
        );
    }

    #[test]
    fn prefers_even_lines_over_greedy_fill() {
        // greedy: "aaa bb cc" / "ddddd" costs 1 + 25
        // optimal: "aaa bb" / "cc ddddd" costs 16 + 4
        let lines = break_lines("aaa bb cc ddddd", 10);
        assert_eq!(lines, ["aaa bb", "cc ddddd"]);
        assert_eq!(cost(&lines, 10), 20);
    }

    #[test]
    fn empty_paragraph() {
        assert!(break_lines("", 10).is_empty());
        assert!(break_lines("  \n\t ", 10).is_empty());
    }

    #[test]
    fn overlong_word_gets_its_own_line() {
        assert_eq!(
            break_lines("see https://spdx.org/licenses/MIT.html now", 12),
            ["see", "https://spdx.org/licenses/MIT.html", "now"]
        );
    }

    #[test]
    fn one_word_per_line_when_no_pair_fits() {
        assert_eq!(break_lines("abcd efgh ijkl", 5), ["abcd", "efgh", "ijkl"]);
    }

    #[test]
    fn whole_paragraph_on_one_line_when_it_fits() {
        assert_eq!(break_lines(" a  b\nc ", 80), ["a b c"]);
    }

    #[test]
    fn quoted_attribute_values_are_not_split() {
        assert_eq!(
            words(r#"see <alt name="a b" match="x  y">v w</alt> "z""#),
            ["see", "<alt", r#"name="a b""#, r#"match="x  y">v"#, "w</alt>", r#""z""#]
        );
        assert_eq!(
            break_lines(r#"<SPDX name="BSD Zero Clause License" identifier="0BSD">"#, 20),
            [
                "<SPDX",
                r#"name="BSD Zero Clause License""#,
                r#"identifier="0BSD">"#,
            ]
        );
    }

    #[test]
    fn quotes_in_text_do_not_glue_words() {
        assert_eq!(words(r#"said "hello world""#), ["said", r#""hello"#, r#"world""#]);
    }

    #[test]
    fn zero_width_is_treated_as_one() {
        assert_eq!(break_lines("a b", 0), ["a", "b"]);
    }

    #[test]
    fn measures_display_width() {
        // "é" is one column though two bytes
        assert_eq!(break_lines("ééé ééé", 7), ["ééé ééé"]);
    }

    fn word_list() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-z]{1,12}", 0..40)
    }

    proptest! {
        #[test]
        fn lines_fit_unless_single_overlong_word(words in word_list(), width in 1usize..40) {
            let paragraph = words.join(" ");
            for line in break_lines(&paragraph, width) {
                let fits = line.width() <= width;
                let lone = !line.contains(' ');
                prop_assert!(fits || lone, "line {:?} exceeds {}", line, width);
            }
        }

        #[test]
        fn words_are_preserved_in_order(words in word_list(), width in 1usize..40) {
            let paragraph = words.join("  \n ");
            let lines = break_lines(&paragraph, width);
            let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split(' ')).collect();
            prop_assert_eq!(rejoined, words.iter().map(String::as_str).collect::<Vec<_>>());
            prop_assert!(lines.iter().all(|l| !l.is_empty()));
        }

        #[test]
        fn cost_is_minimal(
            words in prop::collection::vec("[a-z]{1,9}", 1..=8),
            width in 1usize..30,
        ) {
            let refs: Vec<&str> = words.iter().map(String::as_str).collect();
            let lines = break_lines(&refs.join(" "), width);
            prop_assert_eq!(cost(&lines, width), brute_force_cost(&refs, width));
        }
    }
}
