//! Flexible person-name comparison.

/// Compare a free-text name against a (given, family) pair.
///
/// The candidate may be written "Kyle E. Niemeyer", "Kyle Niemeyer",
/// "K. E. Niemeyer", "KE Niemeyer", "K Niemeyer" or "Niemeyer, Kyle E.";
/// hyphenated given names such as "Chih-Jen Sung" also match "C. J. Sung"
/// and "C-J Sung". Comparison is case-insensitive.
///
/// ```
/// use chemked::validator::compare_name;
///
/// assert!(compare_name("Kyle", "Niemeyer", "Kyle E Niemeyer"));
/// assert!(compare_name("Chih-Jen", "Sung", "C-J Sung"));
/// assert!(!compare_name("Kyle", "Niemeyer", "John Smith"));
/// ```
pub fn compare_name(given_name: &str, family_name: &str, candidate: &str) -> bool {
    let given_name = given_name.to_lowercase();
    let family_name = family_name.to_lowercase();
    let mut candidate = candidate.to_lowercase();

    // "family, given middle" → "given middle family"
    if candidate.contains(',') {
        let mut parts: Vec<&str> = candidate.split(',').collect();
        parts.reverse();
        candidate = parts.join(" ").trim().to_string();
    }

    let tokens = split_name(&candidate);
    let Some(leading) = tokens.first() else {
        return false;
    };
    let mut first = vec![leading.clone()];
    if tokens.len() == 3 {
        first.push(tokens[1].clone());
    }

    let mut given = split_name(&given_name);
    if given.is_empty() {
        return false;
    }

    if first.len() == 2 && given.len() == 2 {
        first[1] = initial(&first[1]);
        given[1] = initial(&given[1]);
    } else if given.len() == 2 && first.len() == 1 {
        given.truncate(1);
    } else if first.len() == 2 && given.len() == 1 {
        first.truncate(1);
    }

    if char_len(&first[0]) == 1 || char_len(&given[0]) == 1 {
        given[0] = initial(&given[0]);
        first[0] = initial(&first[0]);
    }

    // combined initials such as "KE"
    if char_len(&first[0]) == 2 || char_len(&given[0]) == 2 {
        given[0] = initial(&given[0]);
        first[0] = initial(leading);
    }

    given == first && tokens.last() == Some(&family_name)
}

fn split_name(name: &str) -> Vec<String> {
    name.split(|c: char| matches!(c, ',' | ' ' | '-' | '.'))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn initial(token: &str) -> String {
    token.chars().next().map(String::from).unwrap_or_default()
}

fn char_len(token: &str) -> usize {
    token.chars().count()
}
