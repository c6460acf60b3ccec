// SPDX-License-Identifier: GPL-3.0-or-later

//! Genre string formatting for the written genre tag.

/// Join catalog genres with `", "` and title-case the result.
///
/// Returns `None` when there is nothing to write.
pub fn format_genres(genres: &[String]) -> Option<String> {
    let genres: Vec<&str> = genres
        .iter()
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .collect();

    if genres.is_empty() {
        return None;
    }

    Some(title_case(&genres.join(", ")))
}

/// Upper-case every letter that does not follow another letter; lower-case the rest.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_is_letter = false;

    for ch in input.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(ch);
            previous_is_letter = false;
        }
    }

    out
}
