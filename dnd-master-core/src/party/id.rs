//! Member id generation from character names.

use std::collections::HashSet;

/// Latin spelling for each lower-case Cyrillic letter.
fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'ё' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "c",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// Reduce text to lower-case ASCII letters and digits.
///
/// Cyrillic is transliterated; every other character is dropped.
pub fn slugify(text: &str) -> String {
    let mut slug = String::new();
    for c in text.to_lowercase().chars() {
        if let Some(latin) = transliterate(c) {
            slug.push_str(latin);
        } else if c.is_ascii_alphanumeric() {
            slug.push(c);
        }
    }
    slug
}

/// Derive a unique `pc_` id for a new member.
///
/// `index` is the member's 1-based position and is used when the name has
/// nothing to slug. Collisions get `_2`, `_3`, ... appended.
pub fn generate_member_id(name: &str, existing_ids: &HashSet<String>, index: usize) -> String {
    let slug = slugify(name);
    let candidate = if slug.is_empty() {
        format!("pc_{index}")
    } else {
        format!("pc_{slug}")
    };

    let mut id = candidate.clone();
    let mut suffix = 1;
    while existing_ids.contains(&id) {
        suffix += 1;
        id = format!("{candidate}_{suffix}");
    }
    id
}
