//! Name derivation for generated messages, fields and enum values.

use heck::{ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};

pub fn snake(name: &str) -> String {
    name.to_snake_case()
}

pub fn pascal(name: &str) -> String {
    name.to_upper_camel_case()
}

pub fn shouty_snake(name: &str) -> String {
    name.to_shouty_snake_case()
}

const UNCOUNTABLE: &[&str] = &[
    "data",
    "deer",
    "equipment",
    "fish",
    "information",
    "media",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "species",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("woman", "women"),
];

/// Pluralize a PascalCase entity name by inflecting its last word:
/// `User` → `Users`, `BlogPost` → `BlogPosts`, `Person` → `People`.
pub fn plural(name: &str) -> String {
    let split = name
        .char_indices()
        .filter(|(i, c)| *i > 0 && c.is_ascii_uppercase())
        .map(|(i, _)| i)
        .last()
        .unwrap_or(0);
    let (head, word) = name.split_at(split);
    if word.is_empty() {
        return name.to_string();
    }

    let lower = word.to_ascii_lowercase();
    let inflected = plural_word(&lower);

    // Reapply the capitalization of the first letter.
    let mut out = String::with_capacity(name.len() + 3);
    out.push_str(head);
    if word.starts_with(|c: char| c.is_ascii_uppercase()) {
        let mut chars = inflected.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    } else {
        out.push_str(&inflected);
    }
    out
}

fn plural_word(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, p)) = IRREGULAR.iter().find(|(s, _)| *s == word) {
        return (*p).to_string();
    }

    let ends_with_consonant_then = |suffix: &str| {
        word.strip_suffix(suffix)
            .and_then(|stem| stem.chars().last())
            .is_some_and(|c| !"aeiou".contains(c))
    };

    if let Some(stem) = word.strip_suffix("ix").or_else(|| word.strip_suffix("ex")) {
        if matches!(stem, "ind" | "matr" | "vert" | "apend") {
            return format!("{stem}ices");
        }
    }
    if word.ends_with("quiz") {
        return format!("{word}zes");
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) {
        return format!("{word}es");
    }
    if ends_with_consonant_then("y") {
        return format!("{}ies", &word[..word.len() - 1]);
    }
    if let Some(stem) = word.strip_suffix("fe") {
        if !stem.ends_with('f') {
            return format!("{stem}ves");
        }
    }
    if word.ends_with("lf") || word.ends_with("rf") || word.ends_with("eaf") {
        return format!("{}ves", &word[..word.len() - 1]);
    }
    if matches!(word, "hero" | "potato" | "tomato" | "echo" | "veto") {
        return format!("{word}es");
    }
    format!("{word}s")
}
