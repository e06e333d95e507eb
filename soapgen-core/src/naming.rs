//! Identifier and namespace derivation.
//!
//! Everything here is pure and total: the same input always yields the same
//! identifier, which is what keeps getter/setter pairs aligned across the
//! wrapper and adapter synthesizers.

const RESERVED: &[&str] = &[
    "abstract", "as", "assert", "async", "await", "boolean", "break", "byte", "case", "catch",
    "char", "class", "const", "continue", "crate", "default", "do", "double", "dyn", "else",
    "enum", "extends", "extern", "false", "final", "finally", "float", "fn", "for", "goto", "if",
    "impl", "implements", "import", "in", "instanceof", "int", "interface", "let", "long", "loop",
    "match", "mod", "move", "mut", "native", "new", "null", "package", "private", "protected",
    "pub", "public", "ref", "return", "self", "short", "static", "strictfp", "struct", "super",
    "switch", "synchronized", "this", "throw", "throws", "trait", "transient", "true", "try",
    "type", "unsafe", "use", "void", "volatile", "where", "while",
];

/// Default namespace for a dotted package: `org.acme.fruit` becomes
/// `http://fruit.acme.org/`.
pub fn derive_namespace(package: &str) -> String {
    let reversed: Vec<&str> = package.split('.').rev().collect();
    format!("http://{}/", reversed.join("."))
}

pub fn effective_name(explicit: Option<&str>, fallback: &str) -> String {
    explicit.unwrap_or(fallback).to_string()
}

pub fn effective_namespace(explicit: Option<&str>, fallback: &str) -> String {
    explicit.unwrap_or(fallback).to_string()
}

/// Upper-case the first character, leave the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}

/// Split a wire name into words at punctuation and case boundaries.
///
/// `first_name` and `firstName` both give `["first", "Name"]`-shaped words;
/// an acronym run ends before its last capital when a lower-case letter
/// follows (`XMLParser` gives `XML`, `Parser`).
pub fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if !prev.is_uppercase() || next_is_lower {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Field identifier for a wire name: lower camel case, prefixed with `_`
/// when it would start with a digit or collide with a reserved word.
pub fn to_field_identifier(wire_name: &str) -> String {
    let words = split_words(wire_name);
    let mut ident = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            ident.push_str(&word.to_lowercase());
        } else {
            ident.push_str(&capitalize(word));
        }
    }
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) || is_reserved(&ident)
    {
        ident.insert(0, '_');
    }
    ident
}

fn accessor(prefix: &str, wire_name: &str) -> String {
    let mut ident = prefix.to_string();
    for word in split_words(wire_name) {
        ident.push_str(&capitalize(&word));
    }
    ident
}

pub fn getter_identifier(wire_name: &str) -> String {
    accessor("get", wire_name)
}

pub fn setter_identifier(wire_name: &str) -> String {
    accessor("set", wire_name)
}
