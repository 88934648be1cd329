use regex::Regex;

use crate::domain::ChromosomeRow;

const X_RANK: u32 = 1000;
const Y_RANK: u32 = 1001;
const MT_RANK: u32 = 1002;

/// Classification of a chromosome/scaffold label for ordering purposes.
///
/// Numeric chromosomes and the special sex/mitochondrial labels share the
/// first tier; special labels rank from 1000 so they land after any plausible
/// chromosome count. Letter-prefixed scaffold names group by prefix, then
/// number. Everything else falls back to lexical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChromosomeClass {
    Numeric(u32),
    Special(u32),
    PrefixedNumeric(String, u64),
    Other(String),
}

/// Strip a leading "chr"/"Chr" (those two spellings only) and uppercase the
/// remainder.
fn normalize(label: &str) -> String {
    let stripped = label
        .strip_prefix("chr")
        .or_else(|| label.strip_prefix("Chr"))
        .unwrap_or(label);
    stripped.to_uppercase()
}

pub fn classify(label: &str) -> ChromosomeClass {
    let name = normalize(label);

    let special = match name.as_str() {
        "X" => Some(X_RANK),
        "Y" => Some(Y_RANK),
        "MT" | "M" | "MITO" | "MITOCHONDRION" => Some(MT_RANK),
        _ => None,
    };
    if let Some(rank) = special {
        return ChromosomeClass::Special(rank);
    }

    if let Ok(number) = name.parse::<u32>() {
        return ChromosomeClass::Numeric(number);
    }

    let prefixed = Regex::new(r"^([A-Z]+)(\d+)$").unwrap();
    if let Some(captures) = prefixed.captures(&name) {
        let prefix = captures[1].to_string();
        if let Ok(number) = captures[2].parse::<u64>() {
            return ChromosomeClass::PrefixedNumeric(prefix, number);
        }
    }

    ChromosomeClass::Other(name)
}

/// Total order over labels. Variant order gives the tiers; derived `Ord`
/// supplies the within-tier comparison.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Canonical(u32),
    Prefixed(String, u64),
    Lexical(String),
}

pub fn sort_key(label: &str) -> SortKey {
    match classify(label) {
        ChromosomeClass::Numeric(number) => SortKey::Canonical(number),
        ChromosomeClass::Special(rank) => SortKey::Canonical(rank),
        ChromosomeClass::PrefixedNumeric(prefix, number) => SortKey::Prefixed(prefix, number),
        ChromosomeClass::Other(name) => SortKey::Lexical(name),
    }
}

/// Stable sort into conventional chromosome order.
pub fn sort_rows(rows: &mut [ChromosomeRow]) {
    rows.sort_by_key(|row| sort_key(&row.chromosome));
}
