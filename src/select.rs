//! Picking categories or schemas by their listed index.

use crate::error::{ErrorKind, Result};
use clap::Args;
use regex::Regex;
use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

static RANGE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)-(\d+)$").unwrap());

/// Selectors shared by `populate` and `update`; at most one may be given.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
#[group(multiple = false)]
pub struct SelectArgs {
    /// Select everything
    #[arg(short, long)]
    pub all: bool,
    /// Select one entry (usage: '7')
    #[arg(short, long, value_name = "INDEX")]
    pub one: Option<usize>,
    /// Select an inclusive range of entries (usage: '12-35')
    #[arg(short, long, value_name = "FIRST-LAST", value_parser = parse_range)]
    pub range: Option<RangeInclusive<usize>>,
    /// Select a few entries (usage: '5 8 11 25')
    #[arg(short, long, value_name = "INDEX", num_args = 1..)]
    pub few: Option<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    One(usize),
    Range(RangeInclusive<usize>),
    Few(Vec<usize>),
}

impl SelectArgs {
    /// `None` when no selector was given.
    pub fn selection(&self) -> Option<Selection> {
        if self.all {
            Some(Selection::All)
        } else if let Some(index) = self.one {
            Some(Selection::One(index))
        } else if let Some(range) = &self.range {
            Some(Selection::Range(range.clone()))
        } else {
            self.few.clone().map(Selection::Few)
        }
    }
}

impl Selection {
    /// The selected items, in selection order, each at most once.
    ///
    /// Every index must exist; nothing is returned if one doesn't.
    pub fn pick<'a, T>(&self, items: &'a [T]) -> Result<Vec<&'a T>> {
        if items.is_empty() {
            exn::bail!(ErrorKind::NothingToSelect);
        }
        let indices: Vec<usize> = match self {
            Self::All => (0..items.len()).collect(),
            Self::One(index) => vec![*index],
            Self::Range(range) => range.clone().collect(),
            Self::Few(indices) => indices.clone(),
        };
        let mut seen = HashSet::with_capacity(indices.len());
        let mut picked = Vec::with_capacity(indices.len());
        for index in indices {
            let Some(item) = items.get(index) else {
                exn::bail!(ErrorKind::OutOfRange { index, len: items.len() });
            };
            if seen.insert(index) {
                picked.push(item);
            }
        }
        Ok(picked)
    }
}

/// Parse `FIRST-LAST`, where `FIRST` must be smaller than `LAST`.
fn parse_range(value: &str) -> std::result::Result<RangeInclusive<usize>, String> {
    let captures = RANGE_REGEX.captures(value).ok_or_else(|| format!("invalid range value: {value}"))?;
    let bound = |i: usize| captures[i].parse::<usize>().map_err(|e| format!("invalid range value: {value} ({e})"));
    let (first, last) = (bound(1)?, bound(2)?);
    if first >= last {
        return Err("second value should be bigger than first one".to_string());
    }
    Ok(first..=last)
}
