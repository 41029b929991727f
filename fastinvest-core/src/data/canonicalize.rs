//! Missing-data policy and ordering for raw provider rows.
//!
//! Rules, applied in order:
//! 1. rows missing any of open/high/low/close are dropped; missing volume is 0
//! 2. rows failing `PriceBar::is_sane` are dropped
//! 3. rows outside `[start, end)` are dropped
//! 4. rows are sorted ascending; on duplicate dates the last reported row wins

use chrono::NaiveDate;

use super::provider::RawBar;
use crate::domain::PriceBar;

/// Cleaned bars plus counts of what was discarded and why.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Canonicalized {
    pub bars: Vec<PriceBar>,
    pub incomplete: usize,
    pub insane: usize,
    pub out_of_range: usize,
    pub duplicates: usize,
}

impl Canonicalized {
    pub fn dropped(&self) -> usize {
        self.incomplete + self.insane + self.out_of_range + self.duplicates
    }
}

pub fn canonicalize(raw: Vec<RawBar>, start: NaiveDate, end: NaiveDate) -> Canonicalized {
    let mut out = Canonicalized::default();
    let mut kept: Vec<PriceBar> = Vec::with_capacity(raw.len());

    for row in raw {
        let (Some(open), Some(high), Some(low), Some(close)) = (row.open, row.high, row.low, row.close)
        else {
            out.incomplete += 1;
            continue;
        };
        let bar = PriceBar {
            date: row.date,
            open,
            high,
            low,
            close,
            volume: row.volume.unwrap_or(0),
        };
        if !bar.is_sane() {
            out.insane += 1;
            continue;
        }
        if bar.date < start || bar.date >= end {
            out.out_of_range += 1;
            continue;
        }
        kept.push(bar);
    }

    // Stable sort keeps provider order among equal dates, so "last wins" holds.
    kept.sort_by_key(|b| b.date);
    for bar in kept {
        match out.bars.last_mut() {
            Some(prev) if prev.date == bar.date => {
                *prev = bar;
                out.duplicates += 1;
            }
            _ => out.bars.push(bar),
        }
    }

    out
}
