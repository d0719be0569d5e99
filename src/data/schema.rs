use crate::data::bar::Bar;
use crate::data::diagnostics::{Diagnostics, RowWarning};
use chrono::NaiveDate;
use csv::ByteRecord;
use serde::{Deserialize, Serialize};

//both supported layouts carry exactly six columns
const FIELD_COUNT: usize = 6;

//the two input layouts the loader understands
//native:       ts_ms,open,high,low,close,volume
//vendor daily: Date,Close/Last,Volume,Open,High,Low
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Schema {
    Native,
    VendorDaily,
}

//bars produced by one parser pass plus what went wrong along the way
#[derive(Debug, Default)]
pub struct ParsedRows {
    pub bars: Vec<Bar>,
    pub diagnostics: Diagnostics,
}

impl Schema {
    //detects the schema from the header line
    //spaces are ignored and matching is case-insensitive
    pub fn detect(header: &str) -> Option<Self> {
        let normalized: String = header
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        if normalized.contains("ts_ms") && normalized.contains("open") {
            Some(Schema::Native)
        } else if normalized.contains("date") && normalized.contains("close/last") {
            Some(Schema::VendorDaily)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Schema::Native => "native (ts_ms)",
            Schema::VendorDaily => "vendor daily (Date, Close/Last)",
        }
    }

    //runs the parser that belongs to this schema
    pub fn parse<I>(self, rows: I) -> ParsedRows
    where
        I: IntoIterator<Item = (u64, ByteRecord)>,
    {
        match self {
            Schema::Native => parse_native(rows),
            Schema::VendorDaily => parse_vendor_daily(rows),
        }
    }
}

//parses native rows, timestamps are already epoch millis
//rows are kept in file order, out-of-order timestamps only raise a warning
pub fn parse_native<I>(rows: I) -> ParsedRows
where
    I: IntoIterator<Item = (u64, ByteRecord)>,
{
    let mut out = ParsedRows::default();
    let mut last_ts: Option<i64> = None;

    for (line, record) in rows {
        if record.len() != FIELD_COUNT {
            out.diagnostics.record(RowWarning::MalformedRow { line });
            continue;
        }

        let Some(bar) = native_bar(&record) else {
            out.diagnostics.record(RowWarning::BadNumeric { line });
            continue;
        };

        if last_ts.is_some_and(|prev| bar.ts_ms <= prev) {
            out.diagnostics.record(RowWarning::NonMonotonic { line });
        }
        last_ts = Some(bar.ts_ms);
        out.bars.push(bar);
    }

    out
}

//parses vendor daily rows (MM/DD/YYYY dates, $ prices, comma volumes)
//newest-first exports are flipped to ascending order
pub fn parse_vendor_daily<I>(rows: I) -> ParsedRows
where
    I: IntoIterator<Item = (u64, ByteRecord)>,
{
    let mut out = ParsedRows::default();

    for (line, record) in rows {
        if record.len() != FIELD_COUNT {
            out.diagnostics.record(RowWarning::MalformedRow { line });
            continue;
        }

        let Some(ts_ms) = field(&record, 0).and_then(parse_us_date_ms) else {
            out.diagnostics.record(RowWarning::BadDate { line });
            continue;
        };

        let Some(bar) = vendor_bar(ts_ms, &record) else {
            out.diagnostics.record(RowWarning::BadNumeric { line });
            continue;
        };

        out.bars.push(bar);
    }

    if let (Some(first), Some(last)) = (out.bars.first(), out.bars.last()) {
        if first.ts_ms > last.ts_ms {
            out.bars.reverse();
        }
    }

    out
}

fn native_bar(record: &ByteRecord) -> Option<Bar> {
    let ts_ms = field(record, 0)?.parse::<i64>().ok()?;
    let open = number(record, 1)?;
    let high = number(record, 2)?;
    let low = number(record, 3)?;
    let close = number(record, 4)?;
    let volume = number(record, 5)?;

    Some(Bar::new(ts_ms, open, high, low, close, volume))
}

fn vendor_bar(ts_ms: i64, record: &ByteRecord) -> Option<Bar> {
    let close = field(record, 1).and_then(parse_money)?;
    let volume = field(record, 2).and_then(parse_volume)?;
    let open = field(record, 3).and_then(parse_money)?;
    let high = field(record, 4).and_then(parse_money)?;
    let low = field(record, 5).and_then(parse_money)?;

    Some(Bar::new(ts_ms, open, high, low, close, volume))
}

//returns a trimmed field, none if missing or not utf-8
fn field(record: &ByteRecord, index: usize) -> Option<&str> {
    record
        .get(index)
        .and_then(|raw| std::str::from_utf8(raw).ok())
        .map(str::trim)
}

fn number(record: &ByteRecord, index: usize) -> Option<f64> {
    field(record, index)?.parse::<f64>().ok()
}

//"MM/DD/YYYY" -> epoch millis at 00:00:00 utc
//the year must be written with four digits, dates before 1970 are negative
pub fn parse_us_date_ms(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let year = raw.rsplit('/').next()?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let date = NaiveDate::parse_from_str(raw, "%m/%d/%Y").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(midnight.and_utc().timestamp_millis())
}

//"$ 395.94" -> 395.94
pub fn parse_money(raw: &str) -> Option<f64> {
    raw.trim()
        .trim_start_matches('$')
        .trim()
        .parse::<f64>()
        .ok()
}

//"168,156,400" -> 168156400
pub fn parse_volume(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    digits.parse::<f64>().ok()
}
