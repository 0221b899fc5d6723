//! Strict natural-language date parsing.
//!
//! Accepted shapes:
//!
//! ```text
//! ISO        2023-05-12   2023/05/12   2023.05.12
//! Numeric    12/05/2023   05-12-2023          (day/month order by language)
//! Words      12 May 2023  May 12th, 2023  twelve may 2023
//!            the twenty-first of March 2020
//!            doce de mayo de 2023   veintiuno de marzo del 2020
//!            le 1er mai 2023
//! ```
//!
//! Day, month and year must all be present. Any word that is not a month,
//! a number, a weekday or a known filler word fails the parse.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::lang::Language;
use crate::normalize::transliterate;

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})$").expect("valid regex"));

static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[-/.](\d{1,2})[-/.](\d{4})$").expect("valid regex"));

static DAY_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})(?:st|nd|rd|th|er|re|e|o|a)?$").expect("valid regex"));

static YEAR_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").expect("valid regex"));

/// Month names and abbreviations, already folded to ASCII.
const MONTHS: &[(&str, u32)] = &[
    // en
    ("january", 1),
    ("jan", 1),
    ("february", 2),
    ("feb", 2),
    ("march", 3),
    ("mar", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("june", 6),
    ("jun", 6),
    ("july", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sep", 9),
    ("sept", 9),
    ("october", 10),
    ("oct", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dec", 12),
    // es
    ("enero", 1),
    ("febrero", 2),
    ("marzo", 3),
    ("abril", 4),
    ("mayo", 5),
    ("junio", 6),
    ("julio", 7),
    ("agosto", 8),
    ("septiembre", 9),
    ("setiembre", 9),
    ("octubre", 10),
    ("noviembre", 11),
    ("diciembre", 12),
    // fr
    ("janvier", 1),
    ("fevrier", 2),
    ("mars", 3),
    ("avril", 4),
    ("mai", 5),
    ("juin", 6),
    ("juillet", 7),
    ("aout", 8),
    ("septembre", 9),
    ("octobre", 10),
    ("novembre", 11),
    ("decembre", 12),
];

/// Number words (cardinal and ordinal) usable as a day, folded to ASCII.
const DAY_WORDS: &[(&str, u32)] = &[
    // en
    ("one", 1),
    ("first", 1),
    ("two", 2),
    ("second", 2),
    ("three", 3),
    ("third", 3),
    ("four", 4),
    ("fourth", 4),
    ("five", 5),
    ("fifth", 5),
    ("six", 6),
    ("sixth", 6),
    ("seven", 7),
    ("seventh", 7),
    ("eight", 8),
    ("eighth", 8),
    ("nine", 9),
    ("ninth", 9),
    ("ten", 10),
    ("tenth", 10),
    ("eleven", 11),
    ("eleventh", 11),
    ("twelve", 12),
    ("twelfth", 12),
    ("thirteen", 13),
    ("thirteenth", 13),
    ("fourteen", 14),
    ("fourteenth", 14),
    ("fifteen", 15),
    ("fifteenth", 15),
    ("sixteen", 16),
    ("sixteenth", 16),
    ("seventeen", 17),
    ("seventeenth", 17),
    ("eighteen", 18),
    ("eighteenth", 18),
    ("nineteen", 19),
    ("nineteenth", 19),
    ("twenty", 20),
    ("twentieth", 20),
    ("thirty", 30),
    ("thirtieth", 30),
    // es
    ("uno", 1),
    ("un", 1),
    ("primero", 1),
    ("primer", 1),
    ("dos", 2),
    ("segundo", 2),
    ("tres", 3),
    ("tercero", 3),
    ("cuatro", 4),
    ("cuarto", 4),
    ("cinco", 5),
    ("quinto", 5),
    ("seis", 6),
    ("sexto", 6),
    ("siete", 7),
    ("septimo", 7),
    ("ocho", 8),
    ("octavo", 8),
    ("nueve", 9),
    ("noveno", 9),
    ("diez", 10),
    ("decimo", 10),
    ("once", 11),
    ("doce", 12),
    ("trece", 13),
    ("catorce", 14),
    ("quince", 15),
    ("dieciseis", 16),
    ("diecisiete", 17),
    ("dieciocho", 18),
    ("diecinueve", 19),
    ("veinte", 20),
    ("veintiuno", 21),
    ("veintiun", 21),
    ("veintidos", 22),
    ("veintitres", 23),
    ("veinticuatro", 24),
    ("veinticinco", 25),
    ("veintiseis", 26),
    ("veintisiete", 27),
    ("veintiocho", 28),
    ("veintinueve", 29),
    ("treinta", 30),
];

/// Words that may appear around a date without carrying a value.
const FILLERS: &[&str] = &[
    "the", "of", "on", "day", "de", "del", "el", "dia", "le", "du", "en",
    // weekdays
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
    "lunes", "martes", "miercoles", "jueves", "viernes", "sabado", "domingo",
    "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
];

/// Connectors allowed between a tens word and a unit word ("twenty and one", "treinta y uno").
const CONNECTORS: &[&str] = &["y", "and"];

fn lookup(table: &[(&str, u32)], word: &str) -> Option<u32> {
    table.iter().find(|(w, _)| *w == word).map(|(_, v)| *v)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Day(u32),
    Month(u32),
    Year(i32),
}

/// Parse a date expression.
///
/// `language` only decides the day/month order of ambiguous numeric dates;
/// month names and number words of every supported language are accepted.
///
/// ```rust
/// use chrono::NaiveDate;
/// use lexner::date::parse_date;
/// use lexner::lang::Language;
///
/// let expected = NaiveDate::from_ymd_opt(2023, 5, 12).unwrap();
/// assert_eq!(parse_date("twelve may 2023", Language::English).unwrap(), expected);
/// assert_eq!(parse_date("12 de mayo de 2023", Language::Spanish).unwrap(), expected);
/// assert!(parse_date("May 2023", Language::English).is_err());
/// ```
pub fn parse_date(text: &str, language: Language) -> Result<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::parse("empty date"));
    }

    if let Some(caps) = ISO_DATE.captures(trimmed) {
        return build_date(&caps[1], &caps[2], &caps[3], trimmed);
    }

    if let Some(caps) = NUMERIC_DATE.captures(trimmed) {
        let (first, second) = (&caps[1], &caps[2]);
        let first_n: u32 = first.parse().unwrap_or(0);
        let second_n: u32 = second.parse().unwrap_or(0);
        let month_first = if first_n > 12 {
            false
        } else if second_n > 12 {
            true
        } else {
            language.is_month_first()
        };
        let (month, day) = if month_first { (first, second) } else { (second, first) };
        return build_date(&caps[3], month, day, trimmed);
    }

    parse_words(trimmed)
}

/// Parse and format as `YYYY-MM-DD`.
pub fn normalize_date(text: &str, language: Language) -> Result<String> {
    parse_date(text, language).map(|d| d.format("%Y-%m-%d").to_string())
}

fn build_date(year: &str, month: &str, day: &str, original: &str) -> Result<NaiveDate> {
    let parsed = (year.parse::<i32>(), month.parse::<u32>(), day.parse::<u32>());
    match parsed {
        (Ok(y), Ok(m), Ok(d)) => NaiveDate::from_ymd_opt(y, m, d)
            .ok_or_else(|| Error::parse(format!("no such calendar date: {original}"))),
        _ => Err(Error::parse(format!("malformed date: {original}"))),
    }
}

fn parse_words(text: &str) -> Result<NaiveDate> {
    let folded: String = transliterate(&text.to_lowercase())
        .chars()
        .map(|c| match c {
            ',' | '.' | ';' | '/' | '-' => ' ',
            'º' | 'ª' => 'o',
            c => c,
        })
        .collect();
    let words: Vec<&str> = folded.split_whitespace().collect();

    let mut parts = Vec::new();
    let mut i = 0;
    while i < words.len() {
        let word = words[i];
        i += 1;

        if let Some(month) = lookup(MONTHS, word) {
            parts.push(Part::Month(month));
        } else if YEAR_NUMBER.is_match(word) {
            let year = word
                .parse()
                .map_err(|_| Error::parse(format!("bad year '{word}' in: {text}")))?;
            parts.push(Part::Year(year));
        } else if let Some(caps) = DAY_NUMBER.captures(word) {
            let day = caps[1]
                .parse()
                .map_err(|_| Error::parse(format!("bad day '{word}' in: {text}")))?;
            parts.push(Part::Day(day));
        } else if let Some(value) = lookup(DAY_WORDS, word) {
            let mut day = value;
            // "twenty first", "twenty-one", "treinta y uno"
            if value % 10 == 0 && value >= 20 {
                let mut j = i;
                if j < words.len() && CONNECTORS.contains(&words[j]) {
                    j += 1;
                }
                if let Some(unit) = words.get(j).and_then(|w| lookup(DAY_WORDS, w)) {
                    if (1..=9).contains(&unit) {
                        day += unit;
                        i = j + 1;
                    }
                }
            }
            parts.push(Part::Day(day));
        } else if FILLERS.contains(&word) {
            continue;
        } else {
            return Err(Error::parse(format!("unrecognized word '{word}' in: {text}")));
        }
    }

    let mut day = None;
    let mut month = None;
    let mut year = None;
    for part in parts {
        let slot_taken = match part {
            Part::Day(d) => day.replace(d).is_some(),
            Part::Month(m) => month.replace(m).is_some(),
            Part::Year(y) => year.replace(y).is_some(),
        };
        if slot_taken {
            return Err(Error::parse(format!("ambiguous date: {text}")));
        }
    }

    match (year, month, day) {
        (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y, m, d)
            .ok_or_else(|| Error::parse(format!("no such calendar date: {text}"))),
        _ => Err(Error::parse(format!("incomplete date: {text}"))),
    }
}
