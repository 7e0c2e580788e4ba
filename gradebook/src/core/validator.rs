//! Score edits: coercion, clamping and copy-on-write roster updates.

use std::str::FromStr;

use rand::Rng;

use crate::core::error::EngineError;
use crate::roster::{MAX_SCORE, Roster, Subject};

/// Subjects touched by a bulk random fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillTarget {
    Subject(Subject),
    All,
}

impl FillTarget {
    fn includes(self, subject: Subject) -> bool {
        match self {
            FillTarget::Subject(target) => target == subject,
            FillTarget::All => true,
        }
    }
}

impl FromStr for FillTarget {
    type Err = EngineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "*" => Ok(FillTarget::All),
            other if other.eq_ignore_ascii_case("all") => Ok(FillTarget::All),
            other => other.parse().map(FillTarget::Subject),
        }
    }
}

/// Coerce raw user input into a score.
///
/// Malformed input is not rejected: an empty string, unparseable text or NaN
/// all become `0`, then the value is clamped to `0..=100` and truncated.
///
/// Accepted numerals are decimal/exponent notation, unsigned `0x`/`0o`/`0b`
/// integers and the exact words `Infinity`, `+Infinity` and `-Infinity`.
/// Spellings such as `inf` or `nan` are unparseable.
pub fn coerce_score(raw: &str) -> u8 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }
    clamp_score(parse_numeral(trimmed).unwrap_or(0.0))
}

fn parse_numeral(text: &str) -> Option<f64> {
    match text {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    const PREFIXES: [(&str, u32); 6] = [
        ("0x", 16),
        ("0X", 16),
        ("0o", 8),
        ("0O", 8),
        ("0b", 2),
        ("0B", 2),
    ];
    for (prefix, radix) in PREFIXES {
        if let Some(digits) = text.strip_prefix(prefix) {
            return parse_radix(digits, radix);
        }
    }
    // `f64::from_str` also takes `inf`, `infinity` and `nan` in any case
    if text
        .bytes()
        .any(|b| b.is_ascii_alphabetic() && !matches!(b, b'e' | b'E'))
    {
        return None;
    }
    text.parse().ok()
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|digit| acc * f64::from(radix) + f64::from(digit))
    })
}

/// Clamp a numeric value into `0..=100`. NaN maps to `0`.
pub fn clamp_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, f64::from(MAX_SCORE)).trunc() as u8
}

/// Replace one subject score of one student, parsing the subject key.
pub fn update_score(
    roster: &Roster,
    id: u32,
    subject: &str,
    raw: &str,
) -> Result<Roster, EngineError> {
    let subject: Subject = subject.parse()?;
    update_subject_score(roster, id, subject, raw)
}

/// Replace one subject score of one student.
///
/// Returns a new roster; `roster` itself is left untouched.
pub fn update_subject_score(
    roster: &Roster,
    id: u32,
    subject: Subject,
    raw: &str,
) -> Result<Roster, EngineError> {
    let index = roster
        .students()
        .binary_search_by_key(&id, |student| student.id)
        .map_err(|_| EngineError::UnknownStudentId(id))?;
    let score = coerce_score(raw);

    let mut students = roster.students().to_vec();
    students[index] = students[index].with_score(subject, score);
    Ok(Roster::from_sorted(students))
}

/// Assign a uniform random score in `0..=100` to every targeted subject.
pub fn fill_random<R: Rng + ?Sized>(roster: &Roster, target: FillTarget, rng: &mut R) -> Roster {
    let students = roster
        .students()
        .iter()
        .map(|student| {
            let mut next = student.clone();
            for subject in Subject::ALL.into_iter().filter(|s| target.includes(*s)) {
                next = next.with_score(subject, rng.gen_range(0..=MAX_SCORE));
            }
            next
        })
        .collect();
    Roster::from_sorted(students)
}
