//! Conversion between effect records and portable display lines.
//!
//! Encoding is strict: every record becomes one line of the form
//! `"{name} {glyph} {MM:SS} [{key}]"`. Decoding is lenient: text may have
//! passed through display layers that add `§x` color markup or reflow
//! whitespace, so only the trailing bracketed key is required. A line
//! without a level or time token still yields a record with the missing
//! field set to 0, and lines that cannot be keyed are skipped.
//!
//! Level glyphs are Roman numerals `I`..`X` for displayed values 1 through
//! 10 and plain decimal above that. Decode accepts either form, so every
//! level survives a round trip. Display names may themselves contain
//! numbers, so decode reads the glyph and time nearest the key, scanning
//! the line from the right.

use std::collections::BTreeMap;

use stewpot_types::{
    EffectKind, EffectKindRegistry, EffectRecord, EncodedEffect, EncodedStack, TICKS_PER_SECOND,
};
use tracing::debug;

/// Title given to every crystallized stack.
pub const STACK_TITLE: &str = "Mystery Stew";

/// Markup escape introducing a two-character color or format code.
const MARKUP_ESCAPE: char = '§';

/// Roman numerals for displayed values 1 through 10.
const NUMERALS: [&str; 10] = ["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X"];

// ---------------------------------------------------------------------------
// Glyphs and time text
// ---------------------------------------------------------------------------

/// Glyph for a 0-based `level`: the numeral for `level + 1`.
pub fn level_glyph(level: u32) -> String {
    usize::try_from(level)
        .ok()
        .and_then(|index| NUMERALS.get(index))
        .map_or_else(|| level.saturating_add(1).to_string(), |glyph| (*glyph).to_owned())
}

/// Displayed value of a glyph token, or `None` if the token is not a glyph.
///
/// Tokens made only of `I`, `V`, and `X` are glyphs; one outside the
/// `I`..`X` table counts as 1. Plain decimal tokens are read as-is.
pub fn parse_level_glyph(token: &str) -> Option<u32> {
    if token.is_empty() {
        return None;
    }
    if token.chars().all(|c| matches!(c, 'I' | 'V' | 'X')) {
        let value = NUMERALS
            .iter()
            .position(|numeral| *numeral == token)
            .and_then(|index| u32::try_from(index).ok())
            .map_or(1, |index| index.saturating_add(1));
        return Some(value);
    }
    if token.chars().all(|c| c.is_ascii_digit()) {
        return Some(token.parse().unwrap_or(u32::MAX));
    }
    None
}

/// Format a tick count as `MM:SS`, dropping the sub-second remainder.
///
/// Minutes widen past two digits rather than wrapping.
pub fn format_time(ticks: u32) -> String {
    let total_seconds = ticks.checked_div(TICKS_PER_SECOND).unwrap_or(0);
    let minutes = total_seconds.checked_div(60).unwrap_or(0);
    let seconds = total_seconds.checked_rem(60).unwrap_or(0);
    format!("{minutes:02}:{seconds:02}")
}

/// Parse an `MM:SS` token into ticks.
///
/// Requires at least two minute digits and exactly two second digits below
/// 60. Returns `None` for anything else, including overflow.
pub fn parse_time(token: &str) -> Option<u32> {
    let (minutes, seconds) = token.split_once(':')?;
    let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if minutes.len() < 2 || seconds.len() != 2 || !digits(minutes) || !digits(seconds) {
        return None;
    }

    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;
    if seconds >= 60 {
        return None;
    }

    minutes
        .checked_mul(60)?
        .checked_add(seconds)?
        .checked_mul(TICKS_PER_SECOND)
}

/// Remove `§x` markup codes from a line.
pub fn strip_markup(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c == MARKUP_ESCAPE {
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Encoder and decoder bound to an effect registry.
pub struct EncodingCodec<'r, R: ?Sized> {
    registry: &'r R,
}

impl<'r, R> EncodingCodec<'r, R>
where
    R: EffectKindRegistry + ?Sized,
{
    /// Create a codec that names and resolves kinds through `registry`.
    pub const fn new(registry: &'r R) -> Self {
        Self { registry }
    }

    /// Encode a single record.
    pub fn encode_record(&self, kind: &EffectKind, record: &EffectRecord) -> EncodedEffect {
        EncodedEffect {
            display_name: self.registry.display_name(kind),
            level_glyph: level_glyph(record.level),
            time_text: format_time(record.remaining_ticks),
            effect_kind: self.registry.key_of(kind),
        }
    }

    /// Encode every record, in kind order.
    pub fn encode(&self, records: &BTreeMap<EffectKind, EffectRecord>) -> Vec<EncodedEffect> {
        records
            .iter()
            .map(|(kind, record)| self.encode_record(kind, record))
            .collect()
    }

    /// Encode every record into a titled stack, one line per record.
    pub fn encode_stack(&self, records: &BTreeMap<EffectKind, EffectRecord>) -> EncodedStack {
        EncodedStack {
            title: STACK_TITLE.to_owned(),
            lines: self.encode(records).iter().map(EncodedEffect::to_line).collect(),
        }
    }

    /// Decode one line.
    ///
    /// Returns `None` when the line has no trailing `[key]` segment or the
    /// key does not resolve. Level and time default to 0 when absent.
    pub fn decode_line(&self, line: &str) -> Option<(EffectKind, EffectRecord)> {
        let plain = strip_markup(line);
        let (body, tail) = plain.trim_end().rsplit_once('[')?;
        let key = tail.strip_suffix(']')?.trim();
        if key.is_empty() {
            return None;
        }

        let Some(kind) = self.registry.resolve(key) else {
            debug!(key, "Ignoring encoded line with unknown effect kind");
            return None;
        };

        let level = body
            .split_whitespace()
            .rev()
            .find_map(parse_level_glyph)
            .map_or(0, |value| value.saturating_sub(1));
        let remaining_ticks = body
            .split_whitespace()
            .rev()
            .find_map(parse_time)
            .unwrap_or(0);

        Some((kind, EffectRecord::new(level, remaining_ticks)))
    }

    /// Decode every line that carries a resolvable key.
    ///
    /// A kind appearing on more than one line keeps the last one.
    pub fn decode<I, S>(&self, lines: I) -> BTreeMap<EffectKind, EffectRecord>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .filter_map(|line| self.decode_line(line.as_ref()))
            .collect()
    }

    /// Decode the lines of a stack. The title is never read.
    pub fn decode_stack(&self, stack: &EncodedStack) -> BTreeMap<EffectKind, EffectRecord> {
        self.decode(&stack.lines)
    }
}
