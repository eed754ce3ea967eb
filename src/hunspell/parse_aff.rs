/// Parser for hunspell-format .aff files
use anyhow::{anyhow, bail, Result};
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{
    char, line_ending, not_line_ending, space0, space1, u32,
};
use nom::combinator::{eof, map, opt, peek, success, value};
use nom::error::{Error as NomError, ErrorKind, ParseError};
use nom::multi::many0;
use nom::sequence::{delimited, preceded, separated_pair, terminated};
use nom::{Err, Finish, IResult, Parser};

use crate::hunspell::affixdata::{AffixData, AffixEntry, AffixKind, AffixRule};
use crate::hunspell::condition::AffixCondition;

type Input<'a> = &'a str;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

struct AffError {
    message: String,
}

impl AffError {
    fn new(message: &str) -> Self {
        AffError { message: message.to_string() }
    }

    fn wrapped(message: &str) -> Err<Self> {
        Err::Error(Self::new(message))
    }

    fn from_nom(e: Err<NomError<Input>>) -> Err<Self> {
        Err::Error(Self::new(&e.to_string()))
    }
}

impl<'a> ParseError<Input<'a>> for AffError {
    fn from_error_kind(input: Input, kind: ErrorKind) -> Self {
        let message = format!("{:?}:\t{}\n", kind, input);
        AffError { message }
    }

    fn append(_input: Input, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl ToString for AffError {
    fn to_string(&self) -> String {
        self.message.to_string()
    }
}

#[derive(Clone, Debug)]
enum AffixLine<'a> {
    Empty,
    /// Any KEY value directive, recognized later or not.
    Setting(&'a str, &'a str),
    Header {
        kind: AffixKind,
        flag: &'a str,
        combineable: bool,
        count: u32,
    },
    Entry {
        kind: AffixKind,
        flag: &'a str,
        strip: &'a str,
        addspec: &'a str,
        condition: &'a str,
    },
    CompoundHeader(u32),
    CompoundPattern(&'a str),
    Replacement(&'a str, &'a str),
}

fn comment(s: &str) -> IResult<&str, ()> {
    value((), preceded(char('#'), not_line_ending))(s)
}

fn ending(s: &str) -> IResult<&str, (), AffError> {
    value((), delimited(space0, opt(comment), line_ending))(s)
        .map_err(AffError::from_nom)
}

fn value_string(s: &str) -> IResult<&str, &str, AffError> {
    take_till1(|c: char| c.is_whitespace())(s)
}

/// Consume fields we don't keep, up to the end of the line.
fn ignored_rest(s: &str) -> IResult<&str, (), AffError> {
    value(
        (),
        opt(preceded(space1, take_till1(|c| c == '\n' || c == '\r'))),
    )(s)
}

fn affix_kind(s: Input) -> IResult<Input, AffixKind, AffError> {
    alt((
        value(AffixKind::Prefix, tag("PFX")),
        value(AffixKind::Suffix, tag("SFX")),
    ))(s)
}

fn yes_no(s: Input) -> IResult<Input, bool, AffError> {
    alt((value(true, char('Y')), value(false, char('N'))))(s)
}

/// `PFX flag Y/N count`: exactly four fields, or it's an entry line.
fn affix_header(s: Input) -> IResult<Input, AffixLine, AffError> {
    let (s, kind) = affix_kind(s)?;
    let (s, _) = space1(s)?;
    let (s, flag) = value_string(s)?;
    let (s, _) = space1(s)?;
    let (s, combineable) = yes_no(s)?;
    let (s, _) = space1(s)?;
    let (s, count) = u32(s)?;
    let (s, _) = peek(ending)(s)?;
    Ok((s, AffixLine::Header { kind, flag, combineable, count }))
}

/// `PFX flag strip add condition [morph...]`
fn affix_entry(s: Input) -> IResult<Input, AffixLine, AffError> {
    let (s, kind) = affix_kind(s)?;
    let (s, _) = space1(s)?;
    let (s, flag) = value_string(s)?;
    let (s, _) = space1(s)?;
    let (s, strip) = value_string(s)?;
    let (s, _) = space1(s)?;
    let (s, addspec) = value_string(s)?;
    let (s, _) = space1(s)?;
    let (s, condition) = value_string(s)?;
    let (s, _) = ignored_rest(s)?;
    Ok((s, AffixLine::Entry { kind, flag, strip, addspec, condition }))
}

/// `COMPOUNDRULE n` opens a table; any other second field is a pattern.
fn compound_rule_line(s: Input) -> IResult<Input, AffixLine, AffError> {
    let (s, _) = tag("COMPOUNDRULE")(s)?;
    let (s, _) = space1(s)?;
    let (s, l) = alt((
        map(terminated(u32, peek(ending)), AffixLine::CompoundHeader),
        map(value_string, AffixLine::CompoundPattern),
    ))(s)?;
    let (s, _) = ignored_rest(s)?;
    Ok((s, l))
}

fn replacement(s: Input) -> IResult<Input, AffixLine, AffError> {
    let (s, _) = tag("REP")(s)?;
    let (s, _) = space1(s)?;
    let (s, l) = alt((
        // The table-size line; the table grows per entry instead.
        map(terminated(u32, peek(ending)), |_| AffixLine::Empty),
        map(
            separated_pair(value_string, space1, value_string),
            |(from, to)| AffixLine::Replacement(from, to),
        ),
    ))(s)?;
    let (s, _) = ignored_rest(s)?;
    Ok((s, l))
}

/// Catch-all for KEY value directives, with or without a value. Extra
/// fields are dropped.
fn setting(s: Input) -> IResult<Input, AffixLine, AffError> {
    let (s, key) = value_string(s)?;
    if key.starts_with('#') {
        // Leave comment lines for the line terminator.
        return Err(AffError::wrapped("comment"));
    }
    let (s, val) = opt(preceded(space1, value_string))(s)?;
    let (s, _) = ignored_rest(s)?;
    Ok((s, AffixLine::Setting(key, val.unwrap_or(""))))
}

fn line(s: Input) -> IResult<Input, AffixLine, AffError> {
    alt((
        affix_header,
        affix_entry,
        compound_rule_line,
        replacement,
        setting,
        success(AffixLine::Empty),
    ))(s)
}

fn line_list(s: Input) -> IResult<Input, Vec<AffixLine>, AffError> {
    many0(terminated(preceded(space0, line), ending))(s)
}

struct PendingAffix<'a> {
    kind: AffixKind,
    flag: &'a str,
    combineable: bool,
    count: u32,
    entries: Vec<AffixEntry>,
}

fn build_entry(
    d: &AffixData,
    strip: &str,
    addspec: &str,
    condition: &str,
) -> Result<AffixEntry> {
    let strip = if strip == "0" {
        None
    } else {
        Some(AffixCondition::new(strip))
    };
    let (add, continuation) = match addspec.split_once('/') {
        Some((add, flags)) => (add, d.parse_flags(flags)?),
        None => (addspec, Vec::new()),
    };
    let add = if add == "0" { String::new() } else { add.to_string() };
    let condition = if condition == "." {
        None
    } else {
        Some(AffixCondition::new(condition))
    };
    Ok(AffixEntry { strip, add, condition, continuation })
}

fn build_affix_data(
    lines: &[AffixLine],
    fallback: &[(&str, &str)],
) -> Result<AffixData> {
    let mut d = AffixData::new();

    // The flag scheme has to be known before any flag is parsed, so a
    // FLAG fallback is applied up front when the file sets none.
    if !lines.iter().any(|l| matches!(l, AffixLine::Setting("FLAG", _))) {
        if let Some((_, v)) = fallback.iter().find(|(k, _)| *k == "FLAG") {
            d.apply_setting("FLAG", v)?;
        }
    }

    let mut affix: Option<PendingAffix> = None;
    let mut compound_left: u32 = 0;

    for l in lines {
        if let Some(pending) = affix.as_mut() {
            match l {
                AffixLine::Empty => continue,
                AffixLine::Entry { kind, flag, strip, addspec, condition }
                    if *kind == pending.kind && *flag == pending.flag =>
                {
                    pending
                        .entries
                        .push(build_entry(&d, strip, addspec, condition)?);
                    if pending.entries.len() as u32 == pending.count {
                        let done = affix.take().unwrap();
                        let flag = d.parse_single_flag(done.flag)?;
                        d.rules.insert(
                            flag,
                            AffixRule {
                                kind: done.kind,
                                combineable: done.combineable,
                                entries: done.entries,
                            },
                        );
                    }
                    continue;
                }
                _ => bail!(
                    "Affix table for {:?} ended before its declared {} entries",
                    pending.flag,
                    pending.count
                ),
            }
        }
        if compound_left > 0 {
            match l {
                AffixLine::Empty => continue,
                AffixLine::CompoundPattern(p) => {
                    d.compound_rules.push(p.to_string());
                    compound_left -= 1;
                    continue;
                }
                // An all-digit pattern parses as a header; inside a table
                // it is still a pattern.
                AffixLine::CompoundHeader(n) => {
                    d.compound_rules.push(n.to_string());
                    compound_left -= 1;
                    continue;
                }
                _ => bail!("COMPOUNDRULE table ended before its declared size"),
            }
        }
        match l {
            AffixLine::Empty => (),
            AffixLine::Setting(key, val) => d.apply_setting(key, val)?,
            AffixLine::Header { kind, flag, combineable, count } => {
                if *count == 0 {
                    let flag = d.parse_single_flag(flag)?;
                    d.rules.insert(
                        flag,
                        AffixRule {
                            kind: *kind,
                            combineable: *combineable,
                            entries: Vec::new(),
                        },
                    );
                } else {
                    affix = Some(PendingAffix {
                        kind: *kind,
                        flag: *flag,
                        combineable: *combineable,
                        count: *count,
                        entries: Vec::new(),
                    });
                }
            }
            AffixLine::Entry { flag, .. } => {
                bail!("PFX/SFX entry for {:?} outside its table", flag)
            }
            AffixLine::CompoundHeader(n) => compound_left = *n,
            AffixLine::CompoundPattern(_) => {
                bail!("COMPOUNDRULE pattern outside its table")
            }
            AffixLine::Replacement(from, to) => d.replacements.push(from, to),
        }
    }
    if let Some(pending) = affix {
        bail!(
            "Affix table for {:?} is missing entries ({} expected, {} found)",
            pending.flag,
            pending.count,
            pending.entries.len()
        );
    }
    if compound_left > 0 {
        bail!("COMPOUNDRULE table is missing {} patterns", compound_left);
    }

    for (key, val) in fallback {
        if !d.settings.contains_key(*key) {
            d.apply_setting(key, val)?;
        }
    }
    Ok(d)
}

pub fn parse_affix_data(
    text: &str,
    fallback: &[(&str, &str)],
) -> Result<AffixData> {
    let storage;
    let text = if text.is_empty() || text.ends_with('\n') {
        text
    } else {
        storage = format!("{}\n", text);
        &storage
    };
    let lines = match delimited(opt(char(BYTE_ORDER_MARK)), line_list, eof)
        .parse(text)
        .finish()
    {
        Ok((_, lines)) => lines,
        Err(e) => return Err(anyhow!(e.to_string())),
    };
    build_affix_data(&lines, fallback)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hunspell::affixdata::FlagMode;

    #[test]
    fn test_settings_and_comments() {
        let d = parse_affix_data(
            "# header comment\n\
             SET UTF-8\n\
             FLAG long\n\
             KEEPCASE Kc # trailing comment\n\
             \n\
             WORDCHARS 0123456789\n\
             COMPLEXPREFIXES",
            &[],
        )
        .unwrap();
        assert_eq!(FlagMode::DoubleCharFlags, d.flag_mode);
        assert_eq!(Some(('K' as u32) * 256 + 'c' as u32), d.keep_case);
        assert_eq!("UTF-8", d.settings["SET"]);
        assert_eq!("0123456789", d.settings["WORDCHARS"]);
        assert_eq!("", d.settings["COMPLEXPREFIXES"]);
    }

    #[test]
    fn test_affix_tables() {
        let d = parse_affix_data(
            "PFX A Y 1\n\
             PFX A 0 re .\n\
             SFX D Y 2\n\
             SFX D 0 ed [^y]\n\
             SFX D y ied y\n",
            &[],
        )
        .unwrap();
        let prefix = &d.rules[&('A' as u32)];
        assert_eq!(AffixKind::Prefix, prefix.kind);
        assert!(prefix.combineable);
        assert_eq!(1, prefix.entries.len());

        let suffix = &d.rules[&('D' as u32)];
        assert_eq!(AffixKind::Suffix, suffix.kind);
        assert_eq!(2, suffix.entries.len());
        assert!(suffix.entries[0].strip.is_none());
        assert_eq!("ed", suffix.entries[0].add);
        assert!(suffix.entries[1].strip.is_some());
    }

    #[test]
    fn test_continuation_classes() {
        let d = parse_affix_data(
            "SFX S Y 1\n\
             SFX S 0 s/P .\n\
             SFX P Y 1\n\
             SFX P 0 ish .\n",
            &[],
        )
        .unwrap();
        let rule = &d.rules[&('S' as u32)];
        assert_eq!(vec!['P' as u32], rule.entries[0].continuation);
    }

    #[test]
    fn test_short_affix_table_is_rejected() {
        assert!(parse_affix_data("SFX D Y 2\nSFX D 0 ed .\n", &[]).is_err());
        assert!(parse_affix_data("SFX D Y 2\nSFX D 0 ed .\nKEY abc\n", &[])
            .is_err());
        // An entry for some other flag doesn't count either.
        assert!(parse_affix_data("SFX D Y 1\nSFX E 0 ed .\n", &[]).is_err());
    }

    #[test]
    fn test_compound_rules_and_replacements() {
        let d = parse_affix_data(
            "COMPOUNDMIN 3\n\
             COMPOUNDRULE 2\n\
             COMPOUNDRULE AB\n\
             COMPOUNDRULE A*B?\n\
             REP 2\n\
             REP f ph\n\
             REP shun tion\n",
            &[],
        )
        .unwrap();
        assert_eq!(vec!["AB", "A*B?"], d.compound_rules);
        assert_eq!(Some(3), d.compound_min);
        let cands: Vec<String> = d.replacements.candidates("fshun").collect();
        assert_eq!(vec!["phshun", "ftion"], cands);
    }

    #[test]
    fn test_fallback_settings() {
        let d = parse_affix_data("KEEPCASE K\n", &[("KEEPCASE", "Z"), ("NOSUGGEST", "N")])
            .unwrap();
        // The affix file wins for KEEPCASE; the fallback fills NOSUGGEST.
        assert_eq!(Some('K' as u32), d.keep_case);
        assert_eq!(Some('N' as u32), d.no_suggest);
    }

    #[test]
    fn test_flag_fallback_applies_first() {
        let d = parse_affix_data(
            "SFX Aa Y 1\nSFX Aa 0 s .\n",
            &[("FLAG", "long")],
        )
        .unwrap();
        assert_eq!(FlagMode::DoubleCharFlags, d.flag_mode);
        assert!(d.rules.contains_key(&(('A' as u32) * 256 + 'a' as u32)));
    }

    #[test]
    fn test_bom_and_missing_final_newline() {
        let d = parse_affix_data("\u{FEFF}KEEPCASE K", &[]).unwrap();
        assert_eq!(Some('K' as u32), d.keep_case);
    }

    #[test]
    fn test_morphological_fields_ignored() {
        let d = parse_affix_data(
            "SFX N Y 1\n\
             SFX N 0 ion e ds:ion\n",
            &[],
        )
        .unwrap();
        assert_eq!("ion", d.rules[&('N' as u32)].entries[0].add);
    }

    #[test]
    fn test_compoundmin_must_be_numeric() {
        assert!(parse_affix_data("COMPOUNDMIN x\n", &[]).is_err());
    }
}
