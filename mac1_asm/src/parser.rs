use crate::error::{AssemblyError, Result, Type};
use crate::isa::{self, Descriptor, Format};

/// One non-blank source line. A line with only a label has no instruction and names the
/// address of the next instruction.
#[derive(Debug, PartialEq, Eq)]
pub struct ParsedLine {
    pub line: usize,
    pub label: Option<String>,
    pub instruction: Option<&'static Descriptor>,
    pub operand: Option<String>,
}

/// Letters, digits and underscores. Labels may start with a digit.
pub fn is_label(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn parse(source: &str) -> Result<Vec<ParsedLine>> {
    let mut lines = vec![];
    for (index, text) in source.lines().enumerate() {
        if let Some(line) = parse_line(index + 1, text)? {
            lines.push(line);
        }
    }
    Ok(lines)
}

/// Parses `text` as source line `number`. Blank and comment-only lines yield `None`.
pub fn parse_line(number: usize, text: &str) -> Result<Option<ParsedLine>> {
    let error = |kind| AssemblyError::new(number, kind);
    let code = match text.find(';') {
        Some(comment) => &text[..comment],
        None => text,
    }
    .trim();
    if code.is_empty() {
        return Ok(None);
    }

    let (label, rest) = match code.find(':') {
        Some(colon) => {
            let label = code[..colon].trim();
            if !is_label(label) {
                return Err(error(Type::InvalidLabel(label.into())));
            }
            (Some(label.to_string()), &code[colon + 1..])
        }
        None => (None, code),
    };

    let mut tokens = rest.split_whitespace();
    let mnemonic = match tokens.next() {
        Some(mnemonic) => mnemonic.to_ascii_uppercase(),
        None => {
            return Ok(Some(ParsedLine { line: number, label, instruction: None, operand: None }))
        }
    };
    let operand = tokens.next();
    if let Some(extra) = tokens.next() {
        return Err(error(Type::ExtraOperand(extra.into())));
    }

    let descriptor = isa::lookup(&mnemonic).ok_or_else(|| error(Type::UnknownMnemonic(mnemonic)))?;
    match (descriptor.format, operand) {
        (Format::NoOperand, Some(_)) => {
            return Err(error(Type::UnexpectedOperand(descriptor.mnemonic)))
        }
        (Format::Constant, None) | (Format::Memory, None) => {
            return Err(error(Type::MissingOperand(descriptor.mnemonic)))
        }
        _ => {}
    }

    Ok(Some(ParsedLine {
        line: number,
        label,
        instruction: Some(descriptor),
        operand: operand.map(String::from),
    }))
}
