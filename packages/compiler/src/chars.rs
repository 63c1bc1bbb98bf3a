/*
 * Character Codes
 *
 * Characters the markup tokenizer, the interpolation scanner and the style
 * parser dispatch on.
 */

//! Character constants used throughout the compiler

// Special characters
pub const TAB: char = '\t';
pub const NEWLINE: char = '\n';
pub const VTAB: char = '\x0B';
pub const FF: char = '\x0C';
pub const RETURN: char = '\r';
pub const SPACE: char = ' ';

// Punctuation
pub const BANG: char = '!';
pub const DQ: char = '"';
pub const HASH: char = '#';
pub const DOLLAR: char = '$';
pub const SQ: char = '\'';
pub const STAR: char = '*';
pub const COMMA: char = ',';
pub const MINUS: char = '-';
pub const PERIOD: char = '.';
pub const SLASH: char = '/';
pub const COLON: char = ':';
pub const SEMICOLON: char = ';';
pub const LT: char = '<';
pub const EQ: char = '=';
pub const GT: char = '>';
pub const AT: char = '@';
pub const BACKSLASH: char = '\\';
pub const UNDERSCORE: char = '_';
pub const BT: char = '`';

// Braces
pub const LBRACE: char = '{';
pub const RBRACE: char = '}';
pub const LPAREN: char = '(';
pub const RPAREN: char = ')';
pub const LBRACKET: char = '[';
pub const RBRACKET: char = ']';

/// Attribute-name prefixes that carry a binding kind.
pub const AFFIX_PREFIXES: [char; 4] = [AT, COLON, HASH, STAR];

/// HTML whitespace (the non-breaking space is significant content).
pub fn is_whitespace(ch: char) -> bool {
    ch == SPACE || ch == TAB || ch == NEWLINE || ch == RETURN || ch == VTAB || ch == FF
}

/// Check if character is a digit
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Check if character is ASCII letter
pub fn is_ascii_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

/// Check if character can start a tag name
pub fn is_tag_start(ch: char) -> bool {
    is_ascii_letter(ch) || ch == UNDERSCORE
}

/// Characters allowed inside a tag name after the first one.
pub fn is_tag_name_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == MINUS || ch == UNDERSCORE || ch == COLON || ch == PERIOD
}

/// Check if character can start an identifier
pub fn is_identifier_start(ch: char) -> bool {
    is_ascii_letter(ch) || ch == UNDERSCORE || ch == DOLLAR
}

/// Check if character can be part of an identifier
pub fn is_identifier_part(ch: char) -> bool {
    is_identifier_start(ch) || is_digit(ch)
}

/// Whether `text` is a plain JavaScript identifier.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_part),
        _ => false,
    }
}
