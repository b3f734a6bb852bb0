//! American Soundex encoding
//!
//! Name and address words are indexed by their Soundex code so that
//! spelling variants ("Stephen"/"Steven", "Wilson"/"Wilkson") share a token.
//! The rules follow the commons-codec variant: only ASCII letters count,
//! H and W are skipped without separating equal codes, vowels do separate.

#[inline]
fn encode_char(c: char) -> char {
    match c {
        'B' | 'F' | 'P' | 'V' => '1',
        'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => '2',
        'D' | 'T' => '3',
        'L' => '4',
        'M' | 'N' => '5',
        'R' => '6',
        _ => '0',
    }
}

/// Encode a word as a 4-character Soundex code.
///
/// Returns an empty string when the input contains no ASCII letters; callers
/// fall back to the raw word in that case.
///
/// ```
/// use fuzzymatch::algorithms::phonetic::soundex;
/// assert_eq!(soundex("Stephen"), "S315");
/// assert_eq!(soundex("Steven"), "S315");
/// assert_eq!(soundex("new"), "N000");
/// ```
#[must_use]
pub fn soundex(s: &str) -> String {
    let mut letters = s
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase());

    let Some(first) = letters.next() else {
        return String::new();
    };

    let mut code = String::with_capacity(4);
    code.push(first);
    let mut prev = encode_char(first);

    for c in letters {
        if code.len() == 4 {
            break;
        }
        if matches!(c, 'H' | 'W') {
            continue;
        }
        let digit = encode_char(c);
        if digit != '0' && digit != prev {
            code.push(digit);
        }
        prev = digit;
    }

    while code.len() < 4 {
        code.push('0');
    }
    code
}
