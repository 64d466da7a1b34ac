use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

/// Delimiters accepted between hex groups. A single token uses exactly one of them.
const DELIMITERS: [&str; 3] = [":", "-", "."];

/// Address family a recognized token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    /// 48 bit, `00:00:5e:00:53:01`
    Eui48,
    /// 64 bit, `02:00:5e:10:00:00:00:01`
    Eui64,
    /// 20 byte IP over InfiniBand link-layer address
    IpoIb,
}

impl AddressKind {
    pub fn hex_digits(&self) -> usize {
        match self {
            AddressKind::Eui48 => 12,
            AddressKind::Eui64 => 16,
            AddressKind::IpoIb => 40,
        }
    }
}

/// One notation: `group_count` groups of `group_size` hex digits.
#[derive(Debug)]
struct MacSystem {
    group_count: usize,
    group_size: usize,
    kind: AddressKind,
    regex: Regex,
}

impl MacSystem {
    fn new(group_count: usize, group_size: usize, kind: AddressKind) -> Self {
        let pattern = DELIMITERS
            .iter()
            .map(|delimiter| {
                format!(
                    "(?:[0-9A-Fa-f]{{{size}}}{delimiter}){{{repeat}}}[0-9A-Fa-f]{{{size}}}",
                    size = group_size,
                    delimiter = regex::escape(delimiter),
                    repeat = group_count - 1,
                )
            })
            .collect::<Vec<String>>()
            .join("|");

        debug_assert_eq!(group_count * group_size, kind.hex_digits());
        let regex = Regex::new(&pattern).expect("MAC address pattern is a valid regex");

        Self { group_count, group_size, kind, regex }
    }

    /// Non-overlapping matches inside `gap`, left to right.
    ///
    /// A match touching another hex digit is not an address, and no part of it may
    /// become one: its span goes to `rejected` instead.
    fn find_in<'a>(
        &self,
        input: &'a str,
        gap: Range<usize>,
        rejected: &mut Vec<Range<usize>>,
    ) -> Vec<Candidate<'a>> {
        let haystack = &input[..gap.end];
        let mut found = Vec::new();
        let mut at = gap.start;

        while let Some(m) = self.regex.find_at(haystack, at) {
            if hex_bounded(input, m.range()) {
                found.push(Candidate { text: m.as_str(), start: m.start(), kind: self.kind });
            } else {
                rejected.push(m.range());
            }
            at = m.end();
        }

        found
    }

    /// Number of characters a match of this notation spans, delimiters included.
    fn span(&self) -> usize {
        self.group_count * self.group_size + self.group_count - 1
    }
}

/// Supported notations, longest span first.
static MAC_SYSTEMS: Lazy<Vec<MacSystem>> = Lazy::new(|| {
    let systems = vec![
        // 00:00:00:00:fe:80:00:00:00:00:00:00:02:00:5e:10:00:00:00:01
        MacSystem::new(20, 2, AddressKind::IpoIb),
        // 0000.0000.fe80.0000.0000.0000.0200.5e10.0000.0001
        MacSystem::new(10, 4, AddressKind::IpoIb),
        MacSystem::new(8, 2, AddressKind::Eui64), // 02:00:5e:10:00:00:00:01
        MacSystem::new(4, 4, AddressKind::Eui64), // 0200.5e10.0000.0001
        MacSystem::new(6, 2, AddressKind::Eui48), // 00:00:5e:00:53:01
        MacSystem::new(3, 4, AddressKind::Eui48), // 0000.5e00.5301
        MacSystem::new(2, 6, AddressKind::Eui48), // 00005e-005301
    ];
    debug_assert!(systems.windows(2).all(|pair| pair[0].span() >= pair[1].span()));
    systems
});

/// A MAC-like token found in the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    text: &'a str,
    start: usize,
    kind: AddressKind,
}

impl<'a> Candidate<'a> {
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Byte offset of the token in the scanned text.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    pub fn span(&self) -> Range<usize> {
        self.start()..self.end()
    }

    pub fn kind(&self) -> AddressKind {
        self.kind
    }
}

/// Finds every address token in `input`.
///
/// Notations are tried from the most to the least specific one. Whatever a pass
/// recognizes is off limits for all later passes, so a shorter notation never picks
/// up a fragment of a wider address. A token directly touching another hex digit is
/// not a match, and its text is off limits for later passes as well. The result is
/// grouped by notation, and only within one notation ordered left to right.
pub fn find_all_candidates(input: &str) -> Vec<Candidate<'_>> {
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut consumed: Vec<Range<usize>> = Vec::new();

    for system in MAC_SYSTEMS.iter() {
        let mut rejected = Vec::new();
        let found: Vec<Candidate> = unconsumed(input.len(), &consumed)
            .into_iter()
            .flat_map(|gap| system.find_in(input, gap, &mut rejected))
            .collect();

        consumed.extend(found.iter().map(Candidate::span));
        consumed.extend(rejected);
        consumed.sort_by_key(|span| span.start);

        candidates.extend(found);
    }

    candidates
}

/// Same as [`find_all_candidates`], returning only the matched text.
pub fn find_all_mac_addresses(input: &str) -> Vec<&str> {
    find_all_candidates(input)
        .iter()
        .map(Candidate::as_str)
        .collect()
}

/// True when neither neighbour of `span` is a hex digit that would widen the first or last group.
fn hex_bounded(input: &str, span: Range<usize>) -> bool {
    let before = input[..span.start].chars().next_back();
    let after = input[span.end..].chars().next();

    let hex = |c: Option<char>| c.is_some_and(|c| c.is_ascii_hexdigit());

    !hex(before) && !hex(after)
}

/// Byte ranges of `0..len` not covered by the sorted, disjoint `consumed` spans.
fn unconsumed(len: usize, consumed: &[Range<usize>]) -> Vec<Range<usize>> {
    let mut gaps = Vec::with_capacity(consumed.len() + 1);
    let mut cursor = 0;

    for span in consumed {
        if span.start > cursor {
            gaps.push(cursor..span.start);
        }
        cursor = span.end;
    }
    if cursor < len {
        gaps.push(cursor..len);
    }

    gaps
}
