//! Declarative grammar for spell-selection messages.
//!
//! Recognized phrasings live in the rule tables below. Adding a phrasing means
//! adding a row, not touching the parser. All functions expect text that has
//! already been through [`crate::normalize::normalize`].
//!
//! Parsing works per sentence:
//! 1. Every intent marker in the sentence is located ("i'll take", "pick",
//!    "for my cantrips", ...).
//! 2. The text between a marker and the next marker, terminating clause or
//!    sentence end is that marker's span.
//! 3. Each span is cut into fragments at list separators (commas, "and", ...).
//!
//! Fragments are not spell names yet: the resolver decides which runs of
//! fragments name real spells.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Which kind of selection a message talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionCategory {
    Cantrips,
    Spells,
}

/// One row of a grammar table.
struct Rule {
    name: &'static str,
    pattern: &'static str,
}

/// Phrases that declare a choice. Earlier rows win when two markers start at
/// the same position.
const INTENT_MARKERS: &[Rule] = &[
    Rule {
        name: "conditional_desire",
        pattern: r"\bi(?:'d| would) (?:like|love|prefer)(?: to (?:learn|take|have|get|pick|choose|go with))?\b",
    },
    Rule {
        name: "future_declaration",
        pattern: r"\bi(?:'ll| will| shall) (?:go with|take|choose|pick|select|learn|get|grab|want)\b",
    },
    Rule {
        name: "declarative_verb",
        pattern: r"\b(?:choose|pick|select|take|want|learn|get|grab|go with|going with)(?: to (?:learn|take|have|get|pick|choose))?\b",
    },
    Rule {
        name: "list_declaration",
        pattern: r"\bmy (?:starting |first )?(?:cantrips?|spells?) (?:are|is|will be|should be)\b",
    },
    Rule {
        name: "category_lead",
        pattern: r"\bfor (?:my |the )?(?:cantrips?|(?:level[ -]?(?:1|one) |(?:1st|first)[ -]level )?spells?)\b",
    },
];

/// Phrases that say which selection the message is about.
const CATEGORY_MARKERS: &[(SelectionCategory, Rule)] = &[
    (
        SelectionCategory::Cantrips,
        Rule {
            name: "cantrip_word",
            pattern: r"\bcantrips?\b",
        },
    ),
    (
        SelectionCategory::Cantrips,
        Rule {
            name: "level_zero",
            pattern: r"\blevel[ -]?(?:0|zero) spells?\b",
        },
    ),
    (
        SelectionCategory::Spells,
        Rule {
            name: "level_one",
            pattern: r"\b(?:level[ -]?(?:1|one)|(?:1st|first)[ -]level|leveled) spells?\b",
        },
    ),
    (
        SelectionCategory::Spells,
        Rule {
            name: "my_spells",
            pattern: r"\b(?:for|my) (?:the )?spells?\b",
        },
    ),
];

/// Phrases that declare the player is done with the tutorial.
const READY_MARKERS: &[Rule] = &[
    Rule {
        name: "ready",
        pattern: r"\b(?:i'm|i am|im|we're|we are) (?:all )?ready\b|^ready\b",
    },
    Rule {
        name: "begin",
        pattern: r"\blet's (?:begin|go|start)\b|\b(?:begin|start) (?:the|my|our) (?:adventure|journey)\b",
    },
    Rule {
        name: "level_up",
        pattern: r"\blevel (?:me )?up\b|\bcomplete (?:my |the )?(?:training|tutorial)\b",
    },
];

/// Clauses that end a span early.
const TERMINATOR: &str =
    r"\b(?:because|since|so that|as my|but|except|please|thanks|thank you)\b|\bfor (?:now|me|you)\b";

/// Separators between list items. Runs such as ", and" count as one.
const SEPARATOR: &str = r"(?:\s*(?:,|&|/|\+|\band\b|\bor\b)\s*)+";

/// Negations that cancel the marker right after them.
const NEGATION: &str = r"\b(?:don't|dont|do not|won't|wont|will not|never|not|no longer)\s*$";

/// Span openings that ask about spells rather than choose them
/// ("i want to know about ...").
const INQUIRY: &str =
    r"^\s*(?:to (?:know|hear|see|ask|understand|find out)|(?:more )?about)\b";

/// Sentence boundaries. The boundary character is kept with the sentence so
/// questions can be recognized.
const SENTENCE: &str = r"[^.!?;\n]+[.!?;\n]?";

/// Words that carry no spell name at either end of a candidate.
const LEADING_FILLER: &[&str] = &[
    "i", "we", "the", "a", "an", "also", "both", "maybe", "probably", "just", "then", "with", "to",
    "learn", "cantrip", "cantrips", "spell", "spells", "is", "are",
];
const TRAILING_FILLER: &[&str] = &[
    "cantrip", "cantrips", "spell", "spells", "too", "as well", "instead", "please",
];

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("grammar patterns are literals and must compile")
}

static INTENT_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    INTENT_MARKERS
        .iter()
        .map(|rule| (rule.name, compile(rule.pattern)))
        .collect()
});

static CATEGORY_RES: LazyLock<Vec<(SelectionCategory, Regex)>> = LazyLock::new(|| {
    CATEGORY_MARKERS
        .iter()
        .map(|(category, rule)| (*category, compile(rule.pattern)))
        .collect()
});

static READY_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    READY_MARKERS
        .iter()
        .map(|rule| (rule.name, compile(rule.pattern)))
        .collect()
});

static TERMINATOR_RE: LazyLock<Regex> = LazyLock::new(|| compile(TERMINATOR));
static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| compile(SEPARATOR));
static NEGATION_RE: LazyLock<Regex> = LazyLock::new(|| compile(NEGATION));
static INQUIRY_RE: LazyLock<Regex> = LazyLock::new(|| compile(INQUIRY));
static SENTENCE_RE: LazyLock<Regex> = LazyLock::new(|| compile(SENTENCE));

/// The text after one intent marker, cut into list fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList {
    /// Name of the marker rule that opened this list.
    pub marker: &'static str,
    text: String,
    fragments: Vec<Range<usize>>,
}

impl CandidateList {
    fn new(marker: &'static str, span: &str) -> Self {
        let mut fragments = Vec::new();
        let mut start = 0;
        for sep in SEPARATOR_RE.find_iter(span) {
            fragments.push(start..sep.start());
            start = sep.end();
        }
        fragments.push(start..span.len());
        fragments.retain(|range| !strip_filler(&span[range.clone()]).is_empty());
        Self {
            marker,
            text: span.to_string(),
            fragments,
        }
    }

    /// Number of fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// The original text from fragment `first` through fragment `last`
    /// (inclusive), separators included, filler words stripped.
    ///
    /// Joining keeps the separators so that names which contain one
    /// ("detect evil and good") can be recovered.
    pub fn joined(&self, first: usize, last: usize) -> &str {
        match (self.fragments.get(first), self.fragments.get(last)) {
            (Some(a), Some(b)) if a.start <= b.end => strip_filler(&self.text[a.start..b.end]),
            _ => "",
        }
    }

    /// Every fragment on its own.
    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        (0..self.len()).map(|i| self.joined(i, i))
    }
}

/// Result of parsing a message that contains at least one intent marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentMatch {
    pub lists: Vec<CandidateList>,
    pub category: Option<SelectionCategory>,
}

/// Parse a normalized message. `None` means the message declares nothing.
pub fn parse_selection(normalized: &str) -> Option<IntentMatch> {
    let mut lists = Vec::new();
    let mut saw_marker = false;

    // Marker of a "choose:" line whose list continues on the following lines
    let mut block: Option<&'static str> = None;

    for sentence in SENTENCE_RE.find_iter(normalized) {
        let sentence = sentence.as_str();
        if sentence.trim_end().ends_with('?') {
            block = None;
            continue;
        }
        let body = sentence.trim_end_matches(['.', '!', ';', '\n']);
        let markers = find_markers(body);
        saw_marker |= !markers.is_empty();

        if markers.is_empty() {
            if let Some(marker) = block {
                push_list(&mut lists, marker, body);
            }
        } else {
            block = None;
        }

        for (i, marker) in markers.iter().enumerate() {
            if is_negated(&body[..marker.range.start]) {
                continue;
            }
            let end = markers
                .get(i + 1)
                .map_or(body.len(), |next| next.range.start);
            let span = &body[marker.range.end..end];
            if is_inquiry(span) {
                continue;
            }
            if end == body.len() && span.trim() == ":" && sentence.ends_with('\n') {
                block = Some(marker.name);
            }
            push_list(&mut lists, marker.name, span);
        }

        if !sentence.ends_with('\n') {
            block = None;
        }
    }

    if !saw_marker {
        return None;
    }
    Some(IntentMatch {
        lists,
        category: explicit_category(normalized),
    })
}

/// The category a message names explicitly, if it names exactly one.
pub fn explicit_category(normalized: &str) -> Option<SelectionCategory> {
    let mut found: Option<SelectionCategory> = None;
    for (category, re) in CATEGORY_RES.iter() {
        if !re.is_match(normalized) {
            continue;
        }
        match found {
            Some(existing) if existing != *category => return None,
            _ => found = Some(*category),
        }
    }
    found
}

/// Whether a normalized message declares the player ready to finish.
pub fn is_ready_declaration(normalized: &str) -> bool {
    SENTENCE_RE.find_iter(normalized).any(|sentence| {
        let sentence = sentence.as_str().trim();
        !sentence.ends_with('?') && READY_RES.iter().any(|(_, re)| re.is_match(sentence))
    })
}

struct Marker {
    name: &'static str,
    range: Range<usize>,
}

/// All non-overlapping intent markers in a sentence, in text order.
fn find_markers(sentence: &str) -> Vec<Marker> {
    let mut found: Vec<(usize, Marker)> = Vec::new();
    for (priority, (name, re)) in INTENT_RES.iter().enumerate() {
        for m in re.find_iter(sentence) {
            found.push((
                priority,
                Marker {
                    name: *name,
                    range: m.range(),
                },
            ));
        }
    }
    found.sort_by_key(|(priority, marker)| (marker.range.start, *priority));

    let mut markers: Vec<Marker> = Vec::new();
    for (_, marker) in found {
        let overlaps = markers
            .last()
            .is_some_and(|last| marker.range.start < last.range.end);
        if !overlaps {
            markers.push(marker);
        }
    }
    markers
}

/// Cut a span at its terminating clause and keep it if anything is left.
fn push_list(lists: &mut Vec<CandidateList>, marker: &'static str, mut span: &str) {
    if let Some(term) = TERMINATOR_RE.find(span) {
        span = &span[..term.start()];
    }
    let list = CandidateList::new(marker, span);
    if !list.is_empty() {
        lists.push(list);
    }
}

fn is_negated(before: &str) -> bool {
    NEGATION_RE.is_match(before)
}

fn is_inquiry(span: &str) -> bool {
    INQUIRY_RE.is_match(span)
}

fn strip_filler(mut text: &str) -> &str {
    loop {
        let trimmed = text.trim_matches(|c: char| c.is_whitespace() || "\"'():-".contains(c));
        let next = strip_word(trimmed, LEADING_FILLER, true)
            .or_else(|| strip_word(trimmed, TRAILING_FILLER, false))
            .unwrap_or(trimmed);
        if next.len() == text.len() {
            return next;
        }
        text = next;
    }
}

fn strip_word<'t>(text: &'t str, words: &[&str], leading: bool) -> Option<&'t str> {
    words.iter().find_map(|word| {
        if leading {
            let rest = text.strip_prefix(*word)?;
            (rest.is_empty() || rest.starts_with(' ')).then_some(rest)
        } else {
            let rest = text.strip_suffix(*word)?;
            (rest.is_empty() || rest.ends_with(' ')).then_some(rest)
        }
    })
}
