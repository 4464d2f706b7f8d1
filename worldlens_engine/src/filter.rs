//! Rule-based pre-filter for surface-layer claims.
//!
//! Runs before any embedding call and rejects fragments that carry no
//! concrete, checkable content: pronoun-led snippets, slogans, exhortations,
//! bare emotional reactions and unfinished sentences. Rules cover English
//! and Korean forum text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Why a surface claim was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    TooShort,
    DemonstrativeStart,
    VagueSubject,
    Normative,
    VagueEvaluation,
    IncompleteSentence,
    Shorthand,
}

impl RejectReason {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TooShort => "too_short",
            Self::DemonstrativeStart => "demonstrative_start",
            Self::VagueSubject => "vague_subject",
            Self::Normative => "normative",
            Self::VagueEvaluation => "vague_evaluation",
            Self::IncompleteSentence => "incomplete_sentence",
            Self::Shorthand => "shorthand",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVerdict {
    Keep,
    Reject(RejectReason),
}

impl FilterVerdict {
    #[must_use]
    pub const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }
}

const DEMONSTRATIVES: &[&str] = &["this", "that", "these", "those", "it", "here", "there"];

/// Nouns that make a demonstrative opening concrete ("this incident ...").
const CONCRETE_NOUNS: &[&str] = &[
    "incident", "person", "case", "event", "bill", "law", "ruling", "decision", "election",
    "policy", "statement", "report", "verdict", "protest",
];

const VAGUE_PRONOUNS: &[&str] = &["we", "they", "everyone", "everybody"];

/// Collective nouns; vague unless they open a proper name ("People Power Party").
const VAGUE_COLLECTIVES: &[&str] = &["people", "leftists", "conservatives", "liberals", "moms"];

/// Closers allowed after sentence-final punctuation.
const CLOSERS: [char; 6] = ['"', '\'', ')', ']', '\u{201D}', '\u{2019}'];

const SHORTHAND: &[&str] = &["lol", "lmao", "smh", "tbh", "imo", "imho", "omg", "wtf"];

const KO_DEMONSTRATIVE_PREFIXES: &[&str] = &[
    "이는 ", "이는,", "이것은 ", "이것이 ", "그것은 ", "그것이 ", "여기는 ", "거기는 ", "저기는 ",
];
const KO_BARE_DEMONSTRATIVES: &[&str] = &["이 ", "그 ", "저 "];
const KO_CONCRETE_DEMONSTRATIVES: &[&str] = &["이 사건", "이 사람", "이 일", "그 사건", "그 사람"];
const KO_VAGUE_SUBJECTS: &[&str] = &[
    "우리가 ", "우리는 ", "이들은 ", "이들이 ", "그들은 ", "그들이 ", "엄마들이 ", "좌파들이 ",
    "보수들이 ", "사람들이 ",
];
const KO_NORMATIVE: &[&str] = &["해야 한다", "해야한다", "하자", "드리자", "말아야", "되어야"];
const KO_VAGUE_EVALUATIONS: &[&str] = &[
    "웃기다", "다행", "부당", "적절", "나쁜", "좋은", "이상하다", "복잡하다", "어렵다", "쉽다",
];
const KO_CONCRETE_SUBJECTS: &[&str] = &[
    "민주당", "국민의힘", "윤석열", "이재명", "경찰", "검찰", "법원", "정부", "국회", "대통령",
    "의원", "장관", "판사", "검사",
];

#[expect(clippy::expect_used, reason = "filter patterns are static")]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static filter pattern should compile")
}

static NORMATIVE: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)\b(should|must|let['’]s|ought to|needs? to|ha(ve|s) to)\b")
});

static VAGUE_EVALUATION: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)\b(ridiculous|unfair|outrageous|absurd|crazy|insane|terrible|awful|disgraceful|shameful|weird|strange|pathetic)\b",
    )
});

static INSTITUTION: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)\b(police|prosecutors?|court|judge|government|ministry|minister|parliament|congress|senate|president|governor|mayor|assembly)\b",
    )
});

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| compile(r#"(?:[.!?]["'”’)\]]*|[다까냐요음][,.!?"']|다)$"#));

/// Leading alphabetic run of a word, lowercased ("It's" -> "it").
fn head_word(word: &str) -> String {
    word.chars()
        .take_while(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

const fn is_hangul_consonant(c: char) -> bool {
    matches!(c, '\u{3131}'..='\u{314E}')
}

/// Deterministic surface-claim filter.
#[derive(Debug, Clone, Copy)]
pub struct FastFilter {
    min_chars: usize,
}

impl Default for FastFilter {
    fn default() -> Self {
        Self::new(10)
    }
}

impl FastFilter {
    #[must_use]
    pub const fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    /// Judge one surface claim. Same input, same verdict.
    #[must_use]
    pub fn check(&self, text: &str) -> FilterVerdict {
        match self.first_rejection(text.trim()) {
            Some(reason) => FilterVerdict::Reject(reason),
            None => FilterVerdict::Keep,
        }
    }

    fn first_rejection(&self, text: &str) -> Option<RejectReason> {
        if text.chars().count() < self.min_chars {
            return Some(RejectReason::TooShort);
        }

        let mut words = text.split_whitespace();
        let first_raw = words.next().unwrap_or_default();
        let second_raw = words.next().unwrap_or_default();
        let first = head_word(first_raw);
        let second = head_word(second_raw);

        if Self::demonstrative_start(text, &first, &second) {
            return Some(RejectReason::DemonstrativeStart);
        }

        if VAGUE_PRONOUNS.contains(&first.as_str())
            || (VAGUE_COLLECTIVES.contains(&first.as_str())
                && !(starts_uppercase(first_raw) && starts_uppercase(second_raw)))
            || KO_VAGUE_SUBJECTS.iter().any(|s| text.starts_with(s))
        {
            return Some(RejectReason::VagueSubject);
        }

        if NORMATIVE.is_match(text) || KO_NORMATIVE.iter().any(|n| text.contains(n)) {
            return Some(RejectReason::Normative);
        }

        let vague = VAGUE_EVALUATION.is_match(text)
            || KO_VAGUE_EVALUATIONS.iter().any(|v| text.contains(v));
        if vague && !Self::has_concrete_subject(text) {
            return Some(RejectReason::VagueEvaluation);
        }

        if !SENTENCE_END.is_match(text) {
            return Some(RejectReason::IncompleteSentence);
        }

        if SHORTHAND.contains(&first.as_str())
            || text.chars().take(3).any(is_hangul_consonant)
        {
            return Some(RejectReason::Shorthand);
        }

        None
    }

    fn demonstrative_start(text: &str, first: &str, second: &str) -> bool {
        if DEMONSTRATIVES.contains(&first) {
            return !CONCRETE_NOUNS.contains(&second);
        }
        if KO_DEMONSTRATIVE_PREFIXES.iter().any(|p| text.starts_with(p)) {
            return true;
        }
        KO_BARE_DEMONSTRATIVES.iter().any(|p| text.starts_with(p))
            && !KO_CONCRETE_DEMONSTRATIVES.iter().any(|p| text.starts_with(p))
    }

    /// A known institution or office, or a capitalized name.
    fn has_concrete_subject(text: &str) -> bool {
        INSTITUTION.is_match(text)
            || KO_CONCRETE_SUBJECTS.iter().any(|s| text.contains(s))
            || Self::has_capitalized_name(text)
    }

    /// Capitalization only counts mid-sentence, and never for the pronoun "I".
    fn has_capitalized_name(text: &str) -> bool {
        let mut sentence_start = true;
        for word in text.split_whitespace() {
            if !sentence_start && starts_uppercase(word) && head_word(word) != "i" {
                return true;
            }
            sentence_start = word.trim_end_matches(CLOSERS).ends_with(['.', '!', '?']);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(text: &str) -> FilterVerdict {
        FastFilter::default().check(text)
    }

    fn rejected(text: &str, reason: RejectReason) {
        assert_eq!(verdict(text), FilterVerdict::Reject(reason), "{text}");
    }

    #[test]
    fn keeps_concrete_claims() {
        for text in [
            "The Seoul Central District Court sentenced the former mayor on Monday.",
            "Police arrested three protesters outside the National Assembly.",
            "This incident happened at the Gwanghwamun rally last week.",
            "민주당이 특검법을 국회에서 단독으로 통과시켰다.",
            "검찰이 전 장관을 불구속 기소했다",
        ] {
            assert_eq!(verdict(text), FilterVerdict::Keep, "{text}");
        }
    }

    #[test]
    fn rejects_short_fragments() {
        rejected("Too short", RejectReason::TooShort);
        rejected("   hi.    ", RejectReason::TooShort);
    }

    #[test]
    fn rejects_demonstrative_openings() {
        rejected("this is outrageous", RejectReason::DemonstrativeStart);
        rejected("It's happening again, as expected.", RejectReason::DemonstrativeStart);
        rejected("이것은 정말 심각한 문제다.", RejectReason::DemonstrativeStart);
        rejected("그 말이 맞는 것 같다.", RejectReason::DemonstrativeStart);
    }

    #[test]
    fn rejects_vague_subjects() {
        rejected("They always get away with everything.", RejectReason::VagueSubject);
        rejected("사람들이 다 알고 있는 사실이다.", RejectReason::VagueSubject);
        rejected("People are tired of the same old promises.", RejectReason::VagueSubject);
        rejected("We Koreans never learn from history.", RejectReason::VagueSubject);
    }

    #[test]
    fn collective_noun_opening_a_party_name_is_kept() {
        assert!(verdict("People Power Party lawmakers walked out of the National Assembly.").is_keep());
        assert!(verdict("Conservatives Unite staged a sit-in at Seoul Station.").is_keep());
    }

    #[test]
    fn rejects_normative_statements() {
        rejected("The prosecutors should resign immediately.", RejectReason::Normative);
        rejected("Citizens need to wake up before the vote.", RejectReason::Normative);
        rejected("정부는 즉시 사과해야 한다.", RejectReason::Normative);
    }

    #[test]
    fn vague_evaluation_needs_concrete_subject() {
        rejected("The whole thing is just ridiculous.", RejectReason::VagueEvaluation);
        assert_eq!(
            verdict("The court ruling on the election appeal was absurd."),
            FilterVerdict::Keep
        );
        assert_eq!(
            verdict("The statement by Minister Han was absurd."),
            FilterVerdict::Keep
        );
    }

    #[test]
    fn first_person_and_new_sentences_are_not_names() {
        rejected("Honestly I think the whole thing is ridiculous.", RejectReason::VagueEvaluation);
        rejected("I'm sure it was all rather absurd.", RejectReason::VagueEvaluation);
        rejected("The whole thing is ridiculous. Really.", RejectReason::VagueEvaluation);
        rejected("What a crazy week! Unbelievable.", RejectReason::VagueEvaluation);
    }

    #[test]
    fn rejects_unfinished_sentences() {
        rejected("The ruling party and its allies in the assembly", RejectReason::IncompleteSentence);
        assert!(verdict("The mayor announced a new budget (again).").is_keep());
        assert!(verdict("The senator said \"no comment.\"").is_keep());
    }

    #[test]
    fn rejects_shorthand() {
        rejected("lol the committee voted against it again.", RejectReason::Shorthand);
        rejected("ㅋㅋ 결국 또 그렇게 되었다.", RejectReason::Shorthand);
    }

    #[test]
    fn verdict_is_deterministic() {
        let filter = FastFilter::default();
        for text in ["this is outrageous", "Police arrested three protesters outside the court."] {
            assert_eq!(filter.check(text), filter.check(text));
        }
    }
}
