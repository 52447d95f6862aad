//! Static lookup tables for role tagging and normalization (spec §4.1.2,
//! §4.1.3, §9 "Dictionaries"). Compiled into read-only arrays keyed by
//! language, as the design notes prescribe; loaded lazily and cached the
//! first time they're indexed via `once_cell::sync::Lazy`, matching the
//! teacher's lazy-static-dictionary idiom.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Organisation legal-form tokens (case-insensitive), spec §4.1.2 rule 1.
pub static ORG_LEGAL_FORMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "ооо", "зао", "оао", "пао", "ип", "ао", "тов", "пп", "фоп", "кт", "llc", "ltd", "gmbh",
        "inc", "corp", "ag", "plc", "s.a.", "sa", "bv", "nv",
    ]
    .into_iter()
    .collect()
});

/// Stop-words filtered during tokenization when `remove_stop_words=true`
/// (§4.1.1). Single-letter prepositions/conjunctions are kept separate
/// (`STRICT_STOPWORD_SINGLE_LETTERS`) because `strict_stopwords` treats them
/// specially rather than filtering them outright.
pub static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "от", "для", "по", "на", "в", "во", "к", "ко", "с", "со", "и", "или", "от кого",
        "отримувач", "платник", "платіж", "оплата", "платеж", "перевод", "переказ", "payment",
        "transfer", "from", "to", "for", "recipient", "payer",
    ]
    .into_iter()
    .collect()
});

/// Single-letter prepositions/conjunctions that `strict_stopwords` keeps out
/// of initial-candidacy (§4.1.2 rule 3).
pub static STRICT_STOPWORD_SINGLE_LETTERS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["з", "с", "и", "і", "й", "у", "в", "а", "о"].into_iter().collect());

/// Given-name dictionaries per language, nominative singular forms. Not
/// exhaustive — a production system loads a compiled gazetteer; this is the
/// representative subset the pipeline's rules are built and tested against.
pub static GIVEN_NAMES_RU: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "владимир", "александр", "дмитрий", "сергей", "андрей", "алексей", "николай", "иван",
        "мария", "елена", "ольга", "наталья", "татьяна", "дарья", "анна", "ирина", "светлана",
        "максим", "михаил", "павел", "роман", "артём", "виктор", "юрий",
    ]
    .into_iter()
    .collect()
});

pub static GIVEN_NAMES_UK: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "олександр", "дмитро", "сергій", "андрій", "олексій", "микола", "іван", "марія", "олена",
        "ольга", "наталія", "тетяна", "дарʼя", "дарʼя", "ганна", "ірина", "світлана", "максим",
        "михайло", "павло", "роман", "артем", "віктор", "юрій", "богдан", "тарас",
    ]
    .into_iter()
    .collect()
});

/// `(language, diminutive) -> full form`, spec §4.1.3 step 2.
pub static DIMINUTIVES_RU: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("саша", "александр"),
        ("дима", "дмитрий"),
        ("серёжа", "сергей"),
        ("сережа", "сергей"),
        ("вова", "владимир"),
        ("вовчик", "владимир"),
        ("маша", "мария"),
        ("даша", "дарья"),
        ("таня", "татьяна"),
        ("аня", "анна"),
        ("катя", "екатерина"),
        ("лена", "елена"),
        ("оля", "ольга"),
        ("миша", "михаил"),
        ("паша", "павел"),
        ("рома", "роман"),
        ("юра", "юрий"),
        ("витя", "виктор"),
    ]
    .into_iter()
    .collect()
});

pub static DIMINUTIVES_UK: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("сашко", "олександр"),
        ("дмитрик", "дмитро"),
        ("сергійко", "сергій"),
        ("володя", "володимир"),
        ("маша", "марія"),
        ("даша", "дарʼя"),
        ("таня", "тетяна"),
        ("ганнуся", "ганна"),
        ("оленка", "олена"),
        ("михайлик", "михайло"),
        ("юрко", "юрій"),
    ]
    .into_iter()
    .collect()
});

/// English nickname → formal-name expansion (§4.1.3, flag
/// `enable_en_nicknames`).
pub static EN_NICKNAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("bill", "William"),
        ("billy", "William"),
        ("will", "William"),
        ("bob", "Robert"),
        ("rob", "Robert"),
        ("bobby", "Robert"),
        ("dick", "Richard"),
        ("rick", "Richard"),
        ("jim", "James"),
        ("jimmy", "James"),
        ("mike", "Michael"),
        ("tony", "Anthony"),
        ("liz", "Elizabeth"),
        ("beth", "Elizabeth"),
        ("kate", "Katherine"),
        ("katie", "Katherine"),
        ("jack", "John"),
        ("chuck", "Charles"),
        ("charlie", "Charles"),
        ("maggie", "Margaret"),
        ("peggy", "Margaret"),
        ("ted", "Edward"),
        ("ned", "Edward"),
    ]
    .into_iter()
    .collect()
});

/// Particles attached to the last-name segment of an English personal name
/// (§4.1.3 EN rules).
pub static EN_PARTICLES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "van", "von", "de", "la", "du", "di", "da", "der", "den", "le", "el",
    ]
    .into_iter()
    .collect()
});

/// Titles and suffixes stripped from the final person core (§4.1.3 EN rules).
pub static EN_TITLES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["dr", "dr.", "mr", "mr.", "mrs", "mrs.", "ms", "ms.", "prof", "prof."].into_iter().collect());
pub static EN_SUFFIXES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["jr", "jr.", "sr", "sr.", "ii", "iii", "iv"].into_iter().collect());

/// Surname suffix patterns checked in `roles::looks_like_surname` (§4.1.2
/// rule 6) — stored as plain suffix strings rather than compiled regex,
/// since they are simple string-suffix tests.
pub const SURNAME_SUFFIXES_RU: &[&str] = &[
    "енко", "ук", "юк", "чук", "ов", "ова", "ев", "ева", "ин", "ина", "ский", "ская", "цкий",
    "цкая", "ян", "дзе",
];

pub const SURNAME_SUFFIXES_UK: &[&str] = &[
    "енко", "ук", "юк", "чук", "ський", "ська", "цький", "цька", "ів", "ова", "ева", "ян", "дзе",
];

/// Feminine-suffix surname patterns (spec §8 invariant: feminine surnames
/// are never converted to masculine). Order matters only for readability.
pub const FEMININE_SURNAME_SUFFIXES: &[&str] =
    &["ова", "ева", "іна", "ина", "ська", "цька", "івна", "овна", "евна"];

/// Patronymic suffix patterns (§4.1.2 rule 4): masculine then feminine.
pub const PATRONYMIC_SUFFIXES_MASC: &[&str] = &["ович", "евич", "ич"];
pub const PATRONYMIC_SUFFIXES_FEM: &[&str] = &["овна", "евна", "ична", "івна"];
