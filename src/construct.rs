use std::sync::{Arc, Mutex, RwLock};

// used to print out readable forms of a construct
use std::fmt;

use serde::Serialize;

// our own stuff that we need
use crate::error::{Result, SarfError};
use crate::root_keeper::RootKeeper;
use crate::scheme::TemplateShape;
use crate::scheme_keeper::SchemeKeeper;

// ------------- Category -------------
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Regular,
    Glottal,
    Geminate,
    Assimilated,
    Hollow,
    Defective,
    DoublyWeak,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Regular,
        Category::Glottal,
        Category::Geminate,
        Category::Assimilated,
        Category::Hollow,
        Category::Defective,
        Category::DoublyWeak,
    ];
    pub fn name(&self) -> &'static str {
        match self {
            Category::Regular => "regular",
            Category::Glottal => "glottal",
            Category::Geminate => "geminate",
            Category::Assimilated => "assimilated",
            Category::Hollow => "hollow",
            Category::Defective => "defective",
            Category::DoublyWeak => "doubly_weak",
        }
    }
    /// The traditional grammatical term for the category.
    pub fn arabic_name(&self) -> &'static str {
        match self {
            Category::Regular => "سالم",
            Category::Glottal => "مهموز",
            Category::Geminate => "مضعف",
            Category::Assimilated => "مثال",
            Category::Hollow => "أجوف",
            Category::Defective => "ناقص",
            Category::DoublyWeak => "لفيف",
        }
    }
    pub fn description(&self) -> &'static str {
        match self {
            Category::Regular => "three sound consonants, derivatives need no rewriting",
            Category::Glottal => "contains a glottal stop whose seat follows the surrounding vowels",
            Category::Geminate => "second and third letters are identical and fuse under a shadda",
            Category::Assimilated => "first letter is a semivowel that drops in present and imperative forms",
            Category::Hollow => "second letter is a semivowel that turns into a long vowel",
            Category::Defective => "third letter is a semivowel that changes at the end of the word",
            Category::DoublyWeak => "two of the three letters are semivowels",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ------------- Root -------------
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Root {
    spelling: String,
    letters: [char; 3],
    has_glottal: bool,
    category: Category,
}

impl Root {
    // Roots are only built by the classifier, which guarantees the letters
    // and the category agree with each other.
    pub(crate) fn new(spelling: String, letters: [char; 3], has_glottal: bool, category: Category) -> Self {
        Self {
            spelling,
            letters,
            has_glottal,
            category,
        }
    }
    pub fn spelling(&self) -> &str {
        &self.spelling
    }
    pub fn letters(&self) -> [char; 3] {
        self.letters
    }
    pub fn has_glottal(&self) -> bool {
        self.has_glottal
    }
    pub fn category(&self) -> Category {
        self.category
    }
    pub fn explanation(&self) -> String {
        let [l1, l2, l3] = self.letters;
        let mut text = format!(
            "{} ({} {} {}) is {} ({}): {}",
            self.spelling,
            l1,
            l2,
            l3,
            self.category,
            self.category.arabic_name(),
            self.category.description()
        );
        if self.has_glottal && self.category != Category::Glottal {
            text.push_str("; it also carries a glottal stop");
        }
        text
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.spelling)
    }
}

// ------------- Template -------------
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Template {
    name: String,
    rule: String,
    id: String,
    #[serde(skip)]
    shape: TemplateShape,
}

impl Template {
    /// A template whose id is its name. The rule must mention all three
    /// positional markers.
    pub fn new(name: &str, rule: &str) -> Result<Self> {
        Self::with_id(name, rule, name)
    }
    pub fn with_id(name: &str, rule: &str, id: &str) -> Result<Self> {
        let name = name.trim();
        let rule = rule.trim();
        if name.is_empty() {
            return Err(SarfError::invalid_template(name, "name is empty"));
        }
        if rule.is_empty() {
            return Err(SarfError::invalid_template(name, "rule is empty"));
        }
        for marker in ['1', '2', '3'] {
            if !rule.contains(marker) {
                return Err(SarfError::invalid_template(
                    name,
                    format!("rule '{}' lacks positional marker {}", rule, marker),
                ));
            }
        }
        let id = if id.trim().is_empty() { name } else { id.trim() };
        Ok(Self {
            name: name.to_string(),
            rule: rule.to_string(),
            id: id.to_string(),
            shape: TemplateShape::of(id),
        })
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn rule(&self) -> &str {
        &self.rule
    }
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn shape(&self) -> TemplateShape {
        self.shape
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.name, self.rule)
    }
}

// ------------- DerivedWord -------------
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DerivedWord {
    pub surface: String,
    pub frequency: u64,
}

#[derive(Debug, Default)]
struct Derivations {
    words: Vec<DerivedWord>,
    total: u64,
}

// ------------- RootNode -------------
/// A registered root together with everything derived from it so far. The
/// derivation list has its own lock so that deriving from one root never
/// waits on another.
#[derive(Debug)]
pub struct RootNode {
    root: Root,
    derivations: Mutex<Derivations>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RootSummary {
    pub root: String,
    pub letters: [char; 3],
    pub category: Category,
    pub has_glottal: bool,
    pub total_derivations: u64,
    pub derivatives: Vec<DerivedWord>,
}

impl RootNode {
    pub fn new(root: Root) -> Self {
        Self {
            root,
            derivations: Mutex::new(Derivations::default()),
        }
    }
    pub fn root(&self) -> &Root {
        &self.root
    }
    pub fn spelling(&self) -> &str {
        self.root.spelling()
    }
    /// Adds the surface form or bumps its frequency. Returns the new frequency.
    pub fn record(&self, surface: &str) -> Result<u64> {
        let mut derivations = self.derivations.lock()?;
        derivations.total += 1;
        if let Some(word) = derivations.words.iter_mut().find(|w| w.surface == surface) {
            word.frequency += 1;
            return Ok(word.frequency);
        }
        derivations.words.push(DerivedWord {
            surface: surface.to_string(),
            frequency: 1,
        });
        Ok(1)
    }
    /// Derived words in the order they were first produced.
    pub fn derived_words(&self) -> Result<Vec<DerivedWord>> {
        Ok(self.derivations.lock()?.words.clone())
    }
    /// Derived words, most frequent first. Ties keep their first-seen order.
    pub fn ranked_words(&self) -> Result<Vec<DerivedWord>> {
        let mut words = self.derived_words()?;
        words.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        Ok(words)
    }
    pub fn derived(&self, surface: &str) -> Result<Option<DerivedWord>> {
        let derivations = self.derivations.lock()?;
        Ok(derivations.words.iter().find(|w| w.surface == surface).cloned())
    }
    pub fn total_derivations(&self) -> Result<u64> {
        Ok(self.derivations.lock()?.total)
    }
    pub fn distinct_derivations(&self) -> Result<usize> {
        Ok(self.derivations.lock()?.words.len())
    }
    pub fn summary(&self) -> Result<RootSummary> {
        let derivations = self.derivations.lock()?;
        Ok(RootSummary {
            root: self.root.spelling().to_string(),
            letters: self.root.letters(),
            category: self.root.category(),
            has_glottal: self.root.has_glottal(),
            total_derivations: derivations.total,
            derivatives: derivations.words.clone(),
        })
    }
}

// ------------- Database -------------
/// Owns both registries. Everything that reads or changes morphological state
/// goes through an explicit `Database`, there are no process-wide stores.
#[derive(Debug, Default)]
pub struct Database {
    pub root_keeper: Arc<RwLock<RootKeeper>>,
    pub scheme_keeper: Arc<RwLock<SchemeKeeper>>,
}

impl Database {
    pub fn new() -> Self {
        Self {
            root_keeper: Arc::new(RwLock::new(RootKeeper::new())),
            scheme_keeper: Arc::new(RwLock::new(SchemeKeeper::new())),
        }
    }
    pub fn root_keeper(&self) -> Arc<RwLock<RootKeeper>> {
        Arc::clone(&self.root_keeper)
    }
    pub fn scheme_keeper(&self) -> Arc<RwLock<SchemeKeeper>> {
        Arc::clone(&self.scheme_keeper)
    }
}
