//! Operations over a [`Database`]: registering roots and templates, deriving
//! words, and taking words apart again.
//!
//! Lookups hold a registry's read lock only long enough to clone the `Arc` of
//! what they found. Recording a derivation then locks just that root's node.
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::alphabet;
use crate::classify;
use crate::construct::{Category, Database, DerivedWord, Root, RootNode, Template};
use crate::error::Result;
use crate::scheme;
use crate::transform;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Insertion {
    Added,
    AlreadyExists,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Removal {
    Removed,
    NotFound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Update {
    Updated,
    NotFound,
}

/// Outcome of one derivation. Unknown roots or templates and failed
/// substitutions are reported here rather than as errors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GeneratedWord {
    pub surface: Option<String>,
    pub root: String,
    pub scheme: Option<String>,
    pub success: bool,
    pub message: String,
}

impl GeneratedWord {
    fn failed(root: &str, scheme: Option<&str>, message: String) -> Self {
        Self {
            surface: None,
            root: root.to_string(),
            scheme: scheme.map(str::to_string),
            success: false,
            message,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Decomposition {
    pub word: String,
    pub root: String,
    pub scheme: String,
    pub category: Category,
    /// Characters the template adds around the root letters.
    pub added_elements: Vec<char>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub word: String,
    pub root: String,
    pub valid: bool,
    pub scheme: Option<String>,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SchemeUsage {
    pub root: String,
    pub surface: String,
    pub frequency: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct Statistics {
    pub roots: usize,
    pub schemes: usize,
    pub distinct_derivatives: usize,
    pub total_derivations: u64,
    pub average_derivatives: f64,
    pub roots_by_category: BTreeMap<&'static str, usize>,
    pub tree_height: i32,
    pub load_factor: f64,
    pub collisions: usize,
    pub longest_chain: usize,
}

pub struct Engine<'db> {
    database: &'db Database,
}

impl<'db> Engine<'db> {
    pub fn new(database: &'db Database) -> Self {
        Self { database }
    }

    // ------------- roots -------------
    pub fn classify(&self, text: &str) -> Result<Root> {
        classify::classify(text)
    }

    pub fn register_root(&self, text: &str) -> Result<Insertion> {
        let root = classify::classify(text)?;
        let spelling = root.spelling().to_string();
        let category = root.category();
        let added = self.database.root_keeper.write()?.insert(RootNode::new(root));
        if added {
            info!(root = %spelling, %category, "root registered");
            Ok(Insertion::Added)
        } else {
            debug!(root = %spelling, "root already registered");
            Ok(Insertion::AlreadyExists)
        }
    }

    pub fn remove_root(&self, text: &str) -> Result<Removal> {
        if self.database.root_keeper.write()?.delete(text) {
            info!(root = %text.trim(), "root removed");
            Ok(Removal::Removed)
        } else {
            Ok(Removal::NotFound)
        }
    }

    pub fn find_root(&self, text: &str) -> Result<Option<Arc<RootNode>>> {
        Ok(self.database.root_keeper.read()?.search(text))
    }

    /// Registered spellings in lexicographic order, optionally restricted to
    /// those starting with `prefix`, paged by `offset` and `limit`.
    pub fn list_roots(&self, prefix: Option<&str>, offset: usize, limit: usize) -> Result<Vec<String>> {
        let prefix = prefix.map(str::trim).unwrap_or("");
        Ok(self
            .database
            .root_keeper
            .read()?
            .inorder()
            .into_iter()
            .filter(|r| r.starts_with(prefix))
            .skip(offset)
            .take(limit)
            .collect())
    }

    pub fn count_roots(&self, prefix: Option<&str>) -> Result<usize> {
        let keeper = self.database.root_keeper.read()?;
        Ok(match prefix.map(str::trim) {
            None | Some("") => keeper.len(),
            Some(p) => keeper.inorder().iter().filter(|r| r.starts_with(p)).count(),
        })
    }

    /// Derived words of a root, most frequent first.
    pub fn derivatives(&self, text: &str) -> Result<Option<Vec<DerivedWord>>> {
        match self.find_root(text)? {
            Some(node) => Ok(Some(node.ranked_words()?)),
            None => Ok(None),
        }
    }

    // ------------- schemes -------------
    pub fn register_scheme(&self, name: &str, rule: &str) -> Result<Insertion> {
        self.register_template(Template::new(name, rule)?)
    }

    pub fn register_template(&self, template: Template) -> Result<Insertion> {
        let mut keeper = self.database.scheme_keeper.write()?;
        if keeper.contains(template.name()) {
            debug!(scheme = %template.name(), "scheme already registered");
            return Ok(Insertion::AlreadyExists);
        }
        info!(scheme = %template.name(), rule = %template.rule(), "scheme registered");
        keeper.insert(template);
        Ok(Insertion::Added)
    }

    /// Replaces the rule of a known template, keeping its id.
    pub fn update_scheme(&self, name: &str, rule: &str) -> Result<Update> {
        let mut keeper = self.database.scheme_keeper.write()?;
        let Some(existing) = keeper.search(name) else {
            // still report a bad rule before a missing name
            Template::new(name, rule)?;
            return Ok(Update::NotFound);
        };
        let id = if existing.id() == existing.name() { name.trim() } else { existing.id() };
        let template = Template::with_id(name, rule, id)?;
        info!(scheme = %template.name(), rule = %template.rule(), "scheme updated");
        keeper.insert(template);
        Ok(Update::Updated)
    }

    pub fn remove_scheme(&self, name: &str) -> Result<Removal> {
        if self.database.scheme_keeper.write()?.delete(name) {
            info!(scheme = %name.trim(), "scheme removed");
            Ok(Removal::Removed)
        } else {
            Ok(Removal::NotFound)
        }
    }

    pub fn find_scheme(&self, name: &str) -> Result<Option<Arc<Template>>> {
        Ok(self.database.scheme_keeper.read()?.search(name))
    }

    pub fn list_schemes(&self) -> Result<Vec<Arc<Template>>> {
        Ok(self.database.scheme_keeper.read()?.templates())
    }

    // ------------- derivation -------------
    pub fn derive_word(&self, root_text: &str, scheme_name: &str) -> Result<GeneratedWord> {
        let root_text = root_text.trim();
        let scheme_name = scheme_name.trim();
        let Some(node) = self.find_root(root_text)? else {
            return Ok(GeneratedWord::failed(
                root_text,
                Some(scheme_name),
                format!("root '{}' is not registered", root_text),
            ));
        };
        let Some(template) = self.find_scheme(scheme_name)? else {
            return Ok(GeneratedWord::failed(
                root_text,
                Some(scheme_name),
                format!("scheme '{}' is not registered", scheme_name),
            ));
        };
        self.derive_with(&node, &template)
    }

    /// One derivation per registered template, in registration order.
    pub fn derive_family(&self, root_text: &str) -> Result<Vec<GeneratedWord>> {
        let root_text = root_text.trim();
        let Some(node) = self.find_root(root_text)? else {
            return Ok(vec![GeneratedWord::failed(
                root_text,
                None,
                format!("root '{}' is not registered", root_text),
            )]);
        };
        let family = self
            .list_schemes()?
            .iter()
            .map(|template| self.derive_with(&node, template))
            .collect::<Result<Vec<_>>>()?;
        info!(root = %root_text, words = family.len(), "family derived");
        Ok(family)
    }

    fn derive_with(&self, node: &RootNode, template: &Template) -> Result<GeneratedWord> {
        let root = node.root();
        let raw = match scheme::apply(template, root.spelling()) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(root = %root, scheme = %template.name(), error = %e, "substitution failed");
                return Ok(GeneratedWord::failed(root.spelling(), Some(template.name()), e.to_string()));
            }
        };
        let surface = transform::transform(&raw, root, template.shape());
        let frequency = node.record(&surface)?;
        debug!(root = %root, scheme = %template.name(), %surface, frequency, "word derived");
        let mut message = format!("derived {}", surface);
        if root.category() != Category::Regular {
            message.push_str(&format!(" ({} root)", root.category()));
        }
        Ok(GeneratedWord {
            surface: Some(surface),
            root: root.spelling().to_string(),
            scheme: Some(template.name().to_string()),
            success: true,
            message,
        })
    }

    // ------------- decomposition -------------
    /// The first (root, template) pair, in root order then template order,
    /// whose derivation spells `word`. A pair that matches every written mark
    /// wins over one that only matches the bare letters.
    pub fn decompose(&self, word: &str) -> Result<Option<Decomposition>> {
        Ok(self.search_decompositions(word, true)?.into_iter().next())
    }

    pub fn decompose_all(&self, word: &str) -> Result<Vec<Decomposition>> {
        let found = self.search_decompositions(word, false)?;
        debug!(word = %word.trim(), candidates = found.len(), "decomposed");
        Ok(found)
    }

    fn search_decompositions(&self, word: &str, first_only: bool) -> Result<Vec<Decomposition>> {
        let word = word.trim();
        if word.is_empty() {
            return Ok(Vec::new());
        }
        let target = Target::new(word);
        let nodes = self.database.root_keeper.read()?.all_nodes();
        let templates = self.list_schemes()?;
        // exact spellings first, then words that only agree once marks are stripped
        let mut exact = Vec::new();
        let mut loose = Vec::new();
        for node in &nodes {
            for template in &templates {
                let found = match target.matches(node.root(), template) {
                    Some(Match::Exact) => &mut exact,
                    Some(Match::Loose) => &mut loose,
                    None => continue,
                };
                found.push(Decomposition {
                    word: word.to_string(),
                    root: node.spelling().to_string(),
                    scheme: template.name().to_string(),
                    category: node.root().category(),
                    added_elements: added_elements(template),
                });
                if first_only && !exact.is_empty() {
                    return Ok(exact);
                }
            }
        }
        exact.append(&mut loose);
        if first_only {
            exact.truncate(1);
        }
        Ok(exact)
    }

    /// Which template derives `word` from the given registered root.
    pub fn identify_scheme(&self, word: &str, root_text: &str) -> Result<Option<String>> {
        let Some(node) = self.find_root(root_text)? else {
            return Ok(None);
        };
        let target = Target::new(word.trim());
        let templates = self.list_schemes()?;
        let mut loose = None;
        for template in &templates {
            match target.matches(node.root(), template) {
                Some(Match::Exact) => return Ok(Some(template.name().to_string())),
                Some(Match::Loose) if loose.is_none() => loose = Some(template.name().to_string()),
                _ => {}
            }
        }
        Ok(loose)
    }

    /// Checks that `word` derives from the root; a confirmed word is recorded
    /// as a derivative of it.
    pub fn validate_word(&self, word: &str, root_text: &str) -> Result<Validation> {
        let word = word.trim();
        let root_text = root_text.trim();
        let mut validation = Validation {
            word: word.to_string(),
            root: root_text.to_string(),
            valid: false,
            scheme: None,
            message: String::new(),
        };
        let Some(node) = self.find_root(root_text)? else {
            validation.message = format!("root '{}' is not registered", root_text);
            return Ok(validation);
        };
        match self.identify_scheme(word, root_text)? {
            Some(scheme) => {
                node.record(word)?;
                validation.message = format!("'{}' derives from '{}' with '{}'", word, root_text, scheme);
                validation.valid = true;
                validation.scheme = Some(scheme);
            }
            None => {
                validation.message = format!("'{}' does not derive from '{}'", word, root_text);
            }
        }
        Ok(validation)
    }

    /// Roots that have produced the word the template derives from them.
    pub fn words_for_scheme(&self, scheme_name: &str) -> Result<Vec<SchemeUsage>> {
        let Some(template) = self.find_scheme(scheme_name)? else {
            return Ok(Vec::new());
        };
        let nodes = self.database.root_keeper.read()?.all_nodes();
        let mut usages = Vec::new();
        for node in nodes {
            let Ok(raw) = scheme::apply(&template, node.spelling()) else {
                continue;
            };
            let surface = transform::transform(&raw, node.root(), template.shape());
            if let Some(derived) = node.derived(&surface)? {
                usages.push(SchemeUsage {
                    root: node.spelling().to_string(),
                    surface,
                    frequency: derived.frequency,
                });
            }
        }
        Ok(usages)
    }

    pub fn statistics(&self) -> Result<Statistics> {
        let (nodes, tree_height) = {
            let keeper = self.database.root_keeper.read()?;
            (keeper.all_nodes(), keeper.height())
        };
        let (schemes, load_factor, collisions, longest_chain) = {
            let keeper = self.database.scheme_keeper.read()?;
            (keeper.len(), keeper.load_factor(), keeper.collisions(), keeper.longest_chain())
        };
        let mut distinct_derivatives = 0;
        let mut total_derivations = 0;
        let mut roots_by_category: BTreeMap<&'static str, usize> =
            Category::ALL.iter().map(|c| (c.name(), 0)).collect();
        for node in &nodes {
            distinct_derivatives += node.distinct_derivations()?;
            total_derivations += node.total_derivations()?;
            *roots_by_category.entry(node.root().category().name()).or_insert(0) += 1;
        }
        let average_derivatives = if nodes.is_empty() {
            0.0
        } else {
            distinct_derivatives as f64 / nodes.len() as f64
        };
        Ok(Statistics {
            roots: nodes.len(),
            schemes,
            distinct_derivatives,
            total_derivations,
            average_derivatives,
            roots_by_category,
            tree_height,
            load_factor,
            collisions,
            longest_chain,
        })
    }
}

/// A word being decomposed. Vocalized input is first compared mark for mark;
/// input with only some marks (a lone shadda, say) still matches once marks
/// are stripped from both sides.
struct Target {
    vocalized: Option<String>,
    bare: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Match {
    Exact,
    Loose,
}

impl Target {
    fn new(word: &str) -> Self {
        let vocalized = alphabet::has_marks(word).then(|| alphabet::canonical(word));
        let bare = alphabet::canonical(&alphabet::strip_marks(word));
        Self { vocalized, bare }
    }
    fn matches(&self, root: &Root, template: &Template) -> Option<Match> {
        let raw = scheme::apply(template, root.spelling()).ok()?;
        let candidate = transform::transform(&raw, root, template.shape());
        if let Some(vocalized) = &self.vocalized {
            if alphabet::canonical(&candidate) == *vocalized {
                return Some(Match::Exact);
            }
        }
        if alphabet::canonical(&alphabet::strip_marks(&candidate)) == self.bare {
            return Some(if self.vocalized.is_some() { Match::Loose } else { Match::Exact });
        }
        None
    }
}

fn added_elements(template: &Template) -> Vec<char> {
    template
        .rule()
        .chars()
        .filter(|c| !matches!(c, '1' | '2' | '3'))
        .collect()
}
