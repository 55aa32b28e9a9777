//! A small command language over the [`Engine`], used by the binary and handy
//! in tests.
//!
//! Commands are separated by `;` or line breaks, `#` starts a comment line:
//!
//! ```text
//! add root كتب; add scheme فاعل 1َا2ِ3
//! derive كتب فاعل
//! decompose كَاتِب
//! ```
//!
//! The whole script is parsed before anything runs, so a typo on the last
//! line leaves the registries untouched.
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};

use crate::construct::Database;
use crate::engine::Engine;
use crate::error::{Result, SarfError};

lazy_static! {
    static ref ADD_ROOT: Regex = Regex::new(r"^add\s+root\s+(\S+)$").unwrap();
    static ref REMOVE_ROOT: Regex = Regex::new(r"^remove\s+root\s+(\S+)$").unwrap();
    static ref FIND_ROOT: Regex = Regex::new(r"^find\s+root\s+(\S+)$").unwrap();
    static ref LIST_ROOTS: Regex = Regex::new(
        r"^list\s+roots(?:\s+prefix\s+(\S+))?(?:\s+offset\s+(\d+))?(?:\s+limit\s+(\d+))?$"
    )
    .unwrap();
    static ref COUNT_ROOTS: Regex = Regex::new(r"^count\s+roots(?:\s+prefix\s+(\S+))?$").unwrap();
    static ref ADD_SCHEME: Regex = Regex::new(r"^add\s+scheme\s+(\S+)\s+(\S+)$").unwrap();
    static ref UPDATE_SCHEME: Regex = Regex::new(r"^update\s+scheme\s+(\S+)\s+(\S+)$").unwrap();
    static ref REMOVE_SCHEME: Regex = Regex::new(r"^remove\s+scheme\s+(\S+)$").unwrap();
    static ref FIND_SCHEME: Regex = Regex::new(r"^find\s+scheme\s+(\S+)$").unwrap();
    static ref LIST_SCHEMES: Regex = Regex::new(r"^list\s+schemes$").unwrap();
    static ref CLASSIFY: Regex = Regex::new(r"^classify\s+(\S+)$").unwrap();
    static ref DERIVE: Regex = Regex::new(r"^derive\s+(\S+)\s+(\S+)$").unwrap();
    static ref FAMILY: Regex = Regex::new(r"^family\s+(\S+)$").unwrap();
    static ref DERIVATIVES: Regex = Regex::new(r"^derivatives\s+(\S+)$").unwrap();
    static ref DECOMPOSE_ALL: Regex = Regex::new(r"^decompose\s+all\s+(\S+)$").unwrap();
    static ref DECOMPOSE: Regex = Regex::new(r"^decompose\s+(\S+)$").unwrap();
    static ref IDENTIFY: Regex = Regex::new(r"^identify\s+(\S+)\s+(\S+)$").unwrap();
    static ref VALIDATE: Regex = Regex::new(r"^validate\s+(\S+)\s+(\S+)$").unwrap();
    static ref WORDS: Regex = Regex::new(r"^words\s+(\S+)$").unwrap();
    static ref STATS: Regex = Regex::new(r"^stats$").unwrap();
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    AddRoot(String),
    RemoveRoot(String),
    FindRoot(String),
    ListRoots { prefix: Option<String>, offset: usize, limit: Option<usize> },
    CountRoots(Option<String>),
    AddScheme { name: String, rule: String },
    UpdateScheme { name: String, rule: String },
    RemoveScheme(String),
    FindScheme(String),
    ListSchemes,
    Classify(String),
    Derive { root: String, scheme: String },
    Family(String),
    Derivatives(String),
    Decompose(String),
    DecomposeAll(String),
    Identify { word: String, root: String },
    Validate { word: String, root: String },
    Words(String),
    Stats,
}

impl Command {
    pub fn parse(statement: &str) -> Option<Self> {
        let s = statement.trim();
        if let Some(r) = first(&ADD_ROOT, s) {
            return Some(Command::AddRoot(r));
        }
        if let Some(r) = first(&REMOVE_ROOT, s) {
            return Some(Command::RemoveRoot(r));
        }
        if let Some(r) = first(&FIND_ROOT, s) {
            return Some(Command::FindRoot(r));
        }
        if let Some(c) = LIST_ROOTS.captures(s) {
            return Some(Command::ListRoots {
                prefix: c.get(1).map(|m| m.as_str().to_string()),
                offset: c.get(2).and_then(|m| m.as_str().parse().ok()).unwrap_or(0),
                limit: c.get(3).and_then(|m| m.as_str().parse().ok()),
            });
        }
        if let Some(c) = COUNT_ROOTS.captures(s) {
            return Some(Command::CountRoots(c.get(1).map(|m| m.as_str().to_string())));
        }
        if let Some(c) = ADD_SCHEME.captures(s) {
            return Some(Command::AddScheme { name: c[1].to_string(), rule: c[2].to_string() });
        }
        if let Some(c) = UPDATE_SCHEME.captures(s) {
            return Some(Command::UpdateScheme { name: c[1].to_string(), rule: c[2].to_string() });
        }
        if let Some(n) = first(&REMOVE_SCHEME, s) {
            return Some(Command::RemoveScheme(n));
        }
        if let Some(n) = first(&FIND_SCHEME, s) {
            return Some(Command::FindScheme(n));
        }
        if LIST_SCHEMES.is_match(s) {
            return Some(Command::ListSchemes);
        }
        if let Some(r) = first(&CLASSIFY, s) {
            return Some(Command::Classify(r));
        }
        if let Some(c) = DERIVE.captures(s) {
            return Some(Command::Derive { root: c[1].to_string(), scheme: c[2].to_string() });
        }
        if let Some(r) = first(&FAMILY, s) {
            return Some(Command::Family(r));
        }
        if let Some(r) = first(&DERIVATIVES, s) {
            return Some(Command::Derivatives(r));
        }
        if let Some(w) = first(&DECOMPOSE_ALL, s) {
            return Some(Command::DecomposeAll(w));
        }
        if let Some(w) = first(&DECOMPOSE, s) {
            return Some(Command::Decompose(w));
        }
        if let Some(c) = IDENTIFY.captures(s) {
            return Some(Command::Identify { word: c[1].to_string(), root: c[2].to_string() });
        }
        if let Some(c) = VALIDATE.captures(s) {
            return Some(Command::Validate { word: c[1].to_string(), root: c[2].to_string() });
        }
        if let Some(n) = first(&WORDS, s) {
            return Some(Command::Words(n));
        }
        if STATS.is_match(s) {
            return Some(Command::Stats);
        }
        None
    }

    fn name(&self) -> &'static str {
        match self {
            Command::AddRoot(_) => "add root",
            Command::RemoveRoot(_) => "remove root",
            Command::FindRoot(_) => "find root",
            Command::ListRoots { .. } => "list roots",
            Command::CountRoots(_) => "count roots",
            Command::AddScheme { .. } => "add scheme",
            Command::UpdateScheme { .. } => "update scheme",
            Command::RemoveScheme(_) => "remove scheme",
            Command::FindScheme(_) => "find scheme",
            Command::ListSchemes => "list schemes",
            Command::Classify(_) => "classify",
            Command::Derive { .. } => "derive",
            Command::Family(_) => "family",
            Command::Derivatives(_) => "derivatives",
            Command::Decompose(_) => "decompose",
            Command::DecomposeAll(_) => "decompose all",
            Command::Identify { .. } => "identify",
            Command::Validate { .. } => "validate",
            Command::Words(_) => "words",
            Command::Stats => "stats",
        }
    }
}

/// Splits a script into statements and parses each, reporting the first bad
/// statement with its line number.
pub fn parse(script: &str) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    for (index, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        for statement in line.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            match Command::parse(statement) {
                Some(command) => commands.push(command),
                None => {
                    return Err(SarfError::Parse {
                        message: format!("unrecognized command '{}'", statement),
                        line: Some(index + 1),
                    });
                }
            }
        }
    }
    Ok(commands)
}

pub struct Interpreter<'db> {
    engine: Engine<'db>,
    page_size: usize,
}

impl<'db> Interpreter<'db> {
    pub fn new(database: &'db Database) -> Self {
        Self {
            engine: Engine::new(database),
            page_size: 50,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn engine(&self) -> &Engine<'db> {
        &self.engine
    }

    /// Runs every command and returns one JSON object per command. A root or
    /// template the engine rejects is reported in that command's object; only
    /// parse errors and engine failures abort the script.
    pub fn execute_collect(&self, script: &str) -> Result<Vec<Value>> {
        parse(script)?.iter().map(|c| self.run(c)).collect()
    }

    fn run(&self, command: &Command) -> Result<Value> {
        let result = match self.outcome(command) {
            Ok(value) => json!({ "command": command.name(), "result": value }),
            Err(e @ (SarfError::InvalidRoot { .. } | SarfError::InvalidTemplate { .. })) => {
                json!({ "command": command.name(), "error": e.to_string() })
            }
            Err(e) => return Err(e),
        };
        Ok(result)
    }

    fn outcome(&self, command: &Command) -> Result<Value> {
        let engine = &self.engine;
        match command {
            Command::AddRoot(r) => to_json(engine.register_root(r)?),
            Command::RemoveRoot(r) => to_json(engine.remove_root(r)?),
            Command::FindRoot(r) => match engine.find_root(r)? {
                Some(node) => to_json(node.summary()?),
                None => Ok(Value::Null),
            },
            Command::ListRoots { prefix, offset, limit } => to_json(engine.list_roots(
                prefix.as_deref(),
                *offset,
                limit.unwrap_or(self.page_size),
            )?),
            Command::CountRoots(prefix) => to_json(engine.count_roots(prefix.as_deref())?),
            Command::AddScheme { name, rule } => to_json(engine.register_scheme(name, rule)?),
            Command::UpdateScheme { name, rule } => to_json(engine.update_scheme(name, rule)?),
            Command::RemoveScheme(n) => to_json(engine.remove_scheme(n)?),
            Command::FindScheme(n) => to_json(engine.find_scheme(n)?.as_deref()),
            Command::ListSchemes => {
                let templates = engine.list_schemes()?;
                to_json(templates.iter().map(|t| t.as_ref()).collect::<Vec<_>>())
            }
            Command::Classify(r) => {
                let root = engine.classify(r)?;
                Ok(json!({
                    "root": root.spelling(),
                    "letters": root.letters(),
                    "category": root.category(),
                    "has_glottal": root.has_glottal(),
                    "explanation": root.explanation(),
                }))
            }
            Command::Derive { root, scheme } => to_json(engine.derive_word(root, scheme)?),
            Command::Family(r) => to_json(engine.derive_family(r)?),
            Command::Derivatives(r) => to_json(engine.derivatives(r)?),
            Command::Decompose(w) => to_json(engine.decompose(w)?),
            Command::DecomposeAll(w) => to_json(engine.decompose_all(w)?),
            Command::Identify { word, root } => to_json(engine.identify_scheme(word, root)?),
            Command::Validate { word, root } => to_json(engine.validate_word(word, root)?),
            Command::Words(n) => to_json(engine.words_for_scheme(n)?),
            Command::Stats => to_json(engine.statistics()?),
        }
    }
}

fn first(re: &Regex, statement: &str) -> Option<String> {
    re.captures(statement).map(|c| c[1].to_string())
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
