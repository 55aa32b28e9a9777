//! Sarf – classification, derivation and decomposition of triliteral roots.
//!
//! Words in root-and-pattern morphology are built by slotting the three
//! consonants of a *root* into a *template*. Sarf models that process:
//! * A [`construct::Root`] is three validated consonants with a
//!   [`construct::Category`] describing which of them are weak (semivowels),
//!   doubled or glottal.
//! * A [`construct::Template`] is a named rule in which the markers `1`, `2`
//!   and `3` stand for the root letters, e.g. `1َا2ِ3` for the active participle.
//! * Substituting a root into a template gives a raw word, which the
//!   [`transform`] module rewrites according to the root's category and the
//!   template's shape (so قَوَل becomes قَال and رَمَي becomes رَمَى).
//!
//! Roots and templates are owned by "keeper" structures held in a
//! [`construct::Database`]: an AVL tree for roots ([`root_keeper`]) and a
//! chained hash table for templates ([`scheme_keeper`]).
//!
//! ## Modules
//! * [`alphabet`] – Letters, diacritics and the token model for words.
//! * [`classify`] – Root validation and category detection.
//! * [`scheme`] – Template substitution and template shape detection.
//! * [`transform`] – Category-specific rewriting rules.
//! * [`engine`] – The operations: register, derive, decompose, statistics.
//! * [`import`] – Bulk loading of roots and templates from text.
//! * [`script`] – A small command language on top of the engine.
//! * [`settings`] – Layered configuration for the binary.
//!
//! ## Quick Start
//! ```
//! use sarf::{construct::Database, engine::Engine};
//! let db = Database::new();
//! let engine = Engine::new(&db);
//! engine.register_root("قول").unwrap();
//! engine.register_scheme("فعل", "1َ2َ3").unwrap();
//! let word = engine.derive_word("قول", "فعل").unwrap();
//! assert_eq!(word.surface.as_deref(), Some("قَال"));
//! let found = engine.decompose("قَال").unwrap().unwrap();
//! assert_eq!((found.root.as_str(), found.scheme.as_str()), ("قول", "فعل"));
//! ```
pub mod alphabet;
pub mod classify;
pub mod construct;
pub mod engine;
pub mod error;
pub mod import;
pub mod root_keeper;
pub mod scheme;
pub mod scheme_keeper;
pub mod script;
pub mod settings;
pub mod transform;
