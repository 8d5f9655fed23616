/// Data layer: table model, file I/O, and row selection.
///
/// Architecture:
/// ```text
///  corpus .tsv / .dic / term list / labels .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode UTF-8/UTF-16 → Table, Lexicon, term list, lookup
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  Vec<Vec<String>>, two header rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  label predicates → row indices
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
